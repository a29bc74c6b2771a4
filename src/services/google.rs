use std::time::Duration;

use super::{ServiceError, Translator};

pub const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Longest input accepted per request.
pub const MAX_TRANSLATE_CHARS: usize = 5000;

/// Translator using the public Google Translate web endpoint.
pub struct GoogleTranslator {
    endpoint: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GoogleTranslator {
    pub fn new(timeout_secs: u64) -> Result<Self, ServiceError> {
        Self::with_endpoint(GOOGLE_TRANSLATE_URL, timeout_secs)
    }

    pub fn with_endpoint(endpoint: &str, timeout_secs: u64) -> Result<Self, ServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::HttpClient(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
            timeout_secs,
        })
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let len = text.chars().count();
        if len > MAX_TRANSLATE_CHARS {
            return Err(ServiceError::InputTooLong {
                len,
                max: MAX_TRANSLATE_CHARS,
            });
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .map_err(|e| ServiceError::from_reqwest(e, &self.endpoint, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response
            .json()
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;
        let translated = parse_translation(&payload)?;
        tracing::debug!(source, target, bytes = translated.len(), "Text translated");
        Ok(translated)
    }
}

/// Join the translated fragments of a `translate_a/single` response.
///
/// The payload is a nested array whose first element lists one entry per
/// sentence, each starting with the translated fragment:
/// `[[["Hallo Welt.","Hello world.",null,null,10]],null,"en"]`
pub fn parse_translation(payload: &serde_json::Value) -> Result<String, ServiceError> {
    let sentences = payload
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ServiceError::ResponseParsing("missing sentence list".into()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(ServiceError::EmptyResult);
    }
    Ok(translated)
}
