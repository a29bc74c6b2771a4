use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ServiceError, Summarizer};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Environment variable overriding the Ollama base URL.
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

const SUMMARY_SYSTEM_PROMPT: &str = "\
You are a clinical documentation assistant. Summarize the clinical note you are \
given for a hospital discharge letter. Keep every diagnosis, medication, dose and \
follow-up instruction that is stated. Do not add facts, advice or interpretation. \
Answer with the summary text only, in English, without headings or bullet points.";

/// Summarizer backed by a local Ollama instance (`/api/generate`).
pub struct OllamaSummarizer {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaSummarizer {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, ServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of the models installed on the Ollama instance.
    pub fn list_models(&self) -> Result<Vec<String>, ServiceError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ServiceError::from_reqwest(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    pub fn is_model_available(&self) -> Result<bool, ServiceError> {
        Ok(self
            .list_models()?
            .iter()
            .any(|m| m.starts_with(&self.model)))
    }
}

/// Resolve the Ollama base URL: `OLLAMA_HOST` if set, else `fallback`.
pub fn ollama_url_from_env(fallback: &str) -> String {
    resolve_ollama_url(std::env::var(OLLAMA_HOST_ENV).ok().as_deref(), fallback)
}

/// `host` wins over `fallback` unless it is unset or blank.
pub fn resolve_ollama_url(host: Option<&str>, fallback: &str) -> String {
    match host.map(str::trim) {
        Some(host) if !host.is_empty() => normalize_host(host),
        _ => fallback.to_string(),
    }
}

/// `OLLAMA_HOST` is commonly given without a scheme (`127.0.0.1:11434`).
fn normalize_host(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

pub fn build_summary_prompt(text: &str, max_len: u32, min_len: u32) -> String {
    format!(
        "Summarize the following note in {min_len} to {max_len} words.\n\n<note>\n{text}\n</note>"
    )
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

impl Summarizer for OllamaSummarizer {
    fn summarize(&self, text: &str, max_len: u32, min_len: u32) -> Result<String, ServiceError> {
        let url = format!("{}/api/generate", self.base_url);
        let prompt = build_summary_prompt(text, max_len, min_len);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            system: SUMMARY_SYSTEM_PROMPT,
            stream: false,
            // Deterministic output; words run at roughly 1.3 tokens each.
            options: GenerateOptions {
                temperature: 0.0,
                num_predict: max_len.saturating_mul(2),
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| ServiceError::from_reqwest(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;

        let summary = parsed.response.trim();
        if summary.is_empty() {
            return Err(ServiceError::EmptyResult);
        }
        tracing::debug!(model = %self.model, bytes = summary.len(), "Summary generated");
        Ok(summary.to_string())
    }
}
