use serde::{Deserialize, Serialize};

use super::prompt::build_summary_input;
use super::review::Reviewer;
use super::PipelineError;
use crate::config::Settings;
use crate::correction::{correct, RuleSet};
use crate::export::export;
use crate::letter::{compose, LetterFields, DIAGNOSIS_LABEL, RECOMMENDATION_LABEL, TREATMENT_LABEL};
use crate::services::{Summarizer, Translator};

/// English clinical notes as entered by the clinician.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalNotes {
    pub diagnosis: String,
    pub treatment: String,
    pub recommendations: String,
}

impl ClinicalNotes {
    /// All three fields must carry text before a letter is drafted.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let fields = [
            ("diagnosis", &self.diagnosis),
            ("treatment", &self.treatment),
            ("recommendations", &self.recommendations),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(PipelineError::MissingField(*name)),
            None => Ok(()),
        }
    }
}

/// Everything produced for one letter.
#[derive(Debug, Clone)]
pub struct GeneratedLetter {
    /// English summary returned by the summarizer.
    pub summary: String,
    /// German fields after correction and review.
    pub fields: LetterFields,
    pub letter_text: String,
    pub pdf: Vec<u8>,
}

/// Orchestrates letter generation:
/// validate → summarize → translate → correct → review → compose → export
pub struct LetterPipeline<'a> {
    summarizer: &'a dyn Summarizer,
    translator: &'a dyn Translator,
    rules: &'a RuleSet,
    settings: &'a Settings,
}

impl<'a> LetterPipeline<'a> {
    pub fn new(
        summarizer: &'a dyn Summarizer,
        translator: &'a dyn Translator,
        rules: &'a RuleSet,
        settings: &'a Settings,
    ) -> Self {
        Self {
            summarizer,
            translator,
            rules,
            settings,
        }
    }

    /// Summarize and translate the notes into German draft fields.
    ///
    /// The summary of all three notes becomes the diagnosis section; treatment
    /// and recommendations are translated directly.
    pub fn draft(&self, notes: &ClinicalNotes) -> Result<(String, LetterFields), PipelineError> {
        notes.validate()?;

        let input = build_summary_input(&notes.diagnosis, &notes.treatment, &notes.recommendations);
        let (max_len, min_len) = (self.settings.summary_max_len, self.settings.summary_min_len);
        let summary = self
            .settings
            .retry
            .run("summarize", || self.summarizer.summarize(&input, max_len, min_len))
            .map_err(PipelineError::Summarization)?;
        tracing::info!(input_bytes = input.len(), summary_bytes = summary.len(), "Notes summarized");

        let fields = LetterFields {
            diagnosis: self.translate_field(DIAGNOSIS_LABEL, &summary)?,
            treatment: self.translate_field(TREATMENT_LABEL, &notes.treatment)?,
            recommendation: self.translate_field(RECOMMENDATION_LABEL, &notes.recommendations)?,
        };
        Ok((summary, fields))
    }

    /// Translate one field and apply the term corrections.
    pub fn translate_field(&self, label: &'static str, text: &str) -> Result<String, PipelineError> {
        let (from, to) = (&self.settings.source_lang, &self.settings.target_lang);
        let translated = self
            .settings
            .retry
            .run("translate", || self.translator.translate(text, from, to))
            .map_err(|source| PipelineError::Translation { field: label, source })?;
        let corrected = correct(&translated, self.rules);
        tracing::debug!(field = label, bytes = corrected.len(), "Field translated");
        Ok(corrected)
    }

    /// Run the draft fields through the reviewer, then compose and export.
    pub fn finalize(
        &self,
        draft: LetterFields,
        reviewer: &dyn Reviewer,
    ) -> Result<(LetterFields, String, Vec<u8>), PipelineError> {
        let fields = LetterFields {
            diagnosis: reviewer.review(DIAGNOSIS_LABEL, &draft.diagnosis)?,
            treatment: reviewer.review(TREATMENT_LABEL, &draft.treatment)?,
            recommendation: reviewer.review(RECOMMENDATION_LABEL, &draft.recommendation)?,
        };
        let letter_text = compose(&fields);
        let pdf = export(&letter_text, &self.settings.layout)?;
        tracing::info!(pdf_bytes = pdf.len(), "Letter rendered");
        Ok((fields, letter_text, pdf))
    }

    pub fn generate(
        &self,
        notes: &ClinicalNotes,
        reviewer: &dyn Reviewer,
    ) -> Result<GeneratedLetter, PipelineError> {
        let _span = tracing::info_span!("generate_letter").entered();
        let (summary, draft) = self.draft(notes)?;
        let (fields, letter_text, pdf) = self.finalize(draft, reviewer)?;
        Ok(GeneratedLetter {
            summary,
            fields,
            letter_text,
            pdf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::review::{AcceptAll, ReviewError};
    use crate::pipeline::RetryPolicy;
    use crate::services::{MockSummarizer, MockTranslator};

    /// Reviewer that swaps in fixed text for one label.
    struct ReplaceField {
        label: &'static str,
        text: &'static str,
    }

    impl Reviewer for ReplaceField {
        fn review(&self, label: &str, draft: &str) -> Result<String, ReviewError> {
            if label == self.label {
                Ok(self.text.to_string())
            } else {
                Ok(draft.to_string())
            }
        }
    }

    fn notes() -> ClinicalNotes {
        ClinicalNotes {
            diagnosis: "Hypertension".into(),
            treatment: "Ramipril 5mg daily".into(),
            recommendations: "Follow-up in 2 weeks".into(),
        }
    }

    fn settings() -> Settings {
        Settings {
            retry: RetryPolicy {
                max_attempts: 3,
                backoff_ms: 0,
            },
            ..Settings::default()
        }
    }

    #[test]
    fn full_pipeline_produces_corrected_letter() {
        let summarizer = MockSummarizer::new("Hypertension treated with Ramipril.");
        let translator = MockTranslator::new()
            .with_translation("Hypertension treated with Ramipril.", "Hypertension mit Ramipril behandelt.")
            .with_translation("Ramipril 5mg daily", "Ramipril 5mg täglich")
            .with_translation("Follow-up in 2 weeks", "Follow-up in 2 Wochen");
        let settings = settings();
        let pipeline = LetterPipeline::new(&summarizer, &translator, RuleSet::default_medical(), &settings);

        let letter = pipeline.generate(&notes(), &AcceptAll).unwrap();

        assert_eq!(letter.fields.diagnosis, "Hypertonie mit Ramipril behandelt.");
        assert_eq!(letter.fields.treatment, "Ramipril 5mg täglich");
        assert_eq!(letter.fields.recommendation, "Nachkontrolle in 2 Wochen");
        assert!(letter.letter_text.contains("Diagnose: Hypertonie mit Ramipril behandelt."));
        assert_eq!(&letter.pdf[0..4], b"%PDF");
    }

    #[test]
    fn summarizer_receives_combined_prompt() {
        let summarizer = MockSummarizer::new("summary");
        let translator = MockTranslator::new();
        let settings = settings();
        let pipeline = LetterPipeline::new(&summarizer, &translator, RuleSet::default_medical(), &settings);

        pipeline.draft(&notes()).unwrap();

        assert_eq!(
            summarizer.prompts(),
            vec!["Diagnosis: Hypertension. Treatment: Ramipril 5mg daily. Follow-up: Follow-up in 2 weeks."]
        );
    }

    #[test]
    fn missing_field_is_rejected_before_any_call() {
        let summarizer = MockSummarizer::new("summary");
        let translator = MockTranslator::new();
        let settings = settings();
        let pipeline = LetterPipeline::new(&summarizer, &translator, RuleSet::default_medical(), &settings);
        let incomplete = ClinicalNotes {
            treatment: "  ".into(),
            ..notes()
        };

        let err = pipeline.generate(&incomplete, &AcceptAll).unwrap_err();

        assert!(matches!(err, PipelineError::MissingField("treatment")));
        assert!(summarizer.prompts().is_empty());
        assert_eq!(translator.call_count(), 0);
    }

    #[test]
    fn transient_translation_failure_is_retried() {
        let summarizer = MockSummarizer::new("summary");
        let translator = MockTranslator::new().failing_first(2);
        let settings = settings();
        let pipeline = LetterPipeline::new(&summarizer, &translator, RuleSet::default_medical(), &settings);

        let (_, fields) = pipeline.draft(&notes()).unwrap();

        assert_eq!(fields.diagnosis, "summary");
        // 2 failures + 3 successful field translations
        assert_eq!(translator.call_count(), 5);
    }

    #[test]
    fn translation_failure_names_the_field() {
        let summarizer = MockSummarizer::new("summary");
        let translator = MockTranslator::new().failing_first(10);
        let settings = settings();
        let pipeline = LetterPipeline::new(&summarizer, &translator, RuleSet::default_medical(), &settings);

        let err = pipeline.draft(&notes()).unwrap_err();

        assert!(matches!(err, PipelineError::Translation { field: "Diagnose", .. }));
        assert_eq!(translator.call_count(), 3);
    }

    #[test]
    fn reviewer_edits_reach_the_letter() {
        let summarizer = MockSummarizer::new("summary");
        let translator = MockTranslator::new();
        let settings = settings();
        let pipeline = LetterPipeline::new(&summarizer, &translator, RuleSet::default_medical(), &settings);
        let reviewer = ReplaceField {
            label: "Therapie",
            text: "Ramipril 5 mg morgens",
        };

        let letter = pipeline.generate(&notes(), &reviewer).unwrap();

        assert_eq!(letter.fields.treatment, "Ramipril 5 mg morgens");
        assert!(letter.letter_text.contains("Therapie: Ramipril 5 mg morgens"));
    }

    #[test]
    fn custom_rules_are_used() {
        let summarizer = MockSummarizer::new("summary");
        let translator = MockTranslator::new();
        let rules = RuleSet::from_pairs([("Ramipril", "Ramipril (ACE-Hemmer)")]).unwrap();
        let settings = settings();
        let pipeline = LetterPipeline::new(&summarizer, &translator, &rules, &settings);

        let (_, fields) = pipeline.draft(&notes()).unwrap();

        assert_eq!(fields.treatment, "Ramipril (ACE-Hemmer) 5mg daily");
        // Default table not applied
        assert_eq!(fields.recommendation, "Follow-up in 2 weeks");
    }
}
