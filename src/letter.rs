//! Discharge letter composition.
//!
//! Template-based, no LLM: the three (already translated and reviewed) fields
//! are interpolated into a fixed German layout.

use serde::{Deserialize, Serialize};

pub const LETTER_HEADING: &str = "Entlassungsbrief";
pub const DIAGNOSIS_LABEL: &str = "Diagnose";
pub const TREATMENT_LABEL: &str = "Therapie";
pub const RECOMMENDATION_LABEL: &str = "Empfehlung";

/// Letter body sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterFields {
    pub diagnosis: String,
    pub treatment: String,
    pub recommendation: String,
}

impl LetterFields {
    pub fn new(
        diagnosis: impl Into<String>,
        treatment: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            diagnosis: diagnosis.into(),
            treatment: treatment.into(),
            recommendation: recommendation.into(),
        }
    }

    fn sections(&self) -> [(&'static str, &str); 3] {
        [
            (DIAGNOSIS_LABEL, &self.diagnosis),
            (TREATMENT_LABEL, &self.treatment),
            (RECOMMENDATION_LABEL, &self.recommendation),
        ]
    }
}

/// Render the letter as plain text, one blank line between sections.
///
/// An empty body leaves the bare label (`Therapie:`).
pub fn compose(fields: &LetterFields) -> String {
    let mut out = String::from(LETTER_HEADING);
    for (label, body) in fields.sections() {
        out.push_str("\n\n");
        out.push_str(&section_line(&format!("{label}:"), body));
    }
    out
}

/// Same letter with bold markdown labels, for terminal preview.
pub fn compose_markdown(fields: &LetterFields) -> String {
    let mut out = format!("**{LETTER_HEADING}**");
    for (label, body) in fields.sections() {
        out.push_str("\n\n");
        out.push_str(&section_line(&format!("**{label}:**"), body));
    }
    out
}

fn section_line(heading: &str, body: &str) -> String {
    if body.is_empty() {
        heading.to_string()
    } else {
        format!("{heading} {body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LetterFields {
        LetterFields::new(
            "Hypertonie festgestellt",
            "Ramipril 5 mg täglich",
            "Nachkontrolle in 2 Wochen",
        )
    }

    #[test]
    fn composes_fixed_template() {
        let letter = compose(&sample());
        assert_eq!(
            letter,
            "Entlassungsbrief\n\n\
             Diagnose: Hypertonie festgestellt\n\n\
             Therapie: Ramipril 5 mg täglich\n\n\
             Empfehlung: Nachkontrolle in 2 Wochen"
        );
    }

    #[test]
    fn compose_is_pure() {
        let fields = sample();
        assert_eq!(compose(&fields), compose(&fields));
    }

    #[test]
    fn empty_section_keeps_bare_label() {
        let fields = LetterFields::new("Hypertonie", "", "Nachkontrolle");
        let letter = compose(&fields);
        assert!(letter.lines().any(|l| l == "Therapie:"));
        assert!(letter.contains("Diagnose: Hypertonie"));
    }

    #[test]
    fn all_empty_fields_are_accepted() {
        let letter = compose(&LetterFields::default());
        assert_eq!(
            letter,
            "Entlassungsbrief\n\nDiagnose:\n\nTherapie:\n\nEmpfehlung:"
        );
    }

    #[test]
    fn multiline_body_is_kept() {
        let fields = LetterFields::new("Zeile 1\nZeile 2", "x", "y");
        let letter = compose(&fields);
        assert!(letter.contains("Diagnose: Zeile 1\nZeile 2\n\nTherapie: x"));
    }

    #[test]
    fn markdown_preview_bolds_labels() {
        let md = compose_markdown(&sample());
        assert!(md.starts_with("**Entlassungsbrief**"));
        assert!(md.contains("**Diagnose:** Hypertonie festgestellt"));
        assert!(md.contains("**Empfehlung:** Nachkontrolle in 2 Wochen"));
    }

    #[test]
    fn markdown_preview_empty_section() {
        let md = compose_markdown(&LetterFields::new("a", "", "c"));
        assert!(md.lines().any(|l| l == "**Therapie:**"));
    }
}
