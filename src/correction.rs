//! Post-translation medical term correction.
//!
//! Generic machine translation leaves clinical phrases untranslated or picks a
//! lay wording. A fixed table of literal substitutions is applied on top of the
//! translated text so the established German terms end up in the letter.
//!
//! Rules run strictly in table order and each rule sees the output of the
//! previous one. Matching is a plain case-sensitive substring search: a source
//! phrase inside a longer word is still replaced.

use std::sync::LazyLock;

/// English → German replacements applied after translation. Order matters.
const MEDICAL_TERMS: &[(&str, &str)] = &[
    ("Follow-up", "Nachkontrolle"),
    ("Low-sodium diet", "Natriumarme Diät"),
    ("Exercise", "Regelmäßige körperliche Aktivität"),
    ("Lifestyle modifications", "Empfohlene Lebensstiländerungen"),
    ("Blood pressure monitoring", "Blutdrucküberwachung"),
    ("Hypertension", "Hypertonie"),
    ("Diabetes management", "Diabetesmanagement"),
    ("Physical therapy", "Physiotherapie"),
    ("Cardiology consultation", "Kardiologische Nachsorge"),
];

static DEFAULT_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new(
        MEDICAL_TERMS
            .iter()
            .map(|&(source, target)| CorrectionRule {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect(),
    )
});

/// A single literal find/replace pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRule {
    source: String,
    target: String,
}

impl CorrectionRule {
    /// Returns `None` when `source` is empty; an empty pattern would match
    /// between every character.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Option<Self> {
        let source = source.into();
        if source.is_empty() {
            return None;
        }
        Some(Self {
            source,
            target: target.into(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Correction rule #{index} has an empty source phrase")]
    EmptySource { index: usize },
}

/// Ordered, immutable collection of correction rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CorrectionRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<CorrectionRule>) -> Self {
        Self { rules }
    }

    /// Build a rule set from `(source, target)` pairs, keeping their order.
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (source, target))| {
                CorrectionRule::new(source, target).ok_or(RuleError::EmptySource { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// The built-in English → German medical term table.
    pub fn default_medical() -> &'static RuleSet {
        &DEFAULT_RULES
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorrectionRule> {
        self.rules.iter()
    }

    /// Equivalent to [`correct`] with `self` as the rule set.
    pub fn apply(&self, text: &str) -> String {
        correct(text, self)
    }
}

/// Apply every rule of `rules` to `text`, in order.
///
/// Each rule replaces all non-overlapping occurrences (left to right) of its
/// source phrase, and the next rule runs on the result.
pub fn correct(text: &str, rules: &RuleSet) -> String {
    let mut corrected = text.to_string();
    for rule in rules.iter() {
        if corrected.contains(rule.source()) {
            corrected = corrected.replace(rule.source(), rule.target());
        }
    }
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_nine_rules_in_order() {
        let rules = RuleSet::default_medical();
        assert_eq!(rules.len(), 9);
        let first = rules.iter().next().unwrap();
        assert_eq!(first.source(), "Follow-up");
        assert_eq!(first.target(), "Nachkontrolle");
        let last = rules.iter().last().unwrap();
        assert_eq!(last.source(), "Cardiology consultation");
    }

    #[test]
    fn default_table_sources_are_non_empty() {
        assert!(MEDICAL_TERMS.iter().all(|(source, _)| !source.is_empty()));
    }

    #[test]
    fn replaces_follow_up() {
        let out = correct("Follow-up in 2 weeks", RuleSet::default_medical());
        assert_eq!(out, "Nachkontrolle in 2 weeks");
    }

    #[test]
    fn leaves_text_without_terms_unchanged() {
        let input = "Der Patient wurde in gutem Zustand entlassen.";
        assert_eq!(correct(input, RuleSet::default_medical()), input);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let rules = RuleSet::default_medical();
        let once = correct("Hypertension. Follow-up with Cardiology consultation.", rules);
        assert_eq!(correct(&once, rules), once);
        assert_eq!(once, "Hypertonie. Nachkontrolle with Kardiologische Nachsorge.");
    }

    #[test]
    fn rules_apply_sequentially() {
        let rules = RuleSet::from_pairs([("ab", "x"), ("x", "y")]).unwrap();
        assert_eq!(correct("ab", &rules), "y");
    }

    #[test]
    fn replaces_every_occurrence() {
        let rules = RuleSet::from_pairs([("Exercise", "Sport")]).unwrap();
        assert_eq!(
            correct("Exercise daily. Exercise gently.", &rules),
            "Sport daily. Sport gently."
        );
    }

    #[test]
    fn matches_inside_longer_words() {
        let out = correct("PreHypertensionStage", RuleSet::default_medical());
        assert_eq!(out, "PreHypertonieStage");
    }

    #[test]
    fn matching_is_case_sensitive() {
        let input = "hypertension and follow-up";
        assert_eq!(correct(input, RuleSet::default_medical()), input);
    }

    #[test]
    fn non_overlapping_left_to_right() {
        let rules = RuleSet::from_pairs([("aa", "b")]).unwrap();
        assert_eq!(correct("aaa", &rules), "ba");
    }

    #[test]
    fn empty_inputs_are_valid() {
        assert_eq!(correct("", RuleSet::default_medical()), "");
        assert_eq!(correct("Follow-up", &RuleSet::default()), "Follow-up");
    }

    #[test]
    fn rejects_empty_source() {
        assert!(CorrectionRule::new("", "x").is_none());
        let err = RuleSet::from_pairs([("a", "b"), ("", "c")]).unwrap_err();
        assert_eq!(err, RuleError::EmptySource { index: 1 });
    }

    #[test]
    fn apply_matches_free_function() {
        let rules = RuleSet::default_medical();
        let text = "Physical therapy twice weekly";
        assert_eq!(rules.apply(text), correct(text, rules));
        assert_eq!(rules.apply(text), "Physiotherapie twice weekly");
    }
}
