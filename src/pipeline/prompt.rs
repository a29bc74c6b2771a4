/// Combine the three English fields into the text handed to the summarizer.
pub fn build_summary_input(diagnosis: &str, treatment: &str, recommendations: &str) -> String {
    format!("Diagnosis: {diagnosis}. Treatment: {treatment}. Follow-up: {recommendations}.")
}
