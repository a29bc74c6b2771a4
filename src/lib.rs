pub mod config;
pub mod correction; // Post-translation medical term table
pub mod export; // Pagination + PDF rendering
pub mod letter; // Letter template
pub mod pipeline; // Summarize → translate → review → export
pub mod services; // Ollama summarizer, Google translator

pub use correction::{correct, CorrectionRule, RuleSet};
pub use export::{export, paginate, Document, DrawText, ExportError, Page, PageLayout};
pub use letter::{compose, LetterFields};

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. `RUST_LOG` takes precedence over
/// [`config::default_log_filter`].
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
