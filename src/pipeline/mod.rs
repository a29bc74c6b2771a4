pub mod orchestrator;
pub mod prompt;
pub mod retry;
pub mod review;

pub use orchestrator::*;
pub use prompt::*;
pub use retry::*;
pub use review::*;

use thiserror::Error;

use crate::export::ExportError;
use crate::services::ServiceError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Field `{0}` is empty; fill in all fields before generating the letter")]
    MissingField(&'static str),

    #[error("Summarization failed: {0}")]
    Summarization(#[source] ServiceError),

    #[error("Translation of {field} failed: {source}")]
    Translation {
        field: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("Review failed: {0}")]
    Review(#[from] ReviewError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}
