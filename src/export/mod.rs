pub mod layout;
pub mod paginate;
pub mod pdf;

pub use layout::*;
pub use paginate::*;
pub use pdf::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid page layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("PDF could not be finalized: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
