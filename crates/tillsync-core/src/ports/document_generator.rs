//! Document generator port
//!
//! Turns one report into the document bytes to be stored. The primary
//! implementation asks the POS provider to render the report as a PDF.

use crate::domain::errors::RenderError;
use crate::domain::report::Report;

/// Port trait for rendering a report into a storable document
#[async_trait::async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Renders the report, returning the document bytes
    async fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError>;
}
