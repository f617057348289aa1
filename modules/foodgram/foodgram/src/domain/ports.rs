//! Outbound ports implemented in the infrastructure layer.

use foodgram_sdk::ShoppingList;

use crate::domain::error::DomainError;

/// Output format of a shopping list download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Text,
}

impl ExportFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "txt",
        }
    }

    /// Parse the `format` query value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// A rendered file ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns an aggregated list into a downloadable document.
pub trait ShoppingListRenderer: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// # Errors
    /// Returns `DomainError::Internal` when the document cannot be encoded.
    fn render(&self, title: &str, list: &ShoppingList) -> Result<RenderedDocument, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_accepts_known_values() {
        assert_eq!(ExportFormat::parse("PDF"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::parse("txt"), Some(ExportFormat::Text));
        assert_eq!(ExportFormat::parse("docx"), None);
        assert_eq!(ExportFormat::default(), ExportFormat::Pdf);
    }
}
