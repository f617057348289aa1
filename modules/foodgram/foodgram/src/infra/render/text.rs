use foodgram_sdk::ShoppingList;

use super::format_line;
use crate::domain::error::DomainError;
use crate::domain::ports::{ExportFormat, RenderedDocument, ShoppingListRenderer};

/// Plain UTF-8 text, one ingredient per line under the title.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl ShoppingListRenderer for TextRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn render(&self, title: &str, list: &ShoppingList) -> Result<RenderedDocument, DomainError> {
        let mut out = String::new();
        out.push_str(title);
        out.push('\n');
        if !list.is_empty() {
            out.push('\n');
        }
        for line in list.lines() {
            out.push_str(&format_line(&line));
            out.push('\n');
        }
        Ok(RenderedDocument {
            content_type: "text/plain; charset=utf-8",
            file_name: "shopping_list.txt",
            bytes: out.into_bytes(),
        })
    }
}
