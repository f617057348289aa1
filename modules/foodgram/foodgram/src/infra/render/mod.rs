//! Shopping list renderers.

use std::sync::Arc;

use foodgram_sdk::IngredientLine;

use crate::domain::ports::ShoppingListRenderer;

mod font;
mod pdf;
mod text;

pub use pdf::PdfRenderer;
pub use text::TextRenderer;

/// `"{name} ({unit}) - {amount}"`
#[must_use]
pub fn format_line(line: &IngredientLine) -> String {
    format!(
        "{} ({}) - {}",
        line.name, line.measurement_unit, line.amount
    )
}

/// Every renderer the module ships with.
#[must_use]
pub fn default_renderers() -> Vec<Arc<dyn ShoppingListRenderer>> {
    vec![Arc::new(PdfRenderer::default()), Arc::new(TextRenderer)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_shows_name_unit_and_total() {
        let line = IngredientLine::new("flour", "g", 150);
        assert_eq!(format_line(&line), "flour (g) - 150");
    }
}
