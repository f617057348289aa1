//! A4 PDF output with an embedded Unicode font (`DejaVu Sans`).

use foodgram_sdk::ShoppingList;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use super::font::GlyphEncoder;
use super::format_line;
use crate::domain::error::DomainError;
use crate::domain::ports::{ExportFormat, RenderedDocument, ShoppingListRenderer};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const TITLE_SIZE: i64 = 16;
const BODY_SIZE: i64 = 12;
const LEADING: i64 = 18;

/// Renders one ingredient per line, starting a new page when the current
/// one is full.
#[derive(Debug, Clone, Copy)]
pub struct PdfRenderer {
    lines_per_page: usize,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        let usable = PAGE_HEIGHT - 2 * MARGIN;
        Self {
            lines_per_page: usize::try_from(usable / LEADING).unwrap_or(1),
        }
    }
}

fn text_line(font: &mut GlyphEncoder<'_>, size: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Integer(size)]),
        Operation::new("Td", vec![Object::Integer(MARGIN), Object::Integer(y)]),
        Operation::new("Tj", vec![font.encode(text)]),
        Operation::new("ET", vec![]),
    ]
}

impl PdfRenderer {
    /// Page body line count; the title takes the first slot of page one.
    #[must_use]
    pub fn with_lines_per_page(lines_per_page: usize) -> Self {
        Self {
            lines_per_page: lines_per_page.max(2),
        }
    }

    fn paginate(
        self,
        font: &mut GlyphEncoder<'_>,
        title: &str,
        list: &ShoppingList,
    ) -> Vec<Vec<Operation>> {
        let mut pages = Vec::new();
        let mut ops = text_line(font, TITLE_SIZE, PAGE_HEIGHT - MARGIN, title);
        let mut slot = 2;
        for line in list.lines() {
            if slot >= self.lines_per_page {
                pages.push(std::mem::take(&mut ops));
                slot = 0;
            }
            let y = PAGE_HEIGHT - MARGIN - LEADING * i64::try_from(slot).unwrap_or(0);
            ops.extend(text_line(font, BODY_SIZE, y, &format_line(&line)));
            slot += 1;
        }
        pages.push(ops);
        pages
    }

    fn build(self, title: &str, list: &ShoppingList) -> Result<Vec<u8>, DomainError> {
        let mut font = GlyphEncoder::dejavu_sans()?;
        let page_ops = self.paginate(&mut font, title, list);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = font.embed(&mut doc)?;
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<ObjectId> = Vec::new();
        for operations in page_ops {
            let content = Content { operations }
                .encode()
                .map_err(|e| DomainError::internal(format!("PDF content encoding failed: {e}")))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            kids.push(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }));
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => Object::Integer(count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| DomainError::internal(format!("PDF serialization failed: {e}")))?;
        Ok(bytes)
    }
}

impl ShoppingListRenderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, title: &str, list: &ShoppingList) -> Result<RenderedDocument, DomainError> {
        Ok(RenderedDocument {
            content_type: "application/pdf",
            file_name: "shopping_list.pdf",
            bytes: self.build(title, list)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use foodgram_sdk::IngredientLine;

    use super::*;

    fn compact(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn sample() -> ShoppingList {
        [
            IngredientLine::new("egg", "pcs", 2),
            IngredientLine::new("flour", "g", 150),
            IngredientLine::new("milk", "ml", 200),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn cyrillic_names_survive_extraction() {
        let list: ShoppingList = [
            IngredientLine::new("сахар", "г", 50),
            IngredientLine::new("соль", "г", 5),
        ]
        .into_iter()
        .collect();

        let doc = PdfRenderer::default().render("Список покупок", &list).unwrap();

        let text = compact(&pdf_extract::extract_text_from_mem(&doc.bytes).unwrap());
        assert!(text.contains("Списокпокупок"), "{text}");
        assert!(text.contains("сахар(г)-50"), "{text}");
        assert!(text.contains("соль(г)-5"), "{text}");
        assert!(!text.contains('?'), "{text}");
    }

    #[test]
    fn text_uses_an_embedded_type0_font() {
        let doc = PdfRenderer::default().render("Shopping list", &sample()).unwrap();
        let parsed = Document::load_mem(&doc.bytes).unwrap();

        let fonts: Vec<_> = parsed
            .objects
            .values()
            .filter_map(|o| o.as_dict().ok())
            .filter(|d| d.has_type(b"Font"))
            .filter_map(|d| d.get(b"Subtype").and_then(Object::as_name).ok())
            .collect();
        assert!(fonts.contains(&b"Type0".as_slice()));
        assert!(fonts.contains(&b"CIDFontType2".as_slice()));
    }

    #[test]
    fn renders_a_readable_pdf() {
        let doc = PdfRenderer::default().render("Shopping list", &sample()).unwrap();

        assert_eq!(doc.content_type, "application/pdf");
        assert_eq!(doc.file_name, "shopping_list.pdf");
        assert!(doc.bytes.starts_with(b"%PDF-1.5"));

        let text = compact(&pdf_extract::extract_text_from_mem(&doc.bytes).unwrap());
        assert!(text.contains("Shoppinglist"));
        assert!(text.contains("egg(pcs)-2"));
        assert!(text.contains("flour(g)-150"));
        assert!(text.contains("milk(ml)-200"));
    }

    #[test]
    fn empty_list_is_a_valid_single_page_document() {
        let doc = PdfRenderer::default()
            .render("Shopping list", &ShoppingList::new())
            .unwrap();
        let parsed = Document::load_mem(&doc.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }

    #[test]
    fn long_lists_span_several_pages() {
        let list: ShoppingList = (0..25)
            .map(|i| IngredientLine::new(format!("item{i}"), "g", i))
            .collect();

        let doc = PdfRenderer::with_lines_per_page(10)
            .render("Shopping list", &list)
            .unwrap();

        // 8 lines fit under the title, then 10 per page.
        let parsed = Document::load_mem(&doc.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }
}
