use std::sync::Arc;

use foodgram_sdk::{ShoppingList, UserId};
use tracing::{info, instrument};

use crate::domain::error::DomainError;
use crate::domain::ports::{ExportFormat, RenderedDocument, ShoppingListRenderer};
use crate::domain::shopping_list::{CartSource, ShoppingListAggregator};
use crate::security::SecurityContext;

/// Builds and exports the caller's consolidated shopping list.
pub struct ShoppingListService {
    source: Arc<dyn CartSource>,
    aggregator: ShoppingListAggregator,
    renderers: Vec<Arc<dyn ShoppingListRenderer>>,
    title: String,
}

impl ShoppingListService {
    #[must_use]
    pub fn new(
        source: Arc<dyn CartSource>,
        renderers: Vec<Arc<dyn ShoppingListRenderer>>,
        title: String,
    ) -> Self {
        Self {
            source,
            aggregator: ShoppingListAggregator::new(),
            renderers,
            title,
        }
    }

    #[instrument(skip(self, ctx))]
    pub async fn build(&self, ctx: &SecurityContext) -> Result<ShoppingList, DomainError> {
        let user_id = ctx.require_subject()?;
        self.aggregate_for(user_id).await
    }

    async fn aggregate_for(&self, user_id: UserId) -> Result<ShoppingList, DomainError> {
        self.aggregator.aggregate(self.source.as_ref(), user_id).await
    }

    /// Aggregate the caller's cart and render it in `format`.
    #[instrument(skip(self, ctx))]
    pub async fn export(
        &self,
        ctx: &SecurityContext,
        format: ExportFormat,
    ) -> Result<RenderedDocument, DomainError> {
        let user_id = ctx.require_subject()?;
        let renderer = self
            .renderers
            .iter()
            .find(|r| r.format() == format)
            .ok_or_else(|| {
                DomainError::bad_request(format!(
                    "export format '{}' is not available",
                    format.as_str()
                ))
            })?;
        let list = self.aggregate_for(user_id).await?;
        let document = renderer.render(&self.title, &list)?;
        info!(
            lines = list.len(),
            bytes = document.bytes.len(),
            content_type = document.content_type,
            "shopping list exported"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use foodgram_sdk::{IngredientLine, RecipeId};

    use super::*;

    #[derive(Default)]
    struct CountingCart {
        reads: AtomicUsize,
    }

    #[async_trait]
    impl CartSource for CountingCart {
        async fn cart_recipes(&self, _user_id: UserId) -> Result<Vec<RecipeId>, DomainError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1])
        }

        async fn ingredient_entries(
            &self,
            _recipe_id: RecipeId,
        ) -> Result<Vec<IngredientLine>, DomainError> {
            Ok(vec![IngredientLine::new("salt", "g", 5)])
        }
    }

    struct LineCount;

    impl ShoppingListRenderer for LineCount {
        fn format(&self) -> ExportFormat {
            ExportFormat::Text
        }

        fn render(
            &self,
            _title: &str,
            list: &ShoppingList,
        ) -> Result<RenderedDocument, DomainError> {
            Ok(RenderedDocument {
                content_type: "text/plain",
                file_name: "count.txt",
                bytes: list.len().to_string().into_bytes(),
            })
        }
    }

    fn service(cart: &Arc<CountingCart>) -> ShoppingListService {
        let source: Arc<dyn CartSource> = Arc::<CountingCart>::clone(cart);
        ShoppingListService::new(source, vec![Arc::new(LineCount)], "List".to_owned())
    }

    #[tokio::test]
    async fn anonymous_export_is_rejected_before_format_lookup() {
        let cart = Arc::new(CountingCart::default());
        let err = service(&cart)
            .export(&SecurityContext::anonymous(), ExportFormat::Pdf)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Unauthorized));
        assert_eq!(cart.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn export_reads_the_cart_once() {
        let cart = Arc::new(CountingCart::default());
        let doc = service(&cart)
            .export(&SecurityContext::user(7, false), ExportFormat::Text)
            .await
            .unwrap();

        assert_eq!(doc.bytes, b"1");
        assert_eq!(cart.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unavailable_format_is_a_bad_request() {
        let cart = Arc::new(CountingCart::default());
        let err = service(&cart)
            .export(&SecurityContext::user(7, false), ExportFormat::Pdf)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::BadRequest { .. }));
        assert_eq!(cart.reads.load(Ordering::SeqCst), 0);
    }
}
