use std::sync::Arc;

use foodgram_sdk::{Ingredient, IngredientId, NewIngredient, NewTag, Tag, TagId};
use tracing::{info, instrument};

use crate::domain::error::{DomainError, Violation};
use crate::domain::repos::CatalogRepository;

/// Outcome of a fixture import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub created: usize,
    pub existing: usize,
}

/// Read access to tags and ingredients plus fixture import.
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list_tags(&self) -> Result<Vec<Tag>, DomainError> {
        self.repo.list_tags().await
    }

    #[instrument(skip(self))]
    pub async fn get_tag(&self, id: TagId) -> Result<Tag, DomainError> {
        self.repo
            .get_tag(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", &id))
    }

    /// Ingredients whose name starts with `name_prefix`, ignoring case.
    #[instrument(skip(self))]
    pub async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, DomainError> {
        let prefix = name_prefix.map(str::trim).filter(|p| !p.is_empty());
        self.repo.list_ingredients(prefix).await
    }

    #[instrument(skip(self))]
    pub async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, DomainError> {
        self.repo
            .get_ingredient(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Ingredient", &id))
    }

    /// Import tags, skipping the ones whose slug already exists.
    ///
    /// The whole batch is validated before anything is written.
    #[instrument(skip(self, tags), fields(count = tags.len()))]
    pub async fn load_tags(&self, tags: Vec<NewTag>) -> Result<LoadReport, DomainError> {
        let mut violations = Vec::new();
        for (idx, tag) in tags.iter().enumerate() {
            validate_tag(idx, tag, &mut violations);
        }
        if !violations.is_empty() {
            return Err(DomainError::violations(violations));
        }

        let mut report = LoadReport::default();
        for tag in tags {
            let (_, created) = self.repo.get_or_create_tag(tag).await?;
            report.record(created);
        }
        info!(created = report.created, existing = report.existing, "tags loaded");
        Ok(report)
    }

    /// Import ingredients, skipping existing `(name, measurement_unit)` pairs.
    #[instrument(skip(self, ingredients), fields(count = ingredients.len()))]
    pub async fn load_ingredients(
        &self,
        ingredients: Vec<NewIngredient>,
    ) -> Result<LoadReport, DomainError> {
        let mut violations = Vec::new();
        for (idx, ingredient) in ingredients.iter().enumerate() {
            if ingredient.name.trim().is_empty() {
                violations.push(Violation::new(format!("[{idx}].name"), "must not be empty"));
            }
            if ingredient.measurement_unit.trim().is_empty() {
                violations.push(Violation::new(
                    format!("[{idx}].measurement_unit"),
                    "must not be empty",
                ));
            }
        }
        if !violations.is_empty() {
            return Err(DomainError::violations(violations));
        }

        let mut report = LoadReport::default();
        for ingredient in ingredients {
            let normalized = NewIngredient {
                name: ingredient.name.trim().to_owned(),
                measurement_unit: ingredient.measurement_unit.trim().to_owned(),
            };
            let (_, created) = self.repo.get_or_create_ingredient(normalized).await?;
            report.record(created);
        }
        info!(created = report.created, existing = report.existing, "ingredients loaded");
        Ok(report)
    }
}

impl LoadReport {
    fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }
}

fn validate_tag(idx: usize, tag: &NewTag, violations: &mut Vec<Violation>) {
    if tag.name.trim().is_empty() {
        violations.push(Violation::new(format!("[{idx}].name"), "must not be empty"));
    } else if tag.name.chars().count() > 40 {
        violations.push(Violation::new(
            format!("[{idx}].name"),
            "must be at most 40 characters",
        ));
    }
    if tag.slug.trim().is_empty() {
        violations.push(Violation::new(format!("[{idx}].slug"), "must not be empty"));
    }
    if let Some(color) = &tag.color
        && !is_hex_color(color)
    {
        violations.push(Violation::new(
            format!("[{idx}].color"),
            "must be a #RRGGBB color",
        ));
    }
}

/// `#` followed by exactly six hex digits.
pub(crate) fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
