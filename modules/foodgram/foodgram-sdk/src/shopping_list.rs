//! Aggregated shopping list.
//!
//! Totals are keyed by ingredient identity, the `(name, measurement_unit)`
//! pair, and keep first-seen order so rendered output is reproducible.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Ingredient identity used as the merge key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IngredientKey {
    pub name: String,
    pub measurement_unit: String,
}

impl IngredientKey {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
        }
    }
}

/// One `(name, unit, amount)` entry, either as read from a recipe or as a
/// consolidated total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: i64) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShoppingList {
    totals: IndexMap<IngredientKey, i64>,
}

impl ShoppingList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `line.amount` to the total of its ingredient identity, inserting
    /// the identity on first sight. Totals saturate at the `i64` bounds.
    pub fn add(&mut self, line: IngredientLine) {
        let key = IngredientKey {
            name: line.name,
            measurement_unit: line.measurement_unit,
        };
        self.totals
            .entry(key)
            .and_modify(|total| *total = total.saturating_add(line.amount))
            .or_insert(line.amount);
    }

    #[must_use]
    pub fn get(&self, name: &str, measurement_unit: &str) -> Option<i64> {
        self.totals
            .get(&IngredientKey::new(name, measurement_unit))
            .copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Totals in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&IngredientKey, i64)> {
        self.totals.iter().map(|(key, total)| (key, *total))
    }

    /// Totals in first-seen order as owned lines.
    pub fn lines(&self) -> impl Iterator<Item = IngredientLine> + '_ {
        self.iter().map(|(key, amount)| IngredientLine {
            name: key.name.clone(),
            measurement_unit: key.measurement_unit.clone(),
            amount,
        })
    }

    /// Sum over every total.
    #[must_use]
    pub fn grand_total(&self) -> i64 {
        self.totals
            .values()
            .fold(0_i64, |acc, total| acc.saturating_add(*total))
    }
}

impl Extend<IngredientLine> for ShoppingList {
    fn extend<I: IntoIterator<Item = IngredientLine>>(&mut self, iter: I) {
        for line in iter {
            self.add(line);
        }
    }
}

impl FromIterator<IngredientLine> for ShoppingList {
    fn from_iter<I: IntoIterator<Item = IngredientLine>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

/// Serialized as an ordered array of lines.
impl Serialize for ShoppingList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.lines())
    }
}
