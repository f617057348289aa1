use serde::{Deserialize, Serialize};

/// Module configuration, read from the `foodgram` section of the app config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FoodgramConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Recipes previewed per author in subscription listings when the
    /// request does not pass `recipes_limit`. `None` shows all of them.
    #[serde(default)]
    pub default_recipes_limit: Option<u64>,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_shopping_list_title")]
    pub shopping_list_title: String,
}

impl Default for FoodgramConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_recipes_limit: None,
            max_name_length: default_max_name_length(),
            shopping_list_title: default_shopping_list_title(),
        }
    }
}

fn default_page_size() -> u64 {
    6
}

fn default_max_page_size() -> u64 {
    100
}

fn default_max_name_length() -> usize {
    200
}

fn default_shopping_list_title() -> String {
    "Shopping list".to_owned()
}
