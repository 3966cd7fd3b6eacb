//! Catalog records
//!
//! Products are immutable once loaded. The catalog itself lives in the
//! config crate; this module only defines the shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Laptop,
    Smartphone,
    Headphones,
}

impl Category {
    /// All categories in keyword-table order
    pub const ALL: [Category; 3] = [Category::Laptop, Category::Smartphone, Category::Headphones];

    /// Lower-case identifier, as used in templates and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Laptop => "laptop",
            Category::Smartphone => "smartphone",
            Category::Headphones => "headphones",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recommendable product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique id
    pub id: u32,
    /// Category
    pub category: Category,
    /// Display name
    pub name: String,
    /// Price in whole currency units
    pub price: u32,
    /// Feature bullet points, in display order
    pub features: Vec<String>,
    /// Short descriptions of who the product suits
    #[serde(rename = "idealFor", alias = "ideal_for", alias = "idealfor")]
    pub ideal_for: Vec<String>,
    /// Average rating in [0, 5]
    pub rating: f32,
    /// Card image URL
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Check if any feature contains `needle` (case-insensitive)
    pub fn has_feature(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.features.iter().any(|f| f.to_lowercase().contains(&needle))
    }

    /// Check if any ideal-for entry contains `needle` (case-insensitive)
    pub fn suits(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.ideal_for.iter().any(|f| f.to_lowercase().contains(&needle))
    }
}

/// Price constraint collected during the budget stage
///
/// `min` is only set when the user gave a range. No ordering between
/// `min` and `max` is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    pub max: u32,
}

impl Budget {
    /// Upper bound only
    pub fn up_to(max: u32) -> Self {
        Self { min: None, max }
    }

    /// Inclusive range
    pub fn range(min: u32, max: u32) -> Self {
        Self { min: Some(min), max }
    }

    /// Check whether `price` satisfies this budget
    ///
    /// A zero lower bound means no lower bound; a zero upper bound admits
    /// everything.
    pub fn admits(&self, price: u32) -> bool {
        match self.min {
            Some(min) if min > 0 && self.max > 0 => price >= min && price <= self.max,
            _ if self.max > 0 => price <= self.max,
            _ => true,
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.min {
            Some(min) if min > 0 => write!(f, "${} to ${}", min, self.max),
            _ => write!(f, "up to ${}", self.max),
        }
    }
}
