//! Product catalog
//!
//! A fixed, read-only list of products. The built-in catalog holds nine
//! products, three per category.

use advisor_core::{Category, Product};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Read-only product list, in catalog order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and out-of-range ratings
    pub fn new(products: Vec<Product>) -> Result<Self, String> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id) {
                return Err(format!("duplicate product id {}", product.id));
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(format!(
                    "product {} has rating {} outside [0, 5]",
                    product.id, product.rating
                ));
            }
            if product.price == 0 {
                return Err(format!("product {} has no price", product.id));
            }
        }
        Ok(Self { products })
    }

    /// Load a catalog from a YAML or TOML file
    ///
    /// YAML files hold a bare list of products; TOML files hold a
    /// `[[products]]` array since TOML has no top-level arrays.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read catalog {}: {}", path.display(), e))?;

        let products: Vec<Product> = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| format!("invalid catalog YAML: {}", e))?,
            Some("toml") => {
                #[derive(Deserialize)]
                struct TomlCatalog {
                    products: Vec<Product>,
                }
                toml::from_str::<TomlCatalog>(&content)
                    .map_err(|e| format!("invalid catalog TOML: {}", e))?
                    .products
            }
            other => return Err(format!("unsupported catalog format: {:?}", other)),
        };

        Self::new(products)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products of one category, in catalog order
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// First product (catalog order) whose name appears in `text`
    ///
    /// `text` is expected to be lower-cased already.
    pub fn mentioned_in(&self, text: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| text.contains(&p.name.to_lowercase()))
    }

    /// One line per product, for the LLM system prompt
    pub fn summary(&self) -> String {
        self.products
            .iter()
            .map(|p| {
                format!(
                    "- {} ({}, ${}, rated {}): {}; ideal for {}",
                    p.name,
                    p.category,
                    p.price,
                    p.rating,
                    p.features.join(", "),
                    p.ideal_for.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            products: default_products(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: u32,
    category: Category,
    name: &str,
    price: u32,
    features: &[&str],
    ideal_for: &[&str],
    rating: f32,
    image: &str,
) -> Product {
    Product {
        id,
        category,
        name: name.to_string(),
        price,
        features: features.iter().map(|s| s.to_string()).collect(),
        ideal_for: ideal_for.iter().map(|s| s.to_string()).collect(),
        rating,
        image: image.to_string(),
    }
}

fn default_products() -> Vec<Product> {
    const WIDE: &str = "/api/placeholder/300/200";
    const TALL: &str = "/api/placeholder/200/300";

    vec![
        product(
            1,
            Category::Laptop,
            "ProBook X5",
            1299,
            &["13\" Retina display", "16GB RAM", "512GB SSD", "All-day battery life", "Ultra-lightweight"],
            &["professionals", "travelers", "students", "designers"],
            4.8,
            WIDE,
        ),
        product(
            2,
            Category::Laptop,
            "TechMaster 7000",
            999,
            &["15.6\" FHD display", "8GB RAM", "256GB SSD", "Gaming graphics card", "Customizable keyboard"],
            &["gamers", "students", "casual users"],
            4.3,
            WIDE,
        ),
        product(
            3,
            Category::Laptop,
            "UltraSlim Pro",
            1499,
            &["14\" 4K OLED display", "32GB RAM", "1TB SSD", "Precision touchpad", "Professional graphics"],
            &["designers", "video editors", "professionals"],
            4.9,
            WIDE,
        ),
        product(
            4,
            Category::Smartphone,
            "Galaxy Ultra",
            899,
            &["6.7\" Super AMOLED", "8GB RAM", "256GB Storage", "Triple camera system", "All-day battery"],
            &["photographers", "professionals", "tech enthusiasts"],
            4.7,
            TALL,
        ),
        product(
            5,
            Category::Smartphone,
            "Pixel Pro",
            799,
            &["6.4\" OLED display", "Best-in-class camera", "Clean OS experience", "Fast charging", "Long-term updates"],
            &["photographers", "Android purists", "casual users"],
            4.6,
            TALL,
        ),
        product(
            6,
            Category::Smartphone,
            "Budget King 5",
            349,
            &["6.5\" LCD display", "Decent camera", "128GB Storage", "Headphone jack", "Expandable storage"],
            &["budget-conscious users", "students", "casual users"],
            4.2,
            TALL,
        ),
        product(
            7,
            Category::Headphones,
            "SoundMaster Pro",
            299,
            &["Active noise cancellation", "Hi-Res audio", "30-hour battery life", "Premium build quality", "Spatial audio"],
            &["audiophiles", "travelers", "professionals"],
            4.8,
            WIDE,
        ),
        product(
            8,
            Category::Headphones,
            "BassBoost 700",
            179,
            &["Enhanced bass response", "Comfortable fit", "25-hour battery life", "Built-in mic", "Foldable design"],
            &["bass lovers", "commuters", "casual listeners"],
            4.4,
            WIDE,
        ),
        product(
            9,
            Category::Headphones,
            "EcoSound Mini",
            89,
            &["Compact design", "Good sound quality", "20-hour battery", "Water resistant", "Built-in controls"],
            &["budget-conscious users", "gym-goers", "casual listeners"],
            4.1,
            WIDE,
        ),
    ]
}
