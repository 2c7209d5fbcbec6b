use serde::{Deserialize, Serialize};

use super::blog::SeoMeta;

pub const PRODUCT_CATEGORIES: &[&str] = &[
    "SaaS",
    "Mobile App",
    "Web App",
    "API",
    "Plugin",
    "Tool",
    "Platform",
];

pub const PRODUCT_STATUSES: &[&str] = &["development", "beta", "launched", "discontinued"];

pub const PRICING_MODELS: &[&str] = &["free", "freemium", "subscription", "one-time", "enterprise"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFeature {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingPlan {
    pub name: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    pub model: String,
    pub plans: Vec<PricingPlan>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            model: "free".to_string(),
            plans: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductImages {
    pub thumbnail: String,
    pub gallery: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub tagline: String,
    pub description: String,
    pub category: String,
    pub features: Vec<ProductFeature>,
    pub pricing: Pricing,
    pub images: ProductImages,
    pub technologies: Vec<String>,
    pub status: String,
    pub demo_url: Option<String>,
    pub documentation_url: Option<String>,
    pub seo: SeoMeta,
    pub featured: bool,
    pub sort_order: i32,
    pub stats: ProductStats,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub slug: String,
    pub tagline: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub features: Vec<ProductFeature>,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub images: ProductImages,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default = "default_product_status")]
    pub status: String,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub documentation_url: Option<String>,
    #[serde(default)]
    pub seo: SeoMeta,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub stats: ProductStats,
}

fn default_product_status() -> String {
    "development".to_string()
}

impl ProductInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name is required".to_string());
        }
        if self.name.len() > 100 {
            return Err("Name cannot exceed 100 characters".to_string());
        }
        if self.slug.trim().is_empty() {
            return Err("Slug is required".to_string());
        }
        if self.tagline.trim().is_empty() {
            return Err("Tagline is required".to_string());
        }
        if self.tagline.len() > 150 {
            return Err("Tagline cannot exceed 150 characters".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required".to_string());
        }
        if !PRODUCT_CATEGORIES.contains(&self.category.as_str()) {
            return Err(format!(
                "Category must be one of: {}",
                PRODUCT_CATEGORIES.join(", ")
            ));
        }
        if !PRODUCT_STATUSES.contains(&self.status.as_str()) {
            return Err(format!(
                "Status must be one of: {}",
                PRODUCT_STATUSES.join(", ")
            ));
        }
        if !PRICING_MODELS.contains(&self.pricing.model.as_str()) {
            return Err(format!(
                "Pricing model must be one of: {}",
                PRICING_MODELS.join(", ")
            ));
        }
        Ok(())
    }
}
