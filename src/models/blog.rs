use serde::{Deserialize, Serialize};

pub const BLOG_CATEGORIES: &[&str] = &[
    "Technology",
    "AI/ML",
    "Business",
    "Development",
    "Design",
    "Tutorial",
    "Case Study",
    "News",
];

pub const BLOG_STATUSES: &[&str] = &["draft", "published", "archived"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// SEO metadata shared by blogs and products.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Blog {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: BlogAuthor,
    pub category: String,
    pub tags: Vec<String>,
    pub cover_image: String,
    pub publish_date: String,
    pub status: String,
    pub featured: bool,
    pub seo: SeoMeta,
    pub views: i64,
    pub likes: i64,
    pub read_time: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for create and full update.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogInput {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub author: BlogAuthor,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_image: String,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default = "default_blog_status")]
    pub status: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub seo: SeoMeta,
    #[serde(default = "default_read_time")]
    pub read_time: i32,
}

fn default_blog_status() -> String {
    "draft".to_string()
}

const fn default_read_time() -> i32 {
    5
}

impl BlogInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.title.len() > 200 {
            return Err("Title cannot exceed 200 characters".to_string());
        }
        if self.slug.trim().is_empty() {
            return Err("Slug is required".to_string());
        }
        if self.excerpt.trim().is_empty() {
            return Err("Excerpt is required".to_string());
        }
        if self.excerpt.len() > 500 {
            return Err("Excerpt cannot exceed 500 characters".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("Content is required".to_string());
        }
        if self.cover_image.trim().is_empty() {
            return Err("Cover image is required".to_string());
        }
        if !BLOG_CATEGORIES.contains(&self.category.as_str()) {
            return Err(format!(
                "Category must be one of: {}",
                BLOG_CATEGORIES.join(", ")
            ));
        }
        if !BLOG_STATUSES.contains(&self.status.as_str()) {
            return Err(format!(
                "Status must be one of: {}",
                BLOG_STATUSES.join(", ")
            ));
        }
        Ok(())
    }
}
