use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{prelude::*, products};
use crate::models::product::{Product, ProductInput};

pub struct ProductRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: products::Model) -> Product {
        Product {
            id: m.id,
            name: m.name,
            slug: m.slug,
            tagline: m.tagline,
            description: m.description,
            category: m.category,
            features: serde_json::from_str(&m.features).unwrap_or_default(),
            pricing: serde_json::from_str(&m.pricing).unwrap_or_default(),
            images: serde_json::from_str(&m.images).unwrap_or_default(),
            technologies: serde_json::from_str(&m.technologies).unwrap_or_default(),
            status: m.status,
            demo_url: m.demo_url,
            documentation_url: m.documentation_url,
            seo: serde_json::from_str(&m.seo).unwrap_or_default(),
            featured: m.featured,
            sort_order: m.sort_order,
            stats: serde_json::from_str(&m.stats).unwrap_or_default(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn filter_condition(filter: &ProductFilter) -> Condition {
        let mut cond = Condition::all();
        if let Some(status) = &filter.status {
            cond = cond.add(products::Column::Status.eq(status.clone()));
        }
        if let Some(category) = &filter.category {
            cond = cond.add(products::Column::Category.eq(category.clone()));
        }
        if let Some(featured) = filter.featured {
            cond = cond.add(products::Column::Featured.eq(featured));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            cond = cond.add(
                Condition::any()
                    .add(products::Column::Name.like(pattern.clone()))
                    .add(products::Column::Tagline.like(pattern.clone()))
                    .add(products::Column::Description.like(pattern)),
            );
        }
        cond
    }

    /// Filtered page ordered by the display order, then recency.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Product>, u64)> {
        let cond = Self::filter_condition(filter);

        let total = Products::find()
            .filter(cond.clone())
            .count(&self.conn)
            .await
            .context("Failed to count products")?;

        let rows = Products::find()
            .filter(cond)
            .order_by_asc(products::Column::SortOrder)
            .order_by_desc(products::Column::CreatedAt)
            .limit(limit)
            .offset(page.saturating_sub(1) * limit)
            .all(&self.conn)
            .await
            .context("Failed to list products")?;

        Ok((rows.into_iter().map(Self::map_model).collect(), total))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        let row = Products::find()
            .filter(products::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count = Products::find()
            .filter(products::Column::Slug.eq(slug))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = products::ActiveModel {
            name: Set(input.name.clone()),
            slug: Set(input.slug.trim().to_lowercase()),
            tagline: Set(input.tagline.clone()),
            description: Set(input.description.clone()),
            category: Set(input.category.clone()),
            features: Set(serde_json::to_string(&input.features)?),
            pricing: Set(serde_json::to_string(&input.pricing)?),
            images: Set(serde_json::to_string(&input.images)?),
            technologies: Set(serde_json::to_string(&input.technologies)?),
            status: Set(input.status.clone()),
            demo_url: Set(input.demo_url.clone()),
            documentation_url: Set(input.documentation_url.clone()),
            seo: Set(serde_json::to_string(&input.seo)?),
            featured: Set(input.featured),
            sort_order: Set(input.sort_order),
            stats: Set(serde_json::to_string(&input.stats)?),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert product")?;
        Ok(Self::map_model(model))
    }

    pub async fn update(&self, id: i32, input: &ProductInput) -> Result<Option<Product>> {
        let Some(existing) = Products::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: products::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.slug = Set(input.slug.trim().to_lowercase());
        active.tagline = Set(input.tagline.clone());
        active.description = Set(input.description.clone());
        active.category = Set(input.category.clone());
        active.features = Set(serde_json::to_string(&input.features)?);
        active.pricing = Set(serde_json::to_string(&input.pricing)?);
        active.images = Set(serde_json::to_string(&input.images)?);
        active.technologies = Set(serde_json::to_string(&input.technologies)?);
        active.status = Set(input.status.clone());
        active.demo_url = Set(input.demo_url.clone());
        active.documentation_url = Set(input.documentation_url.clone());
        active.seo = Set(serde_json::to_string(&input.seo)?);
        active.featured = Set(input.featured);
        active.sort_order = Set(input.sort_order);
        active.stats = Set(serde_json::to_string(&input.stats)?);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(model)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Products::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_with_status(&self, status: &str) -> Result<u64> {
        let count = Products::find()
            .filter(products::Column::Status.eq(status))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Launched products for the analytics dashboard, display order first.
    pub async fn top_launched(&self, limit: u64) -> Result<Vec<Product>> {
        let rows = Products::find()
            .filter(products::Column::Status.eq("launched"))
            .order_by_asc(products::Column::SortOrder)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }
}
