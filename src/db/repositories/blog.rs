use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{blogs, prelude::*};
use crate::models::blog::{Blog, BlogInput};

/// Repository for blog posts
pub struct BlogRepository {
    conn: DatabaseConnection,
}

/// Listing filters; all optional, combined with AND.
#[derive(Debug, Default, Clone)]
pub struct BlogFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

impl BlogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: blogs::Model) -> Blog {
        Blog {
            id: m.id,
            title: m.title,
            slug: m.slug,
            excerpt: m.excerpt,
            content: m.content,
            author: serde_json::from_str(&m.author).unwrap_or_default(),
            category: m.category,
            tags: serde_json::from_str(&m.tags).unwrap_or_default(),
            cover_image: m.cover_image,
            publish_date: m.publish_date,
            status: m.status,
            featured: m.featured,
            seo: serde_json::from_str(&m.seo).unwrap_or_default(),
            views: m.views,
            likes: m.likes,
            read_time: m.read_time,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn filter_condition(filter: &BlogFilter) -> Condition {
        let mut cond = Condition::all();
        if let Some(status) = &filter.status {
            cond = cond.add(blogs::Column::Status.eq(status.clone()));
        }
        if let Some(category) = &filter.category {
            cond = cond.add(blogs::Column::Category.eq(category.clone()));
        }
        if let Some(featured) = filter.featured {
            cond = cond.add(blogs::Column::Featured.eq(featured));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            cond = cond.add(
                Condition::any()
                    .add(blogs::Column::Title.like(pattern.clone()))
                    .add(blogs::Column::Excerpt.like(pattern.clone()))
                    .add(blogs::Column::Tags.like(pattern)),
            );
        }
        cond
    }

    /// Filtered page ordered by publish date descending. Returns the page
    /// plus the total row count for the filter.
    pub async fn list(&self, filter: &BlogFilter, page: u64, limit: u64) -> Result<(Vec<Blog>, u64)> {
        let cond = Self::filter_condition(filter);

        let total = Blogs::find()
            .filter(cond.clone())
            .count(&self.conn)
            .await
            .context("Failed to count blogs")?;

        let rows = Blogs::find()
            .filter(cond)
            .order_by_desc(blogs::Column::PublishDate)
            .limit(limit)
            .offset(page.saturating_sub(1) * limit)
            .all(&self.conn)
            .await
            .context("Failed to list blogs")?;

        Ok((rows.into_iter().map(Self::map_model).collect(), total))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        let row = Blogs::find()
            .filter(blogs::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count = Blogs::find()
            .filter(blogs::Column::Slug.eq(slug))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, input: &BlogInput) -> Result<Blog> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = blogs::ActiveModel {
            title: Set(input.title.clone()),
            slug: Set(input.slug.trim().to_lowercase()),
            excerpt: Set(input.excerpt.clone()),
            content: Set(input.content.clone()),
            author: Set(serde_json::to_string(&input.author)?),
            category: Set(input.category.clone()),
            tags: Set(serde_json::to_string(&input.tags)?),
            cover_image: Set(input.cover_image.clone()),
            publish_date: Set(input.publish_date.clone().unwrap_or_else(|| now.clone())),
            status: Set(input.status.clone()),
            featured: Set(input.featured),
            seo: Set(serde_json::to_string(&input.seo)?),
            views: Set(0),
            likes: Set(0),
            read_time: Set(input.read_time),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await.context("Failed to insert blog")?;
        Ok(Self::map_model(model))
    }

    /// Full replacement of the editable fields; counters and timestamps of
    /// record creation are preserved.
    pub async fn update(&self, id: i32, input: &BlogInput) -> Result<Option<Blog>> {
        let Some(existing) = Blogs::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: blogs::ActiveModel = existing.into();
        active.title = Set(input.title.clone());
        active.slug = Set(input.slug.trim().to_lowercase());
        active.excerpt = Set(input.excerpt.clone());
        active.content = Set(input.content.clone());
        active.author = Set(serde_json::to_string(&input.author)?);
        active.category = Set(input.category.clone());
        active.tags = Set(serde_json::to_string(&input.tags)?);
        active.cover_image = Set(input.cover_image.clone());
        if let Some(publish_date) = &input.publish_date {
            active.publish_date = Set(publish_date.clone());
        }
        active.status = Set(input.status.clone());
        active.featured = Set(input.featured);
        active.seo = Set(serde_json::to_string(&input.seo)?);
        active.read_time = Set(input.read_time);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(model)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Blogs::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn increment_views(&self, id: i32) -> Result<()> {
        Blogs::update_many()
            .col_expr(
                blogs::Column::Views,
                sea_orm::sea_query::Expr::col(blogs::Column::Views).add(1),
            )
            .filter(blogs::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn count_with_status(&self, status: &str) -> Result<u64> {
        let count = Blogs::find()
            .filter(blogs::Column::Status.eq(status))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Most-viewed published posts, for the analytics dashboard.
    pub async fn top_published(&self, limit: u64) -> Result<Vec<Blog>> {
        let rows = Blogs::find()
            .filter(blogs::Column::Status.eq("published"))
            .order_by_desc(blogs::Column::Views)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }
}
