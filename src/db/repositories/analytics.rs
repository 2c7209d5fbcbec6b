use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{analytics_days, prelude::*};

/// Pages with dedicated counters; anything else only bumps the total.
const KNOWN_PAGES: &[&str] = &[
    "home", "about", "services", "products", "blog", "careers", "contact",
];

/// A tracked site event, decoded from the public tracking endpoint.
#[derive(Debug, Clone)]
pub enum AnalyticsEvent {
    PageView { page: Option<String> },
    BlogView { blog_id: i32 },
    ProductView { product_id: i32 },
    ContactForm,
    CareerApplication,
    AssistantInteraction,
    UniqueVisitor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentViews {
    pub id: i32,
    pub views: i64,
}

/// One day of aggregated site activity.
#[derive(Debug, Clone, Serialize)]
pub struct DayStats {
    pub date: String,
    pub page_views: BTreeMap<String, i64>,
    pub unique_visitors: i64,
    pub blog_views: Vec<ContentViews>,
    pub product_views: Vec<ContentViews>,
    pub contact_form_submissions: i64,
    pub career_applications: i64,
    pub assistant_interactions: i64,
}

impl DayStats {
    #[must_use]
    pub fn total_page_views(&self) -> i64 {
        self.page_views.get("total").copied().unwrap_or(0)
    }
}

pub struct AnalyticsRepository {
    conn: DatabaseConnection,
}

impl AnalyticsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: analytics_days::Model) -> DayStats {
        DayStats {
            date: m.date,
            page_views: serde_json::from_str(&m.page_views).unwrap_or_default(),
            unique_visitors: m.unique_visitors,
            blog_views: serde_json::from_str(&m.blog_views).unwrap_or_default(),
            product_views: serde_json::from_str(&m.product_views).unwrap_or_default(),
            contact_form_submissions: m.contact_form_submissions,
            career_applications: m.career_applications,
            assistant_interactions: m.assistant_interactions,
        }
    }

    async fn find_or_create_day(&self, date: &str) -> Result<analytics_days::Model> {
        let existing = AnalyticsDays::find()
            .filter(analytics_days::Column::Date.eq(date))
            .one(&self.conn)
            .await
            .context("Failed to query analytics day")?;

        if let Some(model) = existing {
            return Ok(model);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let active = analytics_days::ActiveModel {
            date: Set(date.to_string()),
            page_views: Set("{}".to_string()),
            unique_visitors: Set(0),
            blog_views: Set("[]".to_string()),
            product_views: Set("[]".to_string()),
            contact_form_submissions: Set(0),
            career_applications: Set(0),
            assistant_interactions: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to create analytics day")
    }

    /// Apply one event to today's row. Read-modify-write on a single daily
    /// counter row; the tracker is best-effort by design.
    pub async fn track(&self, event: AnalyticsEvent) -> Result<()> {
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let model = self.find_or_create_day(&today).await?;
        let mut day = Self::map_model(model.clone());

        match event {
            AnalyticsEvent::PageView { page } => {
                *day.page_views.entry("total".to_string()).or_insert(0) += 1;
                if let Some(page) = page
                    && KNOWN_PAGES.contains(&page.as_str())
                {
                    *day.page_views.entry(page).or_insert(0) += 1;
                }
            }
            AnalyticsEvent::BlogView { blog_id } => {
                bump_content_views(&mut day.blog_views, blog_id);
            }
            AnalyticsEvent::ProductView { product_id } => {
                bump_content_views(&mut day.product_views, product_id);
            }
            AnalyticsEvent::ContactForm => day.contact_form_submissions += 1,
            AnalyticsEvent::CareerApplication => day.career_applications += 1,
            AnalyticsEvent::AssistantInteraction => day.assistant_interactions += 1,
            AnalyticsEvent::UniqueVisitor => day.unique_visitors += 1,
        }

        let mut active: analytics_days::ActiveModel = model.into();
        active.page_views = Set(serde_json::to_string(&day.page_views)?);
        active.unique_visitors = Set(day.unique_visitors);
        active.blog_views = Set(serde_json::to_string(&day.blog_views)?);
        active.product_views = Set(serde_json::to_string(&day.product_views)?);
        active.contact_form_submissions = Set(day.contact_form_submissions);
        active.career_applications = Set(day.career_applications);
        active.assistant_interactions = Set(day.assistant_interactions);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Most recent days inside the optional inclusive date window, newest
    /// first, capped at `limit` rows.
    pub async fn recent_days(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: u64,
    ) -> Result<Vec<DayStats>> {
        let mut query = AnalyticsDays::find();
        if let Some(start) = start_date {
            query = query.filter(analytics_days::Column::Date.gte(start));
        }
        if let Some(end) = end_date {
            query = query.filter(analytics_days::Column::Date.lte(end));
        }

        let rows = query
            .order_by_desc(analytics_days::Column::Date)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query analytics window")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Days from `start_date` onward, oldest first, for trend charts.
    pub async fn days_since(&self, start_date: &str) -> Result<Vec<DayStats>> {
        let rows = AnalyticsDays::find()
            .filter(analytics_days::Column::Date.gte(start_date))
            .order_by_asc(analytics_days::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to query analytics trend window")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }
}

fn bump_content_views(views: &mut Vec<ContentViews>, id: i32) {
    if let Some(entry) = views.iter_mut().find(|v| v.id == id) {
        entry.views += 1;
    } else {
        views.push(ContentViews { id, views: 1 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_content_views_inserts_then_increments() {
        let mut views = Vec::new();
        bump_content_views(&mut views, 7);
        bump_content_views(&mut views, 7);
        bump_content_views(&mut views, 9);

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].views, 2);
        assert_eq!(views[1].views, 1);
    }
}
