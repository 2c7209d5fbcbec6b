use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{careers, prelude::*};
use crate::models::career::{Career, CareerInput};

pub struct CareerRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Default, Clone)]
pub struct CareerFilter {
    pub status: Option<String>,
    pub department: Option<String>,
    pub employment_type: Option<String>,
    pub level: Option<String>,
    pub search: Option<String>,
}

impl CareerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: careers::Model) -> Career {
        Career {
            id: m.id,
            title: m.title,
            slug: m.slug,
            department: m.department,
            location: m.location,
            employment_type: m.employment_type,
            level: m.level,
            description: m.description,
            responsibilities: serde_json::from_str(&m.responsibilities).unwrap_or_default(),
            requirements: serde_json::from_str(&m.requirements).unwrap_or_default(),
            nice_to_have: serde_json::from_str(&m.nice_to_have).unwrap_or_default(),
            benefits: serde_json::from_str(&m.benefits).unwrap_or_default(),
            salary: m
                .salary
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
            status: m.status,
            featured: m.featured,
            application_deadline: m.application_deadline,
            openings: m.openings,
            posted_date: m.posted_date,
            applicants: m.applicants,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn filter_condition(filter: &CareerFilter) -> Condition {
        let mut cond = Condition::all();
        if let Some(status) = &filter.status {
            cond = cond.add(careers::Column::Status.eq(status.clone()));
        }
        if let Some(department) = &filter.department {
            cond = cond.add(careers::Column::Department.eq(department.clone()));
        }
        if let Some(employment_type) = &filter.employment_type {
            cond = cond.add(careers::Column::EmploymentType.eq(employment_type.clone()));
        }
        if let Some(level) = &filter.level {
            cond = cond.add(careers::Column::Level.eq(level.clone()));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            cond = cond.add(
                Condition::any()
                    .add(careers::Column::Title.like(pattern.clone()))
                    .add(careers::Column::Description.like(pattern.clone()))
                    .add(careers::Column::Location.like(pattern)),
            );
        }
        cond
    }

    /// Filtered page, newest postings first.
    pub async fn list(
        &self,
        filter: &CareerFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Career>, u64)> {
        let cond = Self::filter_condition(filter);

        let total = Careers::find()
            .filter(cond.clone())
            .count(&self.conn)
            .await
            .context("Failed to count careers")?;

        let rows = Careers::find()
            .filter(cond)
            .order_by_desc(careers::Column::PostedDate)
            .limit(limit)
            .offset(page.saturating_sub(1) * limit)
            .all(&self.conn)
            .await
            .context("Failed to list careers")?;

        Ok((rows.into_iter().map(Self::map_model).collect(), total))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Career>> {
        let row = Careers::find()
            .filter(careers::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count = Careers::find()
            .filter(careers::Column::Slug.eq(slug))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, input: &CareerInput) -> Result<Career> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = careers::ActiveModel {
            title: Set(input.title.clone()),
            slug: Set(input.slug.trim().to_lowercase()),
            department: Set(input.department.clone()),
            location: Set(input.location.clone()),
            employment_type: Set(input.employment_type.clone()),
            level: Set(input.level.clone()),
            description: Set(input.description.clone()),
            responsibilities: Set(serde_json::to_string(&input.responsibilities)?),
            requirements: Set(serde_json::to_string(&input.requirements)?),
            nice_to_have: Set(serde_json::to_string(&input.nice_to_have)?),
            benefits: Set(serde_json::to_string(&input.benefits)?),
            salary: Set(match &input.salary {
                Some(salary) => Some(serde_json::to_string(salary)?),
                None => None,
            }),
            status: Set(input.status.clone()),
            featured: Set(input.featured),
            application_deadline: Set(input.application_deadline.clone()),
            openings: Set(input.openings),
            posted_date: Set(now.clone()),
            applicants: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert career")?;
        Ok(Self::map_model(model))
    }

    pub async fn update(&self, id: i32, input: &CareerInput) -> Result<Option<Career>> {
        let Some(existing) = Careers::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: careers::ActiveModel = existing.into();
        active.title = Set(input.title.clone());
        active.slug = Set(input.slug.trim().to_lowercase());
        active.department = Set(input.department.clone());
        active.location = Set(input.location.clone());
        active.employment_type = Set(input.employment_type.clone());
        active.level = Set(input.level.clone());
        active.description = Set(input.description.clone());
        active.responsibilities = Set(serde_json::to_string(&input.responsibilities)?);
        active.requirements = Set(serde_json::to_string(&input.requirements)?);
        active.nice_to_have = Set(serde_json::to_string(&input.nice_to_have)?);
        active.benefits = Set(serde_json::to_string(&input.benefits)?);
        active.salary = Set(match &input.salary {
            Some(salary) => Some(serde_json::to_string(salary)?),
            None => None,
        });
        active.status = Set(input.status.clone());
        active.featured = Set(input.featured);
        active.application_deadline = Set(input.application_deadline.clone());
        active.openings = Set(input.openings);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(model)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Careers::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn increment_applicants(&self, id: i32) -> Result<()> {
        Careers::update_many()
            .col_expr(
                careers::Column::Applicants,
                sea_orm::sea_query::Expr::col(careers::Column::Applicants).add(1),
            )
            .filter(careers::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn count_with_status(&self, status: &str) -> Result<u64> {
        let count = Careers::find()
            .filter(careers::Column::Status.eq(status))
            .count(&self.conn)
            .await?;
        Ok(count)
    }
}
