use serde::{Deserialize, Serialize};

pub const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Design",
    "Product",
    "Marketing",
    "Sales",
    "Operations",
    "HR",
    "Finance",
];

pub const EMPLOYMENT_TYPES: &[&str] = &["full-time", "part-time", "contract", "internship"];

pub const LEVELS: &[&str] = &["entry", "mid", "senior", "lead", "executive"];

pub const CAREER_STATUSES: &[&str] = &["open", "closed", "paused"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct Career {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub department: String,
    pub location: String,
    pub employment_type: String,
    pub level: String,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub benefits: Vec<String>,
    pub salary: Option<SalaryRange>,
    pub status: String,
    pub featured: bool,
    pub application_deadline: Option<String>,
    pub openings: i32,
    pub posted_date: String,
    pub applicants: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CareerInput {
    pub title: String,
    pub slug: String,
    pub department: String,
    pub location: String,
    pub employment_type: String,
    pub level: String,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default = "default_career_status")]
    pub status: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default = "default_openings")]
    pub openings: i32,
}

fn default_career_status() -> String {
    "open".to_string()
}

const fn default_openings() -> i32 {
    1
}

impl CareerInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Job title is required".to_string());
        }
        if self.slug.trim().is_empty() {
            return Err("Slug is required".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("Location is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Job description is required".to_string());
        }
        if self.responsibilities.is_empty() {
            return Err("At least one responsibility is required".to_string());
        }
        if self.requirements.is_empty() {
            return Err("At least one requirement is required".to_string());
        }
        if self.openings < 1 {
            return Err("Openings must be at least 1".to_string());
        }
        if !DEPARTMENTS.contains(&self.department.as_str()) {
            return Err(format!(
                "Department must be one of: {}",
                DEPARTMENTS.join(", ")
            ));
        }
        if !EMPLOYMENT_TYPES.contains(&self.employment_type.as_str()) {
            return Err(format!(
                "Type must be one of: {}",
                EMPLOYMENT_TYPES.join(", ")
            ));
        }
        if !LEVELS.contains(&self.level.as_str()) {
            return Err(format!("Level must be one of: {}", LEVELS.join(", ")));
        }
        if !CAREER_STATUSES.contains(&self.status.as_str()) {
            return Err(format!(
                "Status must be one of: {}",
                CAREER_STATUSES.join(", ")
            ));
        }
        Ok(())
    }
}
