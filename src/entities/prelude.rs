pub use super::admins::Entity as Admins;
pub use super::analytics_days::Entity as AnalyticsDays;
pub use super::blogs::Entity as Blogs;
pub use super::careers::Entity as Careers;
pub use super::products::Entity as Products;
