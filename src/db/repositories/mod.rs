pub mod admin;
pub mod analytics;
pub mod blog;
pub mod career;
pub mod product;
