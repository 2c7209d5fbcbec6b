pub mod admin;
pub mod blog;
pub mod career;
pub mod product;
