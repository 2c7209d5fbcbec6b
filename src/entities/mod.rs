pub mod prelude;

pub mod admins;
pub mod analytics_days;
pub mod blogs;
pub mod careers;
pub mod products;
