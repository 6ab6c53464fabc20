pub use seed::seed_demo_users;

pub mod models;
pub mod repository;
mod seed;
