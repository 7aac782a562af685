pub mod announce;
pub mod config;
pub mod models;
