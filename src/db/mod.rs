pub mod app_setting;
mod migrations;
mod repo;

pub use repo::Repository;
