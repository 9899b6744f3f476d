// Library for tests to access modules

pub mod analyzer;
pub mod collector;
pub mod config;
pub mod error;
pub mod forecast;
pub mod history_repo;
pub mod inventory;
pub mod maintenance_worker;
pub mod models;
pub mod routes;
pub mod thresholds;
pub mod utilization;
pub mod version;
pub mod worker;
