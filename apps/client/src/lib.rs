//! Career Metric client: employability readiness scoring with a remote
//! scoring service and a local fallback.

pub mod api_client;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod health;
pub mod models;
pub mod scoring;
pub mod session;
pub mod submission;
