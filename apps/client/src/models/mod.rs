pub mod api;
pub mod assessment;
pub mod summary;
pub mod user;
