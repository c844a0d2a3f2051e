pub mod auth;
pub mod dashboard;
pub mod institutions;
pub mod shifts;
pub mod subscription;
