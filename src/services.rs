pub mod aggregation;
pub mod auth;
pub mod dashboard_service;
pub mod institution_service;
pub mod recurrence;
pub mod shift_service;
pub mod subscription_service;
