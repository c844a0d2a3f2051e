pub mod user_repo;
pub use user_repo::UserRepository;
pub mod shift_repo;
pub use shift_repo::ShiftRepository;
pub mod institution_repo;
pub use institution_repo::InstitutionRepository;
pub mod subscription_repo;
pub use subscription_repo::{SubscriptionRepository, SubscriptionStore};
