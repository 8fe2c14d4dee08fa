//! Repository layer: one stateless struct per table (plus analytics).

mod analytics_repo;
mod project_repo;
mod scene_repo;
mod user_repo;

pub use analytics_repo::{AnalyticsRepo, UsageRow};
pub use project_repo::ProjectRepo;
pub use scene_repo::SceneRepo;
pub use user_repo::UserRepo;
