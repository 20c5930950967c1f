// Public modules
pub mod debug_info;
pub mod recommendation;
pub mod seed_status;
pub mod turn;

// Re-exports
pub use debug_info::DebugInfo;
pub use recommendation::{RecommendRequest, Recommendation};
pub use seed_status::{HealthStatus, SeedStatus};
pub use turn::{Role, Turn};
