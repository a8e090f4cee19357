//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod asset_repo;
pub mod project_repo;
pub mod user_repo;
pub mod version_repo;

pub use asset_repo::AssetRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
pub use version_repo::VersionRepo;
