//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod asset;
pub mod project;
pub mod user;

pub use asset::{Asset, AssetFilter, AssetVersion, AssetWithRefs, CreateAsset, UpdateAsset};
pub use project::{
    CreateProject, MemberSummary, Project, ProjectSummary, ProjectWithOwner, UpdateProject,
};
pub use user::{CreateUser, UpdateUser, User, UserSummary};
