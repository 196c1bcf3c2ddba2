//! Domain entities for the database layer

pub mod identity;
pub mod issue;
pub mod profile;
pub mod user;

pub use identity::{UserIdentity, PASSWORD_PROVIDER};
pub use issue::{CreateIssueRequest, Issue, IssueStatus};
pub use profile::{ProfileColumn, ProfileWithIdentity, UserProfile};
pub use user::{CreateUserRequest, IdentityColumn, User, UserRole};
