//! Database repository implementations

pub mod identity_repository;
pub mod issue_repository;
pub mod profile_repository;
pub mod user_repository;

pub use identity_repository::IdentityRepository;
pub use issue_repository::IssueRepository;
pub use profile_repository::ProfileRepository;
pub use user_repository::UserRepository;
