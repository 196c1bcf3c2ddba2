//! Business logic services for issues and profiles.

pub mod field_mapping;
pub mod issue_service;
pub mod profile_service;
#[cfg(test)]
pub(crate) mod mock_repositories;

pub use field_mapping::{FieldMapping, Target, WritePlan, FIELD_MAPPINGS};
pub use issue_service::{IssueFilter, IssueListing, IssueService};
pub use profile_service::ProfileService;
