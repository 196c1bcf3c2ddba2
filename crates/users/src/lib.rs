//! # OurStreet Users Crate
//!
//! Services behind the signed-in resident's own data: the list of issues
//! they reported and their profile (read-or-create, partial update, account
//! deletion).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ourstreet_users::{IssueFilter, IssueService};
//!
//! let service = IssueService::new(pool);
//! let listing = service.list_for_user(user_id, IssueFilter::default()).await?;
//! ```

pub mod repositories;
pub mod services;
pub mod types;

pub use repositories::{IssueStore, ProfileStore, SqliteProfileStore};
pub use services::{IssueFilter, IssueListing, IssueService, ProfileService, WritePlan};
pub use types::{ProfilePatch, ServiceError, ServiceResult};
