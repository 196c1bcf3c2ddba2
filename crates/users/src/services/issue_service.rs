//! Read side of a resident's reported issues.

use ourstreet_database::{Issue, IssueRepository, SqlitePool};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::repositories::IssueStore;
use crate::types::ServiceResult;

/// Optional exact-match filters. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct IssueFilter {
    pub status: Option<String>,
    pub category: Option<String>,
}

impl IssueFilter {
    pub fn new(status: Option<String>, category: Option<String>) -> Self {
        Self {
            status: status.filter(|value| !value.is_empty()),
            category: category.filter(|value| !value.is_empty()),
        }
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        let status_ok = self
            .status
            .as_deref()
            .map_or(true, |status| issue.status.as_str() == status);
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| issue.category == category);
        status_ok && category_ok
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssueListing {
    pub issues: Vec<Issue>,
    /// Number of issues after filtering.
    pub total: usize,
    /// Whether filtering removed anything.
    pub filtered: bool,
    pub filters: IssueFilter,
}

pub struct IssueService<R> {
    issues: R,
}

impl IssueService<IssueRepository> {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_store(IssueRepository::new(pool))
    }
}

impl<R> IssueService<R>
where
    R: IssueStore,
{
    pub fn with_store(issues: R) -> Self {
        Self { issues }
    }

    /// Issues owned by `user_id` that pass `filter`, newest first.
    pub async fn list_for_user(&self, user_id: i64, filter: IssueFilter) -> ServiceResult<IssueListing> {
        let all = self.issues.issues_for_user(user_id).await?;
        let unfiltered = all.len();

        let mut issues: Vec<Issue> = all.into_iter().filter(|issue| filter.matches(issue)).collect();
        issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(user_id, unfiltered, matched = issues.len(), "listed user issues");

        Ok(IssueListing {
            total: issues.len(),
            filtered: issues.len() != unfiltered,
            issues,
            filters: filter,
        })
    }
}
