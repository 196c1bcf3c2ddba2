use std::sync::Arc;

use ourstreet_auth::Authenticator;
use ourstreet_config::AppConfig;
use ourstreet_database::{IssueRepository, SqlitePool};
use ourstreet_users::{IssueService, ProfileService, SqliteProfileStore};
use ourstreet_voice::AgentProfile;

#[derive(Clone)]
pub struct AppState {
    authenticator: Authenticator,
    issues: Arc<IssueService<IssueRepository>>,
    profiles: Arc<ProfileService<SqliteProfileStore>>,
    agent: Arc<AgentProfile>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        Self {
            authenticator: Authenticator::new(pool.clone(), config.auth.clone()),
            issues: Arc::new(IssueService::new(pool.clone())),
            profiles: Arc::new(ProfileService::new(pool)),
            agent: Arc::new(AgentProfile::from_config(&config.voice)),
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn issues(&self) -> &IssueService<IssueRepository> {
        &self.issues
    }

    pub fn profiles(&self) -> &ProfileService<SqliteProfileStore> {
        &self.profiles
    }

    pub fn agent(&self) -> &AgentProfile {
        &self.agent
    }
}
