//! OurStreet Database Crate
//!
//! SQLite connection management, embedded migrations, entities and the
//! repositories behind accounts, profiles and reported issues.

use ourstreet_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;

pub use repos::{IdentityRepository, IssueRepository, ProfileRepository, UserRepository};

pub use entities::{
    CreateIssueRequest, CreateUserRequest, IdentityColumn, Issue, IssueStatus, ProfileColumn,
    ProfileWithIdentity, User, UserIdentity, UserProfile, UserRole, PASSWORD_PROVIDER,
};

pub use types::{ColumnValue, ColumnWrite, DatabaseError, DatabaseResult};

pub use sqlx::SqlitePool;

/// Connect and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
