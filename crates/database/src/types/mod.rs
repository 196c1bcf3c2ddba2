//! Shared types and result types for the database layer

pub mod errors;

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

pub use errors::DatabaseError;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// A value headed for a single column of a partial write.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// Nullable text. `None` stores SQL `NULL`.
    Text(Option<String>),
    Flag(bool),
    Integer(i64),
}

impl ColumnValue {
    pub fn text(value: impl Into<String>) -> Self {
        ColumnValue::Text(Some(value.into()))
    }
}

/// One column assignment in a partial update of table `C`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWrite<C> {
    pub column: C,
    pub value: ColumnValue,
}

impl<C> ColumnWrite<C> {
    pub fn new(column: C, value: ColumnValue) -> Self {
        Self { column, value }
    }
}

pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &ColumnValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        ColumnValue::Text(text) => query.bind(text.clone()),
        ColumnValue::Flag(flag) => query.bind(*flag),
        ColumnValue::Integer(number) => query.bind(*number),
    }
}
