// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Database abstraction in terms of the operations needed by the server.
//!
//! Every kind of record lives in its own table, described as data by a `Table` implementation.
//! The persistence functions in this module are generic over that description and build their
//! SQL out of the static table and column names only: all record data travels as bound
//! parameters.

use crate::model::RecordId;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::{PgRow, Postgres};
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::{Sqlite, SqliteRow};
#[cfg(feature = "postgres")]
use zoo_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use zoo_core::db::sqlite;
use zoo_core::db::{DbError, DbResult, Executor};

mod tables;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// SQL type of a mutable column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ColumnType {
    /// Text column, mapped to `String`.
    Text,

    /// 32-bit integer column, mapped to `i32`.
    Integer,

    /// Floating point column, mapped to `f64`.
    Real,
}

/// A mutable column of a table.
#[derive(Debug)]
pub(crate) struct Column {
    /// Name of the column.
    pub(crate) name: &'static str,

    /// Type of the values stored in the column.
    pub(crate) ty: ColumnType,
}

/// Layout of the table that holds one kind of record.
#[derive(Debug)]
pub(crate) struct Schema {
    /// Name of the table.
    pub(crate) table: &'static str,

    /// Name of the column holding the storage-assigned identifier.
    pub(crate) id_column: &'static str,

    /// Mutable columns, in the same order as the values of the record's fields.
    pub(crate) columns: &'static [Column],

    /// Name of the nullable column that links the record to a habitat, if the record supports it.
    pub(crate) habitat_column: Option<&'static str>,
}

/// Syntax used by a database backend for positional query parameters.
#[derive(Clone, Copy)]
enum Placeholder {
    /// PostgreSQL style: `$1`, `$2`...
    #[cfg_attr(not(feature = "postgres"), allow(unused))]
    Dollar,

    /// SQLite style: `?`.
    #[cfg_attr(not(any(feature = "sqlite", test)), allow(unused))]
    Question,
}

impl Placeholder {
    /// Returns the placeholder for the 1-based parameter `n`.
    fn nth(self, n: usize) -> String {
        match self {
            Placeholder::Dollar => format!("${}", n),
            Placeholder::Question => "?".to_owned(),
        }
    }
}

impl Schema {
    /// Returns the names of all columns that are read back for a record, in order.
    fn select_columns(&self) -> Vec<&'static str> {
        let mut names = vec![self.id_column];
        names.extend(self.columns.iter().map(|c| c.name));
        names.extend(self.habitat_column);
        names
    }

    /// Builds the query to fetch all records ordered by identifier.
    fn list_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY {} ASC",
            self.select_columns().join(", "),
            self.table,
            self.id_column
        )
    }

    /// Builds the query to insert a new record.  The habitat column, if any, is the last
    /// parameter.
    fn insert_sql(&self, placeholder: Placeholder) -> String {
        let mut names: Vec<&'static str> = self.columns.iter().map(|c| c.name).collect();
        names.extend(self.habitat_column);
        let params: Vec<String> = (1..=names.len()).map(|i| placeholder.nth(i)).collect();
        format!("INSERT INTO {} ({}) VALUES ({})", self.table, names.join(", "), params.join(", "))
    }

    /// Builds the query to replace all mutable columns of a record.  The identifier is the last
    /// parameter.
    fn update_sql(&self, placeholder: Placeholder) -> String {
        let assignments: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = {}", c.name, placeholder.nth(i + 1)))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = {}",
            self.table,
            assignments.join(", "),
            self.id_column,
            placeholder.nth(self.columns.len() + 1)
        )
    }

    /// Builds the query to delete a record.
    fn delete_sql(&self, placeholder: Placeholder) -> String {
        format!("DELETE FROM {} WHERE {} = {}", self.table, self.id_column, placeholder.nth(1))
    }
}

/// A single value of a mutable column.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Value {
    /// Value of a `ColumnType::Text` column.
    Text(String),

    /// Value of a `ColumnType::Integer` column.
    Integer(i32),

    /// Value of a `ColumnType::Real` column.
    Real(f64),
}

/// Cursor over the values of a row, used to rebuild records field by field.
pub(crate) struct Values(std::vec::IntoIter<Value>);

impl Values {
    /// Fetches the next value, which must be of `ColumnType::Text`.
    pub(crate) fn text(&mut self) -> DbResult<String> {
        match self.0.next() {
            Some(Value::Text(s)) => Ok(s),
            v => Err(DbError::DataIntegrityError(format!("Expected text but got {:?}", v))),
        }
    }

    /// Fetches the next value, which must be of `ColumnType::Integer`.
    pub(crate) fn integer(&mut self) -> DbResult<i32> {
        match self.0.next() {
            Some(Value::Integer(i)) => Ok(i),
            v => Err(DbError::DataIntegrityError(format!("Expected integer but got {:?}", v))),
        }
    }

    /// Fetches the next value, which must be of `ColumnType::Real`.
    pub(crate) fn real(&mut self) -> DbResult<f64> {
        match self.0.next() {
            Some(Value::Real(f)) => Ok(f),
            v => Err(DbError::DataIntegrityError(format!("Expected real but got {:?}", v))),
        }
    }
}

impl From<Vec<Value>> for Values {
    fn from(values: Vec<Value>) -> Self {
        Self(values.into_iter())
    }
}

/// A kind of record that is stored in its own table.
pub(crate) trait Table: Sized {
    /// Mutable fields of the record, which are the ones provided on creation and on update.
    type Fields;

    /// Layout of the table.
    const SCHEMA: Schema;

    /// Flattens `fields` into values that match `SCHEMA.columns`.
    fn values(fields: &Self::Fields) -> Vec<Value>;

    /// Returns the identifier of the record.
    #[cfg(test)]
    fn record_id(&self) -> RecordId;

    /// Rebuilds a record from its identifier, the values of `SCHEMA.columns` and its habitat.
    fn from_parts(id: RecordId, values: Values, habitat_id: Option<RecordId>) -> DbResult<Self>;
}

/// Binds all `values` to `query` in order.
macro_rules! bind_values [
    ( $query:expr, $values:expr ) => {{
        let mut query = $query;
        for value in $values {
            query = match value {
                Value::Text(s) => query.bind(s),
                Value::Integer(i) => query.bind(i),
                Value::Real(f) => query.bind(f),
            };
        }
        query
    }}
];

/// Extracts a record of type `T` from a row.  Expands to the per-backend `try_get` calls with the
/// matching error mapper.
macro_rules! decode_row [
    ( $row:expr, $map_err:path ) => {{
        let row = $row;
        let schema = &T::SCHEMA;
        let id: i64 = row.try_get(schema.id_column).map_err($map_err)?;
        let mut values = Vec::with_capacity(schema.columns.len());
        for column in schema.columns {
            let value = match column.ty {
                ColumnType::Text => Value::Text(row.try_get(column.name).map_err($map_err)?),
                ColumnType::Integer => Value::Integer(row.try_get(column.name).map_err($map_err)?),
                ColumnType::Real => Value::Real(row.try_get(column.name).map_err($map_err)?),
            };
            values.push(value);
        }
        let habitat_id = match schema.habitat_column {
            Some(name) => row.try_get::<Option<i64>, _>(name).map_err($map_err)?.map(RecordId::new),
            None => None,
        };
        T::from_parts(RecordId::new(id), Values::from(values), habitat_id)
    }}
];

/// Converts a PostgreSQL row into a record of type `T`.
#[cfg(feature = "postgres")]
fn decode_pg_row<T: Table>(row: PgRow) -> DbResult<T> {
    decode_row!(row, postgres::map_sqlx_error)
}

/// Converts an SQLite row into a record of type `T`.
#[cfg(any(feature = "sqlite", test))]
fn decode_sqlite_row<T: Table>(row: SqliteRow) -> DbResult<T> {
    decode_row!(row, sqlite::map_sqlx_error)
}

/// Gets all records of type `T` ordered by identifier.
pub(crate) async fn list<T: Table>(ex: &mut Executor) -> DbResult<Vec<T>> {
    let query_str = T::SCHEMA.list_sql();
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query::<Postgres>(&query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(decode_pg_row::<T>).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query::<Sqlite>(&query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(decode_sqlite_row::<T>).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Inserts a new record of type `T` with `fields`, placed in `habitat_id` if the record supports
/// habitats.  The habitat is not required to exist.
///
/// Returns the number of affected rows.
pub(crate) async fn insert<T: Table>(
    ex: &mut Executor,
    fields: &T::Fields,
    habitat_id: Option<RecordId>,
) -> DbResult<u64> {
    let values = T::values(fields);
    let habitat_id = T::SCHEMA.habitat_column.map(|_| habitat_id.map(RecordId::as_i64));
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = T::SCHEMA.insert_sql(Placeholder::Dollar);
            let mut query = bind_values!(sqlx::query::<Postgres>(&query_str), values);
            if let Some(habitat_id) = habitat_id {
                query = query.bind(habitat_id);
            }
            let done = query.execute(ex.conn()).await.map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = T::SCHEMA.insert_sql(Placeholder::Question);
            let mut query = bind_values!(sqlx::query::<Sqlite>(&query_str), values);
            if let Some(habitat_id) = habitat_id {
                query = query.bind(habitat_id);
            }
            let done = query.execute(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Replaces the mutable fields of the record of type `T` identified by `id` with `fields`.  The
/// habitat of the record is left untouched.
///
/// Returns the number of affected rows, which is zero if the record does not exist.
pub(crate) async fn update<T: Table>(
    ex: &mut Executor,
    id: RecordId,
    fields: &T::Fields,
) -> DbResult<u64> {
    let values = T::values(fields);
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = T::SCHEMA.update_sql(Placeholder::Dollar);
            let done = bind_values!(sqlx::query::<Postgres>(&query_str), values)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = T::SCHEMA.update_sql(Placeholder::Question);
            let done = bind_values!(sqlx::query::<Sqlite>(&query_str), values)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes the record of type `T` identified by `id`.
///
/// Returns the number of affected rows, which is zero if the record does not exist.
pub(crate) async fn delete<T: Table>(ex: &mut Executor, id: RecordId) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = T::SCHEMA.delete_sql(Placeholder::Dollar);
            let done = sqlx::query::<Postgres>(&query_str)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = T::SCHEMA.delete_sql(Placeholder::Question);
            let done = sqlx::query::<Sqlite>(&query_str)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}
