//! shape-sql - column and table descriptors for SQLite `strict` tables
//!
//! Columns are declared with by-value builders; a table collects named columns
//! in order and renders one `create table if not exists ... strict;`
//! statement. The row type of a typed table is the tuple of its columns'
//! value types.
//!
//! ```
//! use shape_sql::{col, integer, table, text};
//!
//! let users = table("users", (
//!     col("id", integer().primary()),
//!     col("name", text().required()),
//! ));
//!
//! assert_eq!(
//!     users.to_sql(),
//!     "create table if not exists users (\n  \"id\" integer primary key not null,\n  \"name\" text not null\n) strict;"
//! );
//! ```

mod column;
mod table;

pub use column::{
    integer, null, real, text, Column, ColumnDef, ColumnError, SqlLiteral, SqlType,
};
pub use table::{col, render_all, table, Columns, NamedColumn, Row, Table, Untyped};
