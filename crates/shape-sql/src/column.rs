//! Column descriptors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("Unknown column type: {0}")]
    UnknownType(String),
}

/// Storage classes accepted by SQLite `strict` tables (plus `null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Null,
    Integer,
    Real,
    Text,
}

impl SqlType {
    pub fn keyword(&self) -> &'static str {
        match self {
            SqlType::Null => "null",
            SqlType::Integer => "integer",
            SqlType::Real => "real",
            SqlType::Text => "text",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SqlType {
    type Err = ColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" => Ok(SqlType::Null),
            "integer" => Ok(SqlType::Integer),
            "real" => Ok(SqlType::Real),
            "text" => Ok(SqlType::Text),
            _ => Err(ColumnError::UnknownType(s.to_string())),
        }
    }
}

/// Rendering of a default value inside a column clause.
///
/// Text is emitted verbatim so SQL expressions such as `current_timestamp`
/// pass through. Callers wanting a string literal supply the quotes; an empty
/// string becomes the empty literal `''`.
pub trait SqlLiteral {
    fn to_sql_literal(&self) -> String;
}

impl SqlLiteral for () {
    fn to_sql_literal(&self) -> String {
        "null".to_string()
    }
}

impl SqlLiteral for i64 {
    fn to_sql_literal(&self) -> String {
        self.to_string()
    }
}

/// SQLite has no NaN or infinity literals: NaN is stored as NULL and an
/// out-of-range literal such as `9e999` reads back as infinity.
impl SqlLiteral for f64 {
    fn to_sql_literal(&self) -> String {
        if self.is_nan() {
            "null".to_string()
        } else if self.is_infinite() {
            let literal = if *self > 0.0 { "9e999" } else { "-9e999" };
            literal.to_string()
        } else {
            self.to_string()
        }
    }
}

impl SqlLiteral for String {
    fn to_sql_literal(&self) -> String {
        self.clone()
    }
}

/// Column without its value type: what a table stores and renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub sql_type: SqlType,
    pub primary: bool,
    pub required: bool,
    pub default: Option<String>,
}

impl ColumnDef {
    pub fn new(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            primary: false,
            required: false,
            default: None,
        }
    }

    /// Primary keys are always `not null`; SQLite would otherwise accept
    /// nulls in non-integer primary key columns.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.required = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Blank literals render as `''` so the clause stays valid SQL.
    pub fn default_literal(mut self, literal: impl Into<String>) -> Self {
        let literal = literal.into();
        self.default = Some(if literal.trim().is_empty() {
            "''".to_string()
        } else {
            literal
        });
        self
    }

    /// `"<name>" <type>[ primary key][ not null][ default <value>]`
    ///
    /// Clause order is fixed, whatever order the builder calls came in.
    pub fn to_sql(&self, name: &str) -> String {
        let mut sql = format!("\"{}\" {}", name, self.sql_type.keyword());
        if self.primary {
            sql.push_str(" primary key");
        }
        if self.required {
            sql.push_str(" not null");
        }
        if let Some(default) = &self.default {
            sql.push_str(" default ");
            sql.push_str(default);
        }
        sql
    }
}

/// Column whose values have Rust type `T`.
#[derive(Debug, Clone)]
pub struct Column<T> {
    def: ColumnDef,
    _type: PhantomData<fn() -> T>,
}

impl<T> Column<T> {
    fn new(sql_type: SqlType) -> Self {
        Self {
            def: ColumnDef::new(sql_type),
            _type: PhantomData,
        }
    }

    pub fn primary(self) -> Self {
        Self {
            def: self.def.primary(),
            _type: PhantomData,
        }
    }

    pub fn required(self) -> Self {
        Self {
            def: self.def.required(),
            _type: PhantomData,
        }
    }

    pub fn sql_type(&self) -> SqlType {
        self.def.sql_type
    }

    pub fn def(&self) -> &ColumnDef {
        &self.def
    }

    pub fn into_def(self) -> ColumnDef {
        self.def
    }

    pub fn to_sql(&self, name: &str) -> String {
        self.def.to_sql(name)
    }
}

impl<T: SqlLiteral> Column<T> {
    pub fn default(self, value: impl Into<T>) -> Self {
        Self {
            def: self.def.default_literal(value.into().to_sql_literal()),
            _type: PhantomData,
        }
    }
}

pub fn null() -> Column<()> {
    Column::new(SqlType::Null)
}

pub fn integer() -> Column<i64> {
    Column::new(SqlType::Integer)
}

pub fn real() -> Column<f64> {
    Column::new(SqlType::Real)
}

pub fn text() -> Column<String> {
    Column::new(SqlType::Text)
}
