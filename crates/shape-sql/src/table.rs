//! Table descriptors

use std::marker::PhantomData;
use tracing::trace;

use crate::column::{Column, ColumnDef};

/// A column paired with its name, as listed in a table declaration.
#[derive(Debug, Clone)]
pub struct NamedColumn<T> {
    name: String,
    column: Column<T>,
}

pub fn col<T>(name: impl Into<String>, column: Column<T>) -> NamedColumn<T> {
    NamedColumn {
        name: name.into(),
        column,
    }
}

/// Ordered column list with a row type.
///
/// Implemented for tuples of [`NamedColumn`]; `Row` is the tuple of the
/// columns' value types.
pub trait Columns {
    type Row;

    fn into_defs(self) -> Vec<(String, ColumnDef)>;
}

/// Row type declared by a column list.
pub type Row<C> = <C as Columns>::Row;

macro_rules! impl_columns_for_tuple {
    ($($T:ident . $idx:tt),+) => {
        impl<$($T),+> Columns for ($(NamedColumn<$T>,)+) {
            type Row = ($($T,)+);

            fn into_defs(self) -> Vec<(String, ColumnDef)> {
                vec![$((self.$idx.name, self.$idx.column.into_def())),+]
            }
        }
    };
}

impl_columns_for_tuple!(A.0);
impl_columns_for_tuple!(A.0, B.1);
impl_columns_for_tuple!(A.0, B.1, C.2);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11, M.12);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11, M.12, N.13);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11, M.12, N.13, O.14);
impl_columns_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11, M.12, N.13, O.14, P.15);

/// Row type of tables assembled at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Untyped;

/// A named table with ordered columns. Immutable once built.
#[derive(Debug, Clone)]
pub struct Table<R = Untyped> {
    name: String,
    columns: Vec<(String, ColumnDef)>,
    _row: PhantomData<fn() -> R>,
}

pub fn table<C: Columns>(name: impl Into<String>, columns: C) -> Table<C::Row> {
    Table {
        name: name.into(),
        columns: columns.into_defs(),
        _row: PhantomData,
    }
}

impl Table<Untyped> {
    pub fn from_defs(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = (String, ColumnDef)>,
    ) -> Self {
        Table {
            name: name.into(),
            columns: columns.into_iter().collect(),
            _row: PhantomData,
        }
    }
}

impl<R> Table<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnDef)> {
        self.columns.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, def)| def)
    }

    /// Forget the row type, e.g. to keep typed and loaded tables together.
    pub fn untyped(self) -> Table<Untyped> {
        Table {
            name: self.name,
            columns: self.columns,
            _row: PhantomData,
        }
    }

    /// `create table if not exists` statement for this table.
    ///
    /// Only column names are quoted; names containing `"` are not escaped.
    pub fn to_sql(&self) -> String {
        trace!(table = %self.name, columns = self.columns.len(), "rendering table ddl");

        let clauses: Vec<String> = self
            .columns
            .iter()
            .map(|(name, def)| def.to_sql(name))
            .collect();

        format!(
            "create table if not exists {} (\n  {}\n) strict;",
            self.name,
            clauses.join(",\n  ")
        )
    }
}

/// DDL for several tables, one statement per table separated by a blank line.
pub fn render_all<'a, R: 'a>(tables: impl IntoIterator<Item = &'a Table<R>>) -> String {
    tables
        .into_iter()
        .map(Table::to_sql)
        .collect::<Vec<_>>()
        .join("\n\n")
}
