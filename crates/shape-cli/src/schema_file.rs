//! YAML schema files
//!
//! One file declares object shapes (for `shape validate`) and tables (for
//! `shape ddl`). Lists rather than maps keep field and column order explicit:
//!
//! ```yaml
//! objects:
//!   - name: message
//!     fields:
//!       - { name: yes, type: boolean }
//!       - { name: message, type: string }
//! tables:
//!   - name: posts
//!     columns:
//!       - { name: slug, type: text, primary: true }
//!       - { name: created, type: text, required: true, default: current_timestamp }
//! ```

use serde::Deserialize;
use shape_core::{boolean, number, object, string, AnyDescriptor, Descriptor, DynShape, Kind, Object, Presence};
use shape_sql::{ColumnDef, SqlLiteral, SqlType, Table};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SchemaFileError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Object not found: {0}")]
    UnknownObject(String),

    #[error("Duplicate {what} '{name}'")]
    Duplicate { what: &'static str, name: String },

    #[error("Field '{0}' lists nested fields but is not an object")]
    UnexpectedFields(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,

    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    /// Only for `type: object`
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: SqlType,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

/// Default as written in YAML; rendered into the column clause verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl DefaultValue {
    fn literal(&self) -> String {
        match self {
            DefaultValue::Integer(i) => i.to_sql_literal(),
            DefaultValue::Real(f) => f.to_sql_literal(),
            DefaultValue::Text(s) => s.to_sql_literal(),
        }
    }
}

impl ColumnSpec {
    fn to_def(&self) -> ColumnDef {
        let mut def = ColumnDef::new(self.sql_type);
        if self.primary {
            def = def.primary();
        }
        if self.required {
            def = def.required();
        }
        if let Some(default) = &self.default {
            def = def.default_literal(default.literal());
        }
        def
    }
}

impl SchemaFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SchemaFileError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading schema file");
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, SchemaFileError> {
        let file: SchemaFile = serde_yaml::from_str(contents)?;
        file.check()?;
        Ok(file)
    }

    fn check(&self) -> Result<(), SchemaFileError> {
        unique("object", self.objects.iter().map(|o| o.name.as_str()))?;
        unique("table", self.tables.iter().map(|t| t.name.as_str()))?;
        for spec in &self.objects {
            check_fields(&spec.fields)?;
        }
        for spec in &self.tables {
            unique("column", spec.columns.iter().map(|c| c.name.as_str()))?;
        }
        Ok(())
    }

    /// Object descriptor for the object declared as `name`.
    pub fn object(&self, name: &str, presence: Presence) -> Result<Object<DynShape>, SchemaFileError> {
        let spec = self
            .objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| SchemaFileError::UnknownObject(name.to_string()))?;
        Ok(build_object(&spec.fields, presence))
    }

    pub fn tables(&self) -> Vec<Table> {
        self.tables
            .iter()
            .map(|spec| {
                Table::from_defs(
                    spec.name.clone(),
                    spec.columns.iter().map(|c| (c.name.clone(), c.to_def())),
                )
            })
            .collect()
    }
}

fn unique<'a>(what: &'static str, names: impl Iterator<Item = &'a str>) -> Result<(), SchemaFileError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(SchemaFileError::Duplicate {
                what,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_fields(fields: &[FieldSpec]) -> Result<(), SchemaFileError> {
    unique("field", fields.iter().map(|f| f.name.as_str()))?;
    for field in fields {
        if field.kind != Kind::Object && !field.fields.is_empty() {
            return Err(SchemaFileError::UnexpectedFields(field.name.clone()));
        }
        check_fields(&field.fields)?;
    }
    Ok(())
}

fn build_object(fields: &[FieldSpec], presence: Presence) -> Object<DynShape> {
    let shape = fields
        .iter()
        .map(|f| (f.name.as_str(), build_descriptor(f, presence)))
        .collect::<DynShape>();
    object(shape).with_presence(presence)
}

fn build_descriptor(spec: &FieldSpec, presence: Presence) -> AnyDescriptor {
    match spec.kind {
        Kind::Boolean => boolean().erase(),
        Kind::String => string().erase(),
        Kind::Number => number().erase(),
        Kind::Object => build_object(&spec.fields, presence).erase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EXAMPLE: &str = include_str!("../schema.example.yaml");

    #[test]
    fn test_example_schema_loads() {
        let file = SchemaFile::from_yaml(EXAMPLE).unwrap();
        assert_eq!(file.objects.len(), 2);
        assert_eq!(file.tables.len(), 1);
    }

    #[test]
    fn test_example_posts_ddl() {
        let file = SchemaFile::from_yaml(EXAMPLE).unwrap();
        let tables = file.tables();
        let sql = tables[0].to_sql();
        assert!(sql.starts_with("create table if not exists posts (\n  \"slug\" text primary key not null,"));
        assert!(sql.contains("\n  \"draft\" integer default 0,"));
        assert!(sql.ends_with("\"created\" text not null default current_timestamp\n) strict;"));
    }

    #[test]
    fn test_loaded_object_validates() {
        let file = SchemaFile::from_yaml(EXAMPLE).unwrap();
        let message = file.object("message", Presence::Defined).unwrap();

        let data = message
            .validate(&json!({"yes": true, "message": "ok", "num": 7}))
            .unwrap();
        assert_eq!(data["message"], json!("ok"));

        let err = message
            .validate(&json!({"num": 7, "yes": "true", "message": 7}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Not a boolean");
    }

    #[test]
    fn test_presence_reaches_nested_objects() {
        let file = SchemaFile::from_yaml(EXAMPLE).unwrap();
        let input = json!({"title": "t", "author": {"name": "ada", "karma": 0}});

        let defined = file.object("post", Presence::Defined).unwrap();
        assert!(defined.validate(&input).is_ok());

        let truthy = file.object("post", Presence::Truthy).unwrap();
        assert_eq!(
            truthy.validate(&input).unwrap_err().to_string(),
            "Missing key 'karma'"
        );
    }

    #[test]
    fn test_unknown_object() {
        let file = SchemaFile::from_yaml(EXAMPLE).unwrap();
        let err = file.object("nope", Presence::Defined).unwrap_err();
        assert!(matches!(err, SchemaFileError::UnknownObject(name) if name == "nope"));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let yaml = r#"
tables:
  - name: t
    columns:
      - { name: a, type: text }
      - { name: a, type: integer }
"#;
        let err = SchemaFile::from_yaml(yaml).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate column 'a'");
    }

    #[test]
    fn test_nested_fields_on_primitive_rejected() {
        let yaml = r#"
objects:
  - name: o
    fields:
      - name: a
        type: string
        fields:
          - { name: b, type: number }
"#;
        let err = SchemaFile::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, SchemaFileError::UnexpectedFields(name) if name == "a"));
    }

    #[test]
    fn test_unknown_types_fail_to_parse() {
        let yaml = "tables:\n  - name: t\n    columns:\n      - { name: a, type: blob }\n";
        assert!(matches!(
            SchemaFile::from_yaml(yaml),
            Err(SchemaFileError::Yaml(_))
        ));

        let yaml = "objects:\n  - name: o\n    fields:\n      - { name: a, type: array }\n";
        assert!(matches!(
            SchemaFile::from_yaml(yaml),
            Err(SchemaFileError::Yaml(_))
        ));
    }

    #[test]
    fn test_default_values() {
        let yaml = r#"
tables:
  - name: t
    columns:
      - { name: n, type: integer, default: 0 }
      - { name: r, type: real, default: 0.5 }
      - { name: s, type: text, default: "'x'" }
      - { name: e, type: text, default: "" }
      - { name: i, type: real, default: .inf }
"#;
        let file = SchemaFile::from_yaml(yaml).unwrap();
        let table = &file.tables()[0];
        assert_eq!(table.column("n").and_then(|c| c.default.as_deref()), Some("0"));
        assert_eq!(table.column("r").and_then(|c| c.default.as_deref()), Some("0.5"));
        assert_eq!(table.column("s").and_then(|c| c.default.as_deref()), Some("'x'"));
        assert_eq!(table.column("e").and_then(|c| c.default.as_deref()), Some("''"));
        assert_eq!(table.column("i").and_then(|c| c.default.as_deref()), Some("9e999"));
    }
}
