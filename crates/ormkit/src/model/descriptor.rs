use std::collections::HashMap;
use std::fmt;

use super::{FieldDef, Getter, Model, RawLayout, Setter, Shape};
use crate::error::{OrmError, OrmResult};
use crate::value::ValueType;

/// Tag key that overrides the derived column name.
const COLUMN_TAG: &str = "column";

/// Column metadata for one declared field.
pub struct ColumnInfo<M> {
    field: &'static str,
    column: String,
    value_type: ValueType,
    nullable: bool,
    pub(crate) get: Getter<M>,
    pub(crate) set: Setter<M>,
    pub(crate) layout: Option<RawLayout>,
}

impl<M> ColumnInfo<M> {
    /// The Rust field identifier.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The SQL column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Byte offset inside the record, when the accessor table recorded one.
    pub fn byte_offset(&self) -> Option<usize> {
        self.layout.map(|l| l.offset)
    }
}

impl<M> fmt::Debug for ColumnInfo<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnInfo")
            .field("field", &self.field)
            .field("column", &self.column)
            .field("value_type", &self.value_type)
            .field("nullable", &self.nullable)
            .field("byte_offset", &self.byte_offset())
            .finish()
    }
}

/// Cached table schema for one model type.
///
/// Built once by the [`Registry`](super::Registry) and shared immutably afterwards.
pub struct TableDescriptor<M> {
    table_name: String,
    fields_by_name: HashMap<&'static str, usize>,
    fields_by_column: HashMap<String, usize>,
    fields: Vec<ColumnInfo<M>>,
}

impl<M: Model> TableDescriptor<M> {
    /// Introspect `M`'s accessor table.
    pub(crate) fn from_model() -> OrmResult<Self> {
        if M::SHAPE != Shape::Struct {
            return Err(OrmError::UnsupportedType(format!(
                "{} is a {:?}, expected a struct with named fields",
                M::type_name(),
                M::SHAPE
            )));
        }

        let defs = M::fields();
        let mut fields_by_name = HashMap::with_capacity(defs.len());
        let mut fields_by_column = HashMap::with_capacity(defs.len());
        let mut fields = Vec::with_capacity(defs.len());

        for (idx, def) in defs.into_iter().enumerate() {
            let FieldDef {
                ident,
                tag,
                value_type,
                nullable,
                get,
                set,
                layout,
            } = def;

            let tags = parse_tag(tag)?;
            let column = match tags.get(COLUMN_TAG) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => underscore_name(ident),
            };

            if fields_by_name.insert(ident, idx).is_some() {
                return Err(OrmError::UnsupportedType(format!(
                    "{} declares field '{}' twice",
                    M::type_name(),
                    ident
                )));
            }
            if fields_by_column.insert(column.clone(), idx).is_some() {
                return Err(OrmError::DuplicateColumn(column));
            }

            fields.push(ColumnInfo {
                field: ident,
                column,
                value_type,
                nullable,
                get,
                set,
                layout,
            });
        }

        let table_name = M::table_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| underscore_name(M::type_name()));

        Ok(Self {
            table_name,
            fields_by_name,
            fields_by_column,
            fields,
        })
    }
}

impl<M> TableDescriptor<M> {
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Look up a column by Rust field identifier.
    pub fn field(&self, name: &str) -> Option<&ColumnInfo<M>> {
        self.fields_by_name.get(name).map(|&idx| &self.fields[idx])
    }

    /// Look up a column by SQL column name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo<M>> {
        self.fields_by_column.get(name).map(|&idx| &self.fields[idx])
    }

    /// Like [`field`](Self::field) but fails with `UnknownField`.
    pub fn require_field(&self, name: &str) -> OrmResult<&ColumnInfo<M>> {
        self.field(name).ok_or_else(|| OrmError::unknown_field(name))
    }

    /// Like [`column`](Self::column) but fails with `UnknownColumn`.
    pub fn require_column(&self, name: &str) -> OrmResult<&ColumnInfo<M>> {
        self.column(name).ok_or_else(|| OrmError::unknown_column(name))
    }

    /// All columns in declaration order.
    pub fn fields(&self) -> &[ColumnInfo<M>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<M> fmt::Debug for TableDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDescriptor")
            .field("table_name", &self.table_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Split a tag into `key=value` pairs.
fn parse_tag(tag: Option<&str>) -> OrmResult<HashMap<&str, &str>> {
    let mut pairs = HashMap::new();
    let Some(tag) = tag else {
        return Ok(pairs);
    };
    for pair in tag.split(',') {
        let mut parts = pair.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                pairs.insert(key, value);
            }
            _ => return Err(OrmError::InvalidTagSyntax(pair.to_string())),
        }
    }
    Ok(pairs)
}

/// Convert a camel/Pascal-case identifier to snake_case.
///
/// An underscore goes before every uppercase character except a leading one, then the
/// character is lowercased: `TestModel` → `test_model`, `ID` → `i_d`.
pub fn underscore_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
