//! Hand-written models shared by unit tests.

use std::mem::offset_of;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::model::{FieldDef, Model, Shape};
use crate::value::SqlType;

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct TestModel {
    pub id: i64,
    pub first_name: String,
    pub age: Option<i8>,
    pub last_name: Option<String>,
}

impl TestModel {
    pub fn neo() -> Self {
        Self {
            id: 12,
            first_name: "Neo".to_string(),
            age: Some(18),
            last_name: Some("Anderson".to_string()),
        }
    }
}

impl Model for TestModel {
    fn type_name() -> &'static str {
        "TestModel"
    }

    fn fields() -> Vec<FieldDef<Self>> {
        unsafe {
            vec![
                FieldDef::<Self>::new::<i64>("id", |m| m.id.into(), |m, v| {
                    m.id = SqlType::from_value(v)?;
                    Ok(())
                })
                .with_offset::<i64>(offset_of!(TestModel, id)),
                FieldDef::<Self>::new::<String>(
                    "first_name",
                    |m| m.first_name.clone().into(),
                    |m, v| {
                        m.first_name = SqlType::from_value(v)?;
                        Ok(())
                    },
                )
                .with_offset::<String>(offset_of!(TestModel, first_name)),
                FieldDef::<Self>::new::<Option<i8>>("age", |m| m.age.into(), |m, v| {
                    m.age = SqlType::from_value(v)?;
                    Ok(())
                })
                .with_offset::<Option<i8>>(offset_of!(TestModel, age)),
                FieldDef::<Self>::new::<Option<String>>(
                    "last_name",
                    |m| m.last_name.clone().into(),
                    |m, v| {
                        m.last_name = SqlType::from_value(v)?;
                        Ok(())
                    },
                )
                .with_offset::<Option<String>>(offset_of!(TestModel, last_name)),
            ]
        }
    }
}

/// Pascal-case fields, a tag override and a table name hook.
#[allow(non_snake_case)]
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct CustomColumns {
    pub FirstName: String,
    pub LastName: String,
}

impl Model for CustomColumns {
    fn type_name() -> &'static str {
        "CustomColumns"
    }

    fn table_name() -> Option<&'static str> {
        Some("people")
    }

    fn fields() -> Vec<FieldDef<Self>> {
        vec![
            FieldDef::<Self>::new::<String>("FirstName", |m| m.FirstName.clone().into(), |m, v| {
                m.FirstName = SqlType::from_value(v)?;
                Ok(())
            })
            .tag("column=first_name_t"),
            FieldDef::<Self>::new::<String>("LastName", |m| m.LastName.clone().into(), |m, v| {
                m.LastName = SqlType::from_value(v)?;
                Ok(())
            })
            .tag("column="),
        ]
    }
}

#[derive(Debug, Default)]
pub(crate) struct BadTag {
    pub name: String,
}

impl Model for BadTag {
    fn type_name() -> &'static str {
        "BadTag"
    }

    fn fields() -> Vec<FieldDef<Self>> {
        vec![
            FieldDef::<Self>::new::<String>("name", |m| m.name.clone().into(), |m, v| {
                m.name = SqlType::from_value(v)?;
                Ok(())
            })
            .tag("column"),
        ]
    }
}

#[derive(Debug, Default)]
pub(crate) struct DuplicateColumns {
    pub name: String,
    pub alias: String,
}

impl Model for DuplicateColumns {
    fn type_name() -> &'static str {
        "DuplicateColumns"
    }

    fn fields() -> Vec<FieldDef<Self>> {
        vec![
            FieldDef::<Self>::new::<String>("name", |m| m.name.clone().into(), |m, v| {
                m.name = SqlType::from_value(v)?;
                Ok(())
            }),
            FieldDef::<Self>::new::<String>("alias", |m| m.alias.clone().into(), |m, v| {
                m.alias = SqlType::from_value(v)?;
                Ok(())
            })
            .tag("column=name"),
        ]
    }
}

#[derive(Debug, Default)]
pub(crate) struct TupleModel(());

impl Model for TupleModel {
    const SHAPE: Shape = Shape::Tuple;

    fn type_name() -> &'static str {
        "TupleModel"
    }

    fn fields() -> Vec<FieldDef<Self>> {
        Vec::new()
    }
}

static INTROSPECTIONS: AtomicUsize = AtomicUsize::new(0);

/// Counts how often its accessor table is requested.
#[derive(Debug, Default)]
pub(crate) struct CountingModel {
    pub id: i64,
}

impl CountingModel {
    pub fn introspections() -> usize {
        INTROSPECTIONS.load(Ordering::SeqCst)
    }
}

impl Model for CountingModel {
    fn type_name() -> &'static str {
        "CountingModel"
    }

    fn fields() -> Vec<FieldDef<Self>> {
        INTROSPECTIONS.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(5));
        vec![FieldDef::<Self>::new::<i64>("id", |m| m.id.into(), |m, v| {
            m.id = SqlType::from_value(v)?;
            Ok(())
        })]
    }
}
