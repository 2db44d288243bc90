//! Record metadata: the [`Model`] trait, its per-field accessor table and the
//! [`Registry`] that turns it into cached [`TableDescriptor`]s.
//!
//! `#[derive(Model)]` generates the accessor table; implementing the trait by hand is
//! supported for types the derive cannot see.

mod descriptor;
mod registry;

pub use descriptor::{ColumnInfo, TableDescriptor, underscore_name};
pub use registry::Registry;

use crate::value::{SqlType, Value, ValueError, ValueType};

/// Reads a field of `M` as a [`Value`].
pub type Getter<M> = fn(&M) -> Value;

/// Writes a [`Value`] into a field of `M`.
pub type Setter<M> = fn(&mut M, Value) -> Result<(), ValueError>;

/// Declared shape of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A struct with named fields, the only shape that maps onto a table.
    Struct,
    Tuple,
    Unit,
    Enum,
}

/// A record type that maps onto a table.
///
/// # Example
///
/// ```ignore
/// use ormkit::Model;
///
/// #[derive(Debug, Default, Clone, Model)]
/// #[orm(table = "users")]
/// struct User {
///     id: i64,
///     #[orm("column=user_name")]
///     name: String,
///     email: Option<String>,
/// }
/// ```
pub trait Model: Default + Send + Sync + 'static {
    /// Shape of the type; anything but [`Shape::Struct`] is rejected at registration.
    const SHAPE: Shape = Shape::Struct;

    /// The bare type name, snake-cased into the default table name.
    fn type_name() -> &'static str;

    /// Table name override hook. `None` or an empty string falls back to the type name.
    fn table_name() -> Option<&'static str> {
        None
    }

    /// Declared fields in declaration order.
    fn fields() -> Vec<FieldDef<Self>>;
}

/// Type-erased location of a field inside its record.
#[derive(Debug, Clone, Copy)]
pub struct RawLayout {
    /// Byte offset of the field from the start of the record.
    pub offset: usize,
    pub(crate) read: unsafe fn(*const u8) -> Value,
    pub(crate) write: unsafe fn(*mut u8, Value) -> Result<(), ValueError>,
}

/// One entry of a model's field accessor table.
pub struct FieldDef<M> {
    pub(crate) ident: &'static str,
    pub(crate) tag: Option<&'static str>,
    pub(crate) value_type: ValueType,
    pub(crate) nullable: bool,
    pub(crate) get: Getter<M>,
    pub(crate) set: Setter<M>,
    pub(crate) layout: Option<RawLayout>,
}

impl<M> FieldDef<M> {
    /// Describe a field of type `T` with its accessors.
    pub fn new<T: SqlType>(ident: &'static str, get: Getter<M>, set: Setter<M>) -> Self {
        Self {
            ident,
            tag: None,
            value_type: T::VALUE_TYPE,
            nullable: T::NULLABLE,
            get,
            set,
            layout: None,
        }
    }

    /// Attach the raw tag string (`key=value` pairs separated by commas).
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Record where the field lives so the offset decoder can write it in place.
    ///
    /// # Safety
    ///
    /// `offset` must be the byte offset of a field of exactly type `T` inside `M`, and `T`
    /// must be the type this definition was created with.
    pub unsafe fn with_offset<T: SqlType>(mut self, offset: usize) -> Self {
        self.layout = Some(RawLayout {
            offset,
            read: read_raw::<T>,
            write: write_raw::<T>,
        });
        self
    }
}

/// Read the `T` at `ptr`.
///
/// # Safety
///
/// `ptr` must point to a live, initialised and aligned `T`.
pub unsafe fn read_raw<T: SqlType>(ptr: *const u8) -> Value {
    let field = unsafe { &*ptr.cast::<T>() };
    field.clone().into()
}

/// Convert `value` and assign it to the `T` at `ptr`, dropping the previous value.
///
/// # Safety
///
/// `ptr` must point to a live, initialised and aligned `T` that nothing else borrows.
pub unsafe fn write_raw<T: SqlType>(ptr: *mut u8, value: Value) -> Result<(), ValueError> {
    let converted = T::from_value(value)?;
    unsafe {
        *ptr.cast::<T>() = converted;
    }
    Ok(())
}
