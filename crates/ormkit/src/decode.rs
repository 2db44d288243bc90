//! Row decoding.
//!
//! A [`Decoder`] maps the columns reported by an executor onto model fields through the
//! table descriptor, and reads field values back out of records for INSERT.
//!
//! - [`SafeDecoder`] scans each column into a typed slot and assigns it through the
//!   generated setter.
//! - [`OffsetDecoder`] scans straight into the field's memory at `record + byte_offset`
//!   using the raw writer recorded at registration. Fields without a recorded layout fall
//!   back to the slot-and-setter path.

use crate::error::{OrmError, OrmResult};
use crate::executor::{Rows, ScanTarget};
use crate::model::{ColumnInfo, Model, RawLayout, TableDescriptor};
use crate::value::{Value, ValueError, ValueType};

/// Strategy for moving values between rows and records.
pub trait Decoder {
    /// Decode the current row of `rows` into a fresh record.
    fn decode_row<M: Model, R: Rows + ?Sized>(
        &self,
        desc: &TableDescriptor<M>,
        rows: &mut R,
    ) -> OrmResult<M>;

    /// Read one field of `record` by Rust field identifier.
    fn read_field<M: Model>(
        &self,
        desc: &TableDescriptor<M>,
        record: &M,
        field: &str,
    ) -> OrmResult<Value>;
}

/// Decode every remaining row.
pub fn decode_all<M, R, D>(decoder: &D, desc: &TableDescriptor<M>, rows: &mut R) -> OrmResult<Vec<M>>
where
    M: Model,
    R: Rows + ?Sized,
    D: Decoder + ?Sized,
{
    let mut out = Vec::new();
    while rows.next()? {
        out.push(decoder.decode_row(desc, rows)?);
    }
    Ok(out)
}

/// Which decoder a [`Db`](crate::Db) uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DecoderKind {
    /// Typed slots and generated setters.
    #[default]
    Safe,
    /// In-place writes at recorded field offsets.
    Offset,
}

impl Decoder for DecoderKind {
    fn decode_row<M: Model, R: Rows + ?Sized>(
        &self,
        desc: &TableDescriptor<M>,
        rows: &mut R,
    ) -> OrmResult<M> {
        match self {
            DecoderKind::Safe => SafeDecoder.decode_row(desc, rows),
            DecoderKind::Offset => OffsetDecoder.decode_row(desc, rows),
        }
    }

    fn read_field<M: Model>(
        &self,
        desc: &TableDescriptor<M>,
        record: &M,
        field: &str,
    ) -> OrmResult<Value> {
        match self {
            DecoderKind::Safe => SafeDecoder.read_field(desc, record, field),
            DecoderKind::Offset => OffsetDecoder.read_field(desc, record, field),
        }
    }
}

fn decode_error(column: &str, err: ValueError) -> OrmError {
    OrmError::decode(column, err.to_string())
}

/// Resolve every reported column, failing on the first one no field maps to.
fn resolve_columns<'d, M, R>(desc: &'d TableDescriptor<M>, rows: &R) -> OrmResult<Vec<&'d ColumnInfo<M>>>
where
    R: Rows + ?Sized,
{
    rows.columns()
        .iter()
        .map(|name| desc.require_column(name))
        .collect()
}

/// Holds one scanned column until it is assigned.
struct Slot<'d> {
    column: &'d str,
    ty: ValueType,
    nullable: bool,
    value: Option<Value>,
}

impl<'d> Slot<'d> {
    fn for_column<M>(info: &'d ColumnInfo<M>) -> Self {
        Self {
            column: info.column(),
            ty: info.value_type(),
            nullable: info.is_nullable(),
            value: None,
        }
    }

    fn take(&mut self) -> OrmResult<Value> {
        self.value
            .take()
            .ok_or_else(|| OrmError::decode(self.column, "column was not scanned"))
    }
}

impl ScanTarget for Slot<'_> {
    fn accept(&mut self, value: Value) -> OrmResult<()> {
        let value = value
            .coerce(self.ty, self.nullable)
            .map_err(|e| decode_error(self.column, e))?;
        self.value = Some(value);
        Ok(())
    }
}

fn assign<M>(record: &mut M, info: &ColumnInfo<M>, value: Value) -> OrmResult<()> {
    (info.set)(record, value).map_err(|e| decode_error(info.column(), e))
}

/// Decoder that never touches record memory directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeDecoder;

impl Decoder for SafeDecoder {
    fn decode_row<M: Model, R: Rows + ?Sized>(
        &self,
        desc: &TableDescriptor<M>,
        rows: &mut R,
    ) -> OrmResult<M> {
        let infos = resolve_columns(desc, rows)?;
        let mut slots: Vec<Slot<'_>> = infos.iter().map(|info| Slot::for_column(*info)).collect();

        {
            let mut dest: Vec<&mut dyn ScanTarget> = slots
                .iter_mut()
                .map(|slot| slot as &mut dyn ScanTarget)
                .collect();
            rows.scan(&mut dest)?;
        }

        let mut record = M::default();
        for (info, slot) in infos.iter().zip(slots.iter_mut()) {
            assign(&mut record, info, slot.take()?)?;
        }
        Ok(record)
    }

    fn read_field<M: Model>(
        &self,
        desc: &TableDescriptor<M>,
        record: &M,
        field: &str,
    ) -> OrmResult<Value> {
        let info = desc.require_field(field)?;
        Ok((info.get)(record))
    }
}

/// Writes scanned values directly into the field at `ptr`.
struct RawTarget<'d> {
    column: &'d str,
    ty: ValueType,
    nullable: bool,
    ptr: *mut u8,
    layout: RawLayout,
}

impl ScanTarget for RawTarget<'_> {
    fn accept(&mut self, value: Value) -> OrmResult<()> {
        let value = value
            .coerce(self.ty, self.nullable)
            .map_err(|e| decode_error(self.column, e))?;
        // SAFETY: `ptr` is `record + layout.offset` for a record that outlives the scan and
        // is not borrowed while targets exist; `layout.write` was recorded for that field's
        // exact type by `FieldDef::with_offset`.
        unsafe { (self.layout.write)(self.ptr, value) }.map_err(|e| decode_error(self.column, e))
    }
}

enum Target<'d> {
    Raw(RawTarget<'d>),
    Slot(Slot<'d>),
}

impl ScanTarget for Target<'_> {
    fn accept(&mut self, value: Value) -> OrmResult<()> {
        match self {
            Target::Raw(raw) => raw.accept(value),
            Target::Slot(slot) => slot.accept(value),
        }
    }
}

/// Decoder that writes through recorded field offsets.
///
/// Only models whose accessor table was produced by `#[derive(Model)]` (or an `unsafe`
/// [`FieldDef::with_offset`](crate::model::FieldDef::with_offset) call) carry offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetDecoder;

impl Decoder for OffsetDecoder {
    fn decode_row<M: Model, R: Rows + ?Sized>(
        &self,
        desc: &TableDescriptor<M>,
        rows: &mut R,
    ) -> OrmResult<M> {
        let infos = resolve_columns(desc, rows)?;
        let mut record = M::default();
        let base = (&mut record as *mut M).cast::<u8>();

        let mut targets: Vec<Target<'_>> = infos
            .iter()
            .map(|info| match info.layout {
                Some(layout) => Target::Raw(RawTarget {
                    column: info.column(),
                    ty: info.value_type(),
                    nullable: info.is_nullable(),
                    // SAFETY: offsets come from `offset_of!` on `M`, so they stay inside the
                    // allocation of `record`.
                    ptr: unsafe { base.add(layout.offset) },
                    layout,
                }),
                None => Target::Slot(Slot::for_column(*info)),
            })
            .collect();

        {
            let mut dest: Vec<&mut dyn ScanTarget> = targets
                .iter_mut()
                .map(|t| t as &mut dyn ScanTarget)
                .collect();
            rows.scan(&mut dest)?;
        }

        for (info, target) in infos.iter().zip(targets.iter_mut()) {
            if let Target::Slot(slot) = target {
                assign(&mut record, info, slot.take()?)?;
            }
        }
        Ok(record)
    }

    fn read_field<M: Model>(
        &self,
        desc: &TableDescriptor<M>,
        record: &M,
        field: &str,
    ) -> OrmResult<Value> {
        let info = desc.require_field(field)?;
        match info.layout {
            // SAFETY: the layout was recorded for this field of `M`, and `record` is a live
            // shared reference for the duration of the read.
            Some(layout) => Ok(unsafe {
                (layout.read)((record as *const M).cast::<u8>().add(layout.offset))
            }),
            None => Ok((info.get)(record)),
        }
    }
}
