//! Tagged values and typed row readers.
//!
//! A value travels in three forms: the in-memory *local* form rows are built
//! from ([`LocalValue`]), the JSON-compatible *serial* form ([`SerialValue`],
//! carried with its tag in a [`TypedValue`]) and the protobuf *wire* form
//! ([`WireValue`]). Readers see a fourth, *client* form ([`ClientValue`]) in
//! which dates and times are civil-calendar instants.
//!
//! [`Cursor`] and [`Accessor`] read client values out of rows one column at a
//! time.

pub mod client;
pub mod column;
pub mod composite;
pub mod convert;
pub mod cursor;
pub mod error;
pub mod local;
pub mod rep;
pub mod serial;
pub mod typed;
pub mod wire;

pub use rowwire_calendar as calendar;
pub use rowwire_calendar::Zone;

pub use client::{ClientValue, SqlDate, SqlTime, SqlTimestamp};
pub use column::{ColumnMetaData, ColumnType, Projection};
pub use composite::{ArrayFactory, ArrayValue, DefaultArrayFactory, StructValue};
pub use cursor::{Accessor, Cursor, CursorPhase, ResultSet, RowShape, RowSource};
pub use error::{ConversionError, CursorState, Result, RowwireError};
pub use local::LocalValue;
pub use rep::Rep;
pub use serial::SerialValue;
pub use typed::TypedValue;
pub use wire::{WireRep, WireValue};
