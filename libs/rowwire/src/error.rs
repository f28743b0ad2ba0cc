use rowwire_calendar::CalendarError;

use crate::rep::Rep;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The tag has no conversion for a non-null value (OBJECT, NULL, MULTISET).
    #[error("no conversion defined for {rep} holding {shape}")]
    UnsupportedTag { rep: Rep, shape: String },

    #[error("{rep} expects {expected}, got {shape}")]
    ShapeMismatch { rep: Rep, expected: &'static str, shape: String },
}

/// Where a cursor was when a row read was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CursorState {
    #[error("cursor not positioned on a row (before first row)")]
    NotPositioned,

    #[error("cursor not positioned on a row (after last row)")]
    Exhausted,

    #[error("cursor closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum RowwireError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("malformed wire value: {rep} requires field '{field}'")]
    MalformedWireValue { rep: String, field: &'static str },

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    CursorState(#[from] CursorState),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("protobuf decode: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("column {index} out of range for row of width {count}")]
    Column { index: usize, count: usize },

    #[error("slice at {offset} of length {len} out of range for array of length {size}")]
    Slice { offset: usize, len: usize, size: usize },

    #[error("no field named '{0}'")]
    UnknownField(String),

    #[error("{context}: {source}")]
    Context { context: String, source: Box<RowwireError> },
}

impl RowwireError {
    pub fn unsupported(rep: Rep, shape: impl Into<String>) -> Self {
        ConversionError::UnsupportedTag { rep, shape: shape.into() }.into()
    }

    pub fn mismatch(rep: Rep, expected: &'static str, shape: impl Into<String>) -> Self {
        ConversionError::ShapeMismatch { rep, expected, shape: shape.into() }.into()
    }

    pub fn malformed(rep: impl std::fmt::Display, field: &'static str) -> Self {
        Self::MalformedWireValue { rep: rep.to_string(), field }
    }

    /// Prefix the error with `ctx`, keeping the original as the source.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        Self::Context { context: ctx.to_string(), source: Box::new(self) }
    }

    /// The innermost error, skipping any context layers.
    pub fn root(&self) -> &RowwireError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T, E = RowwireError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_prefixes_message_and_keeps_root() {
        let err = RowwireError::mismatch(Rep::Integer, "a number", "string")
            .with_context("column c1")
            .with_context("row 2");
        assert_eq!(err.to_string(), "row 2: column c1: INTEGER expects a number, got string");
        assert!(matches!(
            err.root(),
            RowwireError::Conversion(ConversionError::ShapeMismatch { rep: Rep::Integer, .. })
        ));
    }

    #[test]
    fn cursor_state_messages() {
        let err: RowwireError = CursorState::Closed.into();
        assert_eq!(err.to_string(), "cursor closed");
        assert!(CursorState::NotPositioned.to_string().starts_with("cursor not positioned"));
    }
}
