use crate::interval::TimeUnitRange;
use crate::unit::TimeUnit;

/// Errors raised while parsing or resolving calendar values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Text does not denote a valid calendar value. `field` names the part that failed.
    #[error("invalid {field} in '{text}'")]
    Parse { field: &'static str, text: String },

    #[error("unknown time zone '{0}'")]
    UnknownZone(String),

    #[error("unknown time unit '{0}'")]
    UnknownUnit(String),

    #[error("{unit} is not supported by {operation}")]
    UnsupportedUnit { unit: TimeUnit, operation: &'static str },

    #[error("{range} is not a {kind} interval qualifier")]
    IntervalRange { range: TimeUnitRange, kind: &'static str },
}

impl CalendarError {
    pub fn parse(field: &'static str, text: impl Into<String>) -> Self {
        Self::Parse { field, text: text.into() }
    }
}
