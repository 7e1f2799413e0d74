//! Kafka protocol error codes

use std::fmt;

/// Kafka protocol error codes produced by the handshake broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i16)]
#[non_exhaustive]
pub enum ErrorCode {
    /// No error
    #[default]
    None = 0,
    /// The version of API is not supported
    UnsupportedVersion = 35,
}

impl ErrorCode {
    /// Convert an i16 to an ErrorCode
    pub fn from_i16(code: i16) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::None),
            35 => Some(ErrorCode::UnsupportedVersion),
            _ => None,
        }
    }

    /// Convert an ErrorCode to an i16
    pub fn to_i16(&self) -> i16 {
        *self as i16
    }

    /// Whether this code signals success
    pub fn is_ok(&self) -> bool {
        matches!(self, ErrorCode::None)
    }
}

impl std::error::Error for ErrorCode {}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ErrorCode::None => "No error",
            ErrorCode::UnsupportedVersion => "The version of API is not supported",
        };
        write!(f, "{}", msg)
    }
}

impl TryFrom<i16> for ErrorCode {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_i16(value).ok_or_else(|| format!("Unknown error code: {}", value))
    }
}

impl From<ErrorCode> for i16 {
    fn from(code: ErrorCode) -> Self {
        code as i16
    }
}
