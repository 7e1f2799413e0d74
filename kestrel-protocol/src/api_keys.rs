//! Kafka protocol API keys known to the broker

use std::fmt;

use num_derive::{FromPrimitive, ToPrimitive};

/// Named API keys. Request headers carry the raw `i16` so that keys
/// outside this enum still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Default)]
#[repr(i16)]
pub enum ApiKey {
    #[default]
    ApiVersions = 18,
    DescribeTopicPartitions = 75,
}

impl ApiKey {
    pub fn from_i16(key: i16) -> Option<Self> {
        num_traits::FromPrimitive::from_i16(key)
    }

    pub fn to_i16(self) -> i16 {
        self as i16
    }
}

impl From<ApiKey> for i16 {
    fn from(key: ApiKey) -> Self {
        key as i16
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, *self as i16)
    }
}
