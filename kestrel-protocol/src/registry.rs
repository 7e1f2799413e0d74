//! The table of APIs the broker advertises, and version negotiation against it.

use bytes::{Buf, BufMut};

use crate::api_keys::ApiKey;
use crate::codec::{Decodable, Encodable};
use crate::error::Result;
use crate::primitives::TaggedFields;

/// One supported API and its inclusive version range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiDescriptor {
    /// The API key.
    pub api_key: i16,
    /// The minimum supported version, inclusive.
    pub min_version: i16,
    /// The maximum supported version, inclusive.
    pub max_version: i16,
}

impl ApiDescriptor {
    pub const fn new(api_key: i16, min_version: i16, max_version: i16) -> Self {
        Self {
            api_key,
            min_version,
            max_version,
        }
    }

    pub fn supports(&self, version: i16) -> bool {
        (self.min_version..=self.max_version).contains(&version)
    }
}

/// Wire form inside the ApiVersions catalogue: key, min, max, then an empty tag buffer.
impl Encodable for ApiDescriptor {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.api_key.encode(buf)?;
        self.min_version.encode(buf)?;
        self.max_version.encode(buf)?;
        TaggedFields.encode(buf)
    }
}

impl Decodable for ApiDescriptor {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let api_key = i16::decode(buf)?;
        let min_version = i16::decode(buf)?;
        let max_version = i16::decode(buf)?;
        TaggedFields::decode(buf)?;
        Ok(Self {
            api_key,
            min_version,
            max_version,
        })
    }
}

/// Outcome of checking a requested (key, version) against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSupport {
    /// Key registered and version inside its range.
    Supported(ApiDescriptor),
    /// Key registered, version outside its range.
    UnsupportedVersion(ApiDescriptor),
    /// Key not registered at all.
    UnknownApiKey(i16),
}

/// Ordered, immutable catalogue of supported APIs.
///
/// Built once at startup and shared behind an `Arc`; registration order is
/// the order entries appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRegistry {
    apis: Vec<ApiDescriptor>,
}

impl ApiRegistry {
    pub fn new(apis: Vec<ApiDescriptor>) -> Self {
        Self { apis }
    }

    pub fn lookup(&self, api_key: i16) -> Option<&ApiDescriptor> {
        self.apis.iter().find(|api| api.api_key == api_key)
    }

    pub fn list_all(&self) -> &[ApiDescriptor] {
        &self.apis
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    pub fn negotiate(&self, api_key: i16, api_version: i16) -> VersionSupport {
        match self.lookup(api_key) {
            Some(api) if api.supports(api_version) => VersionSupport::Supported(*api),
            Some(api) => VersionSupport::UnsupportedVersion(*api),
            None => VersionSupport::UnknownApiKey(api_key),
        }
    }
}

impl Default for ApiRegistry {
    fn default() -> Self {
        Self::new(vec![
            ApiDescriptor::new(ApiKey::ApiVersions.to_i16(), 0, 4),
            ApiDescriptor::new(ApiKey::DescribeTopicPartitions.to_i16(), 0, 0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue_order() {
        let registry = ApiRegistry::default();
        assert_eq!(
            registry.list_all(),
            &[ApiDescriptor::new(18, 0, 4), ApiDescriptor::new(75, 0, 0)]
        );
    }

    #[test]
    fn test_lookup() {
        let registry = ApiRegistry::default();
        assert_eq!(registry.lookup(75), Some(&ApiDescriptor::new(75, 0, 0)));
        assert_eq!(registry.lookup(3), None);
    }

    #[test]
    fn test_supports_is_inclusive() {
        let api = ApiDescriptor::new(18, 0, 4);
        assert!(api.supports(0));
        assert!(api.supports(4));
        assert!(!api.supports(5));
        assert!(!api.supports(-1));
    }

    #[test]
    fn test_negotiate() {
        let registry = ApiRegistry::default();
        assert!(matches!(
            registry.negotiate(18, 3),
            VersionSupport::Supported(_)
        ));
        assert!(matches!(
            registry.negotiate(75, 1),
            VersionSupport::UnsupportedVersion(_)
        ));
        assert_eq!(registry.negotiate(1, 0), VersionSupport::UnknownApiKey(1));
    }

    #[test]
    fn test_descriptor_wire_form() {
        let mut buf = Vec::new();
        ApiDescriptor::new(18, 0, 4).encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x12, 0x00, 0x00, 0x00, 0x04, 0x00]);
    }
}
