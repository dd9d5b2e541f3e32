//! Metadata provider returning one shared base URI.

use crate::domain::value_objects::TokenId;
use crate::ports::outbound::MetadataProvider;

/// Identifier-independent metadata URI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticMetadata {
    base_uri: String,
}

impl StaticMetadata {
    /// Serve `base_uri` for every identifier.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
        }
    }

    /// URI currently served.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }
}

impl MetadataProvider for StaticMetadata {
    fn uri(&self, _id: TokenId) -> String {
        self.base_uri.clone()
    }

    fn set_base_uri(&mut self, uri: String) {
        self.base_uri = uri;
    }
}
