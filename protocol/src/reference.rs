//! Opaque references to renderable assets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a renderable asset.
///
/// References are issued by asset producers (the photo manifest, the avatar
/// editor) and treated as opaque tokens everywhere else; only the asset layer
/// interprets them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AssetReference(String);

impl AssetReference {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// True for references the local asset root can serve directly.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !self.0.contains("://")
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetReference {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

impl From<String> for AssetReference {
    fn from(reference: String) -> Self {
        Self(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_references_have_no_scheme() {
        assert!(AssetReference::new("avatars/bruno.glb").is_local());
        assert!(!AssetReference::new("https://models.example.com/a.glb").is_local());
    }

    #[test]
    fn serializes_as_plain_string() {
        let reference = AssetReference::new("photos/beach.png");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, "\"photos/beach.png\"");

        let parsed: AssetReference = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reference);
    }

    #[test]
    fn displays_the_raw_reference() {
        let reference = AssetReference::new("avatars/user.glb");
        assert_eq!(reference.to_string(), "avatars/user.glb");
    }
}
