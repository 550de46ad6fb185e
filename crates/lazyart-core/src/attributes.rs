//! Immutable attribute sets derived from artifact descriptors.
//!
//! A handle computes its attributes once at construction through an
//! [`AttributesFactory`]. The default factory layers descriptor-derived
//! entries on top of an optional parent set (e.g. the attributes of the
//! variant the artifact belongs to).

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::descriptor::ArtifactName;
use crate::error::AttributeError;

/// Attribute carrying the artifact's format (extension, or type when no
/// extension is known).
pub const ARTIFACT_TYPE: &str = "artifactType";
/// Attribute carrying the artifact's classifier, when it has one.
pub const CLASSIFIER: &str = "classifier";

/// Immutable, cheaply clonable key-value set with a stable iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ImmutableAttributes {
    entries: Arc<BTreeMap<String, String>>,
}

impl ImmutableAttributes {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from key-value pairs, rejecting empty keys or values.
    pub fn from_pairs<K, V, I>(pairs: I) -> Result<Self, AttributeError>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries = BTreeMap::new();
        for (k, v) in pairs {
            let (k, v) = checked(k.into(), v.into())?;
            entries.insert(k, v);
        }
        Ok(Self {
            entries: Arc::new(entries),
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return a new set with `key` bound to `value`; `self` is untouched.
    pub fn with(&self, key: &str, value: &str) -> Result<Self, AttributeError> {
        let (k, v) = checked(key.to_string(), value.to_string())?;
        let mut entries = (*self.entries).clone();
        entries.insert(k, v);
        Ok(Self {
            entries: Arc::new(entries),
        })
    }
}

fn checked(key: String, value: String) -> Result<(String, String), AttributeError> {
    if key.trim().is_empty() {
        return Err(AttributeError::EmptyKey);
    }
    if value.trim().is_empty() {
        return Err(AttributeError::EmptyValue(key));
    }
    Ok((key, value))
}

/// Derives the attributes of an artifact. Must be deterministic and free of
/// side effects; called exactly once per handle.
pub trait AttributesFactory: Send + Sync {
    fn for_artifact(
        &self,
        artifact: &ArtifactName,
        parent: Option<&ImmutableAttributes>,
    ) -> Result<ImmutableAttributes, AttributeError>;
}

/// Adds [`ARTIFACT_TYPE`] (unless the parent already defines it) and
/// [`CLASSIFIER`] (when present) to a copy of the parent set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAttributesFactory;

impl AttributesFactory for DefaultAttributesFactory {
    fn for_artifact(
        &self,
        artifact: &ArtifactName,
        parent: Option<&ImmutableAttributes>,
    ) -> Result<ImmutableAttributes, AttributeError> {
        let mut attrs = parent.cloned().unwrap_or_default();
        if !attrs.contains(ARTIFACT_TYPE) {
            let format = artifact
                .extension
                .as_deref()
                .unwrap_or(&artifact.artifact_type);
            attrs = attrs.with(ARTIFACT_TYPE, format)?;
        }
        if let Some(classifier) = &artifact.classifier {
            attrs = attrs.with(CLASSIFIER, classifier)?;
        }
        Ok(attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_artifact_type_from_extension() {
        let name = ArtifactName::parse("lib@zip").unwrap();
        let attrs = DefaultAttributesFactory.for_artifact(&name, None).unwrap();
        assert_eq!(attrs.get(ARTIFACT_TYPE), Some("zip"));
        assert!(!attrs.contains(CLASSIFIER));
    }

    #[test]
    fn falls_back_to_type_without_extension() {
        let name = ArtifactName::new("tool", "exe", None, Some("linux"));
        let attrs = DefaultAttributesFactory.for_artifact(&name, None).unwrap();
        assert_eq!(attrs.get(ARTIFACT_TYPE), Some("exe"));
        assert_eq!(attrs.get(CLASSIFIER), Some("linux"));
    }

    #[test]
    fn parent_artifact_type_wins_and_parent_is_untouched() {
        let parent =
            ImmutableAttributes::from_pairs([(ARTIFACT_TYPE, "classes"), ("usage", "runtime")])
                .unwrap();
        let name = ArtifactName::parse("lib").unwrap();
        let attrs = DefaultAttributesFactory
            .for_artifact(&name, Some(&parent))
            .unwrap();
        assert_eq!(attrs.get(ARTIFACT_TYPE), Some("classes"));
        assert_eq!(attrs.get("usage"), Some("runtime"));
        assert_eq!(parent.len(), 2);
    }

    #[test]
    fn derivation_is_deterministic() {
        let name = ArtifactName::parse("lib:sources").unwrap();
        let a = DefaultAttributesFactory.for_artifact(&name, None).unwrap();
        let b = DefaultAttributesFactory.for_artifact(&name, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_key_and_value() {
        assert_eq!(
            ImmutableAttributes::from_pairs([("", "x")]),
            Err(AttributeError::EmptyKey)
        );
        assert_eq!(
            ImmutableAttributes::empty().with("usage", " "),
            Err(AttributeError::EmptyValue("usage".to_string()))
        );
    }
}
