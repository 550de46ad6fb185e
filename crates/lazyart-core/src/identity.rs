//! Identity values for module versions and the artifacts they own.
//!
//! An artifact is identified by the pair `(owner module version, component
//! artifact id)`. Descriptor metadata (type, extension, classifier) and
//! resolution state never take part in identity.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// Identifier of a versioned module, e.g. `org.example:lib:1.0`.
///
/// Supported coordinate formats:
///   `group:name:version`
///   `name:version` (no group)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleVersionId {
    pub group: Option<String>,
    pub name: String,
    pub version: String,
}

impl ModuleVersionId {
    pub fn new(group: Option<&str>, name: &str, version: &str) -> Self {
        Self {
            group: group.map(str::to_string),
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    /// Parse a module coordinate string.
    pub fn parse(coord: &str) -> Result<Self, IdentityError> {
        let parts: Vec<&str> = coord.split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(IdentityError::InvalidCoordinate(coord.to_string()));
        }
        match parts.as_slice() {
            [name, version] => Ok(Self::new(None, name, version)),
            [group, name, version] => Ok(Self::new(Some(*group), name, version)),
            _ => Err(IdentityError::InvalidCoordinate(coord.to_string())),
        }
    }
}

impl fmt::Display for ModuleVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(g) => write!(f, "{}:{}:{}", g, self.name, self.version),
            None => write!(f, "{}:{}", self.name, self.version),
        }
    }
}

/// Identifier of one artifact file within a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentArtifactId {
    component: ModuleVersionId,
    file_name: String,
}

impl ComponentArtifactId {
    pub fn new(component: ModuleVersionId, file_name: impl Into<String>) -> Self {
        Self {
            component,
            file_name: file_name.into(),
        }
    }

    pub fn component(&self) -> &ModuleVersionId {
        &self.component
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Human-readable form: `lib-1.0.jar (org.example:lib:1.0)`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.file_name, self.component)
    }
}

impl fmt::Display for ComponentArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file_name, self.component)
    }
}

/// Identity key of an artifact handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub owner: ModuleVersionId,
    pub artifact_id: ComponentArtifactId,
}

impl ArtifactKey {
    pub fn new(owner: ModuleVersionId, artifact_id: ComponentArtifactId) -> Self {
        Self { owner, artifact_id }
    }

    /// XOR of the owner and artifact id hashes.
    ///
    /// Stable within a process; not suitable for persistence.
    pub fn identity_hash(&self) -> u64 {
        hash_one(&self.owner) ^ hash_one(&self.artifact_id)
    }
}

fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Module version that owns a resolved artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedModuleVersion {
    id: ModuleVersionId,
}

impl ResolvedModuleVersion {
    pub fn new(id: ModuleVersionId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &ModuleVersionId {
        &self.id
    }
}

impl fmt::Display for ResolvedModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_three_part_coordinate() {
        let id = ModuleVersionId::parse("org.example:lib:1.0").unwrap();
        assert_eq!(id.group.as_deref(), Some("org.example"));
        assert_eq!(id.name, "lib");
        assert_eq!(id.version, "1.0");
        assert_eq!(id.to_string(), "org.example:lib:1.0");
    }

    #[test]
    fn parse_two_part_coordinate() {
        let id = ModuleVersionId::parse("lib:1.0").unwrap();
        assert_eq!(id.group, None);
        assert_eq!(id.to_string(), "lib:1.0");
    }

    #[test]
    fn parse_rejects_malformed_coordinates() {
        for bad in ["lib", "a:b:c:d", "lib:", ":1.0", ""] {
            assert_eq!(
                ModuleVersionId::parse(bad),
                Err(IdentityError::InvalidCoordinate(bad.to_string())),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn component_artifact_display_name() {
        let owner = ModuleVersionId::parse("org.example:lib:1.0").unwrap();
        let id = ComponentArtifactId::new(owner, "lib-1.0.jar");
        assert_eq!(id.display_name(), "lib-1.0.jar (org.example:lib:1.0)");
        assert_eq!(id.to_string(), id.display_name());
    }

    #[test]
    fn identity_hash_is_symmetric_in_equal_keys() {
        let owner = ModuleVersionId::parse("lib:1.0").unwrap();
        let a = ArtifactKey::new(
            owner.clone(),
            ComponentArtifactId::new(owner.clone(), "lib-1.0.jar"),
        );
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.identity_hash(), b.identity_hash());
    }
}
