//! Artifact descriptor: name, type, extension, classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IdentityError;

/// Descriptive metadata of an artifact.
///
/// Used to derive attributes and for display. Never part of identity.
///
/// Supported string forms for [`ArtifactName::parse`]:
///   `name`
///   `name:classifier`
///   `name@extension`
///   `name:classifier@extension`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactName {
    pub name: String,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub extension: Option<String>,
    pub classifier: Option<String>,
}

impl ArtifactName {
    pub fn new(
        name: &str,
        artifact_type: &str,
        extension: Option<&str>,
        classifier: Option<&str>,
    ) -> Self {
        Self {
            name: name.to_string(),
            artifact_type: artifact_type.to_string(),
            extension: extension.map(str::to_string),
            classifier: classifier.map(str::to_string),
        }
    }

    /// Parse an artifact name. Extension defaults to `jar`; the type follows
    /// the extension.
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        let (head, extension) = match s.rfind('@') {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => (s, "jar"),
        };
        let parts: Vec<&str> = head.split(':').collect();
        let invalid = || IdentityError::InvalidArtifactName(s.to_string());
        if extension.is_empty() || parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }
        match parts.as_slice() {
            [name] => Ok(Self::new(name, extension, Some(extension), None)),
            [name, classifier] => Ok(Self::new(
                name,
                extension,
                Some(extension),
                Some(*classifier),
            )),
            _ => Err(invalid()),
        }
    }

    /// File name for this artifact within the given version:
    /// `name-version[-classifier][.extension]`.
    pub fn file_name(&self, version: &str) -> String {
        let mut out = format!("{}-{}", self.name, version);
        if let Some(c) = &self.classifier {
            out.push('-');
            out.push_str(c);
        }
        if let Some(ext) = &self.extension {
            out.push('.');
            out.push_str(ext);
        }
        out
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{}", c)?;
        }
        if let Some(ext) = &self.extension {
            write!(f, "@{}", ext)?;
        }
        Ok(())
    }
}
