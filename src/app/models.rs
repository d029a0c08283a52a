//! Data models for scriptsync
//!
//! This module defines the core data structures used throughout the library:
//! script files and their types, file identity for collision detection, and
//! the collision strategies the reconciler understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::files;
use crate::errors::ConfigError;

/// Type of a script project file
///
/// The set is closed: an unknown wire value fails at parse time as a
/// [`ConfigError`], never at merge time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Server-side script source (wire value `SERVER_JS`)
    #[serde(rename = "SERVER_JS")]
    ServerJs,
    /// HTML template (wire value `HTML`)
    #[serde(rename = "HTML")]
    Html,
    /// JSON document, including the project manifest (wire value `JSON`)
    #[serde(rename = "JSON")]
    Json,
}

impl FileType {
    /// Get the wire format name (e.g., "SERVER_JS")
    pub fn as_wire_name(&self) -> &'static str {
        match self {
            Self::ServerJs => "SERVER_JS",
            Self::Html => "HTML",
            Self::Json => "JSON",
        }
    }
}

impl FromStr for FileType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SERVER_JS" => Ok(Self::ServerJs),
            "HTML" => Ok(Self::Html),
            "JSON" => Ok(Self::Json),
            other => Err(ConfigError::UnknownFileType {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_name())
    }
}

/// Identity of a file for collision purposes
///
/// Two files are "the same file" iff their `(name, type)` pairs match;
/// content equality additionally compares `source`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub name: String,
    pub file_type: FileType,
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.file_type)
    }
}

/// A single script project file
///
/// `extra` captures server-computed metadata (update times, function sets)
/// that rides along when a file was deserialized from a content fetch. It is
/// never sent back: update payloads are stripped to name/type/source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// File name without extension
    pub name: String,
    /// File type
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// File content
    #[serde(default)]
    pub source: String,
    /// Server-computed metadata from a prior fetch; dropped on update
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl File {
    /// Create a file from its essential fields
    pub fn new(name: impl Into<String>, file_type: FileType, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_type,
            source: source.into(),
            extra: Map::new(),
        }
    }

    /// Identity used for collision detection
    pub fn key(&self) -> FileKey {
        FileKey {
            name: self.name.clone(),
            file_type: self.file_type,
        }
    }

    /// Whether this is the distinguished project manifest
    pub fn is_manifest(&self) -> bool {
        self.name == files::MANIFEST_NAME && self.file_type == FileType::Json
    }

    /// Whether `other` is the same file with the same content
    pub fn same_content(&self, other: &File) -> bool {
        self.name == other.name
            && self.file_type == other.file_type
            && self.source == other.source
    }
}

/// Strategy governing how desired files merge into current files
///
/// Modelled as a closed enum so an unmatched case is a compile-time
/// impossibility; unknown caller input dies at [`FromStr`] before any I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionStrategy {
    /// Fail the whole merge if any desired identity already exists
    Abort,
    /// Desired files win: colliding current files are removed first
    Replace,
    /// Current files win: colliding desired files are not applied
    Skip,
    /// Keep both: colliding desired files get a fresh `_N` suffixed name
    Rename,
}

impl CollisionStrategy {
    /// Get the strategy name as used on the wire and in collision results
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Replace => "replace",
            Self::Skip => "skip",
            Self::Rename => "rename",
        }
    }
}

impl FromStr for CollisionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "replace" => Ok(Self::Replace),
            "skip" => Ok(Self::Skip),
            "rename" => Ok(Self::Rename),
            other => Err(ConfigError::UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CollisionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_round_trip() {
        for (text, expected) in [
            ("SERVER_JS", FileType::ServerJs),
            ("HTML", FileType::Html),
            ("JSON", FileType::Json),
        ] {
            let parsed: FileType = text.parse().unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(parsed.as_wire_name(), text);
        }
    }

    #[test]
    fn test_unknown_file_type_is_config_error() {
        let err = "GS".parse::<FileType>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownFileType {
                value: "GS".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_strategy_is_config_error() {
        let err = "merge".parse::<CollisionStrategy>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStrategy { .. }));
    }

    #[test]
    fn test_manifest_predicate() {
        let manifest = File::new("appsscript", FileType::Json, "{}");
        assert!(manifest.is_manifest());

        // Name alone is not enough; type must be JSON
        let lookalike = File::new("appsscript", FileType::Html, "");
        assert!(!lookalike.is_manifest());

        let code = File::new("main", FileType::ServerJs, "function f() {}");
        assert!(!code.is_manifest());
    }

    #[test]
    fn test_identity_vs_content() {
        let a = File::new("util", FileType::ServerJs, "x");
        let b = File::new("util", FileType::ServerJs, "y");
        assert_eq!(a.key(), b.key());
        assert!(!a.same_content(&b));
        assert!(a.same_content(&a.clone()));
    }

    #[test]
    fn test_file_deserializes_server_metadata() {
        let raw = serde_json::json!({
            "name": "main",
            "type": "SERVER_JS",
            "source": "function f() {}",
            "updateTime": "2024-01-01T00:00:00Z",
        });
        let file: File = serde_json::from_value(raw).unwrap();
        assert_eq!(file.name, "main");
        assert!(file.extra.contains_key("updateTime"));
    }

    #[test]
    fn test_file_key_display_names_type() {
        let key = File::new("appsscript", FileType::Json, "{}").key();
        assert_eq!(key.to_string(), "appsscript (JSON)");
    }
}
