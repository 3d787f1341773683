//! Core type definitions for compile-time safety.
//!
//! Song identifiers are wrapped in a newtype so they cannot be mixed up with
//! titles or paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Song identifier: the file stem shared by a song's audio, lyrics and image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub String);

impl SongId {
    /// Create a new `SongId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SongId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SongId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for SongId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Files that make up one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongAssets {
    /// Audio file (`<id>.mp3`).
    pub audio: PathBuf,
    /// Lyrics file (`<id>.txt`).
    pub lyrics: PathBuf,
    /// Cover image (`<id>.jpg`).
    pub image: PathBuf,
}
