//! Application configuration.
//!
//! Settings are an explicit value handed to each component at construction.
//! They load from environment variables and an optional `.env` file.

use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{defaults, files};
use crate::error::{Error, Result};
use crate::metadata::SectionMarkers;
use crate::types::{SongAssets, SongId};

/// Configuration for the player and song list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `manifest.txt` and the song files.
    pub base_path: PathBuf,
    /// Image shown when a song has no cover.
    pub default_image: PathBuf,
    /// Lyrics file section markers.
    pub markers: SectionMarkers,
    /// Distance moved by a single seek step.
    pub seek_step: Duration,
}

/// Optional replacements for individual settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Replacement base path.
    pub base_path: Option<PathBuf>,
    /// Replacement default image.
    pub default_image: Option<PathBuf>,
    /// Replacement credits marker.
    pub credits_marker: Option<String>,
    /// Replacement lyrics marker.
    pub lyrics_marker: Option<String>,
    /// Replacement seek step.
    pub seek_step: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(defaults::BASE_PATH),
            default_image: PathBuf::from(defaults::DEFAULT_IMAGE),
            markers: SectionMarkers::default(),
            seek_step: Duration::from_secs(defaults::SEEK_STEP_SECS),
        }
    }
}

impl Settings {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        Ok(Self::default().with_overrides(overrides_from(|key| env::var(key).ok())?))
    }

    /// Return a copy with every `Some` override applied.
    #[must_use]
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(path) = overrides.base_path {
            self.base_path = path;
        }
        if let Some(image) = overrides.default_image {
            self.default_image = image;
        }
        if let Some(marker) = overrides.credits_marker {
            self.markers.credits = marker;
        }
        if let Some(marker) = overrides.lyrics_marker {
            self.markers.lyrics = marker;
        }
        if let Some(step) = overrides.seek_step {
            self.seek_step = step;
        }
        self
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.base_path.join(files::MANIFEST_FILE)
    }

    /// Paths of a song's audio, lyrics and image files.
    pub fn assets(&self, song: &SongId) -> SongAssets {
        SongAssets {
            audio: song_file(&self.base_path, song, files::AUDIO_EXT),
            lyrics: song_file(&self.base_path, song, files::LYRICS_EXT),
            image: song_file(&self.base_path, song, files::IMAGE_EXT),
        }
    }
}

/// Build overrides from a variable lookup.
fn overrides_from(lookup: impl Fn(&str) -> Option<String>) -> Result<SettingsOverrides> {
    let seek_step = lookup("MINIDEMO_SEEK_STEP")
        .map(|raw| {
            raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                Error::config(
                    format!("MINIDEMO_SEEK_STEP must be a whole number of seconds, got {raw:?}"),
                    "Set MINIDEMO_SEEK_STEP to a value like 5",
                )
            })
        })
        .transpose()?;

    Ok(SettingsOverrides {
        base_path: lookup("MINIDEMO_BASE_PATH").map(|p| expand_path(&p)),
        default_image: lookup("MINIDEMO_DEFAULT_IMAGE").map(|p| expand_path(&p)),
        credits_marker: lookup("MINIDEMO_CREDITS_MARKER"),
        lyrics_marker: lookup("MINIDEMO_LYRICS_MARKER"),
        seek_step,
    })
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}

/// `<base>/<song>.<ext>`, keeping dots inside the song id.
fn song_file(base: &Path, song: &SongId, ext: &str) -> PathBuf {
    base.join(format!("{}.{ext}", song.as_str()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_original_layout() {
        let settings = Settings::default();
        assert_eq!(settings.base_path, PathBuf::from("../songs/"));
        assert_eq!(settings.default_image, PathBuf::from("../default-image.jpg"));
        assert_eq!(settings.markers.credits, "## Credits");
        assert_eq!(settings.seek_step, Duration::from_secs(5));
    }

    #[test]
    fn test_assets_share_song_stem() {
        let settings = Settings::default().with_overrides(SettingsOverrides {
            base_path: Some(PathBuf::from("/srv/songs")),
            ..SettingsOverrides::default()
        });
        let assets = settings.assets(&SongId::from("v1.2 demo"));
        assert_eq!(assets.audio, PathBuf::from("/srv/songs/v1.2 demo.mp3"));
        assert_eq!(assets.lyrics, PathBuf::from("/srv/songs/v1.2 demo.txt"));
        assert_eq!(assets.image, PathBuf::from("/srv/songs/v1.2 demo.jpg"));
        assert_eq!(settings.manifest_path(), PathBuf::from("/srv/songs/manifest.txt"));
    }

    #[test]
    fn test_overrides_leave_original_untouched() {
        let base = Settings::default();
        let changed = base.clone().with_overrides(SettingsOverrides {
            lyrics_marker: Some("## Words".to_string()),
            ..SettingsOverrides::default()
        });
        assert_eq!(changed.markers.lyrics, "## Words");
        assert_eq!(base.markers.lyrics, "## Lyrics");
    }

    #[test]
    fn test_env_overrides() {
        let overrides = overrides_from(lookup_from(&[
            ("MINIDEMO_BASE_PATH", "/music"),
            ("MINIDEMO_SEEK_STEP", " 10 "),
        ]))
        .unwrap();
        let settings = Settings::default().with_overrides(overrides);
        assert_eq!(settings.base_path, PathBuf::from("/music"));
        assert_eq!(settings.seek_step, Duration::from_secs(10));
        assert_eq!(settings.default_image, PathBuf::from("../default-image.jpg"));
    }

    #[test]
    fn test_load_without_env_is_default() {
        dotenv().ok();
        let any_set = ["BASE_PATH", "DEFAULT_IMAGE", "CREDITS_MARKER", "LYRICS_MARKER", "SEEK_STEP"]
            .iter()
            .any(|name| env::var(format!("MINIDEMO_{name}")).is_ok());
        if any_set {
            return;
        }
        assert_eq!(Settings::load().unwrap(), Settings::default());
    }

    #[test]
    fn test_bad_seek_step_is_config_error() {
        let result = overrides_from(lookup_from(&[("MINIDEMO_SEEK_STEP", "fast")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
