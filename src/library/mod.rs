//! Song directory access.
//!
//! A song directory holds `manifest.txt` plus, per song id, `<id>.mp3`,
//! `<id>.txt` and optionally `<id>.jpg`.

use std::path::PathBuf;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::metadata::{MetadataParser, SongMetadata};
use crate::playlist::Playlist;
use crate::song_list::SongCard;
use crate::types::SongId;

/// Source of manifest and lyrics text.
pub trait SongSource: Send + Sync {
    /// Raw manifest text.
    fn manifest(&self) -> Result<String>;

    /// Raw lyrics file text for `song`.
    fn lyrics(&self, song: &SongId) -> Result<String>;

    /// Whether `song` has its own cover image.
    fn image_exists(&self, song: &SongId) -> bool;
}

/// Song directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct SongLibrary {
    settings: Settings,
}

impl SongLibrary {
    /// Create a library rooted at `settings.base_path`.
    pub const fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read and parse the manifest.
    pub fn load_playlist(&self) -> Result<Playlist> {
        let playlist = Playlist::from_manifest(&self.manifest()?);
        tracing::info!(
            "Loaded {} songs from {}",
            playlist.len(),
            self.settings.manifest_path().display()
        );
        Ok(playlist)
    }

    /// Read and parse a song's lyrics file.
    pub fn load_metadata(&self, song: &SongId) -> Result<SongMetadata> {
        let text = self.lyrics(song)?;
        Ok(MetadataParser::new(self.settings.markers.clone()).parse(&text))
    }

    /// One card per manifest entry, in manifest order.
    ///
    /// A song whose lyrics cannot be read still gets a card, titled by its id.
    pub fn load_cards(&self) -> Result<Vec<SongCard>> {
        let playlist = self.load_playlist()?;
        Ok(playlist
            .songs()
            .iter()
            .map(|song| match self.lyrics(song) {
                Ok(text) => SongCard::from_lyrics(song.clone(), &text, &self.settings),
                Err(e) => {
                    tracing::warn!("Failed to read lyrics for {song}: {e}");
                    SongCard::placeholder(song.clone(), &self.settings)
                }
            })
            .collect())
    }

    /// Cover image for `song`, or the default image when it has none.
    pub fn resolve_image(&self, song: &SongId) -> PathBuf {
        if self.image_exists(song) {
            self.settings.assets(song).image
        } else {
            self.settings.default_image.clone()
        }
    }
}

impl SongSource for SongLibrary {
    fn manifest(&self) -> Result<String> {
        read_text(self.settings.manifest_path())
    }

    fn lyrics(&self, song: &SongId) -> Result<String> {
        read_text(self.settings.assets(song).lyrics)
    }

    fn image_exists(&self, song: &SongId) -> bool {
        self.settings.assets(song).image.is_file()
    }
}

fn read_text(path: PathBuf) -> Result<String> {
    fs_err::read_to_string(&path).map_err(|e| Error::io(e, path))
}
