//! Song list cards and player links.
//!
//! Each manifest entry becomes a card showing the song title, its credits
//! block as written, and its cover image. Cards link to the player with or
//! without autoplay.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::constants::links;
use crate::metadata::{self, MetadataParser};
use crate::types::SongId;

/// One entry of the song list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongCard {
    /// Song identifier.
    pub id: SongId,
    /// Title from the lyrics file.
    pub title: String,
    /// Credits block text, unparsed.
    pub credits_text: String,
    /// Cover image path.
    pub image: PathBuf,
}

impl SongCard {
    /// Build a card from a song's lyrics file text.
    pub fn from_lyrics(id: SongId, text: &str, settings: &Settings) -> Self {
        let parsed = MetadataParser::new(settings.markers.clone()).parse(text);
        Self {
            image: settings.assets(&id).image,
            title: parsed.title,
            credits_text: metadata::credits_block(text, &settings.markers),
            id,
        }
    }

    /// Card for a song whose lyrics could not be read: titled by its id.
    pub fn placeholder(id: SongId, settings: &Settings) -> Self {
        Self {
            image: settings.assets(&id).image,
            title: id.to_string(),
            credits_text: String::new(),
            id,
        }
    }

    /// Link that opens the player and starts playing.
    pub fn play_link(&self) -> PlayerLink {
        PlayerLink::play(self.id.clone())
    }

    /// Link that opens the player without playing.
    pub fn view_link(&self) -> PlayerLink {
        PlayerLink::view(self.id.clone())
    }
}

/// Reference to the player page for one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLink {
    /// Song to open.
    pub song: SongId,
    /// Whether the player should start playing on its own.
    pub autoplay: bool,
}

impl PlayerLink {
    /// Link with autoplay.
    pub const fn play(song: SongId) -> Self {
        Self { song, autoplay: true }
    }

    /// Link without autoplay.
    pub const fn view(song: SongId) -> Self {
        Self { song, autoplay: false }
    }

    /// `player.html?play=<bool>#<song>`
    pub fn to_href(&self) -> String {
        format!("{}?{}={}#{}", links::PLAYER_PAGE, links::PLAY_PARAM, self.autoplay, self.song)
    }

    /// Parse a player href. Returns `None` when there is no song fragment.
    pub fn parse(href: &str) -> Option<Self> {
        let (before, fragment) = href.split_once('#')?;
        let search = before.split_once('?').map_or("", |(_, query)| query);
        Self::from_location(search, fragment)
    }

    /// Build from the query string and fragment of a location, with or
    /// without their leading `?` / `#`.
    pub fn from_location(search: &str, hash: &str) -> Option<Self> {
        let song = song_id_from_fragment(hash.trim_start_matches('#'));
        if song.as_str().is_empty() {
            return None;
        }

        let autoplay = search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == links::PLAY_PARAM && value == "true");

        Some(Self { song, autoplay })
    }
}

/// Song id from a location fragment: everything before the first `?`.
pub fn song_id_from_fragment(fragment: &str) -> SongId {
    let id = fragment.split_once('?').map_or(fragment, |(id, _)| id);
    SongId::from(id)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_card_from_lyrics() {
        let settings = Settings { base_path: PathBuf::from("songs"), ..Settings::default() };
        let text = "# Night Drive\n## Credits\nArtist: A\nMix:  B\n## Lyrics\nla";
        let card = SongCard::from_lyrics(SongId::from("night"), text, &settings);
        assert_eq!(card.title, "Night Drive");
        assert_eq!(card.credits_text, "Artist: A\nMix:  B");
        assert_eq!(card.image, PathBuf::from("songs/night.jpg"));
    }

    #[test]
    fn test_placeholder_card() {
        let card = SongCard::placeholder(SongId::from("lost"), &Settings::default());
        assert_eq!(card.title, "lost");
        assert!(card.credits_text.is_empty());
    }

    #[test]
    fn test_links() {
        let card = SongCard::placeholder(SongId::from("tune"), &Settings::default());
        assert_eq!(card.play_link().to_href(), "player.html?play=true#tune");
        assert_eq!(card.view_link().to_href(), "player.html?play=false#tune");
    }

    #[test]
    fn test_parse_href() {
        let link = PlayerLink::parse("player.html?play=true#tune").unwrap();
        assert_eq!(link, PlayerLink::play(SongId::from("tune")));

        let link = PlayerLink::parse("player.html?x=1&play=false#tune").unwrap();
        assert!(!link.autoplay);

        assert!(PlayerLink::parse("player.html?play=true").is_none());
        assert!(PlayerLink::parse("player.html#").is_none());
    }

    #[test]
    fn test_fragment_query_is_stripped() {
        assert_eq!(song_id_from_fragment("tune?play=true").as_str(), "tune");
        assert_eq!(song_id_from_fragment("tune").as_str(), "tune");
        let link = PlayerLink::from_location("", "#tune?play=true").unwrap();
        assert_eq!(link.song.as_str(), "tune");
        assert!(!link.autoplay);
    }
}
