//! Playlist loading and wraparound navigation.

use serde::{Deserialize, Serialize};

use crate::types::SongId;

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the playlist.
    Next,
    /// Towards the start of the playlist.
    Previous,
}

/// Target of a navigation step. Always a valid index into the playlist it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Position of the target song.
    pub index: usize,
    /// Identifier of the target song.
    pub song_id: SongId,
}

/// Ordered list of song identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlist {
    songs: Vec<SongId>,
}

impl Playlist {
    /// Create a playlist from song ids.
    pub fn new(songs: impl IntoIterator<Item = impl Into<SongId>>) -> Self {
        Self { songs: songs.into_iter().map(Into::into).collect() }
    }

    /// Parse a manifest: one song id per line, blank lines ignored.
    pub fn from_manifest(text: &str) -> Self {
        Self::new(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    /// Songs in order.
    pub fn songs(&self) -> &[SongId] {
        &self.songs
    }

    /// Number of songs.
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the playlist has no songs.
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Position of `song`, using the first occurrence.
    pub fn position(&self, song: &SongId) -> Option<usize> {
        self.songs.iter().position(|s| s == song)
    }

    /// Song after `current`, wrapping to the first.
    pub fn next(&self, current: &SongId) -> Option<Navigation> {
        self.navigate(current, Direction::Next)
    }

    /// Song before `current`, wrapping to the last.
    pub fn previous(&self, current: &SongId) -> Option<Navigation> {
        self.navigate(current, Direction::Previous)
    }

    /// Step one song in `direction`.
    ///
    /// Returns `None` for an empty playlist. A `current` that is not in the
    /// playlist counts as index 0.
    pub fn navigate(&self, current: &SongId, direction: Direction) -> Option<Navigation> {
        let len = self.songs.len();
        if len == 0 {
            return None;
        }

        let index = self.position(current).unwrap_or(0);
        let target = match direction {
            Direction::Next => (index + 1) % len,
            Direction::Previous => (index + len - 1) % len,
        };

        Some(Navigation { index: target, song_id: self.songs[target].clone() })
    }
}

impl FromIterator<SongId> for Playlist {
    fn from_iter<I: IntoIterator<Item = SongId>>(iter: I) -> Self {
        Self { songs: iter.into_iter().collect() }
    }
}

/// Song after `current` in `playlist`.
pub fn next(playlist: &Playlist, current: &SongId) -> Option<Navigation> {
    playlist.next(current)
}

/// Song before `current` in `playlist`.
pub fn previous(playlist: &Playlist, current: &SongId) -> Option<Navigation> {
    playlist.previous(current)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn abc() -> Playlist {
        Playlist::new(["a", "b", "c"])
    }

    #[test]
    fn test_next_wraps_to_first() {
        let nav = next(&abc(), &SongId::from("c")).unwrap();
        assert_eq!(nav.index, 0);
        assert_eq!(nav.song_id, SongId::from("a"));
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let nav = previous(&abc(), &SongId::from("a")).unwrap();
        assert_eq!(nav.index, 2);
        assert_eq!(nav.song_id, SongId::from("c"));
    }

    #[test]
    fn test_middle_steps() {
        let playlist = abc();
        assert_eq!(playlist.next(&"a".into()).unwrap().song_id.as_str(), "b");
        assert_eq!(playlist.previous(&"c".into()).unwrap().song_id.as_str(), "b");
    }

    #[test]
    fn test_empty_playlist_has_no_navigation() {
        let empty = Playlist::default();
        assert!(next(&empty, &"anything".into()).is_none());
        assert!(previous(&empty, &"anything".into()).is_none());
    }

    #[test]
    fn test_unknown_current_counts_as_first() {
        let playlist = abc();
        assert_eq!(playlist.next(&"zzz".into()).unwrap().song_id.as_str(), "b");
        assert_eq!(playlist.previous(&"zzz".into()).unwrap().song_id.as_str(), "c");
    }

    #[test]
    fn test_single_song_returns_itself() {
        let one = Playlist::new(["only"]);
        let nav = one.next(&"only".into()).unwrap();
        assert_eq!(nav, Navigation { index: 0, song_id: "only".into() });
        assert_eq!(one.previous(&"only".into()).unwrap(), nav);
    }

    #[test]
    fn test_previous_then_next_round_trips() {
        let playlist = Playlist::new(["a", "b", "c", "d", "e"]);
        for song in playlist.songs() {
            let back = previous(&playlist, song).unwrap();
            let forth = next(&playlist, &back.song_id).unwrap();
            assert_eq!(&forth.song_id, song);
            assert_eq!(Some(forth.index), playlist.position(song));
        }
    }

    #[test]
    fn test_duplicates_use_first_occurrence() {
        let playlist = Playlist::new(["a", "b", "a", "c"]);
        assert_eq!(playlist.next(&"a".into()).unwrap().index, 1);
    }

    #[test]
    fn test_manifest_parsing() {
        let playlist = Playlist::from_manifest("first\r\n\n  second  \n\n\nthird\n");
        let ids: Vec<&str> = playlist.songs().iter().map(SongId::as_str).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_manifest() {
        assert!(Playlist::from_manifest("").is_empty());
        assert!(Playlist::from_manifest("\n  \n").is_empty());
    }
}
