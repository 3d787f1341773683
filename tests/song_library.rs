//! Integration tests for loading songs from a directory.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::fs;
use std::path::{Path, PathBuf};

use minidemo::config::{Settings, SettingsOverrides};
use minidemo::error::Error;
use minidemo::library::{SongLibrary, SongSource};
use minidemo::playlist::{next, previous};
use minidemo::types::SongId;
use tempfile::TempDir;

// Helper to build a song directory with a manifest and lyrics files
fn song_dir(manifest: &str, songs: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("manifest.txt"), manifest).unwrap();
    for (id, text) in songs {
        fs::write(dir.path().join(format!("{id}.txt")), text).unwrap();
    }
    dir
}

fn library_for(dir: &Path) -> SongLibrary {
    SongLibrary::new(Settings::default().with_overrides(SettingsOverrides {
        base_path: Some(dir.to_path_buf()),
        default_image: Some(PathBuf::from("/shared/default.jpg")),
        ..SettingsOverrides::default()
    }))
}

#[test]
fn test_playlist_from_manifest_file() {
    let dir = song_dir("one\r\ntwo\r\n\r\nthree\r\n", &[]);
    let playlist = library_for(dir.path()).load_playlist().unwrap();

    let ids: Vec<&str> = playlist.songs().iter().map(SongId::as_str).collect();
    assert_eq!(ids, vec!["one", "two", "three"]);

    let last = SongId::from("three");
    assert_eq!(next(&playlist, &last).unwrap().song_id.as_str(), "one");
    assert_eq!(previous(&playlist, &"one".into()).unwrap().song_id, last);
}

#[test]
fn test_empty_manifest_is_valid() {
    let dir = song_dir("\n\n", &[]);
    let library = library_for(dir.path());
    let playlist = library.load_playlist().unwrap();
    assert!(playlist.is_empty());
    assert!(next(&playlist, &"x".into()).is_none());
    assert!(library.load_cards().unwrap().is_empty());
}

#[test]
fn test_missing_manifest_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    match library_for(dir.path()).load_playlist() {
        Err(Error::Io { path: Some(path), .. }) => assert!(path.ends_with("manifest.txt")),
        other => panic!("Expected Io error with path, got {other:?}"),
    }
}

#[test]
fn test_load_metadata_from_file() {
    let dir = song_dir(
        "ballad\n",
        &[("ballad", "# Slow Ballad\r\n## Credits\r\nVocals: Sam\r\nKeys: Lee\r\n## Lyrics\r\n\r\nverse one\r\n  verse two  \r\n")],
    );
    let meta = library_for(dir.path()).load_metadata(&"ballad".into()).unwrap();

    assert_eq!(meta.title, "Slow Ballad");
    assert_eq!(meta.credits.get("Vocals"), Some("Sam"));
    assert_eq!(meta.credits.get("Keys"), Some("Lee"));
    assert_eq!(meta.lyric_lines, vec!["verse one", "verse two"]);
}

#[test]
fn test_cards_fall_back_when_lyrics_missing() {
    let dir = song_dir(
        "first\nmissing\n",
        &[("first", "# First Song\n## Credits\nArtist: Band\n## Lyrics\nla")],
    );
    let cards = library_for(dir.path()).load_cards().unwrap();

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].title, "First Song");
    assert_eq!(cards[0].credits_text, "Artist: Band");
    assert_eq!(cards[0].image, dir.path().join("first.jpg"));
    assert_eq!(cards[1].title, "missing");
    assert!(cards[1].credits_text.is_empty());
}

#[test]
fn test_resolve_image_uses_default_when_absent() {
    let dir = song_dir("a\nb\n", &[]);
    fs::write(dir.path().join("a.jpg"), b"not really a jpeg").unwrap();
    let library = library_for(dir.path());

    assert!(library.image_exists(&"a".into()));
    assert_eq!(library.resolve_image(&"a".into()), dir.path().join("a.jpg"));
    assert_eq!(library.resolve_image(&"b".into()), PathBuf::from("/shared/default.jpg"));
}

#[test]
fn test_custom_markers_from_settings() {
    let dir = song_dir("s\n", &[("s", "# S\n[who]\nBy: Me\n[words]\nhello")]);
    let library = SongLibrary::new(Settings::default().with_overrides(SettingsOverrides {
        base_path: Some(dir.path().to_path_buf()),
        credits_marker: Some("[who]".to_string()),
        lyrics_marker: Some("[words]".to_string()),
        ..SettingsOverrides::default()
    }));

    let meta = library.load_metadata(&"s".into()).unwrap();
    assert_eq!(meta.credits.get("By"), Some("Me"));
    assert_eq!(meta.lyric_lines, vec!["hello"]);
}
