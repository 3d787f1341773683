//! Lyrics file parsing.
//!
//! A lyrics file looks like:
//!
//! ```text
//! # Song Title
//! ## Credits
//! Artist: Someone
//! Producer: Someone Else
//! ## Lyrics
//! first line
//! second line
//! ```
//!
//! Parsing is permissive: missing sections degrade to empty fields and no
//! input produces an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::files;

/// Regex matching the Markdown heading marker in front of the title.
#[allow(clippy::expect_used)]
static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#+ ?").expect("valid regex: RE_HEADING")
});

/// Marker lines that open the credits and lyrics blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarkers {
    /// Line opening the credits block.
    pub credits: String,
    /// Line opening the lyrics block.
    pub lyrics: String,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            credits: files::CREDITS_MARKER.to_string(),
            lyrics: files::LYRICS_MARKER.to_string(),
        }
    }
}

/// One line of the credits block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreditLine {
    /// A `key: value` credit.
    Pair {
        /// Role or field name, e.g. `Artist`.
        key: String,
        /// Credited value.
        value: String,
    },
    /// A non-blank line without a usable `key: value` split.
    Note(String),
}

impl CreditLine {
    /// Text shown for this line.
    pub fn display(&self) -> String {
        match self {
            Self::Pair { key, value } => format!("{key}: {value}"),
            Self::Note(text) => text.clone(),
        }
    }
}

/// Ordered credits with unique keys.
///
/// Inserting a key that already exists replaces its value in place, so the
/// last occurrence wins while display order follows first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credits {
    lines: Vec<CreditLine>,
}

impl Credits {
    /// Create an empty credits list.
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Insert a `key: value` pair, replacing the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        for line in &mut self.lines {
            if let CreditLine::Pair { key: existing, value: slot } = line {
                if *existing == key {
                    *slot = value;
                    return;
                }
            }
        }
        self.lines.push(CreditLine::Pair { key, value });
    }

    /// Append a free-text line.
    pub fn push_note(&mut self, text: impl Into<String>) {
        self.lines.push(CreditLine::Note(text.into()));
    }

    /// Look up the value credited under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Iterate over the `key: value` pairs in display order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| match line {
            CreditLine::Pair { key, value } => Some((key.as_str(), value.as_str())),
            CreditLine::Note(_) => None,
        })
    }

    /// Iterate over every line, pairs and notes alike.
    pub fn iter(&self) -> std::slice::Iter<'_, CreditLine> {
        self.lines.iter()
    }

    /// Lines formatted for display.
    pub fn display_lines(&self) -> Vec<String> {
        self.lines.iter().map(CreditLine::display).collect()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no credits at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Structured contents of a lyrics file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    /// Song title from the first line.
    pub title: String,
    /// Credits block.
    pub credits: Credits,
    /// Non-blank, trimmed lyric lines in order.
    pub lyric_lines: Vec<String>,
}

impl SongMetadata {
    /// Lyrics joined with newlines.
    pub fn lyrics_text(&self) -> String {
        self.lyric_lines.join("\n")
    }
}

/// Turns lyrics file text into [`SongMetadata`].
#[derive(Debug, Clone, Default)]
pub struct MetadataParser {
    markers: SectionMarkers,
}

impl MetadataParser {
    /// Create a parser that splits sections on the given markers.
    pub const fn new(markers: SectionMarkers) -> Self {
        Self { markers }
    }

    /// Markers this parser looks for.
    pub const fn markers(&self) -> &SectionMarkers {
        &self.markers
    }

    /// Parse raw lyrics file text. Never fails.
    pub fn parse(&self, raw: &str) -> SongMetadata {
        let normalized = normalize_line_endings(raw);
        let lines: Vec<&str> = normalized.split('\n').collect();

        let title = lines.first().map(|first| parse_title(first)).unwrap_or_default();

        let credits_at = find_marker(&lines, &self.markers.credits);
        let lyrics_at = find_marker(&lines, &self.markers.lyrics);

        let credits = match (credits_at, lyrics_at) {
            (Some(start), Some(end)) if start < end => parse_credits(&lines[start + 1..end]),
            _ => Credits::new(),
        };

        let lyric_lines = lyrics_at
            .map(|start| {
                lines[start + 1..]
                    .iter()
                    .map(|line| line.trim())
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        SongMetadata { title, credits, lyric_lines }
    }
}

/// Parse with the default `## Credits` / `## Lyrics` markers.
pub fn parse(raw: &str) -> SongMetadata {
    MetadataParser::default().parse(raw)
}

/// Raw credits block text: the lines between the markers joined and trimmed.
///
/// Song cards show the block as written rather than the parsed pairs.
pub fn credits_block(raw: &str, markers: &SectionMarkers) -> String {
    let normalized = normalize_line_endings(raw);
    let lines: Vec<&str> = normalized.split('\n').collect();

    match (find_marker(&lines, &markers.credits), find_marker(&lines, &markers.lyrics)) {
        (Some(start), Some(end)) if start < end => lines[start + 1..end].join("\n").trim().to_string(),
        _ => String::new(),
    }
}

fn normalize_line_endings(raw: &str) -> String {
    raw.replace("\r\n", "\n")
}

fn find_marker(lines: &[&str], marker: &str) -> Option<usize> {
    lines.iter().position(|line| *line == marker)
}

/// Strip the heading marker from the first line.
fn parse_title(line: &str) -> String {
    RE_HEADING.replace(line, "").trim().to_string()
}

// Blank lines are dropped and notes are trimmed. `Key:` with no value is a note, not a pair.
fn parse_credits(block: &[&str]) -> Credits {
    let mut credits = Credits::new();
    for line in block {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
                credits.insert(key.trim(), value.trim());
            }
            _ => credits.push_note(trimmed),
        }
    }
    credits
}
