use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use uuid::Uuid;

/// Byte ranges of each base char together with its trailing combining marks
pub fn cluster_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = None;

    for (idx, ch) in text.char_indices() {
        match start {
            Some(_) if is_combining_mark(ch) => {}
            Some(prev) => {
                ranges.push((prev, idx));
                start = Some(idx);
            }
            None => start = Some(idx),
        }
    }
    if let Some(prev) = start {
        ranges.push((prev, text.len()));
    }

    ranges
}

/// Case fold one cluster: NFC, lower-case, final sigma folded to sigma.
///
/// Keys and document text both go through this, cluster by cluster.
pub fn fold_cluster(cluster: &str) -> impl Iterator<Item = char> + '_ {
    cluster
        .nfc()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
}

/// Normalized form used as the vocabulary key.
///
/// Whitespace runs collapse to one space, so a key never contains a tab or
/// line break.
pub fn normalize_word(word: &str) -> String {
    let word = word.split_whitespace().collect::<Vec<_>>().join(" ");
    cluster_ranges(&word)
        .into_iter()
        .flat_map(|(start, end)| fold_cluster(&word[start..end]))
        .collect()
}

/// One learned word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabRecord {
    pub front: String,
    pub back: String,
    pub notes: String,
    pub context: String,
}

impl VocabRecord {
    /// Build a record, normalizing `front`. Returns `None` if the word is blank.
    pub fn new(
        front: &str,
        back: impl Into<String>,
        notes: impl Into<String>,
        context: impl Into<String>,
    ) -> Option<Self> {
        let front = normalize_word(front);
        if front.is_empty() {
            return None;
        }

        Some(Self {
            front,
            back: back.into(),
            notes: notes.into(),
            context: context.into(),
        })
    }
}

/// A matched occurrence of a vocabulary word.
///
/// Columns are byte offsets into the original line, `end_col` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HighlightMark {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl HighlightMark {
    pub fn new(line: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            line,
            start_col,
            end_col,
        }
    }
}

/// Identity of a preview surface owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computed size of a preview surface, in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSize {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// Events flowing into the session loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Primary lookup of the word at the given document line
    Lookup { word: String, line: Option<usize> },
    Clear(String),
    TranslateSelection(String),
    AddNote {
        file: String,
        line: usize,
        text: String,
    },
    /// Host navigated away from the preview
    NavigatedAway,
    /// Document content or focus changed
    ContentChanged,
    ShowMarks,
    ListVocabulary,
    Quit,
}
