//! Boundary-delimited, case-insensitive marking of vocabulary words.
//!
//! Marks are always recomputed from scratch. The scan is
//! lines × keys × line length, fine for the corpus sizes involved.

use unicode_normalization::char::is_combining_mark;
use vokabel_types::{HighlightMark, cluster_ranges, fold_cluster, normalize_word};

/// Word constituent for boundary checks. Combining marks belong to their word.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || is_combining_mark(c)
}

/// Text folded like vocabulary keys, plus a mapping back to source byte offsets
#[derive(Debug, Clone)]
pub struct FoldedText {
    pub text: String,
    /// (folded start, source cluster start, source cluster end) per folded char
    spans: Vec<(usize, usize, usize)>,
}

impl FoldedText {
    /// Source byte range covering the folded range `start..end`
    fn to_source(&self, start: usize, end: usize) -> (usize, usize) {
        let first = self.spans.partition_point(|span| span.0 <= start).saturating_sub(1);
        let last = self.spans.partition_point(|span| span.0 < end).saturating_sub(1);
        (self.spans[first].1, self.spans[last].2)
    }
}

pub fn fold_case(source: &str) -> FoldedText {
    let mut text = String::with_capacity(source.len());
    let mut spans = Vec::with_capacity(source.len());

    for (start, end) in cluster_ranges(source) {
        for folded in fold_cluster(&source[start..end]) {
            spans.push((text.len(), start, end));
            text.push(folded);
        }
    }

    FoldedText { text, spans }
}

/// Source byte ranges of every boundary-delimited occurrence of `key`.
///
/// `key` must already be normalized.
fn find_occurrences(folded: &FoldedText, key: &str) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    if key.is_empty() {
        return found;
    }

    let hay = folded.text.as_str();
    let mut from = 0;
    while let Some(pos) = hay[from..].find(key) {
        let start = from + pos;
        let end = start + key.len();

        let before_ok = hay[..start].chars().next_back().is_none_or(|c| !is_word_char(c));
        let after_ok = hay[end..].chars().next().is_none_or(|c| !is_word_char(c));
        if before_ok && after_ok {
            found.push(folded.to_source(start, end));
        }

        // Resume past the candidate whether or not it was accepted
        from = end;
    }

    found
}

/// Marks for every vocabulary key in the given document lines
pub fn compute_marks<L, K>(lines: &[L], keys: &[K]) -> Vec<HighlightMark>
where
    L: AsRef<str>,
    K: AsRef<str>,
{
    let keys: Vec<String> = keys
        .iter()
        .map(|k| normalize_word(k.as_ref()))
        .filter(|k| !k.is_empty())
        .collect();

    let mut marks = Vec::new();
    if keys.is_empty() {
        return marks;
    }

    for (line_idx, line) in lines.iter().enumerate() {
        let folded = fold_case(line.as_ref());
        for key in &keys {
            for (start, end) in find_occurrences(&folded, key) {
                marks.push(HighlightMark::new(line_idx, start, end));
            }
        }
    }

    marks.sort_unstable();
    marks.dedup();
    tracing::trace!("Computed {} marks over {} lines", marks.len(), lines.len());
    marks
}

/// Wrap each boundary-delimited occurrence of `word` in `open`/`close`
pub fn emphasize(text: &str, word: &str, open: &str, close: &str) -> String {
    let key = normalize_word(word);
    let folded = fold_case(text);
    let occurrences = find_occurrences(&folded, &key);
    if occurrences.is_empty() {
        return text.to_string();
    }

    let extra = occurrences.len() * (open.len() + close.len());
    let mut out = String::with_capacity(text.len() + extra);
    let mut last = 0;
    for (start, end) in occurrences {
        out.push_str(&text[last..start]);
        out.push_str(open);
        out.push_str(&text[start..end]);
        out.push_str(close);
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

/// The word touching byte column `col`, if any.
///
/// A cursor right after a word still selects it.
pub fn word_at(line: &str, col: usize) -> Option<&str> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    if chars.is_empty() {
        return None;
    }

    let mut idx = chars.partition_point(|(start, _)| *start <= col).saturating_sub(1);
    if !is_word_char(chars[idx].1) {
        if idx > 0 && is_word_char(chars[idx - 1].1) && col >= chars[idx].0 {
            idx -= 1;
        } else {
            return None;
        }
    }

    let mut first = idx;
    while first > 0 && is_word_char(chars[first - 1].1) {
        first -= 1;
    }
    let mut last = idx;
    while last + 1 < chars.len() && is_word_char(chars[last + 1].1) {
        last += 1;
    }

    let start = chars[first].0;
    let end = chars[last].0 + chars[last].1.len_utf8();
    Some(&line[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans<'a>(line: &'a str, marks: &[HighlightMark]) -> Vec<&'a str> {
        marks.iter().map(|m| &line[m.start_col..m.end_col]).collect()
    }

    #[test]
    fn matches_whole_words_only() {
        let lines = ["Straße ist schön"];

        let marks = compute_marks(&lines, &["ist"]);
        assert_eq!(marks, vec![HighlightMark::new(0, 8, 11)]);

        assert!(compute_marks(&lines, &["i"]).is_empty());
        assert!(compute_marks(&lines, &["sch"]).is_empty());
    }

    #[test]
    fn case_folded_keys_match_folded_text() {
        let lines = ["straße", "STRASSE", "Straße!"];
        let marks = compute_marks(&lines, &["Straße"]);

        assert_eq!(
            marks,
            vec![HighlightMark::new(0, 0, 7), HighlightMark::new(2, 0, 7)]
        );
    }

    #[test]
    fn columns_refer_to_original_text() {
        let line = "Die VERNEINUNG, eine Verneinung.";
        let marks = compute_marks(&[line], &["verneinung"]);
        assert_eq!(spans(line, &marks), ["VERNEINUNG", "Verneinung"]);
    }

    #[test]
    fn multi_byte_lowercase_maps_back() {
        // 'İ' lower-cases to two chars
        let line = "İstanbul ist groß";
        let marks = compute_marks(&[line], &["ist"]);
        assert_eq!(spans(line, &marks), ["ist"]);
    }

    #[test]
    fn decomposed_text_matches_composed_key() {
        let line = "Das ist scho\u{0308}n.";

        let marks = compute_marks(&[line], &["schön"]);
        assert_eq!(spans(line, &marks), ["scho\u{0308}n"]);

        assert!(compute_marks(&[line], &["scho"]).is_empty());
    }

    #[test]
    fn trailing_combining_mark_is_part_of_the_word() {
        // U+0347 has no precomposed form, it survives NFC
        let line = "ab\u{0347} ab";
        let marks = compute_marks(&[line], &["ab"]);
        assert_eq!(marks, vec![HighlightMark::new(0, 5, 7)]);
    }

    #[test]
    fn final_sigma_matches_either_case() {
        let lines = ["ΟΔΟΣ", "μια οδος εδώ"];
        let marks = compute_marks(&lines, &["ΟΔΟΣ"]);

        assert_eq!(spans(lines[0], &marks[..1]), ["ΟΔΟΣ"]);
        assert_eq!(spans(lines[1], &marks[1..]), ["οδος"]);
    }

    #[test]
    fn repeated_and_adjacent_occurrences() {
        let line = "haus haus,haus_haus";
        let marks = compute_marks(&[line], &["haus"]);
        assert_eq!(
            marks,
            vec![
                HighlightMark::new(0, 0, 4),
                HighlightMark::new(0, 5, 9),
            ]
        );
    }

    #[test]
    fn overlapping_candidates_do_not_loop() {
        let line = "aaaa aa";
        let marks = compute_marks(&[line], &["aa"]);
        assert_eq!(marks, vec![HighlightMark::new(0, 5, 7)]);
    }

    #[test]
    fn blank_keys_and_empty_lines() {
        assert!(compute_marks(&["", "text"], &["", "  "]).is_empty());
        assert!(compute_marks::<&str, &str>(&[], &["haus"]).is_empty());
    }

    #[test]
    fn marks_sorted_across_keys() {
        let lines = ["der baum und das haus", "haus"];
        let marks = compute_marks(&lines, &["haus", "baum"]);
        assert_eq!(
            marks,
            vec![
                HighlightMark::new(0, 4, 8),
                HighlightMark::new(0, 17, 21),
                HighlightMark::new(1, 0, 4),
            ]
        );
    }

    #[test]
    fn emphasize_wraps_boundary_matches() {
        assert_eq!(
            emphasize("Das ist eine Verneinung.", "verneinung", "<b>", "</b>"),
            "Das ist eine <b>Verneinung</b>."
        );
        assert_eq!(emphasize("Haustür", "haus", "<b>", "</b>"), "Haustür");
    }

    #[test]
    fn word_under_cursor() {
        let line = "Das ist schön.";
        assert_eq!(word_at(line, 0), Some("Das"));
        assert_eq!(word_at(line, 5), Some("ist"));
        assert_eq!(word_at(line, 7), Some("ist"));
        assert_eq!(word_at(line, 9), Some("schön"));
        assert_eq!(word_at(line, 14), Some("schön"));
        assert_eq!(word_at("Ja, scho\u{0308}n", 6), Some("scho\u{0308}n"));
        assert_eq!(word_at("  ", 1), None);
        assert_eq!(word_at("", 0), None);
    }
}
