use vokabel_types::VocabRecord;

pub const SEPARATOR: char = '\t';
pub const HEADER: &str = "front\tback\tnotes\tcontext";
/// Substitute written in place of line breaks
pub const NEWLINE_ESCAPE: &str = "<br>";

const FIELD_COUNT: usize = 4;

/// Make a free-text field safe for a single tab-separated line
pub fn escape_field(text: &str) -> String {
    text.replace("\r\n", NEWLINE_ESCAPE)
        .replace(['\n', '\r'], NEWLINE_ESCAPE)
        .replace(SEPARATOR, " ")
}

/// Serialize records under the header, one per line, sorted by `front`
pub fn encode<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a VocabRecord>,
{
    let mut rows: Vec<&VocabRecord> = records.into_iter().collect();
    rows.sort_by(|a, b| a.front.cmp(&b.front));

    let mut out = String::with_capacity(HEADER.len() + 1 + rows.len() * 64);
    out.push_str(HEADER);
    out.push('\n');

    for record in rows {
        let fields = [
            escape_field(&record.front),
            escape_field(&record.back),
            escape_field(&record.notes),
            escape_field(&record.context),
        ];
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }

    out
}

/// Parse file contents. Malformed lines are skipped, never fatal.
pub fn decode(contents: &str) -> Vec<VocabRecord> {
    let mut records = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if idx == 0 && line.trim_end().eq_ignore_ascii_case(HEADER) {
            continue;
        }

        let fields: Vec<&str> = line.split(SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            tracing::warn!(
                "Skipping vocabulary line {}: expected {} fields, got {}",
                idx + 1,
                FIELD_COUNT,
                fields.len()
            );
            continue;
        }

        match VocabRecord::new(fields[0], fields[1], fields[2], fields[3]) {
            Some(record) => records.push(record),
            None => tracing::warn!("Skipping vocabulary line {}: empty word", idx + 1),
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(front: &str, back: &str, notes: &str, context: &str) -> VocabRecord {
        VocabRecord::new(front, back, notes, context).unwrap()
    }

    #[test]
    fn escapes_newlines_and_tabs() {
        assert_eq!(escape_field("a\nb\r\nc\rd"), "a<br>b<br>c<br>d");
        assert_eq!(escape_field("col\tcol"), "col col");
    }

    #[test]
    fn encode_writes_header_and_sorted_rows() {
        let b = record("b", "2", "", "");
        let a = record("a", "1", "n", "ctx\nmore");
        let out = encode([&b, &a]);

        assert_eq!(out, "front\tback\tnotes\tcontext\na\t1\tn\tctx<br>more\nb\t2\t\t\n");
    }

    #[test]
    fn decode_skips_malformed_lines() {
        let contents = "front\tback\tnotes\tcontext\n\
                        haus\thouse\t\tDas Haus\n\
                        broken\tline\n\
                        \tempty\t\t\n\
                        too\tmany\tfields\there\textra\n\
                        baum\ttree\toak?\tDer Baum\n";

        let records = decode(contents);
        let fronts: Vec<&str> = records.iter().map(|r| r.front.as_str()).collect();
        assert_eq!(fronts, ["haus", "baum"]);
        assert_eq!(records[1].notes, "oak?");
    }

    #[test]
    fn decode_normalizes_keys_and_tolerates_missing_header() {
        let records = decode("Haus\thouse\t\t\r\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].front, "haus");
        assert_eq!(records[0].context, "");
    }
}
