use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use vokabel_core::TextSurface;
use vokabel_types::{HighlightMark, NoticeLevel, PreviewSize, SurfaceId};

/// Text surface printing to a terminal, with the document read from a file
pub struct TerminalSurface {
    document: Option<PathBuf>,
    lines: Vec<String>,
    preview: Option<(SurfaceId, Vec<String>)>,
    marks: Vec<HighlightMark>,
    out: Box<dyn Write>,
}

impl TerminalSurface {
    pub fn new(document: Option<PathBuf>) -> Self {
        Self::with_writer(document, Box::new(io::stdout()))
    }

    pub fn with_writer(document: Option<PathBuf>, out: Box<dyn Write>) -> Self {
        let mut surface = Self {
            document,
            lines: Vec::new(),
            preview: None,
            marks: Vec::new(),
            out,
        };
        surface.reload();
        surface
    }

    /// Re-read the document file
    pub fn reload(&mut self) {
        let Some(path) = &self.document else {
            return;
        };

        match fs::read_to_string(path) {
            Ok(text) => self.lines = text.lines().map(str::to_string).collect(),
            Err(e) => {
                tracing::warn!("Failed to read document {}: {}", path.display(), e);
                self.lines.clear();
            }
        }
    }

    #[cfg(test)]
    pub fn preview(&self) -> Option<&[String]> {
        self.preview.as_ref().map(|(_, lines)| lines.as_slice())
    }

    pub fn marks(&self) -> &[HighlightMark] {
        &self.marks
    }

    /// Document lines with marked words in brackets
    pub fn render_marked(&self) -> Vec<String> {
        let mut rendered = Vec::with_capacity(self.lines.len());

        for (idx, line) in self.lines.iter().enumerate() {
            let mut out = String::with_capacity(line.len() + 8);
            let mut last = 0;
            for mark in self.marks.iter().filter(|m| m.line == idx) {
                // Skip overlaps between different words and stale columns
                if mark.start_col < last || mark.end_col > line.len() {
                    continue;
                }
                out.push_str(&line[last..mark.start_col]);
                out.push('[');
                out.push_str(&line[mark.start_col..mark.end_col]);
                out.push(']');
                last = mark.end_col;
            }
            out.push_str(&line[last..]);
            rendered.push(out);
        }

        rendered
    }

    pub fn print(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }

    fn draw(&mut self, lines: &[String], size: PreviewSize) {
        let border = format!("+{}+", "-".repeat(size.width + 2));
        let mut frame = vec![border.clone()];
        for line in lines.iter().take(size.height) {
            let pad = size.width.saturating_sub(line.chars().count());
            frame.push(format!("| {line}{} |", " ".repeat(pad)));
        }
        frame.push(border);

        self.print(&frame.join("\n"));
    }
}

impl TextSurface for TerminalSurface {
    fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn open_preview(&mut self, lines: &[String], size: PreviewSize) -> SurfaceId {
        let id = SurfaceId::new();
        self.preview = Some((id, lines.to_vec()));
        self.draw(lines, size);
        id
    }

    fn update_preview(&mut self, id: SurfaceId, lines: &[String], size: PreviewSize) {
        match &mut self.preview {
            Some((current, content)) if *current == id => *content = lines.to_vec(),
            _ => {
                tracing::warn!("Update for unknown preview {}", id);
                return;
            }
        }
        self.draw(lines, size);
    }

    fn focus_preview(&mut self, id: SurfaceId) {
        let lines = match &self.preview {
            Some((current, lines)) if *current == id => lines.clone(),
            _ => return,
        };
        self.print(&lines.join("\n"));
    }

    fn close_preview(&mut self, id: SurfaceId) {
        if matches!(&self.preview, Some((current, _)) if *current == id) {
            self.preview = None;
        }
    }

    fn apply_marks(&mut self, marks: &[HighlightMark]) {
        self.marks.extend_from_slice(marks);
    }

    fn clear_marks(&mut self) {
        self.marks.clear();
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => self.print(message),
            NoticeLevel::Warn => eprintln!("warning: {message}"),
            NoticeLevel::Error => eprintln!("error: {message}"),
        }
    }
}
