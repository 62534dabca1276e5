//! Per-action orchestration of store, enrichment, highlights and preview.
//!
//! A `Session` lives on one task. Enrichment runs in spawned tasks that
//! report back through the completion channel; `handle_completion` applies
//! the result on the session's task.

use std::collections::HashMap;
use std::sync::Arc;

use kanal::AsyncSender;
use vokabel_config::Config;
use vokabel_highlight::{compute_marks, emphasize};
use vokabel_store::Store;
use vokabel_store::format::{NEWLINE_ESCAPE, escape_field};
use vokabel_translator::{Enricher, Enrichment, EnrichmentError};
use vokabel_types::{HighlightMark, NoticeLevel, SurfaceId, VocabRecord, normalize_word};

use crate::notes::{NoteEntry, NoteLog};
use crate::overlay::{OverlayController, Subject};
use crate::surface::TextSurface;

/// Result of out-of-line work, delivered back to the session
#[derive(Debug)]
pub enum Completion {
    Enrichment {
        word: String,
        result: Result<Enrichment, EnrichmentError>,
    },
    Translation {
        text: String,
        surface: SurfaceId,
        result: Result<String, EnrichmentError>,
    },
}

/// An in-flight enrichment request
#[derive(Debug, Clone)]
pub struct PendingLookup {
    pub word: String,
    pub context: String,
    /// Surface waiting for the result, if any
    pub surface: Option<SurfaceId>,
}

/// Lines `line - radius ..= line + radius`, clamped to the document
pub fn context_around<L: AsRef<str>>(lines: &[L], line: usize, radius: usize) -> String {
    if lines.is_empty() {
        return String::new();
    }

    let line = line.min(lines.len() - 1);
    let first = line.saturating_sub(radius);
    let last = (line + radius).min(lines.len() - 1);

    lines[first..=last]
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct Session<S: TextSurface> {
    host: S,
    store: Store,
    enricher: Arc<dyn Enricher>,
    overlay: OverlayController,
    notes: NoteLog,
    pending: HashMap<String, PendingLookup>,
    completions: AsyncSender<Completion>,
    translations_in_flight: usize,
    marks: Vec<HighlightMark>,
    emphasize_context: bool,
    context_radius: usize,
}

impl<S: TextSurface> Session<S> {
    pub fn new(
        config: &Config,
        host: S,
        store: Store,
        enricher: Arc<dyn Enricher>,
        completions: AsyncSender<Completion>,
    ) -> Self {
        Self {
            host,
            store,
            enricher,
            overlay: OverlayController::new(&config.ui),
            notes: NoteLog::new(&config.notes.path),
            pending: HashMap::new(),
            completions,
            translations_in_flight: 0,
            marks: Vec::new(),
            emphasize_context: config.store.emphasize_context,
            context_radius: config.ui.context_radius,
        }
    }

    pub fn host(&self) -> &S {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut S {
        &mut self.host
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn marks(&self) -> &[HighlightMark] {
        &self.marks
    }

    pub fn is_pending(&self, word: &str) -> bool {
        self.pending.contains_key(&normalize_word(word))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// No enrichment or translation is still running
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.translations_in_flight == 0
    }

    /// Lookup with context taken from the host lines around `line`
    pub fn lookup_at(&mut self, word: &str, line: Option<usize>) {
        let context = match line {
            Some(line) => context_around(&self.host.lines(), line, self.context_radius),
            None => String::new(),
        };
        self.lookup(word, &context);
    }

    /// Primary lookup: cached records show at once, unknown words are enriched
    pub fn lookup(&mut self, word: &str, context: &str) {
        let word = normalize_word(word);
        if word.is_empty() {
            self.host.notify(NoticeLevel::Warn, "No word to look up");
            return;
        }

        if let Some(record) = self.store.get(&word) {
            tracing::debug!("Cache hit for '{}'", word);
            let lines = record_lines(&record.back, &record.notes);
            self.overlay.show_cached(&mut self.host, Subject::Word(word), &lines);
            return;
        }

        if self.pending.contains_key(&word) {
            tracing::debug!("Joining in-flight lookup for '{}'", word);
            let id = self.overlay.show_loading(
                &mut self.host,
                Subject::Word(word.clone()),
                &loading_lines(&word),
            );
            if let Some(pending) = self.pending.get_mut(&word) {
                pending.surface = Some(id);
            }
            return;
        }

        if !self.enricher.is_configured() {
            self.report(&EnrichmentError::NotConfigured);
            return;
        }

        let id = self.overlay.show_loading(
            &mut self.host,
            Subject::Word(word.clone()),
            &loading_lines(&word),
        );
        self.pending.insert(
            word.clone(),
            PendingLookup {
                word: word.clone(),
                context: context.to_string(),
                surface: Some(id),
            },
        );

        tracing::info!("Enriching '{}'", word);
        let enricher = Arc::clone(&self.enricher);
        let tx = self.completions.clone();
        let context = context.to_string();
        tokio::spawn(async move {
            let result = enricher.enrich(&word, &context).await;
            if tx.send(Completion::Enrichment { word, result }).await.is_err() {
                tracing::warn!("Session gone, dropping enrichment result");
            }
        });
    }

    /// Forget a word. Unknown words are a silent no-op.
    pub fn clear(&mut self, word: &str) {
        match self.store.remove(word) {
            Ok(true) => {
                tracing::info!("Cleared '{}'", normalize_word(word));
                self.refresh_highlights();
            }
            Ok(false) => {}
            Err(e) => {
                // Removed in memory, not on disk
                tracing::error!("Failed to persist removal: {}", e);
                self.host.notify(NoticeLevel::Error, &e.to_string());
                self.refresh_highlights();
            }
        }
    }

    /// Translate free-form text without touching the vocabulary
    pub fn translate_selection(&mut self, text: &str) {
        let text = text.trim().to_string();
        if text.is_empty() {
            self.host.notify(NoticeLevel::Warn, "Nothing selected to translate");
            return;
        }

        if !self.enricher.is_configured() {
            self.report(&EnrichmentError::NotConfigured);
            return;
        }

        let surface = self.overlay.show_loading(
            &mut self.host,
            Subject::Selection(text.clone()),
            &["Translating...".to_string()],
        );

        self.translations_in_flight += 1;
        let enricher = Arc::clone(&self.enricher);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = enricher.translate(&text).await;
            let completion = Completion::Translation {
                text,
                surface,
                result,
            };
            if tx.send(completion).await.is_err() {
                tracing::warn!("Session gone, dropping translation result");
            }
        });
    }

    pub fn add_note(&mut self, file: &str, line: usize, text: &str) {
        let entry = NoteEntry {
            file: file.to_string(),
            line,
            text: text.to_string(),
        };

        match self.notes.append(&entry) {
            Ok(()) => self.host.notify(NoticeLevel::Info, "Note saved"),
            Err(e) => {
                tracing::error!("Failed to append note: {}", e);
                self.host.notify(NoticeLevel::Error, &e.to_string());
            }
        }
    }

    pub fn navigated_away(&mut self) {
        self.overlay.navigated_away(&mut self.host);
    }

    pub fn content_changed(&mut self) {
        self.refresh_highlights();
    }

    /// Close any preview, e.g. on shutdown
    pub fn close_preview(&mut self) {
        self.overlay.close(&mut self.host);
    }

    /// Full recompute: clear every mark, then apply the new set
    pub fn refresh_highlights(&mut self) {
        let lines = self.host.lines();
        let marks = compute_marks(&lines, &self.store.keys());
        tracing::debug!("Highlighting {} occurrences", marks.len());

        self.host.clear_marks();
        self.host.apply_marks(&marks);
        self.marks = marks;
    }

    pub fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Enrichment { word, result } => self.finish_enrichment(word, result),
            Completion::Translation {
                text,
                surface,
                result,
            } => self.finish_translation(text, surface, result),
        }
    }

    fn finish_enrichment(&mut self, word: String, result: Result<Enrichment, EnrichmentError>) {
        let Some(pending) = self.pending.remove(&word) else {
            tracing::warn!("Enrichment for '{}' has no pending lookup, ignoring", word);
            return;
        };
        let subject = Subject::Word(word.clone());

        let enrichment = match result {
            Ok(enrichment) => enrichment,
            Err(e) => {
                self.report(&e);
                if let Some(surface) = pending.surface {
                    let lines = vec![format!("Lookup failed: {e}")];
                    self.overlay.resolve(&mut self.host, &subject, surface, &lines);
                }
                return;
            }
        };

        let context = if self.emphasize_context {
            emphasize(&pending.context, &word, "<b>", "</b>")
        } else {
            pending.context.clone()
        };

        let Some(record) = VocabRecord::new(
            &word,
            escape_field(&enrichment.translation),
            escape_field(&enrichment.notes),
            escape_field(&context),
        ) else {
            return;
        };

        let lines = record_lines(&record.back, &record.notes);
        if let Err(e) = self.store.put(record) {
            tracing::error!("Failed to persist '{}': {}", word, e);
            self.host.notify(NoticeLevel::Error, &e.to_string());
        }
        self.refresh_highlights();

        match pending.surface {
            Some(surface) if self.overlay.resolve(&mut self.host, &subject, surface, &lines) => {
                tracing::debug!("Preview updated for '{}'", word);
            }
            _ => tracing::debug!("Preview for '{}' no longer open, stored silently", word),
        }
    }

    fn finish_translation(
        &mut self,
        text: String,
        surface: SurfaceId,
        result: Result<String, EnrichmentError>,
    ) {
        self.translations_in_flight = self.translations_in_flight.saturating_sub(1);
        let subject = Subject::Selection(text);
        let lines = match result {
            Ok(translation) => translation.lines().map(str::to_string).collect(),
            Err(e) => {
                self.report(&e);
                vec![format!("Translation failed: {e}")]
            }
        };

        self.overlay.resolve(&mut self.host, &subject, surface, &lines);
    }

    fn report(&mut self, error: &EnrichmentError) {
        let message = if error.is_config() {
            format!("Configuration error: {error}")
        } else if error.is_transport() {
            format!("Lookup request failed: {error}")
        } else {
            format!("Could not read lookup reply: {error}")
        };

        tracing::error!("{}", message);
        self.host.notify(NoticeLevel::Error, &message);
    }
}

fn loading_lines(word: &str) -> Vec<String> {
    vec![format!("Looking up '{word}'...")]
}

/// Preview lines for a translation and its notes
fn record_lines(back: &str, notes: &str) -> Vec<String> {
    let mut lines: Vec<String> = back.split(NEWLINE_ESCAPE).map(str::to_string).collect();
    if !notes.is_empty() {
        lines.push(String::new());
        lines.extend(notes.split(NEWLINE_ESCAPE).map(str::to_string));
    }
    lines
}
