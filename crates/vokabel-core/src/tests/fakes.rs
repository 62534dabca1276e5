use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use kanal::AsyncReceiver;
use tokio::time::timeout;
use vokabel_config::Config;
use vokabel_store::{Store, VocabBackend};
use vokabel_translator::{Enricher, Enrichment, EnrichmentError, ProviderMetadata, StatusCode};
use vokabel_types::{HighlightMark, NoticeLevel, PreviewSize, SurfaceId};

use crate::session::{Completion, Session};
use crate::surface::TextSurface;

/// Host that records every call
#[derive(Default)]
pub struct RecordingSurface {
    pub document: Vec<String>,
    pub open: HashMap<SurfaceId, Vec<String>>,
    pub last_size: Option<PreviewSize>,
    pub opened: usize,
    pub updated: usize,
    pub focused: usize,
    pub closed: usize,
    pub marks: Vec<HighlightMark>,
    pub mark_clears: usize,
    pub notices: Vec<(NoticeLevel, String)>,
}

impl RecordingSurface {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            document: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Content of the only open preview
    pub fn preview(&self) -> Option<&Vec<String>> {
        assert!(self.open.len() <= 1, "more than one preview open");
        self.open.values().next()
    }
}

impl TextSurface for RecordingSurface {
    fn lines(&self) -> Vec<String> {
        self.document.clone()
    }

    fn open_preview(&mut self, lines: &[String], size: PreviewSize) -> SurfaceId {
        let id = SurfaceId::new();
        self.open.insert(id, lines.to_vec());
        self.last_size = Some(size);
        self.opened += 1;
        id
    }

    fn update_preview(&mut self, id: SurfaceId, lines: &[String], size: PreviewSize) {
        let content = self.open.get_mut(&id).expect("update of a closed preview");
        *content = lines.to_vec();
        self.last_size = Some(size);
        self.updated += 1;
    }

    fn focus_preview(&mut self, id: SurfaceId) {
        assert!(self.open.contains_key(&id), "focus of a closed preview");
        self.focused += 1;
    }

    fn close_preview(&mut self, id: SurfaceId) {
        assert!(self.open.remove(&id).is_some(), "close of a closed preview");
        self.closed += 1;
    }

    fn apply_marks(&mut self, marks: &[HighlightMark]) {
        self.marks.extend_from_slice(marks);
    }

    fn clear_marks(&mut self) {
        self.marks.clear();
        self.mark_clears += 1;
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}

/// Backend that reads `contents` but refuses every write
#[derive(Default)]
pub struct ReadOnlyBackend {
    pub contents: Option<String>,
}

impl ReadOnlyBackend {
    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: Some(contents.to_string()),
        }
    }
}

impl VocabBackend for ReadOnlyBackend {
    fn read_all(&self) -> io::Result<Option<String>> {
        Ok(self.contents.clone())
    }

    fn write_all(&self, _contents: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"))
    }
}

/// Enricher answering from a fixed table
pub struct FakeEnricher {
    configured: bool,
    replies: HashMap<String, (String, String)>,
    /// Every enrich call fails with this status when set
    status: Option<StatusCode>,
    pub calls: AtomicUsize,
}

impl FakeEnricher {
    pub fn new(replies: &[(&str, &str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            replies: replies
                .iter()
                .map(|(w, t, n)| (w.to_string(), (t.to_string(), n.to_string())))
                .collect(),
            status: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            configured: false,
            replies: HashMap::new(),
            status: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn rejecting(status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            replies: HashMap::new(),
            status: Some(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Enricher for FakeEnricher {
    async fn enrich(&self, word: &str, _context: &str) -> Result<Enrichment, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.status {
            return Err(EnrichmentError::HttpStatus {
                status,
                snippet: "upstream unavailable".to_string(),
            });
        }
        match self.replies.get(word) {
            Some((translation, notes)) => Ok(Enrichment {
                translation: translation.clone(),
                notes: notes.clone(),
            }),
            None => Err(EnrichmentError::Parse {
                reason: "expected value".to_string(),
                raw: "I don't know".to_string(),
            }),
        }
    }

    async fn translate(&self, text: &str) -> Result<String, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("EN: {text}"))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            model: "fake".to_string(),
            requires_api_key: false,
        }
    }
}

pub fn test_config(notes_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.notes.path = notes_dir.join("notes.jsonl");
    config
}

pub fn session(
    config: &Config,
    host: RecordingSurface,
    store: Store,
    enricher: Arc<FakeEnricher>,
) -> (Session<RecordingSurface>, AsyncReceiver<Completion>) {
    let (tx, rx) = kanal::unbounded_async();
    (Session::new(config, host, store, enricher, tx), rx)
}

pub async fn next_completion(rx: &AsyncReceiver<Completion>) -> Completion {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("completion timed out")
        .expect("channel closed")
}

/// Asserts nothing else arrives shortly
pub async fn assert_no_completion(rx: &AsyncReceiver<Completion>) {
    let extra = timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(extra.is_err(), "unexpected completion: {extra:?}");
}
