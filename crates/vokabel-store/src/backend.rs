use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Persistence port for the vocabulary file
pub trait VocabBackend: Send {
    /// Full file contents, `None` if nothing has been persisted yet
    fn read_all(&self) -> io::Result<Option<String>>;

    /// Replace the persisted contents
    fn write_all(&self, contents: &str) -> io::Result<()>;
}

/// Vocabulary file on disk, replaced by temp file + rename on every write
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VocabBackend for FileBackend {
    fn read_all(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io::Error::new(
                e.kind(),
                format!("{}: {}", self.path.display(), e),
            )),
        }
    }

    fn write_all(&self, contents: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}

/// In-memory backend; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        let backend = Self::default();
        backend.lock().contents = Some(contents.into());
        backend
    }

    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Number of `write_all` calls so far
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned buffer is still a valid string
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl VocabBackend for MemoryBackend {
    fn read_all(&self) -> io::Result<Option<String>> {
        Ok(self.contents())
    }

    fn write_all(&self, contents: &str) -> io::Result<()> {
        let mut state = self.lock();
        state.contents = Some(contents.to_string());
        state.writes += 1;
        Ok(())
    }
}
