use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vokabel_types::AppEvent;

#[derive(Debug, Parser)]
#[command(name = "vokabel")]
#[command(about = "Vocabulary lookups with LLM enrichment and document highlighting")]
#[command(version)]
pub struct Cli {
    /// JSON config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Vocabulary file, overriding the configured path
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Keep the vocabulary in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a word, enriching it if unknown
    Lookup {
        word: String,
        /// Document the word was read in
        #[arg(long)]
        document: Option<PathBuf>,
        /// 1-based line of the word in the document
        #[arg(long, requires = "document")]
        line: Option<usize>,
    },
    /// Forget a word
    Clear { word: String },
    /// List the vocabulary
    List,
    /// Translate free text without storing it
    Translate {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Append a positional note
    Note {
        file: String,
        line: usize,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print a document with known words marked
    Highlight { document: PathBuf },
    /// Interactive commands on stdin
    Session {
        #[arg(long)]
        document: Option<PathBuf>,
    },
}

impl Command {
    pub fn document(&self) -> Option<PathBuf> {
        match self {
            Self::Lookup { document, .. } | Self::Session { document } => document.clone(),
            Self::Highlight { document } => Some(document.clone()),
            _ => None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Session { .. })
    }

    /// Events for a one-shot command, ending in `Quit`
    pub fn into_events(self) -> Vec<AppEvent> {
        let mut events = match self {
            Self::Lookup { word, line, .. } => vec![AppEvent::Lookup {
                word,
                line: line.map(|l| l.saturating_sub(1)),
            }],
            Self::Clear { word } => vec![AppEvent::Clear(word)],
            Self::List => vec![AppEvent::ListVocabulary],
            Self::Translate { text } => vec![AppEvent::TranslateSelection(text.join(" "))],
            Self::Note { file, line, text } => vec![AppEvent::AddNote {
                file,
                line,
                text: text.join(" "),
            }],
            Self::Highlight { .. } => vec![AppEvent::ShowMarks],
            Self::Session { .. } => Vec::new(),
        };
        events.push(AppEvent::Quit);
        events
    }
}
