use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use vokabel_core::Completion;
use vokabel_types::AppEvent;

use crate::io::watcher_input;

/// Centralized channel management
pub struct ChannelSet {
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub completions: (AsyncSender<Completion>, AsyncReceiver<Completion>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(64),      // user commands
            completions: kanal::bounded_async(16), // enrichment replies
        }
    }
}

/// Owns the channels and the lifecycle of background tasks
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn event_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.events.0.clone()
    }

    pub fn event_receiver(&self) -> AsyncReceiver<AppEvent> {
        self.channels.events.1.clone()
    }

    pub fn completion_sender(&self) -> AsyncSender<Completion> {
        self.channels.completions.0.clone()
    }

    pub fn completion_receiver(&self) -> AsyncReceiver<Completion> {
        self.channels.completions.1.clone()
    }

    /// Read interactive commands from stdin
    pub fn spawn_input(&self) -> JoinHandle<anyhow::Result<()>> {
        tokio::spawn(watcher_input(
            tokio::io::stdin(),
            self.cancel_token.child_token(),
            self.event_sender(),
        ))
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
