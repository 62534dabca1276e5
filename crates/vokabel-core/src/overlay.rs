//! Single preview surface and its state machine.

use vokabel_config::ui::UiConfig;
use vokabel_types::{PreviewSize, SurfaceId};

use crate::surface::TextSurface;

/// What a preview is about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// Normalized vocabulary word
    Word(String),
    /// Free-form selected text
    Selection(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    ShowingCached(Subject),
    Loading(Subject),
    ShowingFresh(Subject),
}

impl OverlayState {
    pub fn subject(&self) -> Option<&Subject> {
        match self {
            Self::Closed => None,
            Self::ShowingCached(s) | Self::Loading(s) | Self::ShowingFresh(s) => Some(s),
        }
    }
}

/// Owns at most one preview surface on the host
pub struct OverlayController {
    state: OverlayState,
    surface: Option<SurfaceId>,
    /// Single-shot dismissal on navigation away, armed on open
    dismiss_armed: bool,
    min_width: usize,
    max_width: usize,
    max_height: usize,
}

impl OverlayController {
    pub fn new(ui: &UiConfig) -> Self {
        let min_width = ui.min_width.max(1);
        Self {
            state: OverlayState::Closed,
            surface: None,
            dismiss_armed: false,
            min_width,
            max_width: ui.max_width.max(min_width),
            max_height: ui.max_height.max(1),
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn is_open(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_dismiss_armed(&self) -> bool {
        self.dismiss_armed
    }

    pub fn show_cached<S: TextSurface>(
        &mut self,
        host: &mut S,
        subject: Subject,
        lines: &[String],
    ) -> SurfaceId {
        self.present(host, OverlayState::ShowingCached(subject), lines)
    }

    pub fn show_loading<S: TextSurface>(
        &mut self,
        host: &mut S,
        subject: Subject,
        lines: &[String],
    ) -> SurfaceId {
        self.present(host, OverlayState::Loading(subject), lines)
    }

    /// Show `next` on the one surface: open it, focus it, or replace its content
    fn present<S: TextSurface>(
        &mut self,
        host: &mut S,
        next: OverlayState,
        lines: &[String],
    ) -> SurfaceId {
        let size = self.preview_size(lines);

        let Some(id) = self.surface else {
            let id = host.open_preview(lines, size);
            tracing::debug!("Opened preview {} for {:?}", id, next.subject());
            self.surface = Some(id);
            self.dismiss_armed = true;
            self.state = next;
            return id;
        };

        if self.state == next {
            host.focus_preview(id);
            return id;
        }

        let same_subject = self.state.subject() == next.subject();
        host.update_preview(id, lines, size);
        if same_subject {
            host.focus_preview(id);
        }
        self.state = next;
        id
    }

    /// Whether `surface` is still showing the loading placeholder for `subject`
    pub fn awaits(&self, subject: &Subject, surface: SurfaceId) -> bool {
        self.surface == Some(surface)
            && matches!(&self.state, OverlayState::Loading(s) if s == subject)
    }

    /// Replace the placeholder with arrived content. Returns `false` and
    /// leaves the host untouched if the surface moved on or was closed.
    pub fn resolve<S: TextSurface>(
        &mut self,
        host: &mut S,
        subject: &Subject,
        surface: SurfaceId,
        lines: &[String],
    ) -> bool {
        if !self.awaits(subject, surface) {
            return false;
        }

        host.update_preview(surface, lines, self.preview_size(lines));
        self.state = OverlayState::ShowingFresh(subject.clone());
        true
    }

    /// Navigation-away signal. Fires once per open surface.
    pub fn navigated_away<S: TextSurface>(&mut self, host: &mut S) -> bool {
        if !self.dismiss_armed {
            return false;
        }
        self.dismiss_armed = false;
        self.close(host)
    }

    pub fn close<S: TextSurface>(&mut self, host: &mut S) -> bool {
        let Some(id) = self.surface.take() else {
            return false;
        };
        host.close_preview(id);
        tracing::debug!("Closed preview {}", id);
        self.state = OverlayState::Closed;
        self.dismiss_armed = false;
        true
    }

    pub fn preview_size(&self, lines: &[String]) -> PreviewSize {
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = widest.clamp(self.min_width, self.max_width);
        let height: usize = lines
            .iter()
            .map(|l| l.chars().count().div_ceil(width).max(1))
            .sum();

        PreviewSize {
            width,
            height: height.clamp(1, self.max_height),
        }
    }
}
