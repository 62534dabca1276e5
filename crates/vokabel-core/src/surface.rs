use vokabel_types::{HighlightMark, NoticeLevel, PreviewSize, SurfaceId};

/// Host text surface the session renders into
pub trait TextSurface {
    /// Current document lines
    fn lines(&self) -> Vec<String>;

    /// Open a floating preview and return its identity
    fn open_preview(&mut self, lines: &[String], size: PreviewSize) -> SurfaceId;

    /// Replace the content of an open preview
    fn update_preview(&mut self, id: SurfaceId, lines: &[String], size: PreviewSize);

    fn focus_preview(&mut self, id: SurfaceId);

    fn close_preview(&mut self, id: SurfaceId);

    /// Annotate every range with the vocabulary highlight style
    fn apply_marks(&mut self, marks: &[HighlightMark]);

    /// Remove all vocabulary annotations from the document
    fn clear_marks(&mut self);

    /// User-visible notification
    fn notify(&mut self, level: NoticeLevel, message: &str);
}
