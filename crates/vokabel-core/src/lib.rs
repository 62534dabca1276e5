pub mod notes;
pub mod overlay;
pub mod session;
pub mod surface;

#[cfg(test)]
mod tests;

pub use notes::{NoteEntry, NoteError, NoteLog};
pub use overlay::{OverlayController, OverlayState, Subject};
pub use session::{Completion, PendingLookup, Session, context_around};
pub use surface::TextSurface;
