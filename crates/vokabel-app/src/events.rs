use kanal::AsyncReceiver;
use vokabel_core::{Completion, Session};
use vokabel_types::AppEvent;

use crate::terminal::TerminalSurface;

/// App's main loop.
///
/// Runs until `Quit` or the event channel closes, then keeps handling
/// completions until no request is in flight.
pub async fn event_loop(
    mut session: Session<TerminalSurface>,
    events_rx: AsyncReceiver<AppEvent>,
    completions_rx: AsyncReceiver<Completion>,
) -> anyhow::Result<Session<TerminalSurface>> {
    session.refresh_highlights();

    let mut quitting = false;
    loop {
        if quitting && session.is_idle() {
            break;
        }

        tokio::select! {
            event = events_rx.recv(), if !quitting => match event {
                Ok(AppEvent::Quit) => {
                    let pending = session.pending_count();
                    tracing::debug!("Quit requested, {} lookups pending", pending);
                    quitting = true;
                }
                Ok(event) => handle_event(&mut session, event),
                Err(_) => {
                    tracing::debug!("Event channel closed");
                    quitting = true;
                }
            },
            completion = completions_rx.recv() => {
                session.handle_completion(completion?);
            }
        }
    }

    session.close_preview();
    Ok(session)
}

fn handle_event(session: &mut Session<TerminalSurface>, event: AppEvent) {
    tracing::debug!("Handling {:?}", event);
    match event {
        AppEvent::Lookup { word, line } => session.lookup_at(&word, line),
        AppEvent::Clear(word) => session.clear(&word),
        AppEvent::TranslateSelection(text) => session.translate_selection(&text),
        AppEvent::AddNote { file, line, text } => session.add_note(&file, line, &text),
        AppEvent::NavigatedAway => session.navigated_away(),
        AppEvent::ContentChanged => {
            session.host_mut().reload();
            session.content_changed();
        }
        AppEvent::ShowMarks => {
            tracing::debug!("Rendering {} marks", session.host().marks().len());
            let rendered = session.host().render_marked();
            let host = session.host_mut();
            for line in rendered {
                host.print(&line);
            }
        }
        AppEvent::ListVocabulary => {
            let rows: Vec<String> = session
                .store()
                .records()
                .into_iter()
                .map(|r| format!("{}\t{}", r.front, r.back))
                .collect();
            let host = session.host_mut();
            if rows.is_empty() {
                host.print("(no vocabulary yet)");
            }
            for row in rows {
                host.print(&row);
            }
        }
        AppEvent::Quit => {}
    }
}
