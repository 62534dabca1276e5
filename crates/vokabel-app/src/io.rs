use kanal::AsyncSender;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::sync::CancellationToken;
use vokabel_types::AppEvent;

const COMMANDS: &str = "lookup, clear, translate, note, leave, reload, marks, list, quit";

/// Parse one interactive command. Line numbers are 1-based for the user.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "lookup" | "l" => {
            let mut parts = rest.split_whitespace();
            let word = parts.next()?.to_string();
            let line = match parts.next() {
                Some(n) => Some(n.parse::<usize>().ok()?.saturating_sub(1)),
                None => None,
            };
            Some(AppEvent::Lookup { word, line })
        }
        "clear" | "c" if !rest.is_empty() => Some(AppEvent::Clear(rest.to_string())),
        "translate" | "t" if !rest.is_empty() => {
            Some(AppEvent::TranslateSelection(rest.to_string()))
        }
        "note" | "n" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let file = parts.next().filter(|f| !f.is_empty())?.to_string();
            let line = parts.next()?.parse::<usize>().ok()?;
            let text = parts.next().unwrap_or_default().trim().to_string();
            Some(AppEvent::AddNote { file, line, text })
        }
        "leave" => Some(AppEvent::NavigatedAway),
        "reload" => Some(AppEvent::ContentChanged),
        "marks" => Some(AppEvent::ShowMarks),
        "list" => Some(AppEvent::ListVocabulary),
        "quit" | "q" | "exit" => Some(AppEvent::Quit),
        _ => None,
    }
}

/// Forward parsed commands from `input` until EOF or cancellation
pub async fn watcher_input<R>(
    input: R,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = cancel.cancelled() => {
                tracing::info!("Input watcher stopping");
                return Ok(());
            }
        };

        let Some(line) = line else {
            tracing::debug!("Input closed");
            event_tx.send(AppEvent::Quit).await?;
            return Ok(());
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Some(event) => {
                let quit = matches!(event, AppEvent::Quit);
                event_tx.send(event).await?;
                if quit {
                    return Ok(());
                }
            }
            None => eprintln!("unknown command: {} ({COMMANDS})", line.trim()),
        }
    }
}
