use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::error;

use crate::app::App;
use crate::transcript::Turn;
use crate::tui::{AppEvent, EventSender};

/// Reply shown for any failed round trip, whatever the cause.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

pub fn handle_event(app: &mut App, event: AppEvent, events: &EventSender) {
    match event {
        AppEvent::Key(key) => handle_key(app, key, events),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Reply { seq, result } => apply_reply(app, seq, result),
    }
}

fn handle_key(app: &mut App, key: KeyEvent, events: &EventSender) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => submit_message(app, events),
        KeyCode::Backspace => app.composer.backspace(),
        KeyCode::Delete => app.composer.delete(),
        KeyCode::Left => app.composer.move_left(),
        KeyCode::Right => app.composer.move_right(),
        KeyCode::Home => app.composer.move_home(),
        KeyCode::End => app.composer.move_end(),
        KeyCode::Up => app.transcript.scroll_up(1),
        KeyCode::Down => app.transcript.scroll_down(1),
        KeyCode::PageUp => {
            let half = app.transcript.half_page();
            app.transcript.scroll_up(half);
        }
        KeyCode::PageDown => {
            let half = app.transcript.half_page();
            app.transcript.scroll_down(half);
        }
        KeyCode::Char(c) => app.composer.insert(c),
        _ => {}
    }
}

/// Submit the composer contents as a question to the shop backend.
///
/// Blank input (after trimming) is a complete no-op. Otherwise the user's
/// turn is echoed into the transcript and the composer cleared before the
/// request goes out; the context snapshot is taken after the echo so it
/// includes the question being asked. Nothing guards against overlap: a
/// second submission may be issued while the first is still in flight, and
/// each round trip reports back through the event queue when it finishes.
pub fn submit_message(app: &mut App, events: &EventSender) {
    let question = app.composer.text().trim().to_string();
    if question.is_empty() {
        return;
    }

    app.transcript.push(Turn::user(question.clone()));
    app.composer.clear();
    app.typing.show();
    app.transcript.scroll_to_bottom(app.typing.is_visible());

    let context = app.transcript.text();
    let seq = app.next_seq();
    let client = app.client.clone();
    let events = events.clone();
    tokio::spawn(async move {
        let result = client.ask(&question, &context).await;
        let _ = events.send(AppEvent::Reply { seq, result });
    });
}

/// Resolve one round trip. Runs on the event-loop task, in completion
/// order; when round trips overlap, the earliest completion hides the
/// indicator even though another request is still pending.
pub fn apply_reply(app: &mut App, seq: u64, result: Result<String>) {
    app.typing.hide();
    match result {
        Ok(response) => {
            app.transcript.push(Turn::bot(response));
            app.transcript.scroll_to_bottom(app.typing.is_visible());
        }
        Err(err) => {
            error!("chat request #{seq} failed: {err:#}");
            app.transcript.push(Turn::bot(FALLBACK_REPLY));
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.transcript.scroll_down(3),
        MouseEventKind::ScrollUp => app.transcript.scroll_up(3),
        _ => {}
    }
}
