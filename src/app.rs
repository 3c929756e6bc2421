use crate::client::ChatClient;
use crate::transcript::Transcript;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line message input with a character-indexed cursor.
#[derive(Debug, Default)]
pub struct Composer {
    text: String,
    cursor: usize, // cursor position in chars
}

impl Composer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.text.chars().count();
        if self.cursor < char_count {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let char_count = self.text.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }
}

/// The "assistant is typing" affordance. A plain boolean: every submission
/// shows it, every completion hides it, overlapping round trips included.
#[derive(Debug, Default)]
pub struct TypingIndicator {
    visible: bool,
    frame: u8, // 0-2 for ellipsis animation
}

impl TypingIndicator {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Advance the ellipsis animation (driven by Tick events)
    pub fn tick(&mut self) {
        if self.visible {
            self.frame = (self.frame + 1) % 3;
        }
    }

    pub fn dots(&self) -> String {
        ".".repeat(self.frame as usize + 1)
    }
}

/// Everything the chat screen owns. The handler receives this plus an event
/// sender, so the three UI surfaces it touches (composer, transcript,
/// indicator) are injected state rather than globals.
pub struct App {
    pub should_quit: bool,
    pub transcript: Transcript,
    pub composer: Composer,
    pub typing: TypingIndicator,
    pub client: ChatClient,
    next_seq: u64,
}

impl App {
    pub fn new(client: ChatClient) -> Self {
        Self {
            should_quit: false,
            transcript: Transcript::new(),
            composer: Composer::default(),
            typing: TypingIndicator::default(),
            client,
            next_seq: 0,
        }
    }

    /// Sequence number for the next submission. Used in diagnostics only;
    /// completions are applied in whatever order they arrive.
    pub fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        self.typing.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composer_edits_at_the_cursor() {
        let mut composer = Composer::default();
        for c in "helo".chars() {
            composer.insert(c);
        }
        composer.move_left();
        composer.insert('l');
        assert_eq!(composer.text(), "hello");

        composer.move_home();
        composer.delete();
        assert_eq!(composer.text(), "ello");

        composer.move_end();
        composer.backspace();
        assert_eq!(composer.text(), "ell");
    }

    #[test]
    fn composer_handles_multibyte_characters() {
        let mut composer = Composer::default();
        for c in "héllo".chars() {
            composer.insert(c);
        }
        assert_eq!(composer.cursor(), 5);

        composer.move_left();
        composer.move_left();
        composer.move_left();
        composer.move_left();
        composer.backspace();
        assert_eq!(composer.text(), "éllo");
    }

    #[test]
    fn indicator_animates_only_while_visible() {
        let mut typing = TypingIndicator::default();
        typing.tick();
        assert_eq!(typing.dots(), ".");

        typing.show();
        typing.tick();
        assert_eq!(typing.dots(), "..");
        typing.tick();
        assert_eq!(typing.dots(), "...");
        typing.tick();
        assert_eq!(typing.dots(), ".");
    }

    #[test]
    fn sequence_numbers_increase() {
        let mut app = App::new(ChatClient::new("http://localhost:8080"));
        assert_eq!(app.next_seq(), 1);
        assert_eq!(app.next_seq(), 2);
    }
}
