//! Conversation transcript: the append-only log of turns shown in the chat
//! pane, plus the view state needed to keep it scrolled into place.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// Label line shown above each turn. Part of the plain-text snapshot too.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You:",
            Role::Bot => "Bot:",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    pub scroll: u16,
    pub view_height: u16, // Height of chat area for scroll calculations
    pub view_width: u16,  // Width of chat area for wrap calculations
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns are only ever appended; nothing reorders or removes them.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Plain-text snapshot of the visible conversation, role labels included.
    /// This is the context string sent to the backend with each question.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str(turn.role.label());
            out.push('\n');
            out.push_str(&turn.content);
            out.push('\n');
            out.push('\n');
        }
        out
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn half_page(&self) -> u16 {
        (self.view_height / 2).max(1)
    }

    /// Scroll so the newest turn (and the typing indicator, when shown) is
    /// visible.
    pub fn scroll_to_bottom(&mut self, indicator_visible: bool) {
        let total_lines = self.wrapped_line_count(indicator_visible);

        let visible_height = if self.view_height > 0 {
            self.view_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.scroll = total_lines.saturating_sub(visible_height);
        }
    }

    /// Estimate of the display line count after word wrap. Mirrors how the
    /// chat pane lays out each turn: a role line, the wrapped content lines,
    /// then a trailing blank.
    fn wrapped_line_count(&self, indicator_visible: bool) -> u16 {
        // Use the actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.view_width > 0 {
            self.view_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for turn in &self.turns {
            total_lines += 1; // Role line ("You:" or "Bot:")
            for line in turn.content.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after each turn
        }

        if indicator_visible {
            total_lines += 2; // "Bot:" + "Typing..."
        }

        total_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_snapshot_matches_the_rendered_layout() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user("hello"));
        transcript.push(Turn::bot("Hi there"));

        assert_eq!(transcript.text(), "You:\nhello\n\nBot:\nHi there\n\n");
    }

    #[test]
    fn empty_transcript_has_empty_snapshot() {
        assert_eq!(Transcript::new().text(), "");
    }

    #[test]
    fn scroll_to_bottom_accounts_for_wrapped_lines() {
        let mut transcript = Transcript::new();
        transcript.view_width = 10;
        transcript.view_height = 10;

        // Each turn: 1 role line + 4 wrapped content lines + 1 blank = 6
        transcript.push(Turn::user("x".repeat(35)));
        transcript.push(Turn::bot("y".repeat(35)));

        transcript.scroll_to_bottom(false);
        assert_eq!(transcript.scroll, 2);

        // Indicator adds two more lines below the last turn
        transcript.scroll_to_bottom(true);
        assert_eq!(transcript.scroll, 4);
    }

    #[test]
    fn scroll_stays_put_when_everything_fits() {
        let mut transcript = Transcript::new();
        transcript.view_width = 40;
        transcript.view_height = 20;
        transcript.push(Turn::user("hi"));

        transcript.scroll_to_bottom(false);
        assert_eq!(transcript.scroll, 0);
    }

    #[test]
    fn wrap_estimate_counts_characters_not_bytes() {
        let mut transcript = Transcript::new();
        transcript.view_width = 30;
        transcript.view_height = 1;

        // 60 two-byte characters wrap the same as 60 ASCII ones
        transcript.push(Turn::bot("é".repeat(60)));

        // 1 role line + (60 / 30 + 1) content lines + 1 blank = 5
        transcript.scroll_to_bottom(false);
        assert_eq!(transcript.scroll, 4);
    }
}
