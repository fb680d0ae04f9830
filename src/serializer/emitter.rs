//! Output buffer with lazily applied separators.
//!
//! Separators requested between two words are not written until the next word
//! arrives; the strongest request wins. Indentation is applied when a line is
//! actually started, so a layout may dedent before or after asking for the
//! line break that closes a block.

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Gap {
    None,
    Space,
    Newline,
    BlankLine,
}

#[derive(Debug)]
pub(crate) struct Emitter {
    out: String,
    depth: usize,
    pending: Gap,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
            pending: Gap::None,
        }
    }

    pub fn word(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.out.is_empty() {
            match self.pending {
                Gap::None => {}
                Gap::Space => self.out.push(' '),
                Gap::Newline => self.start_line(1),
                Gap::BlankLine => self.start_line(2),
            }
        }
        self.pending = Gap::None;
        self.out.push_str(text);
    }

    pub fn space(&mut self) {
        self.request(Gap::Space);
    }

    pub fn newline(&mut self) {
        self.request(Gap::Newline);
    }

    pub fn blank_line(&mut self) {
        self.request(Gap::BlankLine);
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Drops trailing separators and ends non-empty output with a newline.
    pub fn finish(mut self) -> String {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out
    }

    fn request(&mut self, gap: Gap) {
        self.pending = self.pending.max(gap);
    }

    fn start_line(&mut self, breaks: usize) {
        for _ in 0..breaks {
            self.out.push('\n');
        }
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_glued_without_requests() {
        let mut e = Emitter::new();
        e.word("?x");
        e.word(",");
        e.space();
        e.word("?y");
        assert_eq!(e.finish(), "?x, ?y\n");
    }

    #[test]
    fn strongest_gap_wins() {
        let mut e = Emitter::new();
        e.word("a");
        e.space();
        e.newline();
        e.space();
        e.word("b");
        e.blank_line();
        e.newline();
        e.word("c");
        assert_eq!(e.finish(), "a\nb\n\nc\n");
    }

    #[test]
    fn indent_applies_at_line_start() {
        let mut e = Emitter::new();
        e.word("{");
        e.indent();
        e.newline();
        e.word("?s");
        e.dedent();
        e.newline();
        e.word("}");
        assert_eq!(e.finish(), "{\n  ?s\n}\n");
    }

    #[test]
    fn leading_and_trailing_gaps_are_dropped() {
        let mut e = Emitter::new();
        e.blank_line();
        e.word("ASK");
        e.newline();
        assert_eq!(e.finish(), "ASK\n");
    }

    #[test]
    fn empty_output_stays_empty() {
        let mut e = Emitter::new();
        e.blank_line();
        assert_eq!(e.finish(), "");
    }

    #[test]
    fn dedent_never_underflows() {
        let mut e = Emitter::new();
        e.word("{");
        e.dedent();
        e.indent();
        e.newline();
        e.word("?s");
        assert_eq!(e.finish(), "{\n  ?s\n");
    }
}
