/// Append-only text backing one pane.
#[derive(Debug, Default)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The last `rows` lines, oldest first. A trailing line break does not
    /// produce an empty final line, so the view always ends on content.
    pub fn tail(&self, rows: usize) -> Vec<&str> {
        let text = self.text.strip_suffix('\n').unwrap_or(&self.text);
        if text.is_empty() || rows == 0 {
            return Vec::new();
        }
        let mut lines: Vec<&str> = text.rsplit('\n').take(rows).collect();
        lines.reverse();
        lines
    }
}
