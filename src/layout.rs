use crate::journal::{Journal, Pane};

/// Something the window can show in one column.
pub trait Component: Send {
    fn title(&self) -> &str;

    /// The newest `rows` lines, oldest first.
    fn tail(&self, rows: usize) -> Vec<String>;
}

/// Column view over one of the journal buffers, always scrolled to the end.
pub struct BufferView {
    title: String,
    journal: Journal,
    pane: Pane,
}

impl BufferView {
    pub fn new(title: impl Into<String>, journal: Journal, pane: Pane) -> Self {
        Self {
            title: title.into(),
            journal,
            pane,
        }
    }
}

impl Component for BufferView {
    fn title(&self) -> &str {
        &self.title
    }

    fn tail(&self, rows: usize) -> Vec<String> {
        self.journal.tail(self.pane, rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub x: u16,
    pub width: u16,
}

/// Components laid out left to right with a one-cell separator between
/// neighbours.
#[derive(Default)]
pub struct Layout {
    components: Vec<Box<dyn Component>>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: Box<dyn Component>) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|component| &**component)
    }

    /// Splits `width` evenly; the rightmost column takes the remainder.
    pub fn columns(&self, width: u16) -> Vec<Column> {
        let count = self.components.len() as u16;
        if count == 0 {
            return Vec::new();
        }
        let usable = width.saturating_sub(count - 1);
        let each = usable / count;
        (0..count)
            .map(|index| {
                let x = index * (each + 1);
                let width = if index + 1 == count {
                    usable - each * (count - 1)
                } else {
                    each
                };
                Column { x, width }
            })
            .collect()
    }
}
