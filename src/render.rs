use crate::layout::Layout;
use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use std::io::Write;

const SEPARATOR: char = '│';

/// Draws a [Layout] onto a terminal-like output.
///
/// Every cell of the screen is written on each draw, so no clear is needed
/// and the previous frame never shows through.
pub struct Renderer<W: Write> {
    output: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn draw(&mut self, layout: &Layout, width: u16, height: u16) -> Result<()> {
        if height == 0 {
            return Ok(());
        }
        let body_rows = usize::from(height - 1);
        for (component, column) in layout.components().zip(layout.columns(width)) {
            let cells = usize::from(column.width);
            queue!(
                self.output,
                MoveTo(column.x, 0),
                SetAttribute(Attribute::Reverse),
                Print(fit(component.title(), cells)),
                SetAttribute(Attribute::Reset)
            )?;
            let lines = component.tail(body_rows);
            for row in 0..body_rows {
                let line = lines.get(row).map(String::as_str).unwrap_or("");
                queue!(
                    self.output,
                    MoveTo(column.x, row as u16 + 1),
                    Print(fit(line, cells))
                )?;
            }
            let separator_x = column.x + column.width;
            if separator_x < width {
                for row in 0..height {
                    queue!(self.output, MoveTo(separator_x, row), Print(SEPARATOR))?;
                }
            }
        }
        self.output.flush()?;
        Ok(())
    }
}

/// Pads or cuts `text` to exactly `width` cells. Control characters are
/// replaced so they cannot move the cursor.
fn fit(text: &str, width: usize) -> String {
    let mut line: String = text
        .chars()
        .map(|c| if c.is_control() { '.' } else { c })
        .take(width)
        .collect();
    let shown = line.chars().count();
    line.extend(std::iter::repeat(' ').take(width - shown));
    line
}

#[cfg(test)]
mod test {
    use crate::journal::{Journal, Pane};
    use crate::layout::{BufferView, Layout};
    use crate::render::{fit, Renderer};
    use crate::testing::{FixedClock, SharedOutput};

    fn screen(layout: &Layout, width: u16, height: u16) -> vt100::Parser {
        let mut output = Vec::new();
        Renderer::new(&mut output)
            .draw(layout, width, height)
            .unwrap();
        let mut parser = vt100::Parser::new(height, width, 0);
        parser.process(&output);
        parser
    }

    fn two_pane_layout(journal: &Journal) -> Layout {
        let mut layout = Layout::new();
        layout
            .add_component(Box::new(BufferView::new(
                "Logging Text",
                journal.clone(),
                Pane::Logging,
            )))
            .add_component(Box::new(BufferView::new(
                "Raw Text",
                journal.clone(),
                Pane::Raw,
            )));
        layout
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
        assert_eq!(fit("a\u{1b}b", 3), "a.b");
    }

    #[test]
    fn draws_titles_and_separator() {
        let journal = Journal::new(FixedClock::at(12, 0, 0), SharedOutput::default());
        let parser = screen(&two_pane_layout(&journal), 41, 4);
        let screen = parser.screen();
        let rows: Vec<String> = screen.rows(0, 41).collect();
        assert!(rows[0].starts_with("Logging Text"));
        assert_eq!(screen.cell(0, 20).unwrap().contents(), "│");
        assert_eq!(screen.cell(3, 20).unwrap().contents(), "│");
        assert_eq!(screen.cell(0, 21).unwrap().contents(), "R");
        assert!(screen.cell(0, 0).unwrap().inverse());
    }

    #[test]
    fn panes_show_the_newest_lines() {
        let journal = Journal::new(FixedClock::at(12, 0, 0), SharedOutput::default());
        journal.append_raw("first\nsecond\nthird\n");
        journal.log(format_args!("hello"));
        let parser = screen(&two_pane_layout(&journal), 41, 3);
        let screen = parser.screen();
        let raw: Vec<String> = screen.rows(21, 20).collect();
        assert_eq!(raw[1].trim_end(), "second\\n");
        assert_eq!(raw[2].trim_end(), "third\\n");
        let logging: Vec<String> = screen.rows(0, 20).collect();
        assert_eq!(logging[1].trim_end(), "[12:00:00] hello");
        assert_eq!(logging[2].trim_end(), "");
    }

    #[test]
    fn zero_height_draws_nothing() {
        let journal = Journal::new(FixedClock::at(12, 0, 0), SharedOutput::default());
        let mut output = Vec::new();
        Renderer::new(&mut output)
            .draw(&two_pane_layout(&journal), 41, 0)
            .unwrap();
        assert!(output.is_empty());
    }
}
