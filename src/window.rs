use crate::config::WindowConfig;
use crate::journal::{lock, Journal, LocalClock, Pane};
use crate::layout::{BufferView, Component, Layout};
use crate::logger::PaneLogger;
use crate::render::Renderer;
use crate::shutdown::{Shutdown, ShutdownCallback, ShutdownSignal};
use crate::stream::{DebugReader, DebugWriter, LoggingStream};
use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use log::LevelFilter;
use std::fmt;
use std::io::{self, Read, Stderr, Write};
use std::process;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Full-terminal debug view of a serial session: a logging pane and a raw
/// traffic pane side by side.
///
/// The window draws on stderr so stdout stays free for the log mirror. Once
/// closed it owns process termination.
pub struct DebugWindow {
    journal: Journal,
    layout: Arc<Mutex<Layout>>,
    layout_generation: Arc<AtomicU64>,
    visible: Arc<AtomicBool>,
    close_requested: Arc<AtomicBool>,
    signal: ShutdownSignal,
}

impl DebugWindow {
    /// Takes over the terminal and starts the UI thread. `on_shutdown` runs
    /// once when the window is closed, before the process exits.
    pub fn open<F>(config: WindowConfig, on_shutdown: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let echo: Box<dyn Write + Send> = if config.echo_stdout {
            Box::new(io::stdout())
        } else {
            Box::new(io::sink())
        };
        let journal = Journal::new(LocalClock, echo);

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

        let window = Self {
            journal,
            layout: Arc::new(Mutex::new(layout)),
            layout_generation: Arc::new(AtomicU64::new(0)),
            visible: Arc::new(AtomicBool::new(false)),
            close_requested: Arc::new(AtomicBool::new(false)),
            signal: ShutdownSignal::for_current_thread(),
        };

        let terminal = Terminal::enter(&config.title)?;
        let ui = UiLoop {
            journal: window.journal.clone(),
            layout: window.layout.clone(),
            layout_generation: window.layout_generation.clone(),
            visible: window.visible.clone(),
            close_requested: window.close_requested.clone(),
            shutdown: Shutdown::new(
                window.journal.clone(),
                window.signal.clone(),
                config.shutdown_deadline,
            ),
            on_shutdown: Box::new(on_shutdown),
            redraw_interval: config.redraw_interval,
        };
        window.visible.store(true, Ordering::Release);
        thread::Builder::new()
            .name("debug-window".to_string())
            .spawn(move || ui.run(terminal))
            .context("Failed to spawn window thread")?;
        Ok(window)
    }

    /// Adds a column to the right of the existing ones.
    pub fn add_component(&self, component: Box<dyn Component>) {
        lock(&self.layout).add_component(component);
        self.layout_generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    /// Same as pressing a close key.
    pub fn close(&self) {
        self.close_requested.store(true, Ordering::Release);
    }

    /// Raised when closing starts; the thread that opened the window is
    /// unparked at the same moment.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// A `log` backend for this window, ready for
    /// [`simplelog::CombinedLogger::init`].
    pub fn logger(&self, level: LevelFilter) -> Box<PaneLogger> {
        PaneLogger::new(self.journal.clone(), level)
    }

    pub fn append_raw(&self, text: &str) {
        self.journal.append_raw(text);
    }

    pub fn append_raw_byte(&self, byte: u8) {
        self.journal.append_raw_byte(byte);
    }

    pub fn append_log(&self, text: &str) {
        self.journal.append_log(text);
    }

    pub fn append_log_byte(&self, byte: u8) {
        self.journal.append_log_byte(byte);
    }

    pub fn log(&self, args: fmt::Arguments<'_>) {
        self.journal.log(args);
    }

    pub fn log_with(&self, args: fmt::Arguments<'_>, error: Option<&anyhow::Error>) {
        self.journal.log_with(args, error);
    }

    pub fn wrap_reader<R: Read>(&self, reader: R) -> DebugReader<R> {
        self.journal.wrap_reader(reader)
    }

    pub fn wrap_writer<W: Write>(&self, writer: W) -> DebugWriter<W> {
        self.journal.wrap_writer(writer)
    }

    pub fn logging_stream(&self) -> LoggingStream {
        self.journal.logging_stream()
    }
}

/// Alternate screen plus raw mode on stderr, restored on drop.
struct Terminal {
    renderer: Renderer<Stderr>,
    active: bool,
}

impl Terminal {
    fn enter(title: &str) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut terminal = Self {
            renderer: Renderer::new(io::stderr()),
            active: true,
        };
        execute!(
            terminal.renderer.output_mut(),
            EnterAlternateScreen,
            Hide,
            SetTitle(title)
        )
        .context("Failed to enter alternate screen")?;
        Ok(terminal)
    }

    fn leave(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let _ = execute!(self.renderer.output_mut(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.leave();
    }
}

struct UiLoop {
    journal: Journal,
    layout: Arc<Mutex<Layout>>,
    layout_generation: Arc<AtomicU64>,
    visible: Arc<AtomicBool>,
    close_requested: Arc<AtomicBool>,
    shutdown: Shutdown,
    on_shutdown: ShutdownCallback,
    redraw_interval: Duration,
}

impl UiLoop {
    fn run(self, mut terminal: Terminal) {
        if let Err(error) = self.event_loop(&mut terminal) {
            self.journal
                .log_with(format_args!("Window event loop failed"), Some(&error));
        }
        self.close(terminal)
    }

    fn event_loop(&self, terminal: &mut Terminal) -> Result<()> {
        let mut drawn = None;
        while !self.close_requested.load(Ordering::Acquire) {
            let (width, height) = size()?;
            let frame = (
                self.journal.generation(),
                self.layout_generation.load(Ordering::Acquire),
                width,
                height,
            );
            if drawn != Some(frame) {
                terminal
                    .renderer
                    .draw(&lock(&self.layout), width, height)?;
                drawn = Some(frame);
            }
            if event::poll(self.redraw_interval)? {
                match event::read()? {
                    Event::Key(key) if is_close_key(&key) => break,
                    Event::Resize(..) => drawn = None,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn close(self, mut terminal: Terminal) {
        if !self.shutdown.begin() {
            return;
        }
        terminal.leave();
        drop(terminal);
        self.visible.store(false, Ordering::Release);

        match self.shutdown.run_blocking(self.on_shutdown) {
            Ok(outcome) => process::exit(outcome.exit_code()),
            Err(error) => {
                self.journal
                    .log_with(format_args!("Unexpected shutdown failure"), Some(&error));
                process::exit(0)
            }
        }
    }
}

fn is_close_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
