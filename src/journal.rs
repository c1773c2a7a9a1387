use crate::buffer::TextBuffer;
use crate::escape::{byte_to_display, escape_log, escape_log_byte, escape_raw};
use crate::stream::{DebugReader, DebugWriter, LoggingStream};
use chrono::{Local, NaiveTime};
use std::fmt;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Source of the wall-clock time stamped on log lines.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Which of the two journal buffers a view reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Raw,
    Logging,
}

/// Shared handle to the raw and logging buffers plus the stdout mirror.
///
/// Cloning is cheap; every clone appends to the same buffers. All appends go
/// through here, whether they come from wrapped streams, the [log] facade
/// backend or direct calls.
///
/// [log]: crate::logger::PaneLogger
#[derive(Clone)]
pub struct Journal {
    inner: Arc<Inner>,
}

struct Inner {
    raw: Mutex<TextBuffer>,
    logging: Mutex<TextBuffer>,
    echo: Mutex<Box<dyn Write + Send>>,
    clock: Box<dyn Clock>,
    generation: AtomicU64,
}

// A panic while holding one of these locks cannot leave the buffers half
// written in a way that matters for display, so poisoning is ignored.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Journal {
    pub fn new(clock: impl Clock + 'static, echo: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                raw: Mutex::new(TextBuffer::new()),
                logging: Mutex::new(TextBuffer::new()),
                echo: Mutex::new(Box::new(echo)),
                clock: Box::new(clock),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Counter bumped on every append; unchanged means nothing to redraw.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    fn touched(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn append_raw(&self, text: &str) {
        lock(&self.inner.raw).append(&escape_raw(text));
        self.touched();
    }

    pub fn append_raw_byte(&self, byte: u8) {
        self.append_raw(&byte_to_display(byte));
    }

    /// Appends a run of bytes under a single lock, in order.
    pub fn append_raw_bytes(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        {
            let mut raw = lock(&self.inner.raw);
            for byte in bytes {
                raw.append(&escape_raw(&byte_to_display(*byte)));
            }
        }
        self.touched();
    }

    pub fn append_log(&self, text: &str) {
        lock(&self.inner.logging).append(&escape_log(text));
        self.touched();
    }

    pub fn append_log_byte(&self, byte: u8) {
        lock(&self.inner.logging).append(&escape_log_byte(byte));
        self.touched();
    }

    pub fn log(&self, args: fmt::Arguments<'_>) {
        self.log_with(args, None);
    }

    /// Writes `[HH:MM:SS] message` to the logging pane and stdout. An attached
    /// error is followed by its full diagnostic, written through
    /// [`Journal::logging_stream`].
    pub fn log_with(&self, args: fmt::Arguments<'_>, error: Option<&anyhow::Error>) {
        let line = format!("[{}] {}", self.inner.clock.now().format("%H:%M:%S"), args);
        self.append_log(&line);
        self.echo(format!("{line}\n").as_bytes());
        if let Some(error) = error {
            let mut stream = self.logging_stream();
            let _ = writeln!(stream, "{error:?}");
            let _ = stream.flush();
        }
    }

    /// Mirror to stdout. Failures are dropped; the pane still has the text.
    pub(crate) fn echo(&self, bytes: &[u8]) {
        let mut echo = lock(&self.inner.echo);
        let _ = echo.write_all(bytes);
        let _ = echo.flush();
    }

    pub fn wrap_reader<R: Read>(&self, reader: R) -> DebugReader<R> {
        DebugReader::new(reader, self.clone())
    }

    pub fn wrap_writer<W: Write>(&self, writer: W) -> DebugWriter<W> {
        DebugWriter::new(writer, self.clone())
    }

    pub fn logging_stream(&self) -> LoggingStream {
        LoggingStream::new(self.clone())
    }

    pub fn text(&self, pane: Pane) -> String {
        self.buffer(pane).text().to_string()
    }

    pub fn tail(&self, pane: Pane, rows: usize) -> Vec<String> {
        self.buffer(pane)
            .tail(rows)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn buffer(&self, pane: Pane) -> MutexGuard<'_, TextBuffer> {
        match pane {
            Pane::Raw => lock(&self.inner.raw),
            Pane::Logging => lock(&self.inner.logging),
        }
    }
}
