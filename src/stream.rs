use crate::journal::Journal;
use std::io::{self, Read, Write};

/// Reader decorator that mirrors every byte it hands out into the raw pane.
///
/// End of stream and errors from the inner reader are returned untouched and
/// leave the pane unchanged.
pub struct DebugReader<R> {
    inner: R,
    journal: Journal,
}

impl<R: Read> DebugReader<R> {
    pub fn new(inner: R, journal: Journal) -> Self {
        Self { inner, journal }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for DebugReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.journal.append_raw_bytes(&buf[..read]);
        Ok(read)
    }
}

/// Writer decorator that mirrors every byte the inner writer accepts into the
/// raw pane.
pub struct DebugWriter<W> {
    inner: W,
    journal: Journal,
}

impl<W: Write> DebugWriter<W> {
    pub fn new(inner: W, journal: Journal) -> Self {
        Self { inner, journal }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for DebugWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.journal.append_raw_bytes(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Sink for diagnostic text: each byte lands in the logging pane and is
/// echoed to stdout.
pub struct LoggingStream {
    journal: Journal,
}

impl LoggingStream {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl Write for LoggingStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for byte in buf {
            self.journal.append_log_byte(*byte);
        }
        self.journal.echo(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
