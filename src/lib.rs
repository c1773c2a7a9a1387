/*
Debug window for a serial test harness.

Two panes, both append-only:
    Logging Text: "[HH:MM:SS] message" lines, mirrored to stdout
    Raw Text: every byte seen on wrapped streams, \r and \n made visible

Data flow:
    caller wraps its serial Read/Write in DebugReader/DebugWriter
    wrappers forward bytes unchanged and copy them into the Journal
    UI thread redraws whenever the Journal generation moves

Close (q / Esc / Ctrl-C / DebugWindow::close):
    restore terminal
    log "Ending", raise ShutdownSignal
    run callback on its own thread, bounded by a deadline
    log "Exiting", exit the process either way
*/
mod buffer;
mod config;
mod escape;
mod journal;
mod layout;
mod logger;
mod render;
mod shutdown;
mod stream;
#[cfg(test)]
mod testing;
mod window;

pub use buffer::TextBuffer;
pub use config::WindowConfig;
pub use escape::{byte_to_display, escape_log, escape_log_byte, escape_raw};
pub use journal::{Clock, Journal, LocalClock, Pane};
pub use layout::{BufferView, Column, Component, Layout};
pub use logger::PaneLogger;
pub use render::Renderer;
pub use shutdown::{Shutdown, ShutdownCallback, ShutdownOutcome, ShutdownPhase, ShutdownSignal};
pub use stream::{DebugReader, DebugWriter, LoggingStream};
pub use window::DebugWindow;
