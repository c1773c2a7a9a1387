use crate::journal::Journal;
use log::{LevelFilter, Log, Metadata, Record};
use simplelog::{Config, SharedLogger};

/// `log` backend writing records into the logging pane (and stdout).
///
/// Implements [`SharedLogger`], so it can sit in a
/// [`simplelog::CombinedLogger`] next to other simplelog loggers.
pub struct PaneLogger {
    journal: Journal,
    level: LevelFilter,
    config: Config,
}

impl PaneLogger {
    pub fn new(journal: Journal, level: LevelFilter) -> Box<Self> {
        Box::new(Self {
            journal,
            level,
            config: Config::default(),
        })
    }
}

impl Log for PaneLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.journal
                .log(format_args!("{:<5} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

impl SharedLogger for PaneLogger {
    fn level(&self) -> LevelFilter {
        self.level
    }

    fn config(&self) -> Option<&Config> {
        Some(&self.config)
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}
