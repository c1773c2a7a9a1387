use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// How long the shutdown callback may run before the process is forced
    /// to exit.
    pub shutdown_deadline: Duration,
    /// Upper bound on the delay between an append and its redraw.
    pub redraw_interval: Duration,
    /// Mirror log lines to stdout.
    pub echo_stdout: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "SerialTest Debug".to_string(),
            shutdown_deadline: Duration::from_millis(500),
            redraw_interval: Duration::from_millis(50),
            echo_stdout: true,
        }
    }
}

impl WindowConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_shutdown_deadline(mut self, deadline: Duration) -> Self {
        self.shutdown_deadline = deadline;
        self
    }

    pub fn with_redraw_interval(mut self, interval: Duration) -> Self {
        self.redraw_interval = interval;
        self
    }

    pub fn with_echo_stdout(mut self, echo: bool) -> Self {
        self.echo_stdout = echo;
        self
    }
}
