use crate::journal::Journal;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, Thread};
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPhase {
    Running,
    Closing,
    Terminated,
}

impl ShutdownPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Running,
            1 => Self::Closing,
            _ => Self::Terminated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    Completed,
    CallbackFailed,
    DeadlineElapsed,
}

impl ShutdownOutcome {
    /// The process exits successfully in every case; a stuck or failed
    /// callback is reported in the logging pane, not through the status.
    pub fn exit_code(self) -> i32 {
        0
    }
}

/// Raised once closing starts. Tells the thread that opened the window to
/// stop: the flag can be polled and that thread is unparked.
#[derive(Clone)]
pub struct ShutdownSignal {
    raised: Arc<AtomicBool>,
    owner: Thread,
}

impl ShutdownSignal {
    /// A signal owned by the calling thread.
    pub fn for_current_thread() -> Self {
        Self {
            raised: Arc::new(AtomicBool::new(false)),
            owner: thread::current(),
        }
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    fn raise(&self) {
        self.raised.store(true, Ordering::Release);
        self.owner.unpark();
    }
}

pub type ShutdownCallback = Box<dyn FnOnce() + Send + 'static>;

/// `Running -> Closing -> Terminated`, entered at most once.
///
/// The callback runs on its own thread while this side waits on a deadline;
/// whichever finishes first decides the outcome, and there is exactly one
/// place where the outcome is produced.
pub struct Shutdown {
    phase: AtomicU8,
    deadline: Duration,
    journal: Journal,
    signal: ShutdownSignal,
}

impl Shutdown {
    pub fn new(journal: Journal, signal: ShutdownSignal, deadline: Duration) -> Self {
        Self {
            phase: AtomicU8::new(ShutdownPhase::Running as u8),
            deadline,
            journal,
            signal,
        }
    }

    pub fn phase(&self) -> ShutdownPhase {
        ShutdownPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Moves `Running -> Closing`. Only the first caller gets `true`.
    pub fn begin(&self) -> bool {
        self.phase
            .compare_exchange(
                ShutdownPhase::Running as u8,
                ShutdownPhase::Closing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub async fn run(&self, on_shutdown: ShutdownCallback) -> ShutdownOutcome {
        self.journal.log(format_args!("Ending"));
        self.signal.raise();

        let (done_tx, done_rx) = oneshot::channel();
        let spawned = thread::Builder::new()
            .name("shutdown-callback".to_string())
            .spawn(move || {
                on_shutdown();
                let _ = done_tx.send(());
            });

        let outcome = match spawned {
            Err(error) => {
                self.journal.log_with(
                    format_args!("Could not start shutdown callback"),
                    Some(&anyhow::Error::from(error)),
                );
                ShutdownOutcome::CallbackFailed
            }
            Ok(_) => match tokio::time::timeout(self.deadline, done_rx).await {
                Ok(Ok(())) => ShutdownOutcome::Completed,
                // The sender is dropped without sending only when the
                // callback unwinds.
                Ok(Err(_)) => {
                    self.journal.log(format_args!("Shutdown callback panicked"));
                    ShutdownOutcome::CallbackFailed
                }
                Err(_) => {
                    self.journal.log(format_args!(
                        "Shutdown callback still running after {:?}, forcing exit",
                        self.deadline
                    ));
                    ShutdownOutcome::DeadlineElapsed
                }
            },
        };

        self.journal.log(format_args!("Exiting"));
        self.phase
            .store(ShutdownPhase::Terminated as u8, Ordering::Release);
        outcome
    }

    /// Runs [`Shutdown::run`] on a private current-thread runtime.
    pub fn run_blocking(&self, on_shutdown: ShutdownCallback) -> Result<ShutdownOutcome> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("Failed to build shutdown runtime")?;
        Ok(runtime.block_on(self.run(on_shutdown)))
    }
}

#[cfg(test)]
mod test {
    use crate::journal::{Journal, Pane};
    use crate::shutdown::{Shutdown, ShutdownOutcome, ShutdownPhase, ShutdownSignal};
    use crate::testing::{FixedClock, SharedOutput};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{mpsc, Arc};
    use std::time::{Duration, Instant};

    fn shutdown(deadline: Duration) -> (Shutdown, Journal, ShutdownSignal) {
        let journal = Journal::new(FixedClock::at(23, 59, 58), SharedOutput::default());
        let signal = ShutdownSignal::for_current_thread();
        (
            Shutdown::new(journal.clone(), signal.clone(), deadline),
            journal,
            signal,
        )
    }

    #[test]
    fn only_the_first_close_begins() {
        let (shutdown, _, _) = shutdown(Duration::from_millis(10));
        assert_eq!(shutdown.phase(), ShutdownPhase::Running);
        assert!(shutdown.begin());
        assert!(!shutdown.begin());
        assert_eq!(shutdown.phase(), ShutdownPhase::Closing);
    }

    #[tokio::test]
    async fn completed_callback_exits_cleanly() {
        let (shutdown, journal, signal) = shutdown(Duration::from_secs(5));
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        assert!(shutdown.begin());

        let outcome = shutdown
            .run(Box::new(move || flag.store(true, Ordering::SeqCst)))
            .await;

        assert_eq!(outcome, ShutdownOutcome::Completed);
        assert!(ran.load(Ordering::SeqCst));
        assert!(signal.is_raised());
        assert_eq!(shutdown.phase(), ShutdownPhase::Terminated);
        insta::assert_snapshot!(journal.text(Pane::Logging).trim_end(), @r###"
        [23:59:58] Ending
        [23:59:58] Exiting
        "###);
    }

    #[tokio::test]
    async fn hung_callback_is_abandoned_at_the_deadline() {
        let (shutdown, journal, _) = shutdown(Duration::from_millis(50));
        let (release, hold) = mpsc::channel::<()>();
        let started = Instant::now();

        let outcome = shutdown
            .run(Box::new(move || {
                let _ = hold.recv();
            }))
            .await;

        assert_eq!(outcome, ShutdownOutcome::DeadlineElapsed);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(journal
            .text(Pane::Logging)
            .contains("Shutdown callback still running after 50ms, forcing exit"));
        assert_eq!(shutdown.phase(), ShutdownPhase::Terminated);
        drop(release);
    }

    #[tokio::test]
    async fn panicking_callback_is_reported() {
        let (shutdown, journal, _) = shutdown(Duration::from_secs(5));

        let outcome = shutdown
            .run(Box::new(|| panic!("callback failed")))
            .await;

        assert_eq!(outcome, ShutdownOutcome::CallbackFailed);
        assert!(journal
            .text(Pane::Logging)
            .contains("Shutdown callback panicked"));
    }

    #[test]
    fn run_blocking_drives_the_deadline() {
        let (shutdown, _, _) = shutdown(Duration::from_secs(5));
        let outcome = shutdown.run_blocking(Box::new(|| {})).unwrap();
        assert_eq!(outcome, ShutdownOutcome::Completed);
        assert_eq!(outcome.exit_code(), 0);
    }
}
