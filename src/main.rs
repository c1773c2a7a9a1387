/*
Drives the debug window against a simulated serial device: every second an
AT command goes out through a wrapped writer and the canned reply comes back
through a wrapped reader. Close the window with q, Esc or Ctrl-C.
*/
use anyhow::{Context, Result};
use log::{info, LevelFilter};
use serial_debug_window::{DebugWindow, WindowConfig};
use simplelog::CombinedLogger;
use std::io::{self, Cursor, Read, Write};
use std::thread;
use std::time::Duration;

const COMMANDS: [&str; 3] = ["AT\r\n", "AT+GMR\r\n", "AT+CSQ\r\n"];

fn reply_to(command: &str) -> &'static [u8] {
    match command.trim_end() {
        "AT" => b"OK\r\n",
        "AT+GMR" => b"1.7.4\r\nOK\r\n",
        "AT+CSQ" => b"+CSQ: 21,0\r\nOK\r\n",
        _ => b"ERROR\r\n",
    }
}

fn exchange(window: &DebugWindow, command: &str) -> Result<()> {
    let mut port = window.wrap_writer(io::sink());
    port.write_all(command.as_bytes())
        .context("Failed to send command")?;
    let mut reply = Vec::new();
    window
        .wrap_reader(Cursor::new(reply_to(command)))
        .read_to_end(&mut reply)
        .context("Failed to read reply")?;
    info!("{} -> {} bytes", command.trim_end(), reply.len());
    Ok(())
}

fn main() -> Result<()> {
    let window = DebugWindow::open(WindowConfig::default().with_echo_stdout(false), || {
        thread::sleep(Duration::from_millis(100));
    })?;
    CombinedLogger::init(vec![window.logger(LevelFilter::Info)])
        .context("Failed to install logger")?;

    let signal = window.shutdown_signal();
    window.log(format_args!("Simulated port ready"));
    for command in COMMANDS.iter().cycle() {
        if signal.is_raised() {
            break;
        }
        if let Err(error) = exchange(&window, command) {
            window.log_with(format_args!("Exchange failed"), Some(&error));
        }
        thread::park_timeout(Duration::from_secs(1));
    }
    // The window thread exits the process once shutdown completes.
    loop {
        thread::park();
    }
}
