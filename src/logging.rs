// THEORY:
// Two kinds of output leave the engine:
// 1.  **Diagnostics** go through `tracing` to stderr, and optionally into a log
//     file as plain text.
// 2.  **Program output** (scan summaries and totals) goes to stdout through an
//     `EchoWriter`, which can mirror every line into a file as well.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. `level` wins over `RUST_LOG`; without
/// either, only warnings and errors are shown.
pub fn init_tracing(level: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(io::stderr))
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}

/// Writes everything to `primary` and, when present, to `secondary` too.
pub struct EchoWriter<A: Write, B: Write> {
    primary: A,
    secondary: Option<B>,
}

impl<A: Write, B: Write> EchoWriter<A, B> {
    pub fn new(primary: A, secondary: Option<B>) -> Self {
        Self { primary, secondary }
    }

    pub fn echo_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self, "{line}")
    }

    pub fn into_inner(self) -> (A, Option<B>) {
        (self.primary, self.secondary)
    }
}

impl EchoWriter<io::Stdout, File> {
    /// Stdout, mirrored into a freshly created file when `path` is given.
    pub fn stdout_and_file(path: Option<&Path>) -> Result<Self> {
        let secondary = match path {
            Some(path) => Some(
                File::create(path)
                    .with_context(|| format!("creating echo file {}", path.display()))?,
            ),
            None => None,
        };
        Ok(Self::new(io::stdout(), secondary))
    }
}

impl<A: Write, B: Write> Write for EchoWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        if let Some(secondary) = self.secondary.as_mut() {
            secondary.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        if let Some(secondary) = self.secondary.as_mut() {
            secondary.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_into_both_sinks() {
        let mut echo = EchoWriter::new(Vec::new(), Some(Vec::new()));
        echo.echo_line("Position 0,0 - block found").expect("write");
        echo.echo_line("block: 1 found in 4 positions").expect("write");
        let (primary, secondary) = echo.into_inner();
        assert_eq!(primary, secondary.expect("secondary"));
        assert_eq!(
            String::from_utf8(primary).expect("utf8"),
            "Position 0,0 - block found\nblock: 1 found in 4 positions\n"
        );
    }

    #[test]
    fn works_without_a_secondary() {
        let mut echo: EchoWriter<Vec<u8>, Vec<u8>> = EchoWriter::new(Vec::new(), None);
        echo.echo_line("only stdout").expect("write");
        echo.flush().expect("flush");
        let (primary, secondary) = echo.into_inner();
        assert_eq!(primary, b"only stdout\n");
        assert!(secondary.is_none());
    }
}
