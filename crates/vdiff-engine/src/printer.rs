//! Sinks for diff output.
//!
//! The walker hands every disagreement to a [`Printer`] as a single
//! `fmt::Arguments`, one logical line without a terminator. The adapters
//! below only decide where the rendered line goes, so output is identical
//! whatever the destination.

use std::fmt;
use std::io;

use tracing::Level;

use crate::error::DiffResult;

/// Accepts one formatted diff line at a time.
pub trait Printer {
    fn print(&mut self, line: fmt::Arguments<'_>) -> DiffResult<()>;
}

/// Collects rendered lines in order.
impl Printer for Vec<String> {
    fn print(&mut self, line: fmt::Arguments<'_>) -> DiffResult<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes each line followed by `\n`.
#[derive(Debug)]
pub struct WritePrinter<W> {
    writer: W,
}

impl<W: io::Write> WritePrinter<W> {
    /// Write lines to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Printer for WritePrinter<W> {
    fn print(&mut self, line: fmt::Arguments<'_>) -> DiffResult<()> {
        self.writer.write_fmt(line)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

/// An external log sink that records preformatted messages.
pub trait Logf {
    fn logf(&mut self, message: fmt::Arguments<'_>);
}

impl<L: Logf + ?Sized> Logf for &mut L {
    fn logf(&mut self, message: fmt::Arguments<'_>) {
        (**self).logf(message)
    }
}

/// Forwards each line to a [`Logf`] sink.
#[derive(Debug)]
pub struct LogPrinter<L> {
    sink: L,
}

impl<L: Logf> LogPrinter<L> {
    /// Forward lines to `sink`.
    pub fn new(sink: L) -> Self {
        Self { sink }
    }
}

impl<L: Logf> Printer for LogPrinter<L> {
    fn print(&mut self, line: fmt::Arguments<'_>) -> DiffResult<()> {
        self.sink.logf(line);
        Ok(())
    }
}

/// A [`Logf`] that emits one `tracing` event per message.
#[derive(Clone, Copy, Debug)]
pub struct TracingLogf {
    level: Level,
}

impl TracingLogf {
    /// Emit events at `level`.
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for TracingLogf {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl Logf for TracingLogf {
    fn logf(&mut self, message: fmt::Arguments<'_>) {
        if self.level == Level::ERROR {
            tracing::error!("{message}");
        } else if self.level == Level::WARN {
            tracing::warn!("{message}");
        } else if self.level == Level::INFO {
            tracing::info!("{message}");
        } else if self.level == Level::DEBUG {
            tracing::debug!("{message}");
        } else {
            tracing::trace!("{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Logf for Recorder {
        fn logf(&mut self, message: fmt::Arguments<'_>) {
            self.0.push(message.to_string());
        }
    }

    #[test]
    fn vec_collects_without_newline() {
        let mut lines: Vec<String> = Vec::new();
        lines.print(format_args!("{} != {}", 1, 2)).unwrap();
        assert_eq!(lines, ["1 != 2"]);
    }

    #[test]
    fn writer_appends_newline() {
        let mut p = WritePrinter::new(Vec::new());
        p.print(format_args!("a")).unwrap();
        p.print(format_args!("b: {}", 3)).unwrap();
        assert_eq!(p.into_inner(), b"a\nb: 3\n");
    }

    #[test]
    fn log_printer_forwards_messages() {
        let mut rec = Recorder::default();
        let mut p = LogPrinter::new(&mut rec);
        p.print(format_args!("x: {:?}", "s")).unwrap();
        assert_eq!(rec.0, [r#"x: "s""#]);
    }

    #[test]
    fn tracing_logf_accepts_every_level() {
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            TracingLogf::new(level).logf(format_args!("line"));
        }
    }

    #[test]
    fn writer_errors_propagate() {
        struct Closed;
        impl io::Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let err = WritePrinter::new(Closed).print(format_args!("x")).unwrap_err();
        assert!(matches!(err, crate::DiffError::Io(_)));
    }
}
