use quire_config::logging::ConsoleStream;
use std::io::{self, IsTerminal, Stderr, Stdout, Write};
use tracing_subscriber::fmt::{MakeWriter, TestWriter};

/// Hands out writers for the configured [`ConsoleStream`].
#[derive(Debug, Clone, Copy)]
pub struct ConsoleWriterMaker {
    stream: ConsoleStream,
}

impl ConsoleWriterMaker {
    #[must_use]
    pub fn new(stream: ConsoleStream) -> Self {
        Self { stream }
    }

    /// Colors are only used when logs end up in a terminal.
    pub fn supports_color(&self) -> bool {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().is_terminal(),
            ConsoleStream::Stderr => io::stderr().is_terminal(),
            ConsoleStream::TestWriter => false,
        }
    }
}

impl<'writer> MakeWriter<'writer> for ConsoleWriterMaker {
    type Writer = ConsoleWriter;

    fn make_writer(&'writer self) -> Self::Writer {
        match self.stream {
            ConsoleStream::Stdout => ConsoleWriter::Stdout(io::stdout()),
            ConsoleStream::Stderr => ConsoleWriter::Stderr(io::stderr()),
            ConsoleStream::TestWriter => ConsoleWriter::Test(TestWriter::new()),
        }
    }
}

pub enum ConsoleWriter {
    Stdout(Stdout),
    Stderr(Stderr),
    Test(TestWriter),
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(out) => out.write(buf),
            Self::Stderr(err) => err.write(buf),
            Self::Test(test) => test.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.flush(),
            Self::Stderr(err) => err.flush(),
            Self::Test(test) => test.flush(),
        }
    }
}
