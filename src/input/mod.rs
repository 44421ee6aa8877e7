//! Raw line input
//!
//! No line editing and no history: bytes are read straight from the source
//! until a newline shows up. The reader calls [`Read::read`] itself instead
//! of `BufRead::read_line`, because the latter retries on `EINTR` and an
//! interrupted read has to reach the interpreter loop.

use std::io::{self, ErrorKind, Read};

const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One line, without its trailing newline
    Line(String),
    /// The source is exhausted
    Eof,
    /// A signal interrupted the read; any partial line was dropped
    Interrupted,
}

/// Reads newline-terminated lines from any byte source.
///
/// Bytes read past the end of a line stay buffered for the next call, and
/// the buffer itself is reused from line to line.
pub struct LineReader<R> {
    source: R,
    buffer: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buffer: Vec::new(),
        }
    }

    pub fn read_line(&mut self) -> io::Result<ReadOutcome> {
        let mut chunk = [0u8; CHUNK_SIZE];

        loop {
            if let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
                let line = decode(&self.buffer[..newline]);
                self.buffer.drain(..=newline);
                return Ok(ReadOutcome::Line(line));
            }

            match self.source.read(&mut chunk) {
                Ok(0) if self.buffer.is_empty() => return Ok(ReadOutcome::Eof),
                Ok(0) => {
                    // Unterminated last line
                    let line = decode(&self.buffer);
                    self.buffer.clear();
                    return Ok(ReadOutcome::Line(line));
                }
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    self.buffer.clear();
                    return Ok(ReadOutcome::Interrupted);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that fails once with EINTR after handing out its first part
    struct InterruptOnce {
        parts: Vec<&'static [u8]>,
        interrupted: bool,
    }

    impl Read for InterruptOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.parts.len() == 1 && !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            if self.parts.is_empty() {
                return Ok(0);
            }
            let part = self.parts.remove(0);
            buf[..part.len()].copy_from_slice(part);
            Ok(part.len())
        }
    }

    #[test]
    fn test_reads_lines_in_order() {
        let mut reader = LineReader::new(&b"echo one\necho two\n"[..]);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("echo one".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("echo two".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Eof);
    }

    #[test]
    fn test_empty_lines_are_lines() {
        let mut reader = LineReader::new(&b"\n\n"[..]);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line(String::new()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line(String::new()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Eof);
    }

    #[test]
    fn test_unterminated_last_line() {
        let mut reader = LineReader::new(&b"first\nlast"[..]);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("first".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("last".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Eof);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut reader = LineReader::new(&b"a\xffb\n"[..]);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("a\u{fffd}b".into()));
    }

    #[test]
    fn test_long_line_spans_chunks() {
        let mut input = vec![b'x'; CHUNK_SIZE * 2 + 10];
        input.push(b'\n');
        let mut reader = LineReader::new(&input[..]);
        match reader.read_line().unwrap() {
            ReadOutcome::Line(line) => assert_eq!(line.len(), CHUNK_SIZE * 2 + 10),
            other => panic!("expected a line, got {:?}", other),
        }
    }

    #[test]
    fn test_interrupt_drops_partial_line() {
        let source = InterruptOnce {
            parts: vec![b"partial", b"fresh\n"],
            interrupted: false,
        };
        let mut reader = LineReader::new(source);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Interrupted);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("fresh".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Eof);
    }
}
