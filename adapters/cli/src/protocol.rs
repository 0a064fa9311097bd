//! Line-delimited JSON framing between the server and a session.

use std::io::{self, BufRead, Write};

use rts_client_core::{CommandBatch, GameUpdate};
use rts_client_world::WorldError;
use thiserror::Error;

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Reading from or writing to the connection failed.
    #[error("connection i/o failed")]
    Io(#[from] io::Error),
    /// An inbound line was not a valid update.
    #[error("malformed update on line {line}")]
    Decode {
        /// One-based line number within the session.
        line: u64,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A command batch could not be serialised.
    #[error("failed to encode command batch")]
    Encode(#[source] serde_json::Error),
    /// The update could not be merged into the world.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Duplex channel reading one update per line and writing one batch per line.
#[derive(Debug)]
pub struct LineChannel<R, W> {
    reader: R,
    writer: W,
    buffer: String,
    lines_read: u64,
}

impl<R: BufRead, W: Write> LineChannel<R, W> {
    /// Wraps a buffered reader and a writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            buffer: String::new(),
            lines_read: 0,
        }
    }

    /// Reads the next update, skipping blank lines. Returns `None` once the
    /// peer closes its side.
    pub fn read_update(&mut self) -> Result<Option<GameUpdate>, ProtocolError> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.lines_read += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            return serde_json::from_str(line)
                .map(Some)
                .map_err(|source| ProtocolError::Decode {
                    line: self.lines_read,
                    source,
                });
        }
    }

    /// Writes `batch` as a single newline-terminated JSON object.
    pub fn write_batch(&mut self, batch: &CommandBatch) -> Result<(), ProtocolError> {
        let mut encoded = serde_json::to_vec(batch).map_err(ProtocolError::Encode)?;
        encoded.push(b'\n');
        self.writer.write_all(&encoded)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Number of lines consumed so far, blank lines included.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Releases the underlying writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rts_client_core::{Command, Direction, UnitId};

    use super::*;

    #[test]
    fn reads_updates_and_skips_blank_lines() {
        let input = "\n{\"tile_updates\":[],\"unit_updates\":[]}\n\n";
        let mut channel = LineChannel::new(Cursor::new(input), Vec::new());

        let update = channel.read_update().expect("read succeeds");
        assert_eq!(update, Some(GameUpdate::default()));
        assert_eq!(channel.read_update().expect("eof is clean"), None);
        assert_eq!(channel.lines_read(), 3);
    }

    #[test]
    fn reports_line_of_malformed_update() {
        let input = "{\"tile_updates\":[]}\n{not json\n";
        let mut channel = LineChannel::new(Cursor::new(input), Vec::new());

        let _ = channel.read_update().expect("first line decodes");
        match channel.read_update() {
            Err(ProtocolError::Decode { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn writes_one_line_per_batch() {
        let mut channel = LineChannel::new(Cursor::new(""), Vec::new());
        channel
            .write_batch(&CommandBatch::from(vec![Command::Gather {
                unit: UnitId::Number(2),
                dir: Direction::South,
            }]))
            .expect("write succeeds");
        channel
            .write_batch(&CommandBatch::default())
            .expect("write succeeds");

        let written = String::from_utf8(channel.into_writer()).expect("utf8 output");
        assert_eq!(
            written,
            concat!(
                r#"{"commands":[{"command":"GATHER","unit":2,"dir":"S"}]}"#,
                "\n",
                r#"{"commands":[]}"#,
                "\n"
            )
        );
    }
}
