// src/stream.rs
// One-byte reads with pushback, so the scanner can rewind past the end of
// the best match it found.

use std::io::{self, Read};

pub struct ByteCursor<R: Read> {
    inner: R,
    /// Bytes returned to the cursor, consumed LIFO before the reader.
    pushback: Vec<u8>,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: Vec::new(),
        }
    }

    /// Next byte, or `None` at end of input.
    pub fn next(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pushback.pop() {
            return Ok(Some(b));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Return bytes to the cursor; they are re-read in their original order.
    pub fn push_back(&mut self, bytes: &[u8]) {
        self.pushback.extend(bytes.iter().rev());
    }
}
