//! Push-based pipeline: chunks in, completed record trees out

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::{LineParser, LineSplitter, RecordTree, TreeBuilder};
use crate::errors::{GedError, GedResult};

const READ_CHUNK: usize = 8 * 1024;

/// Incremental GEDCOM parser.
///
/// Feed arbitrarily sized chunks with [`GedStream::feed`]; each call
/// returns the record trees completed by that chunk, in document order.
/// Call [`GedStream::finish`] at end of stream to flush the trailing line
/// and the final in-progress record. Dropping the stream without calling
/// `finish` discards the in-progress record.
#[derive(Debug)]
pub struct GedStream {
    splitter: LineSplitter,
    parser: LineParser,
    builder: TreeBuilder,
    /// trailing bytes of a UTF-8 sequence split across chunks
    pending: Vec<u8>,
}

impl Default for GedStream {
    fn default() -> Self {
        Self::new()
    }
}

impl GedStream {
    pub fn new() -> Self {
        Self {
            splitter: LineSplitter::new(),
            parser: LineParser::new(),
            builder: TreeBuilder::new(),
            pending: Vec::new(),
        }
    }

    /// Feed one chunk of raw bytes.
    ///
    /// Chunk boundaries may fall anywhere, including inside a multi-byte
    /// character; the undecodable tail is carried into the next call.
    /// Invalid bytes decode to U+FFFD and end up in lines the grammar
    /// rejects.
    #[instrument(level = "debug", skip(self, chunk), fields(len = chunk.len()))]
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RecordTree> {
        let text = self.decode(chunk);
        self.feed_str(&text)
    }

    /// Feed one chunk of already-decoded text.
    pub fn feed_str(&mut self, chunk: &str) -> Vec<RecordTree> {
        let mut completed = Vec::new();
        for line in self.splitter.push(chunk) {
            self.consume_line(&line, &mut completed);
        }
        completed
    }

    /// Signal end of stream: flush the trailing fragment through the same
    /// path and yield the final in-progress record, if any.
    #[instrument(level = "debug", skip(self))]
    pub fn finish(mut self) -> Vec<RecordTree> {
        let mut completed = Vec::new();

        // an incomplete UTF-8 tail can no longer complete
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            let text = String::from_utf8_lossy(&tail).into_owned();
            for line in self.splitter.push(&text) {
                self.consume_line(&line, &mut completed);
            }
        }

        if let Some(last) = self.splitter.finish() {
            self.consume_line(&last, &mut completed);
        }
        if let Some(tree) = self.builder.finish() {
            completed.push(tree);
        }

        completed
    }

    fn consume_line(&mut self, line: &str, completed: &mut Vec<RecordTree>) {
        match self.parser.parse(line) {
            Some(parsed) => {
                if let Some(tree) = self.builder.attach(parsed) {
                    completed.push(tree);
                }
            }
            // malformed and blank lines are dropped, never fatal
            None => debug!("skipping line that does not match the grammar: {:?}", line),
        }
    }

    /// Lossy incremental decode: an incomplete trailing sequence is held
    /// back in `pending`, hard-invalid bytes become U+FFFD.
    fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut text = String::new();
        let mut input = bytes.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    text.push_str(valid);
                    input = &[];
                    break;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    text.push_str(std::str::from_utf8(valid).unwrap_or(""));
                    match e.error_len() {
                        Some(n) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[n..];
                        }
                        // sequence may complete with the next chunk
                        None => break,
                    }
                }
            }
        }

        self.pending = input.to_vec();
        text
    }
}

/// Pull-based driver over any byte source.
///
/// Reads fixed-size chunks and yields one completed record tree at a time,
/// flushing the trailing record at EOF. After a read error the iterator
/// yields it once and ends.
pub struct GedReader<R: Read> {
    reader: R,
    stream: Option<GedStream>,
    queue: VecDeque<RecordTree>,
}

impl<R: Read> GedReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            stream: Some(GedStream::new()),
            queue: VecDeque::new(),
        }
    }
}

impl<R: Read> Iterator for GedReader<R> {
    type Item = GedResult<RecordTree>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tree) = self.queue.pop_front() {
                return Some(Ok(tree));
            }
            self.stream.as_ref()?;

            let mut buf = [0u8; READ_CHUNK];
            match self.reader.read(&mut buf) {
                Ok(0) => {
                    if let Some(stream) = self.stream.take() {
                        self.queue.extend(stream.finish());
                    }
                    if self.queue.is_empty() {
                        return None;
                    }
                }
                Ok(n) => {
                    if let Some(stream) = self.stream.as_mut() {
                        self.queue.extend(stream.feed(&buf[..n]));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.stream = None;
                    return Some(Err(GedError::FileReadError(e)));
                }
            }
        }
    }
}

/// Open a GEDCOM file as an incremental [`GedReader`].
#[instrument(level = "debug")]
pub fn from_file(path: &Path) -> GedResult<GedReader<BufReader<File>>> {
    if !path.exists() {
        return Err(GedError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    Ok(GedReader::new(BufReader::new(file)))
}

/// Parse a complete GEDCOM file into its record trees.
#[instrument(level = "debug")]
pub fn parse_file(path: &Path) -> GedResult<Vec<RecordTree>> {
    from_file(path)?.collect()
}

/// Parse a complete in-memory document.
pub fn parse_str(input: &str) -> Vec<RecordTree> {
    let mut stream = GedStream::new();
    let mut trees = stream.feed_str(input);
    trees.extend(stream.finish());
    trees
}
