//! Chunk-to-line splitting with carry-over of the trailing fragment

/// Splits an arbitrarily chunked character stream into logical lines.
///
/// Chunk boundaries carry no meaning: the final piece of every chunk is
/// held back as a fragment until the next chunk or [`LineSplitter::finish`]
/// proves it complete.
#[derive(Debug, Default)]
pub struct LineSplitter {
    fragment: String,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line it completes, in order.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.fragment.push_str(chunk);
        if !self.fragment.contains('\n') {
            return Vec::new();
        }

        let buffered = std::mem::take(&mut self.fragment);
        let mut pieces: Vec<&str> = buffered.split('\n').collect();
        // the stream may continue, so the last piece is never complete yet
        self.fragment = pieces.pop().unwrap_or_default().to_owned();

        pieces.into_iter().map(str::to_owned).collect()
    }

    /// Flush the held-back fragment at end of stream, as if a final
    /// newline had arrived.
    pub fn finish(&mut self) -> Option<String> {
        if self.fragment.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.fragment))
        }
    }
}
