/// Incremental reassembly of newline-terminated protocol lines.
///
/// Network chunk boundaries are arbitrary: a line may arrive split across
/// any number of reads, and a multi-byte UTF-8 sequence may straddle two
/// chunks. The framer buffers raw bytes and decodes only complete lines, so
/// no emitted line is ever split or corrupted by fragmentation.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    /// Feed one chunk and drain every line completed by it.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut lines = Vec::new();

        while let Some(split) = self.buffer.iter().position(|&byte| byte == b'\n') {
            let line = String::from_utf8_lossy(&self.buffer[..split]).into_owned();
            self.buffer.drain(..=split);
            lines.push(line);
        }

        lines
    }

    pub fn has_partial(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Take whatever trailing fragment remains at end of stream.
    ///
    /// The protocol requires a trailing newline on the final meaningful
    /// line; an unterminated fragment is not flushed as content. Callers
    /// log what was dropped.
    pub fn take_partial(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }

        let partial = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        Some(partial)
    }
}
