use crate::errors::DecodingError;

/// Tunables for `H264Reader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Number of bytes requested from the source per read.
    pub chunk_size: usize,

    /// Upper bound on the bytes the scanner may hold while waiting for the next start code.
    pub max_buffer_len: usize,

    /// Emit the unit still buffered when the source runs dry. Off by default: only units closed
    /// by a following start code are returned.
    pub flush_trailing_unit: bool,
}

impl ReaderConfig {
    pub const DEFAULT_CHUNK_SIZE: usize = 1024;
    pub const DEFAULT_MAX_BUFFER_LEN: usize = 1024 * 1024;

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_buffer_len(mut self, max_buffer_len: usize) -> Self {
        self.max_buffer_len = max_buffer_len;
        self
    }

    pub fn with_flush_trailing_unit(mut self, flush_trailing_unit: bool) -> Self {
        self.flush_trailing_unit = flush_trailing_unit;
        self
    }

    pub fn validate(&self) -> Result<(), DecodingError> {
        if self.chunk_size == 0 {
            return Err(DecodingError::InvalidConfig(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.max_buffer_len == 0 {
            return Err(DecodingError::InvalidConfig(
                "max_buffer_len must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            max_buffer_len: Self::DEFAULT_MAX_BUFFER_LEN,
            flush_trailing_unit: false,
        }
    }
}
