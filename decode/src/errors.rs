use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ByteStreamError {
    #[error(
        "carry buffer grew to {len} bytes without a start code, exceeding the {max} byte limit"
    )]
    CarryBufferOverflow { len: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum DecodingError {
    #[error("No byte source was provided to the reader")]
    MissingSource,

    #[error("Invalid reader configuration: {0}")]
    InvalidConfig(String),

    #[error("An error occurred when opening the file")]
    FileError(#[from] io::Error),

    #[error("An error occurred reading the byte stream after {offset} bytes")]
    ReadError {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("An error occurred reading from the nal unit stream buffer")]
    BytestreamError(#[from] ByteStreamError),
}
