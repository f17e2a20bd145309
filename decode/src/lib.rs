mod byte_stream;
mod config;
mod decoder;
mod errors;

pub use byte_stream::ByteStreamScanner;
pub use common::{decode_header, NalUnit, NalUnitHeader, NalUnitType};
pub use config::ReaderConfig;
pub use decoder::{H264Reader, H264ReaderBuilder, MappedFile};
pub use errors::{ByteStreamError, DecodingError};
