use std::fs::File;
use std::io::{Cursor, ErrorKind, Read};
use std::path::Path;

use common::{NalUnit, NalUnitType};
use memmap::Mmap;
use tracing::{debug, trace, warn};

use crate::byte_stream::ByteStreamScanner;
use crate::config::ReaderConfig;
use crate::errors::DecodingError;

/// Reads an Annex-B H.264 byte stream from `source` and collects its NAL units.
#[derive(Debug)]
pub struct H264Reader<R> {
    source: R,
    config: ReaderConfig,
}

impl<R: Read> H264Reader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            config: ReaderConfig::default(),
        }
    }

    pub fn with_config(source: R, config: ReaderConfig) -> Result<Self, DecodingError> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn builder() -> H264ReaderBuilder<R> {
        H264ReaderBuilder::default()
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Consumes the source until it is exhausted and returns every NAL unit in stream order.
    /// Supplemental enhancement information units are dropped.
    ///
    /// On error nothing is returned: units already found and bytes still buffered are discarded.
    pub fn read_all(&mut self) -> Result<Vec<NalUnit>, DecodingError> {
        let mut scanner = ByteStreamScanner::new(self.config.max_buffer_len);
        let mut payloads = vec![];
        let mut chunk = vec![0u8; self.config.chunk_size];
        let mut offset = 0u64;

        loop {
            let n = match self.source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(DecodingError::ReadError { offset, source }),
            };

            trace!(offset, len = n, "scanning chunk");
            payloads.extend(scanner.scan(&chunk[..n])?);
            offset += n as u64;
        }

        if self.config.flush_trailing_unit {
            payloads.extend(scanner.finish());
        }

        let scanned = payloads.len();
        let nal_units: Vec<NalUnit> = payloads
            .into_iter()
            .filter_map(NalUnit::from_payload)
            .filter(|nal_unit| {
                nal_unit.nal_unit_type() != NalUnitType::SupplementalEnhancementInformation
            })
            .inspect(|nal_unit| {
                if nal_unit.forbidden_zero_bit() {
                    warn!(
                        nal_unit_type = %nal_unit.nal_unit_type(),
                        "nal unit has forbidden_zero_bit set"
                    );
                }
            })
            .collect();

        debug!(
            bytes = offset,
            start_codes = scanner.prefix_count(),
            scanned,
            kept = nal_units.len(),
            "byte stream consumed"
        );

        Ok(nal_units)
    }
}

/// Contents of a memory-mapped file. A zero-length file cannot be mapped and reads as empty.
#[derive(Debug)]
pub struct MappedFile(Option<Mmap>);

impl MappedFile {
    pub fn map(file: &File) -> Result<Self, DecodingError> {
        if file.metadata()?.len() == 0 {
            return Ok(Self(None));
        }

        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self(Some(mmap)))
    }
}

impl AsRef<[u8]> for MappedFile {
    fn as_ref(&self) -> &[u8] {
        self.0.as_deref().unwrap_or(&[])
    }
}

impl H264Reader<Cursor<MappedFile>> {
    pub fn from_file(file: File) -> Result<Self, DecodingError> {
        let mapped = MappedFile::map(&file)?;
        Ok(H264Reader::new(Cursor::new(mapped)))
    }

    pub fn from_file_path(file_path: impl AsRef<Path>) -> Result<Self, DecodingError> {
        let file = File::open(file_path)?;
        H264Reader::from_file(file)
    }
}

/// Assembles an `H264Reader`, failing when no source was supplied.
#[derive(Debug)]
pub struct H264ReaderBuilder<R> {
    source: Option<R>,
    config: ReaderConfig,
}

impl<R> Default for H264ReaderBuilder<R> {
    fn default() -> Self {
        Self {
            source: None,
            config: ReaderConfig::default(),
        }
    }
}

impl<R: Read> H264ReaderBuilder<R> {
    pub fn source(mut self, source: R) -> Self {
        self.source = Some(source);
        self
    }

    pub fn config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<H264Reader<R>, DecodingError> {
        let source = self.source.ok_or(DecodingError::MissingSource)?;
        H264Reader::with_config(source, self.config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::*;
    use crate::errors::ByteStreamError;

    fn sps_pps_sei() -> Vec<u8> {
        vec![
            0x00, 0x00, 0x00, 0x01, 0x67, 0xAA, 0xBB, // sps
            0x00, 0x00, 0x01, 0x68, 0xCC, // pps
            0x00, 0x00, 0x01, 0x06, 0xDD, 0xEE, // sei
        ]
    }

    /// Hands out `data` and then fails instead of reporting end of input.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(ErrorKind::ConnectionReset, "stream dropped")),
                n => Ok(n),
            }
        }
    }

    /// Interrupts every other read.
    struct InterruptingReader {
        data: Cursor<Vec<u8>>,
        interrupt: bool,
    }

    impl Read for InterruptingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let len = buf.len().min(1);
            self.data.read(&mut buf[..len])
        }
    }

    #[test]
    fn test_sps_pps_sei_single_chunk() -> Result<(), DecodingError> {
        let mut reader = H264Reader::new(Cursor::new(sps_pps_sei()));
        let nal_units = reader.read_all()?;

        assert_eq!(nal_units.len(), 2);
        assert_eq!(nal_units[0].nal_unit_type().as_u8(), 7);
        assert_eq!(nal_units[0].data(), &[0x67, 0xAA, 0xBB]);
        assert_eq!(nal_units[1].nal_unit_type().as_u8(), 8);
        assert_eq!(nal_units[1].data(), &[0x68, 0xCC]);
        assert!(nal_units.iter().all(|n| n.picture_order_count() == 0));
        Ok(())
    }

    #[test]
    fn test_sei_dropped_mid_stream() -> Result<(), DecodingError> {
        let data = vec![
            0x00, 0x00, 0x01, 0x06, 0x05, 0xFF, // sei
            0x00, 0x00, 0x01, 0x65, 0x88, // idr
            0x00, 0x00, 0x01, 0x09, 0xF0, // aud
            0x00, 0x00, 0x01, 0x41, // slice, never closed
        ];

        let mut scanner = ByteStreamScanner::new(ReaderConfig::DEFAULT_MAX_BUFFER_LEN);
        let raw = scanner.scan(&data)?;
        assert_eq!(raw[0], vec![0x06, 0x05, 0xFF]);

        let nal_units = H264Reader::new(Cursor::new(data)).read_all()?;
        let types: Vec<NalUnitType> = nal_units.iter().map(|n| n.nal_unit_type()).collect();

        assert_eq!(
            types,
            vec![
                NalUnitType::CodedSliceIDRPicture,
                NalUnitType::AccessUnitDelimiter
            ]
        );
        Ok(())
    }

    #[test]
    fn test_trailing_unit_dropped_by_default() -> Result<(), DecodingError> {
        let data = vec![0x00, 0x00, 0x01, 0x67, 0xAA, 0x00, 0x00, 0x01, 0x68, 0xCC];

        let nal_units = H264Reader::new(Cursor::new(data)).read_all()?;

        assert_eq!(nal_units.len(), 1);
        assert_eq!(nal_units[0].data(), &[0x67, 0xAA]);
        Ok(())
    }

    #[test]
    fn test_trailing_unit_kept_when_flushing() -> Result<(), DecodingError> {
        let data = vec![0x00, 0x00, 0x01, 0x67, 0x42, 0x00, 0x00, 0x01, 0x65, 0x88, 0x00];
        let config = ReaderConfig::default().with_flush_trailing_unit(true);

        let nal_units = H264Reader::with_config(Cursor::new(data), config)?.read_all()?;

        assert_eq!(nal_units.len(), 2);
        assert_eq!(nal_units[1].data(), &[0x65, 0x88]);
        Ok(())
    }

    #[test]
    fn test_small_chunks_match_default() -> Result<(), DecodingError> {
        let mut data = vec![0xDE, 0xAD];
        for header in [0x67u8, 0x68, 0x06, 0x65, 0x41, 0x41] {
            data.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, header, 0x9A, 0x00, 0x03, 0x7F]);
        }

        // sei dropped, last slice never closed
        let expected = H264Reader::new(Cursor::new(data.clone())).read_all()?;
        assert_eq!(expected.len(), 4);

        for chunk_size in [1, 2, 3, 5, 7] {
            let config = ReaderConfig::default().with_chunk_size(chunk_size);
            let nal_units = H264Reader::with_config(Cursor::new(data.clone()), config)?.read_all()?;
            assert_eq!(nal_units, expected, "chunk_size {chunk_size}");
        }
        Ok(())
    }

    #[test]
    fn test_empty_source() -> Result<(), DecodingError> {
        let nal_units = H264Reader::new(io::empty()).read_all()?;

        assert!(nal_units.is_empty());
        Ok(())
    }

    #[test]
    fn test_read_error_propagates() {
        let reader = FailingReader {
            data: Cursor::new(sps_pps_sei()),
        };

        let result = H264Reader::new(reader).read_all();

        assert!(matches!(
            result,
            Err(DecodingError::ReadError { offset: 18, .. })
        ));
    }

    #[test]
    fn test_interrupted_reads_retried() -> Result<(), DecodingError> {
        let reader = InterruptingReader {
            data: Cursor::new(sps_pps_sei()),
            interrupt: false,
        };

        let nal_units = H264Reader::new(reader).read_all()?;

        assert_eq!(nal_units.len(), 2);
        Ok(())
    }

    #[test]
    fn test_oversized_stream_fails() {
        let config = ReaderConfig::default()
            .with_chunk_size(64)
            .with_max_buffer_len(256);
        let data = vec![0x5Au8; 1024];

        let result = H264Reader::with_config(Cursor::new(data), config)
            .and_then(|mut reader| reader.read_all());

        assert!(matches!(
            result,
            Err(DecodingError::BytestreamError(
                ByteStreamError::CarryBufferOverflow { max: 256, .. }
            ))
        ));
    }

    #[test]
    fn test_builder_without_source() {
        let result = H264Reader::<Cursor<Vec<u8>>>::builder().build();

        assert!(matches!(result, Err(DecodingError::MissingSource)));
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        let result = H264Reader::builder()
            .source(Cursor::new(sps_pps_sei()))
            .config(ReaderConfig::default().with_chunk_size(0))
            .build();

        assert!(matches!(result, Err(DecodingError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder() -> Result<(), DecodingError> {
        let mut reader = H264Reader::builder()
            .source(Cursor::new(sps_pps_sei()))
            .config(ReaderConfig::default().with_chunk_size(4))
            .build()?;

        assert_eq!(reader.config().chunk_size, 4);
        assert_eq!(reader.read_all()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_reading_from_file_path() -> Result<(), DecodingError> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(&sps_pps_sei())?;
        file.flush()?;

        let mut reader = H264Reader::from_file_path(file.path())?;
        let nal_units = reader.read_all()?;

        assert_eq!(nal_units.len(), 2);
        assert_eq!(nal_units[0].nal_unit_type(), NalUnitType::SequenceParameterSet);
        Ok(())
    }

    #[test]
    fn test_reading_empty_file() -> Result<(), DecodingError> {
        let file = tempfile::NamedTempFile::new()?;

        let nal_units = H264Reader::from_file_path(file.path())?.read_all()?;

        assert!(nal_units.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = H264Reader::from_file_path("./does-not-exist.h264");

        assert!(matches!(result, Err(DecodingError::FileError(_))));
    }
}
