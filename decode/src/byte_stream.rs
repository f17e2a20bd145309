use std::mem;

use tracing::{trace, warn};

use crate::errors::ByteStreamError;

/// A start code is confirmed by `0x01` once at least two zero bytes precede it. Longer runs of
/// zeros are clamped so a four-byte start code strips at most three of them.
const MAX_ZERO_RUN: u8 = 3;

/// Position of the latest start code inside the chunk currently being scanned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PrefixState {
    /// No start code confirmed in this chunk yet. The unit in progress lives in the carry buffer.
    NoPrefixSeen,
    /// A start code ended right before this offset.
    PrefixSeenAt(usize),
}

/// `ByteStreamScanner` splits an Annex-B byte stream into NAL unit payloads.
///
/// The stream may be handed over in chunks of any size. Bytes belonging to a unit whose closing
/// start code has not shown up yet are kept in a carry buffer between calls, so the emitted
/// payloads are the same no matter where the chunk boundaries fall.
#[derive(Debug)]
pub struct ByteStreamScanner {
    prefix_count: usize,
    zero_run: u8,
    carry: Vec<u8>,
    max_buffer_len: usize,
}

impl ByteStreamScanner {
    pub fn new(max_buffer_len: usize) -> Self {
        Self {
            prefix_count: 0,
            zero_run: 0,
            carry: Vec::new(),
            max_buffer_len,
        }
    }

    /// Number of start codes found since creation or the last `reset`.
    pub fn prefix_count(&self) -> usize {
        self.prefix_count
    }

    /// Bytes held back for the unit in progress.
    pub fn pending_len(&self) -> usize {
        self.carry.len()
    }

    /// Scans the next chunk of the stream and returns every payload completed by a start code in
    /// it. Payloads start with the NAL header byte; start codes are stripped. Anything before the
    /// first start code of the stream is dropped.
    pub fn scan(&mut self, chunk: &[u8]) -> Result<Vec<Vec<u8>>, ByteStreamError> {
        let mut units = vec![];
        let mut prefix = PrefixState::NoPrefixSeen;

        for (i, &byte) in chunk.iter().enumerate() {
            match byte {
                0x00 => {
                    self.zero_run = (self.zero_run + 1).min(MAX_ZERO_RUN);
                    continue;
                }
                0x01 if self.zero_run >= 2 => {
                    // the unit runs from the previous start code up to the zeros of this one
                    let mut unit = match prefix {
                        PrefixState::PrefixSeenAt(start) => chunk[start..i].to_vec(),
                        PrefixState::NoPrefixSeen => {
                            let mut unit = mem::take(&mut self.carry);
                            unit.extend_from_slice(&chunk[..i]);
                            unit
                        }
                    };
                    unit.truncate(unit.len().saturating_sub(self.zero_run as usize));

                    if !unit.is_empty() && self.prefix_count > 0 {
                        trace!(len = unit.len(), header = unit[0], "nal unit complete");
                        units.push(unit);
                    }

                    prefix = PrefixState::PrefixSeenAt(i + 1);
                    self.prefix_count += 1;
                }
                _ => {}
            }

            self.zero_run = 0;
        }

        match prefix {
            PrefixState::PrefixSeenAt(start) => {
                self.carry.clear();
                self.carry.extend_from_slice(&chunk[start..]);
            }
            PrefixState::NoPrefixSeen => self.carry.extend_from_slice(chunk),
        }

        if self.carry.len() > self.max_buffer_len {
            let len = self.carry.len();
            // the unit in progress is lost; later scans start from an empty buffer
            self.carry.clear();
            self.zero_run = 0;

            warn!(len, max = self.max_buffer_len, "no start code within buffer limit");
            return Err(ByteStreamError::CarryBufferOverflow {
                len,
                max: self.max_buffer_len,
            });
        }

        Ok(units)
    }

    /// Hands out the unit still in progress once the stream has ended. Trailing zero bytes are
    /// not part of any NAL unit and are stripped. Returns `None` if no start code was ever seen or
    /// nothing is left.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        let mut unit = mem::take(&mut self.carry);
        self.zero_run = 0;

        if self.prefix_count == 0 {
            return None;
        }

        let len = unit.iter().rposition(|&b| b != 0x00).map_or(0, |last| last + 1);
        unit.truncate(len);

        (!unit.is_empty()).then_some(unit)
    }

    pub fn reset(&mut self) {
        self.prefix_count = 0;
        self.zero_run = 0;
        self.carry.clear();
    }
}
