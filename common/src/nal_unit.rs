use crate::nal_unit_type::NalUnitType;

/// The one-byte header that opens every `NalUnit`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NalUnitHeader {
    /// `forbidden_zero_bit` shall be equal to 0.
    pub forbidden_zero_bit: bool,

    /// `nal_ref_idc` not equal to 0 specifies that the content of the NAL unit contains a sequence
    /// parameter set, a picture parameter set or a slice of a reference picture.
    ///
    /// `nal_ref_idc` shall be equal to 0 for all NAL units having nal_unit_type equal to 6, 9, 10,
    /// 11, or 12.
    pub nal_ref_idc: u8,

    /// `nal_unit_type` specifies the type of `RBSP` data structure contained in the NAL unit.
    pub nal_unit_type: NalUnitType,
}

impl NalUnitHeader {
    pub fn from_byte(first_byte: u8) -> Self {
        Self {
            forbidden_zero_bit: first_byte & 0b1000_0000 != 0,
            nal_ref_idc: (first_byte & 0b0110_0000) >> 5,
            nal_unit_type: NalUnitType::from_u8(first_byte & 0b0001_1111),
        }
    }
}

/// Decodes the three header fields packed into the first byte of a NAL unit. Every byte value is
/// a valid input.
pub fn decode_header(first_byte: u8) -> NalUnitHeader {
    NalUnitHeader::from_byte(first_byte)
}

/// `NalUnit` is a syntax structure containing an indication of the type of data to follow and bytes
/// containing that data in the form of an `RBSP` interspersed as necessary with
/// emulation prevention bytes.
///
/// `data` holds the header byte followed by the payload exactly as it appeared in the byte stream,
/// start code excluded. Emulation prevention bytes are left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NalUnit {
    /// Never derived from the stream; always 0.
    picture_order_count: u32,
    header: NalUnitHeader,
    data: Vec<u8>,
}

impl NalUnit {
    /// A unique sequence of three bytes equal to `0x000001` embedded in the byte stream as a prefix
    /// to each `NalUnit`. The location of a `START_CODE_PREFIX` can be used by a decoder to identify
    /// the beginning of a new `NAL unit` and the end of a previous NAL unit.
    pub const START_CODE_PREFIX: [u8; 3] = [0x00, 0x00, 0x01];

    /// Builds a `NalUnit` from a payload whose first byte is the NAL header. Returns `None` when
    /// `data` is empty since there is no header to decode.
    pub fn from_payload(data: Vec<u8>) -> Option<Self> {
        let header = NalUnitHeader::from_byte(*data.first()?);

        Some(Self {
            picture_order_count: 0,
            header,
            data,
        })
    }

    pub fn header(&self) -> NalUnitHeader {
        self.header
    }

    pub fn forbidden_zero_bit(&self) -> bool {
        self.header.forbidden_zero_bit
    }

    pub fn nal_ref_idc(&self) -> u8 {
        self.header.nal_ref_idc
    }

    pub fn nal_unit_type(&self) -> NalUnitType {
        self.header.nal_unit_type
    }

    pub fn picture_order_count(&self) -> u32 {
        self.picture_order_count
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Everything after the header byte. Emulation prevention bytes are not removed, so this is
    /// not an `RBSP`.
    pub fn payload(&self) -> &[u8] {
        &self.data[1..]
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
