use std::fmt;

/// Definitions of `nal_unit_type` pulled from Table 7-1.
///
/// Values 14 to 18 and 20 to 31 have no dedicated meaning for a plain H.264 byte stream and
/// collapse into `Reserved`, which keeps the raw value around.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NalUnitType {
    Unspecified,
    CodedSliceNonIDRPicture,
    CodedSliceDataPartitionA,
    CodedSliceDataPartitionB,
    CodedSliceDataPartitionC,
    CodedSliceIDRPicture,
    SupplementalEnhancementInformation,
    SequenceParameterSet,
    PictureParameterSet,
    AccessUnitDelimiter,
    SequenceEnd,
    StreamEnd,
    FillerData,
    SequenceParameterSetExtension,
    CodedSliceAuxiliaryCodedPictureNonPartitioning,
    Reserved(u8),
}

impl NalUnitType {
    /// Only the low five bits of `nal_unit_type` are considered.
    pub fn from_u8(nal_unit_type: u8) -> Self {
        match nal_unit_type & 0x1F {
            0 => NalUnitType::Unspecified,
            1 => NalUnitType::CodedSliceNonIDRPicture,
            2 => NalUnitType::CodedSliceDataPartitionA,
            3 => NalUnitType::CodedSliceDataPartitionB,
            4 => NalUnitType::CodedSliceDataPartitionC,
            5 => NalUnitType::CodedSliceIDRPicture,
            6 => NalUnitType::SupplementalEnhancementInformation,
            7 => NalUnitType::SequenceParameterSet,
            8 => NalUnitType::PictureParameterSet,
            9 => NalUnitType::AccessUnitDelimiter,
            10 => NalUnitType::SequenceEnd,
            11 => NalUnitType::StreamEnd,
            12 => NalUnitType::FillerData,
            13 => NalUnitType::SequenceParameterSetExtension,
            19 => NalUnitType::CodedSliceAuxiliaryCodedPictureNonPartitioning,
            other => NalUnitType::Reserved(other),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            NalUnitType::Unspecified => 0,
            NalUnitType::CodedSliceNonIDRPicture => 1,
            NalUnitType::CodedSliceDataPartitionA => 2,
            NalUnitType::CodedSliceDataPartitionB => 3,
            NalUnitType::CodedSliceDataPartitionC => 4,
            NalUnitType::CodedSliceIDRPicture => 5,
            NalUnitType::SupplementalEnhancementInformation => 6,
            NalUnitType::SequenceParameterSet => 7,
            NalUnitType::PictureParameterSet => 8,
            NalUnitType::AccessUnitDelimiter => 9,
            NalUnitType::SequenceEnd => 10,
            NalUnitType::StreamEnd => 11,
            NalUnitType::FillerData => 12,
            NalUnitType::SequenceParameterSetExtension => 13,
            NalUnitType::CodedSliceAuxiliaryCodedPictureNonPartitioning => 19,
            NalUnitType::Reserved(value) => *value,
        }
    }

    /// Coded slice NAL units, i.e. the ones carrying picture data.
    pub fn is_vcl(&self) -> bool {
        matches!(
            self,
            NalUnitType::CodedSliceNonIDRPicture
                | NalUnitType::CodedSliceDataPartitionA
                | NalUnitType::CodedSliceDataPartitionB
                | NalUnitType::CodedSliceDataPartitionC
                | NalUnitType::CodedSliceIDRPicture
        )
    }
}

impl fmt::Display for NalUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NalUnitType::Unspecified => write!(f, "Unspecified"),
            NalUnitType::CodedSliceNonIDRPicture => write!(f, "Slice"),
            NalUnitType::CodedSliceDataPartitionA => write!(f, "SliceDPA"),
            NalUnitType::CodedSliceDataPartitionB => write!(f, "SliceDPB"),
            NalUnitType::CodedSliceDataPartitionC => write!(f, "SliceDPC"),
            NalUnitType::CodedSliceIDRPicture => write!(f, "IDR"),
            NalUnitType::SupplementalEnhancementInformation => write!(f, "SEI"),
            NalUnitType::SequenceParameterSet => write!(f, "SPS"),
            NalUnitType::PictureParameterSet => write!(f, "PPS"),
            NalUnitType::AccessUnitDelimiter => write!(f, "AUD"),
            NalUnitType::SequenceEnd => write!(f, "EndOfSeq"),
            NalUnitType::StreamEnd => write!(f, "EndOfStream"),
            NalUnitType::FillerData => write!(f, "Filler"),
            NalUnitType::SequenceParameterSetExtension => write!(f, "SPSExt"),
            NalUnitType::CodedSliceAuxiliaryCodedPictureNonPartitioning => write!(f, "SliceAux"),
            NalUnitType::Reserved(value) => write!(f, "Reserved({value})"),
        }
    }
}
