mod nal_unit;
mod nal_unit_type;

pub use nal_unit::{decode_header, NalUnit, NalUnitHeader};
pub use nal_unit_type::NalUnitType;
