mod message_codec;
mod record_type_map;

pub use message_codec::HickoryWireCodec;
pub use record_type_map::RecordTypeMapper;
