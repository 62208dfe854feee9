pub mod codec;
pub mod sniff;
pub mod document;
pub mod decoder;
pub mod verify;
pub mod embed;

pub use codec::{CodecError, Endian, PackedSequence, WordWidth, pack, pack_bytes};
pub use sniff::{EncodingTag, sniff};
pub use document::LiteralDocument;
pub use decoder::emit_decoder;
pub use verify::VerificationReport;
pub use embed::{EmbedOptions, convert, self_test};
