//! NASDAQ ITCH 5.0 wire model: message kinds, typed bodies, and the capture
//! decoder. Prices and symbols are unit-converted here; the reconstruction
//! engine never sees raw wire integers.

pub mod decode;
pub mod messages;

pub use decode::Decoder;
pub use messages::{Body, Message, MessageKind, Side};
