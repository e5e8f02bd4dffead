// Pipeline processing: decoding, projection, pairing, normalization and aggregation

pub mod aggregate;
pub mod filename;
pub mod normalize;
pub mod projector;
pub mod reader;
pub mod session;
pub mod twins;
