//! Compact serialization parsing
mod decode;
mod split;

pub use decode::CompactToken;
pub use split::SplitJwt;
