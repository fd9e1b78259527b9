//! Re-export of [`HashAlgorithm`](crate::HashAlgorithm).

pub use crate::HashAlgorithm;
