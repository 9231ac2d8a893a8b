//! Result type aliases for Caravel.

use crate::CaravelError;

/// A specialized `Result` type for Caravel operations.
pub type CaravelResult<T> = Result<T, CaravelError>;
