//! Result type alias for fileferry operations

use crate::Error;

/// Result type alias for fileferry operations
pub type Result<T> = std::result::Result<T, Error>;
