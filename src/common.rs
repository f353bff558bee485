//! Defines some common functions used in this library.

/// Numeric constants and defaults.
pub mod constants;

/// Defines some checker functions.
pub(crate) mod checker;

/// Defines some useful functions such as the exponential loss.
pub mod utils;
