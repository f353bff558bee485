/// Tolerance used when solving the `2 x 2` system for `(a, b)`.
/// A candidate whose aggregated `Q` or `P - Q` is smaller than this
/// in absolute value is treated as degenerate.
pub const SOLVE_TOLERANCE: f64 = 1e-6;

/// Seed of the feature sub-sampling generator.
pub const DEFAULT_SEED: u64 = 0;

/// Number of rounds `Booster::run` performs by default.
pub const DEFAULT_ROUNDS: usize = 100;

/// Every example starts with this weight for every class.
pub const INITIAL_WEIGHT: f64 = 1.0;

/// Column width of the console log.
pub const PRINT_WIDTH: usize = 8;
/// Digits after the decimal point in the console log.
pub const PRINT_PRECISION: usize = 5;
