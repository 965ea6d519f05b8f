//! Process exit codes. Part of the CLI contract; scripts depend on them.
//!
//! Codes 1-4 come from `EvalError::exit_code`:
//! 1 no samples, 2 configuration, 3 model call or reply, 4 dataset.

pub const SUCCESS: i32 = 0;
pub const INTERNAL_ERROR: i32 = 5; // Anything else (I/O on output, serialization)
