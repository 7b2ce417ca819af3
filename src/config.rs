//! Runtime constants.

/// Pause between paginated aws CLI calls, in milliseconds.
pub const SLEEP_MSEC: u64 = 200;

/// Ceiling on a single aws CLI response, in bytes. Interface listings on
/// large accounts run to megabytes; anything past this is a runaway query.
pub const MAX_CMD_OUTPUT: usize = 20_000_000;
