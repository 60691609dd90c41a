//! Central configuration and constants for the Synacor VM front end

// Default locations
pub const DEFAULT_IMAGE: &str = "challenge.bin";
pub const DEFAULT_SAVE_DIR: &str = "saves";

// Instructions executed between output flushes and signal checks
pub const STEP_BATCH: usize = 10_000;

// How long to wait for a line of input before re-checking signals
pub const INPUT_POLL_INTERVAL_MS: u64 = 50;

// Snapshot file format
pub const SNAPSHOT_VERSION: u32 = 1;
pub const SNAPSHOT_PREFIX: &str = "snapshot-";
pub const SNAPSHOT_EXTENSION: &str = "json";

// Exit status after a stop signal (128 + SIGINT)
pub const EXIT_STOPPED: i32 = 130;
