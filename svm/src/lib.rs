pub mod vm;
pub mod constants;
pub mod debug;
pub mod console;
pub mod signals;
pub mod runner;

// Re-export commonly used types
pub use vm::{HaltReason, Snapshot, SnapshotError, VMState, VmError, VM};
pub use runner::{RunError, RunOutcome, Runner};
