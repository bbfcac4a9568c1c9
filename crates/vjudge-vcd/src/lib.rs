//! VCD waveform-trace reader.
//!
//! Parses a Value Change Dump file produced by a Verilog simulator and
//! answers "what was signal S at timestamp T" queries. The reader covers
//! the subset of IEEE 1364 VCD that simulators actually emit for judge
//! traces: scope/var declarations, scalar and vector value changes, and
//! real-number changes.

pub mod error;
mod trace;

pub use error::{Result, VcdError};
pub use trace::VcdTrace;
