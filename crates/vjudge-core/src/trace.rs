//! Waveform-trace seam.
//!
//! The checker only needs "value of signal S at timestamp T"; everything
//! about the trace format lives behind these traits so tests can substitute
//! an in-memory fake, the way storage is faked elsewhere in the workspace.

use crate::error::{JudgeError, Result};
use std::path::Path;
use tracing::debug;

/// An opened waveform trace.
pub trait WaveformTrace {
    /// Value of `signal` at `timestamp`, or `None` when the trace does not
    /// know the signal.
    fn signal_value(&self, signal: &str, timestamp: u64) -> Option<&str>;
}

/// Opens trace files produced by the simulation step.
pub trait TraceSource: Send + Sync {
    type Trace: WaveformTrace;

    /// Open the trace at `path`; failure is fatal
    /// ([`JudgeError::OpeningVcdFile`]).
    fn open(&self, path: &Path) -> Result<Self::Trace>;
}

impl WaveformTrace for vjudge_vcd::VcdTrace {
    fn signal_value(&self, signal: &str, timestamp: u64) -> Option<&str> {
        vjudge_vcd::VcdTrace::signal_value(self, signal, timestamp)
    }
}

/// Production trace source backed by the VCD reader.
#[derive(Debug, Clone, Default)]
pub struct VcdTraceSource;

impl TraceSource for VcdTraceSource {
    type Trace = vjudge_vcd::VcdTrace;

    fn open(&self, path: &Path) -> Result<Self::Trace> {
        let trace =
            vjudge_vcd::VcdTrace::read_from_path(path).map_err(|e| JudgeError::OpeningVcdFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), timescale = ?trace.timescale(), "opened VCD trace");
        Ok(trace)
    }
}
