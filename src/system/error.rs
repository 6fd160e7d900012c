use std::path::PathBuf;

use thiserror::Error;

/// Failures reading raw counters from the data source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("counter `{0}` is not exposed by the data source")]
    MissingCounter(&'static str),

    #[error("malformed line in {file}: {line:?}")]
    Malformed { file: &'static str, line: String },
}

/// Failures of one sampling round. None of these carry partial results.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("total memory reported as zero")]
    ZeroTotalMemory,

    #[error("CPU topology changed: expected cores {expected:?}, found {found:?}")]
    TopologyChanged { expected: Vec<u32>, found: Vec<u32> },

    #[error("data source reported no CPU cores")]
    NoCores,
}
