mod cloudfile;
mod provider;
mod statuspage;

pub use provider::{FetchError, HttpSnapshotSource, SnapshotSource};

#[cfg(test)]
pub use provider::MockSnapshotSource;
