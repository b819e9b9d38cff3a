//! The aggregator capability.

use crate::configuration::Configuration;
use crate::domain::{LaunchResults, Result};
use crate::storage::ReportStorage;

/// Produces named artifacts from a batch of launch results.
///
/// Implementations read `configuration` and `launches` without mutating
/// them, and commit each artifact with a single storage write so a failure
/// never leaves a partial artifact behind. Invoked at most once per run.
pub trait Aggregator: Send + Sync {
    fn aggregate(
        &self,
        configuration: &Configuration,
        launches: &[LaunchResults],
        storage: &dyn ReportStorage,
    ) -> Result<()>;
}
