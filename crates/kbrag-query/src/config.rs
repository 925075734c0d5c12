//! Query engine tuning (spec §5, "Query handlers apply their own
//! per-request deadline").

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct QueryConfig {
    pub deadline: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(20),
        }
    }
}
