//! Index descriptor blob (`indexes/<kbId>/index.meta.json`, spec §6).

use serde::{Deserialize, Serialize};

/// Small sidecar descriptor co-written with the index payload so readers
/// can detect a torn read without deserializing the (possibly large)
/// payload first (spec §4.7 "stale-blob handling").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub dimension: u32,
    pub vector_count: u32,
    /// Opaque version token, written alongside the payload in the same
    /// coordinator step so the two agree on what KB `version` they
    /// correspond to (spec §4.7 step 6).
    pub version_token: u64,
}
