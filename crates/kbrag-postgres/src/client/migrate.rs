//! Schema migration execution, mirroring `nvisy-postgres::client::migrate`.

use std::ops::DerefMut;
use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Outcome of a [`run_pending_migrations`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    pub duration: Duration,
    pub processed_versions: Vec<String>,
}

impl MigrationResult {
    pub fn is_no_op(&self) -> bool {
        self.processed_versions.is_empty()
    }
}

/// Applies every migration embedded in [`MIGRATIONS`] that hasn't run yet.
///
/// Diesel's migration harness is synchronous, so the actual run happens on
/// a blocking task wrapping the pooled connection.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(target: TRACING_TARGET_MIGRATION, "applying pending migrations");

    let start = Instant::now();
    let conn = pg.get_pooled_connection().await?;
    let mut wrapper: AsyncConnectionWrapper<_> = conn.into();

    let outcome = spawn_blocking(move || {
        let result = wrapper.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
        });
        (result, wrapper)
    })
    .await;

    let duration = start.elapsed();
    let (result, mut wrapper) = outcome.map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "migration task panicked");
        PgError::Migration(err.into())
    })?;
    let _ = wrapper.deref_mut();

    let processed_versions = result.map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "migration run failed");
        PgError::Migration(err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        applied = processed_versions.len(),
        "migrations complete"
    );

    Ok(MigrationResult {
        duration,
        processed_versions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_op_result_has_no_processed_versions() {
        let result = MigrationResult {
            duration: Duration::from_millis(5),
            processed_versions: vec![],
        };
        assert!(result.is_no_op());
    }
}
