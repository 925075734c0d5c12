//! Shared handles the lifecycle operations need (spec §4.10 inputs: C1, C2,
//! the queue publisher, and C7 for document removal).

use kbrag_coordinator::IndexCoordinator;
use kbrag_object::ObjectStoreGateway;
use kbrag_postgres::PgClient;
use kbrag_queue::IndexingJobPublisher;

use crate::config::LifecycleConfig;

pub struct LifecycleContext {
    pub pg: PgClient,
    pub objects: ObjectStoreGateway,
    pub publisher: IndexingJobPublisher,
    pub coordinator: IndexCoordinator,
    pub config: LifecycleConfig,
}

impl LifecycleContext {
    pub fn new(
        pg: PgClient,
        objects: ObjectStoreGateway,
        publisher: IndexingJobPublisher,
        coordinator: IndexCoordinator,
    ) -> Self {
        Self {
            pg,
            objects,
            publisher,
            coordinator,
            config: LifecycleConfig::default(),
        }
    }
}
