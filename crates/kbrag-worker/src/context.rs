//! Shared handles a worker needs to process jobs (spec §4.8 inputs: C1,
//! C3, C4, C5, C7 plus the metadata store).

use kbrag_chunker::ChunkerConfig;
use kbrag_coordinator::IndexCoordinator;
use kbrag_models::ModelGateway;
use kbrag_object::ObjectStoreGateway;
use kbrag_postgres::PgClient;

pub struct WorkerContext {
    pub pg: PgClient,
    pub objects: ObjectStoreGateway,
    pub models: ModelGateway,
    pub coordinator: IndexCoordinator,
    pub chunker_config: ChunkerConfig,
}

impl WorkerContext {
    pub fn new(
        pg: PgClient,
        objects: ObjectStoreGateway,
        models: ModelGateway,
        coordinator: IndexCoordinator,
    ) -> Self {
        Self {
            pg,
            objects,
            models,
            coordinator,
            chunker_config: ChunkerConfig::default(),
        }
    }
}
