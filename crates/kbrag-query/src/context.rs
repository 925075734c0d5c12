//! Shared handles the query engine needs to answer one request (spec §4.9
//! inputs: C2, C3, C7).

use kbrag_models::ModelGateway;
use kbrag_object::ObjectStoreGateway;
use kbrag_postgres::PgClient;

use crate::config::QueryConfig;

pub struct QueryContext {
    pub pg: PgClient,
    pub objects: ObjectStoreGateway,
    pub models: ModelGateway,
    pub config: QueryConfig,
}

impl QueryContext {
    pub fn new(pg: PgClient, objects: ObjectStoreGateway, models: ModelGateway) -> Self {
        Self {
            pg,
            objects,
            models,
            config: QueryConfig::default(),
        }
    }
}
