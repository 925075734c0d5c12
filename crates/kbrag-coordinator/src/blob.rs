//! Loading and writing the per-KB index blob and its descriptor
//! (spec §4.7 steps 3, 5-6), kept apart from the Postgres-touching retry
//! loop in [`crate::merge`] so it can be exercised without a database.

use bytes::Bytes;
use kbrag_core::object_keys::{index_descriptor_key, index_payload_key};
use kbrag_object::ObjectStoreGateway;
use kbrag_vector::{IndexDescriptor, VectorIndex};
use uuid::Uuid;

use crate::error::{CoordinatorError, CoordinatorResult};

/// Loads the index blob for `kb_id`, or an empty index of `dimension` if
/// none exists yet (spec §4.7 step 3).
pub async fn load_or_empty(
    objects: &ObjectStoreGateway,
    kb_id: Uuid,
    dimension: u32,
) -> CoordinatorResult<VectorIndex> {
    let key = index_payload_key(kb_id);
    match objects.get_object(&key).await {
        Ok(bytes) => Ok(VectorIndex::deserialize(&bytes)?),
        Err(err) if err.kind() == kbrag_core::CoreErrorKind::NotFound => {
            Ok(VectorIndex::empty(dimension))
        }
        Err(err) => Err(CoordinatorError::Storage(err)),
    }
}

/// Reads the index and its descriptor for the read-only query path,
/// retrying once on a torn read (descriptor/payload mismatch) before
/// surfacing `IndexUnavailable` (spec §4.7 "Query path").
pub async fn load_for_query(
    objects: &ObjectStoreGateway,
    kb_id: Uuid,
) -> CoordinatorResult<(VectorIndex, IndexDescriptor)> {
    match try_load_consistent(objects, kb_id).await {
        Ok(loaded) => Ok(loaded),
        Err(_) => try_load_consistent(objects, kb_id)
            .await
            .map_err(|_| CoordinatorError::IndexUnavailable { kb_id }),
    }
}

async fn try_load_consistent(
    objects: &ObjectStoreGateway,
    kb_id: Uuid,
) -> CoordinatorResult<(VectorIndex, IndexDescriptor)> {
    let descriptor_bytes = objects.get_object(&index_descriptor_key(kb_id)).await?;
    let descriptor: IndexDescriptor = serde_json::from_slice(&descriptor_bytes)
        .map_err(|e| CoordinatorError::Vector(kbrag_vector::VectorError::Corrupt(e.to_string())))?;

    let payload_bytes = objects.get_object(&index_payload_key(kb_id)).await?;
    let index = VectorIndex::deserialize(&payload_bytes)?;

    if index.count() as u32 != descriptor.vector_count || index.dimension() != descriptor.dimension
    {
        return Err(CoordinatorError::IndexUnavailable { kb_id });
    }

    Ok((index, descriptor))
}

/// Serializes `index` and writes it and its descriptor to object storage
/// (spec §4.7 steps 5-6). Returns the descriptor that was written.
pub async fn write_merged(
    objects: &ObjectStoreGateway,
    kb_id: Uuid,
    index: &VectorIndex,
    version_token: u64,
) -> CoordinatorResult<IndexDescriptor> {
    let payload = index.serialize()?;
    objects
        .put_object(&index_payload_key(kb_id), Bytes::from(payload), "application/octet-stream")
        .await?;

    let descriptor = IndexDescriptor {
        dimension: index.dimension(),
        vector_count: index.count() as u32,
        version_token,
    };
    let descriptor_bytes =
        serde_json::to_vec(&descriptor).expect("IndexDescriptor always serializes");
    objects
        .put_object(&index_descriptor_key(kb_id), Bytes::from(descriptor_bytes), "application/json")
        .await?;

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendal::Operator;
    use opendal::services::Memory;

    fn memory_gateway() -> ObjectStoreGateway {
        let operator = Operator::new(Memory::default()).unwrap().finish();
        ObjectStoreGateway::from_operator(operator)
    }

    #[tokio::test]
    async fn load_or_empty_starts_empty_when_no_blob_exists() {
        let gw = memory_gateway();
        let idx = load_or_empty(&gw, Uuid::new_v4(), 3).await.unwrap();
        assert_eq!(idx.dimension(), 3);
        assert_eq!(idx.count(), 0);
    }

    #[tokio::test]
    async fn write_then_load_round_trips() {
        let gw = memory_gateway();
        let kb_id = Uuid::new_v4();
        let mut idx = VectorIndex::empty(2);
        idx.add(vec![vec![1.0, 2.0]], vec![Uuid::new_v4()]).unwrap();

        write_merged(&gw, kb_id, &idx, 1).await.unwrap();
        let (loaded, descriptor) = load_for_query(&gw, kb_id).await.unwrap();

        assert_eq!(loaded.count(), 1);
        assert_eq!(descriptor.version_token, 1);
        assert_eq!(descriptor.vector_count, 1);
    }

    #[tokio::test]
    async fn torn_read_surfaces_index_unavailable() {
        let gw = memory_gateway();
        let kb_id = Uuid::new_v4();
        let idx = VectorIndex::empty(2);
        write_merged(&gw, kb_id, &idx, 1).await.unwrap();

        // Overwrite only the descriptor to simulate a losing retry's
        // superseded payload (spec §4.7 "Stale-blob handling").
        let bad_descriptor = IndexDescriptor {
            dimension: 2,
            vector_count: 99,
            version_token: 2,
        };
        gw.put_object(
            &index_descriptor_key(kb_id),
            Bytes::from(serde_json::to_vec(&bad_descriptor).unwrap()),
            "application/json",
        )
        .await
        .unwrap();

        let err = load_for_query(&gw, kb_id).await.unwrap_err();
        assert!(matches!(err, CoordinatorError::IndexUnavailable { .. }));
    }
}
