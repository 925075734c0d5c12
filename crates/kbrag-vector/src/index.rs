//! In-memory L2 vector index (C6, spec §4.6).
//!
//! The teacher crate (`nvisy-vector`) delegates to external ANN backends
//! (Qdrant/Milvus/Pinecone/pgvector). This spec needs an index that is
//! exact, deterministic, and trivially serializable as an object-store
//! blob, so the backend here is a flat brute-force matrix instead — shaped
//! after the add/search/save/load lifecycle in
//! `vyotiq-ai-vyotiq-agent/rust-backend/src/embedder.rs`, with the
//! config/error plumbing kept in `nvisy-vector`'s style.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::error::{VectorError, VectorResult};

/// A self-consistent, in-memory L2 index: a dense array of vectors of a
/// fixed dimension and a parallel array mapping row position to vector id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    dimension: u32,
    vectors: Vec<Vec<f32>>,
    ids: Vec<Uuid>,
}

/// A single k-NN search hit: `(vector_id, L2 distance)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub vector_id: Uuid,
    pub distance: f32,
}

impl VectorIndex {
    /// Creates an empty index of the given dimension (spec §4.7 step 3,
    /// "start from an empty index of dimension d").
    pub fn empty(dimension: u32) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
            ids: Vec::new(),
        }
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn count(&self) -> usize {
        self.vectors.len()
    }

    /// Appends vectors and their ids. Every vector must match the index's
    /// dimension; every id must be unique within the index (spec §4.6,
    /// §3 "Vector index" invariant).
    #[tracing::instrument(skip(self, vectors), fields(dimension = self.dimension, incoming = vectors.len()))]
    pub fn add(&mut self, vectors: Vec<Vec<f32>>, vector_ids: Vec<Uuid>) -> VectorResult<()> {
        if vectors.len() != vector_ids.len() {
            return Err(VectorError::Corrupt(
                "vectors and vector_ids length mismatch".into(),
            ));
        }
        for v in &vectors {
            if v.len() as u32 != self.dimension {
                return Err(VectorError::DimensionMismatch {
                    expected: self.dimension,
                    actual: v.len() as u32,
                });
            }
        }
        for id in &vector_ids {
            if self.ids.contains(id) {
                return Err(VectorError::DuplicateVectorId(*id));
            }
        }
        tracing::debug!(target: TRACING_TARGET, added = vectors.len(), total = self.vectors.len() + vectors.len(), "merged vectors into index");
        self.vectors.extend(vectors);
        self.ids.extend(vector_ids);
        Ok(())
    }

    /// Removes every vector whose id is in `vector_ids` (document delete,
    /// spec §4.7 "Removal path").
    #[tracing::instrument(skip(self, vector_ids), fields(requested = vector_ids.len()))]
    pub fn remove_by_ids(&mut self, vector_ids: &[Uuid]) {
        let before = self.ids.len();
        let mut kept_vectors = Vec::with_capacity(self.vectors.len());
        let mut kept_ids = Vec::with_capacity(self.ids.len());
        for (vector, id) in self.vectors.drain(..).zip(self.ids.drain(..)) {
            if !vector_ids.contains(&id) {
                kept_vectors.push(vector);
                kept_ids.push(id);
            }
        }
        self.vectors = kept_vectors;
        self.ids = kept_ids;
        tracing::debug!(target: TRACING_TARGET, removed = before - self.ids.len(), remaining = self.ids.len(), "removed vectors from index");
    }

    /// Exact k-nearest-neighbour search under L2 distance, ascending by
    /// distance with ties broken by ascending `vector_id` for citation
    /// stability (spec §4.9 "Determinism note"). The index is never
    /// mutated (spec §4.6).
    pub fn search(&self, query: &[f32], k: usize) -> VectorResult<Vec<SearchHit>> {
        if query.len() as u32 != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len() as u32,
            });
        }
        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .zip(self.ids.iter())
            .map(|(v, id)| SearchHit {
                vector_id: *id,
                distance: l2_distance(query, v),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.vector_id.cmp(&b.vector_id))
        });
        hits.truncate(k);
        Ok(hits)
    }

    /// Serializes the index to a byte payload (`indexes/<kbId>/index.bin`).
    pub fn serialize(&self) -> VectorResult<Vec<u8>> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| VectorError::Serialization(e.to_string()))
    }

    /// Deserializes an index payload produced by [`Self::serialize`].
    pub fn deserialize(bytes: &[u8]) -> VectorResult<Self> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(index, _)| index)
            .map_err(|e| VectorError::Corrupt(e.to_string()))
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(values: &[f32]) -> Vec<f32> {
        values.to_vec()
    }

    #[test]
    fn add_then_search_returns_nearest_first() {
        let mut idx = VectorIndex::empty(2);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        idx.add(vec![vec_of(&[0.0, 0.0]), vec_of(&[10.0, 10.0])], vec![a, b])
            .unwrap();

        let hits = idx.search(&[0.1, 0.1], 2).unwrap();
        assert_eq!(hits[0].vector_id, a);
        assert_eq!(hits[1].vector_id, b);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn dimension_mismatch_on_add_is_rejected() {
        let mut idx = VectorIndex::empty(3);
        let err = idx
            .add(vec![vec_of(&[1.0, 2.0])], vec![Uuid::new_v4()])
            .unwrap_err();
        assert!(matches!(err, VectorError::DimensionMismatch { .. }));
    }

    #[test]
    fn duplicate_vector_id_is_rejected() {
        let mut idx = VectorIndex::empty(1);
        let id = Uuid::new_v4();
        idx.add(vec![vec_of(&[1.0])], vec![id]).unwrap();
        let err = idx.add(vec![vec_of(&[2.0])], vec![id]).unwrap_err();
        assert!(matches!(err, VectorError::DuplicateVectorId(_)));
    }

    #[test]
    fn remove_by_ids_drops_matching_vectors() {
        let mut idx = VectorIndex::empty(1);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        idx.add(vec![vec_of(&[1.0]), vec_of(&[2.0])], vec![a, b])
            .unwrap();
        idx.remove_by_ids(&[a]);
        assert_eq!(idx.count(), 1);
        let hits = idx.search(&[2.0], 1).unwrap();
        assert_eq!(hits[0].vector_id, b);
    }

    #[test]
    fn k_larger_than_count_returns_all() {
        let mut idx = VectorIndex::empty(1);
        idx.add(vec![vec_of(&[1.0])], vec![Uuid::new_v4()]).unwrap();
        assert_eq!(idx.search(&[1.0], 50).unwrap().len(), 1);
    }

    #[test]
    fn empty_index_returns_zero_results() {
        let idx = VectorIndex::empty(2);
        assert!(idx.search(&[0.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn round_trip_serialization_is_byte_exact() {
        let mut idx = VectorIndex::empty(2);
        idx.add(
            vec![vec_of(&[1.5, -2.5]), vec_of(&[0.0, 3.0])],
            vec![Uuid::new_v4(), Uuid::new_v4()],
        )
        .unwrap();

        let bytes = idx.serialize().unwrap();
        let restored = VectorIndex::deserialize(&bytes).unwrap();

        assert_eq!(restored.dimension(), idx.dimension());
        assert_eq!(restored.ids, idx.ids);
        assert_eq!(restored.vectors, idx.vectors);
    }

    #[test]
    fn ties_break_by_ascending_vector_id() {
        let mut idx = VectorIndex::empty(1);
        let low = Uuid::nil();
        let high = Uuid::max();
        // Both equidistant from the query.
        idx.add(vec![vec_of(&[1.0]), vec_of(&[1.0])], vec![high, low])
            .unwrap();
        let hits = idx.search(&[0.0], 2).unwrap();
        assert_eq!(hits[0].vector_id, low);
        assert_eq!(hits[1].vector_id, high);
    }
}
