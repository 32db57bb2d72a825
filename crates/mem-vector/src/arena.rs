//! Contiguous `(id, vector)` pairs built once a tier has enough records
//! to make a flat scan over a `DashMap` worth avoiding. Rebuilt lazily
//! from scratch on the next search after any mutation; this workspace
//! has no ANN crate in its dependency stack, so the "index" is a cache
//! of contiguous memory for a faster scan, not an approximate structure.

use uuid::Uuid;

pub struct Arena {
    pub ids: Vec<Uuid>,
    pub vectors: Vec<Vec<f32>>,
}

impl Arena {
    pub fn build(items: impl Iterator<Item = (Uuid, Vec<f32>)>) -> Self {
        let (ids, vectors) = items.unzip();
        Self { ids, vectors }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
