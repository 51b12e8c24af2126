use crate::Quad;

/// Growable, append-only list of quads waiting for the next flush.
///
/// The logical capacity starts at the configured size and doubles exactly on overflow, so
/// the GPU side can size its storage buffer from [`capacity`](Self::capacity) alone.
#[derive(Debug, Clone)]
pub struct QuadBatch {
    quads: Vec<Quad>,
    capacity: usize,
}

impl QuadBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            quads: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, quad: Quad) {
        if self.quads.len() == self.capacity {
            let new_capacity = self.capacity * 2;
            log::debug!("quad batch capacity {} -> {}", self.capacity, new_capacity);

            self.quads.reserve_exact(new_capacity - self.quads.len());
            self.capacity = new_capacity;
        }

        self.quads.push(quad);
    }

    /// Empties the batch, keeping its storage.
    pub fn clear(&mut self) {
        self.quads.clear();
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[Quad] {
        &self.quads
    }

    pub fn get(&self, index: usize) -> Option<&Quad> {
        self.quads.get(index)
    }
}
