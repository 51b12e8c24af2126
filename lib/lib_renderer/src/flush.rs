use serde::Deserialize;

use crate::{Quad, QuadBatch, TextureId};

/// When queued quads are handed to the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushPolicy {
    /// Flush only when a draw uses a different texture than the queued quads, or at frame end.
    #[default]
    OnTextureChange,
    /// Flush before every draw, so every primitive call is its own draw call.
    Always,
}

/// Receives a full batch together with the texture all of its quads were queued under.
pub trait FlushSink {
    fn flush(&mut self, texture: TextureId, batch: &QuadBatch);
}

/// Queues quads per bound texture and decides when they must be flushed.
#[derive(Debug, Clone)]
pub struct Batcher {
    batch: QuadBatch,
    bound: TextureId,
    policy: FlushPolicy,
}

impl Batcher {
    pub fn new(capacity: usize, policy: FlushPolicy, bound: TextureId) -> Self {
        Self {
            batch: QuadBatch::with_capacity(capacity),
            bound,
            policy,
        }
    }

    /// Queues `quads` to be drawn with `texture`, flushing first if the policy demands it.
    pub fn submit(
        &mut self,
        texture: TextureId,
        quads: impl IntoIterator<Item = Quad>,
        sink: &mut impl FlushSink,
    ) {
        if self.policy == FlushPolicy::Always || texture != self.bound {
            self.flush(sink);
        }
        self.bound = texture;

        for quad in quads {
            self.batch.push(quad);
        }
    }

    /// Hands the queued quads to `sink` and empties the batch. Returns whether anything was
    /// flushed.
    pub fn flush(&mut self, sink: &mut impl FlushSink) -> bool {
        if self.batch.is_empty() {
            return false;
        }

        sink.flush(self.bound, &self.batch);
        self.batch.clear();

        true
    }

    /// Drops queued quads without drawing them.
    pub fn discard(&mut self) -> usize {
        let dropped = self.batch.len();
        self.batch.clear();

        dropped
    }

    pub fn batch(&self) -> &QuadBatch {
        &self.batch
    }

    pub fn bound(&self) -> TextureId {
        self.bound
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use lib_math::{Color, Rect};

    use super::*;
    use crate::{ChannelDepth, TextureRegistry};

    #[derive(Default)]
    struct Flushes(Vec<(TextureId, usize)>);

    impl FlushSink for Flushes {
        fn flush(&mut self, texture: TextureId, batch: &QuadBatch) {
            self.0.push((texture, batch.len()));
        }
    }

    fn rect() -> Quad {
        Quad::solid(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE)
    }

    fn ids() -> (TextureId, TextureId) {
        let mut registry = TextureRegistry::new();
        let white = registry.register(1, 1, ChannelDepth::Rgba).id();
        let tex = registry.register(8, 8, ChannelDepth::Rgba).id();
        (white, tex)
    }

    #[test]
    fn texture_change_splits_batches() {
        let (white, tex) = ids();
        let mut batcher = Batcher::new(16, FlushPolicy::OnTextureChange, white);
        let mut sink = Flushes::default();

        batcher.submit(white, [rect()], &mut sink);
        batcher.submit(tex, [rect()], &mut sink);
        batcher.submit(white, [rect()], &mut sink);
        batcher.flush(&mut sink);

        assert_eq!(sink.0, [(white, 1), (tex, 1), (white, 1)]);
    }

    #[test]
    fn same_texture_shares_a_batch() {
        let (white, _) = ids();
        let mut batcher = Batcher::new(16, FlushPolicy::OnTextureChange, white);
        let mut sink = Flushes::default();

        batcher.submit(white, [rect()], &mut sink);
        batcher.submit(white, [rect(), rect()], &mut sink);
        assert!(sink.0.is_empty());

        batcher.flush(&mut sink);
        assert_eq!(sink.0, [(white, 3)]);
    }

    #[test]
    fn always_flushes_per_call() {
        let (white, tex) = ids();
        let mut batcher = Batcher::new(16, FlushPolicy::Always, white);
        let mut sink = Flushes::default();

        batcher.submit(white, [rect()], &mut sink);
        batcher.submit(white, [rect()], &mut sink);
        batcher.submit(tex, [rect(), rect()], &mut sink);
        batcher.flush(&mut sink);

        assert_eq!(sink.0, [(white, 1), (white, 1), (tex, 2)]);
    }

    #[test]
    fn empty_flush_is_a_no_op() {
        let (white, tex) = ids();
        let mut batcher = Batcher::new(16, FlushPolicy::OnTextureChange, white);
        let mut sink = Flushes::default();

        assert!(!batcher.flush(&mut sink));
        batcher.submit(tex, [rect()], &mut sink);

        assert!(sink.0.is_empty());
        assert_eq!(batcher.bound(), tex);
    }

    #[test]
    fn next_quad_after_flush_is_index_zero() {
        let (white, _) = ids();
        let mut batcher = Batcher::new(16, FlushPolicy::OnTextureChange, white);
        let mut sink = Flushes::default();
        let marker = Quad::solid(Rect::new(5.0, 5.0, 1.0, 1.0), Color::RED);

        batcher.submit(white, [rect(), rect()], &mut sink);
        batcher.flush(&mut sink);
        batcher.submit(white, [marker], &mut sink);

        assert_eq!(batcher.batch().len(), 1);
        assert_eq!(batcher.batch().get(0), Some(&marker));
    }

    #[test]
    fn discard_reports_dropped_quads() {
        let (white, _) = ids();
        let mut batcher = Batcher::new(16, FlushPolicy::OnTextureChange, white);
        let mut sink = Flushes::default();

        batcher.submit(white, [rect(), rect()], &mut sink);
        assert_eq!(batcher.discard(), 2);
        assert!(!batcher.flush(&mut sink));
    }
}
