//! Audio-thread EQ processing
//!
//! `EqProcessor` owns both channel chains and the receiving end of the
//! coefficient update channel. Updates are drained at the start of each
//! block, so every sample within a block sees one coherent coefficient
//! set and no sample ever sees a half-applied one.

use crossbeam::channel::Receiver;
use virelai_core::domain::{ChainUpdate, StageChain};

pub struct EqProcessor {
    left: StageChain,
    right: StageChain,
    updates: Receiver<ChainUpdate>,
}

impl EqProcessor {
    pub fn new(updates: Receiver<ChainUpdate>) -> Self {
        Self {
            left: StageChain::new(),
            right: StageChain::new(),
            updates,
        }
    }

    /// Drain all pending updates, installing only the newest
    ///
    /// Allocation-free and non-blocking, safe inside the callback.
    fn drain_updates(&mut self) {
        let mut latest = None;
        while let Ok(update) = self.updates.try_recv() {
            latest = Some(update);
        }
        if let Some(update) = latest {
            update.apply_to(&mut self.left);
            update.apply_to(&mut self.right);
        }
    }

    /// Process one interleaved block in place
    ///
    /// Channel 0 goes through the left chain, channel 1 through the
    /// right; any further channels, and a trailing partial frame,
    /// pass through untouched.
    pub fn process_interleaved(&mut self, data: &mut [f32], channels: usize) {
        self.drain_updates();

        if channels == 0 {
            return;
        }
        if channels == 1 {
            self.left.process(data);
            return;
        }
        for frame in data.chunks_exact_mut(channels) {
            frame[0] = self.left.process_sample(frame[0]);
            frame[1] = self.right.process_sample(frame[1]);
        }
    }

    /// Zero both chains' delay lines
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}
