//! Lock-free ring buffer for real-time audio processing
//!
//! Carries captured input samples from the input callback to the output
//! callback. Split into producer and consumer halves so each side is
//! owned by exactly one stream.
//!
//! Performance characteristics:
//! - Lock-free (no mutex contention)
//! - Wait-free for single producer/consumer
//! - Cache-friendly sequential access
//! - No allocations in hot path

use crossbeam::utils::CachePadded;
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct RingInner {
    /// Sample storage; each slot is touched by at most one side at a time
    buffer: Box<[Cell<f32>]>,

    /// Write position (cache-padded to prevent false sharing)
    write_pos: CachePadded<AtomicUsize>,

    /// Read position (cache-padded to prevent false sharing)
    read_pos: CachePadded<AtomicUsize>,

    /// Buffer capacity (power of 2 for fast modulo)
    capacity: usize,

    /// Mask for fast modulo operation (capacity - 1)
    mask: usize,
}

// SAFETY: the producer only writes slots between read_pos and write_pos'
// free region and publishes them with a Release store of write_pos; the
// consumer only reads slots it observed through an Acquire load. No slot
// is accessed by both sides at once.
unsafe impl Sync for RingInner {}
unsafe impl Send for RingInner {}

impl RingInner {
    #[inline]
    fn available_write(&self, write_pos: usize, read_pos: usize) -> usize {
        // One slot is kept empty to distinguish full from empty
        self.capacity - (write_pos.wrapping_sub(read_pos)) - 1
    }

    #[inline]
    fn available_read(&self, read_pos: usize, write_pos: usize) -> usize {
        write_pos.wrapping_sub(read_pos)
    }
}

/// Producer half of the sample ring (input callback side)
pub struct RingProducer {
    inner: Arc<RingInner>,
}

/// Consumer half of the sample ring (output callback side)
pub struct RingConsumer {
    inner: Arc<RingInner>,
}

/// Create a producer/consumer pair over a shared ring
///
/// Capacity is rounded up to the next power of 2.
pub fn sample_ring(mut capacity: usize) -> (RingProducer, RingConsumer) {
    if !capacity.is_power_of_two() {
        capacity = capacity.next_power_of_two();
    }

    let inner = Arc::new(RingInner {
        buffer: (0..capacity).map(|_| Cell::new(0.0)).collect(),
        write_pos: CachePadded::new(AtomicUsize::new(0)),
        read_pos: CachePadded::new(AtomicUsize::new(0)),
        capacity,
        mask: capacity - 1,
    });

    (
        RingProducer {
            inner: Arc::clone(&inner),
        },
        RingConsumer { inner },
    )
}

impl RingProducer {
    /// Write samples, returning how many fit
    ///
    /// Lock-free and wait-free; excess samples are dropped.
    pub fn push(&mut self, samples: &[f32]) -> usize {
        let inner = &*self.inner;
        let write_pos = inner.write_pos.load(Ordering::Relaxed);
        let read_pos = inner.read_pos.load(Ordering::Acquire);

        let available = inner.available_write(write_pos, read_pos);
        let to_write = samples.len().min(available);

        for (i, &sample) in samples[..to_write].iter().enumerate() {
            let pos = (write_pos + i) & inner.mask;
            // SAFETY NOTE: pos is within the free region computed above;
            // the consumer cannot touch it until write_pos is published.
            inner.buffer[pos].set(sample);
        }

        // Release publishes the slot contents with the new position
        inner
            .write_pos
            .store(write_pos.wrapping_add(to_write), Ordering::Release);

        to_write
    }

    pub fn available(&self) -> usize {
        let inner = &*self.inner;
        let write_pos = inner.write_pos.load(Ordering::Relaxed);
        let read_pos = inner.read_pos.load(Ordering::Acquire);
        inner.available_write(write_pos, read_pos)
    }
}

impl RingConsumer {
    /// Read samples, returning how many were available
    ///
    /// Lock-free and wait-free.
    pub fn pop(&mut self, buffer: &mut [f32]) -> usize {
        let inner = &*self.inner;
        let read_pos = inner.read_pos.load(Ordering::Relaxed);
        let write_pos = inner.write_pos.load(Ordering::Acquire);

        let available = inner.available_read(read_pos, write_pos);
        let to_read = buffer.len().min(available);

        for (i, slot) in buffer[..to_read].iter_mut().enumerate() {
            let pos = (read_pos + i) & inner.mask;
            *slot = inner.buffer[pos].get();
        }

        inner
            .read_pos
            .store(read_pos.wrapping_add(to_read), Ordering::Release);

        to_read
    }

    /// Fill the whole buffer, zero-padding when the ring underruns
    pub fn pop_or_silence(&mut self, buffer: &mut [f32]) {
        let read = self.pop(buffer);
        for slot in &mut buffer[read..] {
            *slot = 0.0;
        }
    }

    /// Samples currently buffered
    pub fn len(&self) -> usize {
        let inner = &*self.inner;
        let read_pos = inner.read_pos.load(Ordering::Relaxed);
        let write_pos = inner.write_pos.load(Ordering::Acquire);
        inner.available_read(read_pos, write_pos)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }
}
