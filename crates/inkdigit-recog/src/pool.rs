//! Bounded pool of scratch buffers
//!
//! Buffers are borrowed as [`PooledBuffer`] guards. Dropping a guard clears
//! the buffer and hands it back, unless the pool already holds `capacity`
//! idle buffers, in which case it is freed.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};

/// Idle buffers kept by default
pub const DEFAULT_POOL_CAPACITY: usize = 10;

/// A shareable pool of `Vec<f32>` scratch buffers
#[derive(Debug, Clone)]
pub struct BufferPool {
    idle: Arc<Mutex<Vec<Vec<f32>>>>,
    capacity: usize,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl BufferPool {
    /// Create a pool that retains at most `capacity` idle buffers
    pub fn new(capacity: usize) -> Self {
        Self {
            idle: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<f32>>> {
        // idle buffers carry no state
        self.idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Borrow a zero-filled buffer of `len` elements
    pub fn acquire(&self, len: usize) -> PooledBuffer {
        let mut buf = self.lock().pop().unwrap_or_default();
        buf.resize(len, 0.0);
        PooledBuffer {
            buf,
            pool: self.clone(),
        }
    }

    /// Maximum number of idle buffers retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of idle buffers currently held
    pub fn available(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, mut buf: Vec<f32>) {
        buf.clear();
        let mut idle = self.lock();
        if idle.len() < self.capacity {
            idle.push(buf);
        }
    }
}

/// A buffer borrowed from a [`BufferPool`]
#[derive(Debug)]
pub struct PooledBuffer {
    buf: Vec<f32>,
    pool: BufferPool,
}

impl Deref for PooledBuffer {
    type Target = Vec<f32>;

    fn deref(&self) -> &Vec<f32> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Vec<f32> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.release(buf);
    }
}
