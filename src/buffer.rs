//! Reusable byte buffers for decompression and record decoding.

use std::collections::{HashMap, VecDeque};

use bytes::BytesMut;
use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Hands out buffers and takes them back for reuse.
///
/// Buffers returned by [`get`](Self::get) are empty with at least the
/// requested capacity.
pub trait BufferSupplier: Send + Sync {
    fn get(&self, capacity: usize) -> Result<BytesMut>;

    /// Give a buffer back. Its contents are discarded.
    fn release(&self, buffer: BytesMut);

    /// Drop all cached buffers; later calls to `get` fail.
    fn close(&self);
}

/// Allocates on every call and never caches.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCaching;

impl BufferSupplier for NoCaching {
    fn get(&self, capacity: usize) -> Result<BytesMut> {
        Ok(BytesMut::with_capacity(capacity))
    }

    fn release(&self, _buffer: BytesMut) {}

    fn close(&self) {}
}

#[derive(Debug, Default)]
struct Pool<T> {
    closed: bool,
    cached: T,
}

/// Caches released buffers keyed by their capacity.
#[derive(Debug, Default)]
pub struct CachingSupplier {
    pool: Mutex<Pool<HashMap<usize, VecDeque<BytesMut>>>>,
}

impl CachingSupplier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferSupplier for CachingSupplier {
    fn get(&self, capacity: usize) -> Result<BytesMut> {
        let mut pool = self.pool.lock();
        if pool.closed {
            return Err(Error::BufferSupplierClosed);
        }
        Ok(pool
            .cached
            .get_mut(&capacity)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| BytesMut::with_capacity(capacity)))
    }

    fn release(&self, mut buffer: BytesMut) {
        let mut pool = self.pool.lock();
        if pool.closed {
            return;
        }
        buffer.clear();
        pool.cached
            .entry(buffer.capacity())
            .or_default()
            .push_back(buffer);
    }

    fn close(&self) {
        let mut pool = self.pool.lock();
        pool.closed = true;
        pool.cached.clear();
    }
}

/// Keeps a single buffer around, replacing it when a larger one is asked for.
#[derive(Debug, Default)]
pub struct GrowableSupplier {
    pool: Mutex<Pool<Option<BytesMut>>>,
}

impl GrowableSupplier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferSupplier for GrowableSupplier {
    fn get(&self, capacity: usize) -> Result<BytesMut> {
        let mut pool = self.pool.lock();
        if pool.closed {
            return Err(Error::BufferSupplierClosed);
        }
        Ok(match pool.cached.take() {
            Some(buffer) if buffer.capacity() >= capacity => buffer,
            _ => BytesMut::with_capacity(capacity),
        })
    }

    fn release(&self, mut buffer: BytesMut) {
        let mut pool = self.pool.lock();
        if pool.closed {
            return;
        }
        buffer.clear();
        pool.cached = Some(buffer);
    }

    fn close(&self) {
        let mut pool = self.pool.lock();
        pool.closed = true;
        pool.cached = None;
    }
}
