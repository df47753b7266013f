//! Growable byte buffers and a bounded pool that recycles them.
//!
//! A render acquires an [`ArenaBuffer`] from a [`BufferPool`], writes into
//! it, copies the bytes out, and hands it back. Small outputs never touch
//! the heap: the first [`DEFAULT_CAPACITY`] bytes live inline.
//!
//! Invariants:
//! - contents are always valid UTF-8; raw bytes that are not are stored as
//!   U+FFFD
//! - a buffer handed out by the pool is always empty
//! - a buffer whose capacity exceeded [`MAX_RETAINED_CAPACITY`] is released
//!   back to inline storage instead of being kept
//! - the pool never holds more than [`MAX_IDLE_BUFFERS`] idle buffers

use std::fmt;
use std::io;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use smallvec::SmallVec;

/// Inline capacity of a fresh buffer.
pub const DEFAULT_CAPACITY: usize = 64;

/// Buffers that grew past this many bytes drop their storage on release.
pub const MAX_RETAINED_CAPACITY: usize = 16 << 10;

/// Upper bound on idle buffers kept by a pool.
pub const MAX_IDLE_BUFFERS: usize = 64;

const REPLACEMENT: &str = "\u{fffd}";

// ---------------------------------------------------------------------------
// ArenaBuffer
// ---------------------------------------------------------------------------

/// Append-only UTF-8 buffer with doubling growth.
#[derive(Debug, Clone, Default)]
pub struct ArenaBuffer {
    bytes: SmallVec<[u8; DEFAULT_CAPACITY]>,
}

impl ArenaBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    #[allow(unsafe_code)]
    pub fn as_str(&self) -> &str {
        debug_assert!(std::str::from_utf8(&self.bytes).is_ok());
        // SAFETY: every writer below appends whole UTF-8 sequences only.
        unsafe { std::str::from_utf8_unchecked(&self.bytes) }
    }

    /// Ensure room for `additional` more bytes. Capacity doubles, or jumps
    /// straight to the requirement when doubling is not enough.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.bytes.len().saturating_add(additional);
        let cap = self.bytes.capacity();
        if required <= cap {
            return;
        }
        let target = required.max(cap.saturating_mul(2));
        self.bytes.reserve_exact(target - self.bytes.len());
    }

    /// Append raw bytes. Invalid UTF-8 sequences are stored as U+FFFD.
    pub fn write(&mut self, bytes: &[u8]) {
        if let Ok(s) = std::str::from_utf8(bytes) {
            self.write_str(s);
            return;
        }
        for chunk in bytes.utf8_chunks() {
            self.write_str(chunk.valid());
            if !chunk.invalid().is_empty() {
                self.write_str(REPLACEMENT);
            }
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.reserve(s.len());
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Append one ASCII byte; anything above 0x7f becomes U+FFFD.
    pub fn write_byte(&mut self, byte: u8) {
        if !byte.is_ascii() {
            self.write_str(REPLACEMENT);
            return;
        }
        self.reserve(1);
        self.bytes.push(byte);
    }

    pub fn write_char(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        self.write_str(c.encode_utf8(&mut tmp));
    }

    /// Append `count` copies of `byte`, or of U+FFFD for a non-ASCII byte.
    pub fn fill(&mut self, byte: u8, count: usize) {
        if count == 0 {
            return;
        }
        if !byte.is_ascii() {
            self.reserve(count.saturating_mul(REPLACEMENT.len()));
            for _ in 0..count {
                self.write_str(REPLACEMENT);
            }
            return;
        }
        self.reserve(count);
        let len = self.bytes.len();
        self.bytes.resize(len + count, byte);
    }

    /// Drop contents, keeping capacity.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Empty the buffer for reuse. Returns `true` when oversized storage was
    /// discarded.
    fn reset(&mut self) -> bool {
        if self.bytes.capacity() > MAX_RETAINED_CAPACITY {
            self.bytes = SmallVec::new();
            true
        } else {
            self.bytes.clear();
            false
        }
    }
}

impl fmt::Write for ArenaBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        ArenaBuffer::write_str(self, s);
        Ok(())
    }
}

impl io::Write for ArenaBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        ArenaBuffer::write(self, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BufferPool
// ---------------------------------------------------------------------------

/// Thread-safe LIFO pool of idle buffers.
#[derive(Debug)]
pub struct BufferPool {
    idle: Mutex<Vec<ArenaBuffer>>,
    acquired: AtomicU64,
    reused: AtomicU64,
    oversize_dropped: AtomicU64,
}

/// Point-in-time pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Buffers handed out.
    pub acquired: u64,
    /// Acquisitions served from an idle buffer.
    pub reused: u64,
    /// Releases that discarded storage above [`MAX_RETAINED_CAPACITY`].
    pub oversize_dropped: u64,
    /// Buffers currently idle.
    pub idle: usize,
}

impl BufferPool {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            acquired: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            oversize_dropped: AtomicU64::new(0),
        }
    }

    /// Take an empty buffer, reusing an idle one when available. The buffer
    /// returns to the pool when the guard drops.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        let buf = match self.idle.lock().pop() {
            Some(buf) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => ArenaBuffer::new(),
        };
        PooledBuffer { pool: self, buf }
    }

    fn release(&self, mut buf: ArenaBuffer) {
        if buf.reset() {
            self.oversize_dropped.fetch_add(1, Ordering::Relaxed);
        }
        let mut idle = self.idle.lock();
        if idle.len() < MAX_IDLE_BUFFERS {
            idle.push(buf);
        }
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            acquired: self.acquired.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            oversize_dropped: self.oversize_dropped.load(Ordering::Relaxed),
            idle: self.idle.lock().len(),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_POOL: BufferPool = BufferPool::new();

/// Process-wide pool behind the free rendering functions.
pub(crate) fn global_pool() -> &'static BufferPool {
    &GLOBAL_POOL
}

// ---------------------------------------------------------------------------
// PooledBuffer
// ---------------------------------------------------------------------------

/// Buffer on loan from a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer<'p> {
    pool: &'p BufferPool,
    buf: ArenaBuffer,
}

impl PooledBuffer<'_> {
    /// Return the buffer to its pool now.
    pub fn release(self) {}

    /// Copy the contents out and return the buffer to its pool.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf.as_str().to_owned()
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = ArenaBuffer;

    fn deref(&self) -> &ArenaBuffer {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut ArenaBuffer {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
