//! A small thread-safe pool of byte buffers used to amortize allocation in
//! diagnostic rendering and other string-building paths.

use std::sync::Mutex;

/// Upper bound on pooled buffers.
const POOL_CAP: usize = 16;
/// Buffers that grew past this capacity are dropped instead of pooled.
const RETAIN_CAP: usize = 1 << 16;

static POOL: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());

/// Borrows a cleared buffer from the pool, allocating when it is empty.
pub(crate) fn get_buffer() -> Vec<u8> {
    if let Ok(mut pool) = POOL.lock() {
        if let Some(buf) = pool.pop() {
            return buf;
        }
    }
    Vec::with_capacity(1024)
}

/// Returns a buffer to the pool, cleared to length zero.
///
/// Oversized buffers are dropped so the pool's retained memory stays
/// bounded.
pub(crate) fn put_buffer(mut buf: Vec<u8>) {
    if buf.capacity() > RETAIN_CAP {
        return;
    }
    buf.clear();
    if let Ok(mut pool) = POOL.lock() {
        if pool.len() < POOL_CAP {
            pool.push(buf);
        }
    }
}
