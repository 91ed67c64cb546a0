//! Canonical hashing of serializable configuration.
//!
//! Values are streamed as compact JSON straight into an xxh64 hasher.
//! Struct fields serialize in declaration order and `NodeSet` as a sorted
//! list, so equal values always produce equal digests.

use std::io;

use serde::Serialize;
use xxhash_rust::xxh64::Xxh64;

/// `io::Write` sink that feeds every byte into an xxh64 state.
struct DigestWriter(Xxh64);

impl io::Write for DigestWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// xxh64 digest of the canonical JSON form of `value`.
///
/// Fails only if the value's `Serialize` impl does (e.g. a map with
/// non-string keys).
pub fn canonical_digest<T: Serialize + ?Sized>(value: &T) -> Result<u64, serde_json::Error> {
    let mut sink = DigestWriter(Xxh64::new(0));
    serde_json::to_writer(&mut sink, value)?;
    Ok(sink.0.digest())
}

/// Canonical digest rendered as 16 hex digits.
pub fn canonical_hash_hex<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    canonical_digest(value).map(|digest| format!("{:016x}", digest))
}
