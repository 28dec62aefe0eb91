//! Deterministic map encoding per RFC 8949 §4.2.1: entries are emitted with
//! their encoded key bytes in ascending length-first, then bytewise
//! lexicographic order.

use std::collections::HashMap;
use std::ops::Range;

use crate::encode::{append_map_header, append_str};
use crate::error::CborError;

/// An already-encoded CBOR key/value pair.
///
/// Both slices must each hold exactly one CBOR item.
#[derive(Debug, Clone, Copy)]
pub struct RawPair<'a> {
    /// Encoded key bytes.
    pub key: &'a [u8],
    /// Encoded value bytes.
    pub value: &'a [u8],
}

/// Orders entry indices by their encoded key bytes.
///
/// Entries are bucketed by key length in ascending order. Small buckets use
/// a comparator sort; large buckets of one shared length use an LSD radix
/// sort over the key bytes, right to left. Both are stable, so equal keys
/// (duplicates, accepted at write time) keep their insertion order.
fn sort_by_encoded_key(keys: &[&[u8]]) -> Vec<usize> {
    let n = keys.len();
    let mut by_len: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, k) in keys.iter().enumerate() {
        by_len.entry(k.len()).or_default().push(i);
    }
    let mut lens: Vec<usize> = by_len.keys().copied().collect();
    lens.sort_unstable();

    let mut order = Vec::with_capacity(n);
    let mut counts = [0usize; 256];
    let mut aux: Vec<usize> = Vec::new();
    for len in lens {
        let mut group = match by_len.remove(&len) {
            Some(g) => g,
            None => continue,
        };
        if group.len() <= 1 {
            order.append(&mut group);
            continue;
        }
        // Comparator wins for short keys and small groups.
        if len < 64 && group.len() < 1024 {
            group.sort_by(|&a, &b| keys[a].cmp(keys[b]));
            order.append(&mut group);
            continue;
        }
        aux.clear();
        aux.resize(group.len(), 0);
        let mut cur = group;
        for pos in (0..len).rev() {
            counts.fill(0);
            for &idx in &cur {
                counts[usize::from(keys[idx][pos])] += 1;
            }
            let mut sum = 0;
            for c in counts.iter_mut() {
                let v = *c;
                *c = sum;
                sum += v;
            }
            for &idx in &cur {
                let slot = &mut counts[usize::from(keys[idx][pos])];
                aux[*slot] = idx;
                *slot += 1;
            }
            std::mem::swap(&mut cur, &mut aux);
        }
        order.append(&mut cur);
    }
    order
}

/// Appends a map whose entries are already encoded, reordering them into
/// deterministic key order.
pub fn append_raw_map_deterministic(b: &mut Vec<u8>, pairs: &[RawPair<'_>]) {
    append_map_header(b, pairs.len() as u32);
    if pairs.is_empty() {
        return;
    }
    let keys: Vec<&[u8]> = pairs.iter().map(|p| p.key).collect();
    for idx in sort_by_encoded_key(&keys) {
        b.extend_from_slice(pairs[idx].key);
        b.extend_from_slice(pairs[idx].value);
    }
}

/// Appends a map in deterministic key order, encoding keys once into a
/// shared scratch buffer and values on emission.
///
/// `enc_key` appends the encoding of a key; `enc_val` appends the encoding
/// of a value and may fail.
///
/// # Errors
///
/// Propagates the first `enc_val` error.
pub fn append_map_deterministic<'m, K, V, EK, EV, I>(
    b: &mut Vec<u8>,
    entries: I,
    enc_key: EK,
    enc_val: EV,
) -> Result<(), CborError>
where
    I: IntoIterator<Item = (&'m K, &'m V)>,
    K: 'm,
    V: 'm,
    EK: Fn(&mut Vec<u8>, &K),
    EV: Fn(&mut Vec<u8>, &V) -> Result<(), CborError>,
{
    // Key ranges index into the scratch so growth cannot invalidate them.
    let mut scratch: Vec<u8> = Vec::new();
    let mut items: Vec<(Range<usize>, &V)> = Vec::new();
    for (k, v) in entries {
        let start = scratch.len();
        enc_key(&mut scratch, k);
        items.push((start..scratch.len(), v));
    }

    let keys: Vec<&[u8]> = items.iter().map(|(r, _)| &scratch[r.clone()]).collect();
    let order = sort_by_encoded_key(&keys);

    append_map_header(b, items.len() as u32);
    for idx in order {
        let (range, v) = &items[idx];
        b.extend_from_slice(&scratch[range.clone()]);
        enc_val(b, v)?;
    }
    Ok(())
}

/// Appends a string-keyed string map in deterministic key order.
pub fn append_map_str_str_deterministic(b: &mut Vec<u8>, m: &HashMap<String, String>) {
    // Infallible value encoder, so the error arm is unreachable.
    let _ = append_map_deterministic(
        b,
        m.iter(),
        |dst, k: &String| append_str(dst, k),
        |dst, v: &String| {
            append_str(dst, v);
            Ok(())
        },
    );
}

/// Appends a string-keyed map in deterministic key order with a caller
/// value encoder.
///
/// # Errors
///
/// Propagates the first `enc_val` error.
pub fn append_map_str_deterministic<V, EV>(
    b: &mut Vec<u8>,
    m: &HashMap<String, V>,
    enc_val: EV,
) -> Result<(), CborError>
where
    EV: Fn(&mut Vec<u8>, &V) -> Result<(), CborError>,
{
    append_map_deterministic(b, m.iter(), |dst, k: &String| append_str(dst, k), enc_val)
}
