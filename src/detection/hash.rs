//! Deterministic image-reference hashing.
//!
//! Reproduces the dashboard's JavaScript accumulator exactly:
//! `hash = (hash << 5) - hash + charCode`, truncated to a signed 32-bit
//! integer at every step, absolute value at the end. Iterates UTF-16 code
//! units because that is what `charCodeAt` yields.

/// Map an arbitrary image reference to a stable non-negative 32-bit value.
///
/// Not cryptographic — collisions are fine. Same string always yields the
/// same hash; the classifier seeds from it.
pub fn image_hash(input: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}
