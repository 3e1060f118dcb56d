//! Ordering of lines as zero-padded big-endian bit strings

use std::cmp::Ordering;

/// Compare two lines as if both were padded with zero bytes to a common length
pub fn padded_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let length = a.len().max(b.len());
    (0..length)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Position of the first adjacent pair that is out of order, if any
pub fn first_disorder(lines: &[Vec<u8>]) -> Option<usize> {
    lines
        .windows(2)
        .position(|pair| padded_cmp(&pair[0], &pair[1]) == Ordering::Greater)
}

pub fn is_sorted(lines: &[Vec<u8>]) -> bool {
    first_disorder(lines).is_none()
}
