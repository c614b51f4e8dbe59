//! Square sizing.
//!
//! The square is always a power of two wide. These helpers find the
//! narrowest square that can hold a number of shares, ignoring alignment
//! padding and the compact shares that precede blobs, so the result is a
//! lower bound.

use crate::config::ChainParams;
use crate::shares::blob_shares_used;

/// Smallest power of two that is `>= n`. Zero rounds up to one.
pub fn round_up_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Largest power of two that is `<= n`. Requires `n >= 1`.
pub fn round_down_power_of_two(n: usize) -> usize {
    debug_assert!(n > 0, "no power of two is <= 0");
    1 << (usize::BITS - 1 - n.max(1).leading_zeros())
}

/// `ceil(sqrt(n))` without going through floating point rounding.
fn ceil_sqrt(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while root * root < n {
        root += 1;
    }
    root
}

/// Minimum square width that can contain `share_count` shares.
pub fn min_square_size(share_count: usize) -> usize {
    round_up_power_of_two(ceil_sqrt(share_count))
}

/// Minimum square width that a blob of `byte_size` bytes can be included in.
pub fn min_square_size_for_message(params: &ChainParams, byte_size: usize) -> usize {
    min_square_size(blob_shares_used(params, byte_size))
}
