//! Random sources and the Fisher–Yates shuffle used for word order and letter tiles.

/// Source of uniform random indices.
/// The engine only ever asks for "a number in [0, upper_bound)", so tests can
/// substitute a scripted source and assert exact orders.
pub trait RandomSource {
    /// Return a value in `[0, upper_bound)`. `upper_bound` is never zero.
    fn next_index(&mut self, upper_bound: usize) -> usize;
}

/// Seedable pseudo-random number generator (xorshift64).
/// Not cryptographic; statistically fine for shuffling a handful of tiles.
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    pub fn new(seed: u64) -> Self {
        XorShiftRng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for XorShiftRng {
    fn next_index(&mut self, upper_bound: usize) -> usize {
        (self.next_u64() % upper_bound as u64) as usize
    }
}

/// In-place uniform shuffle: walk from the end, swapping each position with a
/// random earlier-or-equal one.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}
