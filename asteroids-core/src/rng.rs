/// Xorshift32 generator. The seed is injected by the driver so any run can
/// be reproduced tick for tick.
#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    /// Uniform integer in `[min, max]`, both ends inclusive.
    pub fn next_between(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(max >= min);
        let span = (max - min) as u32 + 1;
        min + (self.next() % span) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_is_remapped() {
        let mut a = SeededRng::new(0);
        let mut b = SeededRng::new(0xDEAD_BEEF);
        assert_eq!(a.next(), b.next());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRng::new(0x1234_5678);
        let mut b = SeededRng::new(0x1234_5678);
        for _ in 0..100 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn next_between_is_inclusive_of_both_ends() {
        let mut rng = SeededRng::new(0xC0FF_EE00);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..10_000 {
            let value = rng.next_between(1, 5);
            assert!((1..=5).contains(&value));
            seen_min |= value == 1;
            seen_max |= value == 5;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn next_between_degenerate_range() {
        let mut rng = SeededRng::new(1);
        assert_eq!(rng.next_between(7, 7), 7);
    }
}
