const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233280;

/// Seed-driven pseudo-random source. Same seed, same draw sequence, on every
/// platform.
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        Self { state: seed as u64 }
    }

    /// Advances the generator and returns a fraction in `[0, 1)`.
    fn next_fraction(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Draws an index in `0..=bound`.
    pub fn next_index(&mut self, bound: usize) -> usize {
        (self.next_fraction() * (bound as f64 + 1.0)) as usize
    }

    /// Fisher-Yates pass driven by this generator.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_sequence() {
        let mut random = SeededRandom::new(1);
        random.next_fraction();
        assert_eq!(random.state, 58598);
        random.next_fraction();
        assert_eq!(random.state, 127215);
        random.next_fraction();
        assert_eq!(random.state, 79852);
    }

    #[test]
    fn test_index_stays_in_bounds() {
        let mut random = SeededRandom::new(9999);
        for bound in 0..50 {
            let index = random.next_index(bound);
            assert!(index <= bound);
        }
    }

    #[test]
    fn test_shuffle_pair() {
        let mut items = vec!["a", "b"];
        SeededRandom::new(1).shuffle(&mut items);
        assert_eq!(items, vec!["b", "a"]);
    }

    #[test]
    fn test_shuffle_sequence() {
        let mut items = vec![1, 2, 3, 4];
        SeededRandom::new(7).shuffle(&mut items);
        assert_eq!(items, vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let mut first = vec![10, 20, 30, 40, 50, 60];
        let mut second = first.clone();
        SeededRandom::new(42).shuffle(&mut first);
        SeededRandom::new(42).shuffle(&mut second);
        assert_eq!(first, second);
    }
}
