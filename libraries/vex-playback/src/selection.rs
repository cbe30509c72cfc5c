//! Track selection for next/previous and automatic advance

use rand::Rng;

/// Uniformly random index different from `current`
///
/// With a single track there is nothing else to pick and `current` is
/// returned.
pub fn random_other<R: Rng + ?Sized>(rng: &mut R, len: usize, current: usize) -> usize {
    if len <= 1 {
        return current.min(len.saturating_sub(1));
    }
    let pick = rng.gen_range(0..len - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}

/// Index following `current`, wrapping to 0
pub fn following(len: usize, current: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current + 1) % len
}

/// Index before `current`, wrapping to the last track
pub fn preceding(len: usize, current: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current + len - 1) % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn random_other_never_repeats() {
        let mut rng = StdRng::seed_from_u64(1);
        for current in 0..5 {
            for _ in 0..200 {
                let pick = random_other(&mut rng, 5, current);
                assert_ne!(pick, current);
                assert!(pick < 5);
            }
        }
    }

    #[test]
    fn random_other_reaches_every_other_index() {
        let mut rng = StdRng::seed_from_u64(2);
        let seen: HashSet<_> = (0..500).map(|_| random_other(&mut rng, 4, 2)).collect();
        assert_eq!(seen, HashSet::from([0, 1, 3]));
    }

    #[test]
    fn single_track_returns_current() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(random_other(&mut rng, 1, 0), 0);
    }

    #[test]
    fn wraparound() {
        assert_eq!(following(3, 2), 0);
        assert_eq!(following(3, 0), 1);
        assert_eq!(preceding(3, 0), 2);
        assert_eq!(preceding(3, 2), 1);
        assert_eq!(following(1, 0), 0);
    }
}
