//! Seeded Fisher–Yates shuffle.
//!
//! The generator is the classic `fract(sin(x) * 10000)` trick. It is not a
//! good random source, but it is stable for a given seed, which is all the
//! news and ticker panels need.

/// Pseudo-random value in `[0, 1)` for `seed`.
pub fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}

/// Return a permutation of `items` that depends only on `seed`.
pub fn shuffle<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
    let mut out = items.to_vec();
    let base = seed as f64;
    for i in (1..out.len()).rev() {
        let r = seeded_random(base + i as f64);
        let j = ((r * (i + 1) as f64).floor() as usize).min(i);
        out.swap(i, j);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_order() {
        let items: Vec<u32> = (0..50).collect();
        assert_eq!(shuffle(&items, 99), shuffle(&items, 99));
        assert_ne!(shuffle(&items, 99), shuffle(&items, 100));
    }

    #[test]
    fn output_is_a_permutation() {
        let items: Vec<u32> = (0..50).collect();
        let mut out = shuffle(&items, 1_700_000_000_000);
        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn known_orders() {
        assert_eq!(shuffle(&["a", "b", "c", "d"], 42), vec!["b", "c", "d", "a"]);
        assert_eq!(shuffle(&["a", "b", "c", "d"], 7), vec!["c", "b", "a", "d"]);
        let digits: Vec<u32> = (0..10).collect();
        assert_eq!(
            shuffle(&digits, 1_700_000_000_000),
            vec![4, 0, 6, 7, 3, 8, 2, 9, 5, 1]
        );
    }

    #[test]
    fn draws_stay_in_unit_interval() {
        for seed in [0.0, 1.0, 43.0, -5.5, 1.7e12] {
            let r = seeded_random(seed);
            assert!((0.0..1.0).contains(&r), "seed {seed} gave {r}");
        }
        assert!((seeded_random(43.0) - 0.252_573_714_016_762_1).abs() < 1e-9);
    }

    #[test]
    fn short_inputs() {
        assert!(shuffle::<u8>(&[], 1).is_empty());
        assert_eq!(shuffle(&[5], 1), vec![5]);
    }
}
