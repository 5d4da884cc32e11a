//! Random draws used to synthesize wave parameters.

use std::num::NonZeroU32;

use glam::Vec2;
use rand::{Rng, RngCore};

/// Unbiased integer in `[0, range)` by rejection sampling.
///
/// A raw 32-bit draw `x` lands in the bucket starting at `x - x % range`.
/// The topmost bucket is partial when `2^32` is not a multiple of `range`,
/// and keeping its draws would favour small results, so draws from it are
/// thrown away and redrawn.
pub fn bounded_rand<R: RngCore + ?Sized>(rng: &mut R, range: NonZeroU32) -> u32 {
    let range = range.get();
    loop {
        let x = rng.next_u32();
        let r = x % range;
        // Bucket fits below u32::MAX iff its start is <= 2^32 - range
        if x - r <= range.wrapping_neg() {
            return r;
        }
    }
}

/// Uniform direction on the unit circle.
///
/// Both components are drawn from `[-1, 1]` and the pair normalized. The
/// exact zero vector has no direction, so such draws are repeated.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    loop {
        let x = rng.gen_range(-1.0f32..=1.0);
        let y = rng.gen_range(-1.0f32..=1.0);
        if let Some(direction) = Vec2::new(x, y).try_normalize() {
            return direction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Replays a fixed sequence of raw draws
    struct ScriptedRng {
        values: Vec<u32>,
        next: usize,
    }

    impl ScriptedRng {
        fn new(values: &[u32]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }

        fn next_u64(&mut self) -> u64 {
            self.next_u32() as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest {
                *byte = self.next_u32() as u8;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn ten() -> NonZeroU32 {
        NonZeroU32::new(10).unwrap()
    }

    #[test]
    fn test_accepts_draw_from_full_bucket() {
        let mut rng = ScriptedRng::new(&[1_234_567]);
        assert_eq!(bounded_rand(&mut rng, ten()), 7);
        assert_eq!(rng.next, 1);
    }

    #[test]
    fn test_rejects_draw_from_partial_top_bucket() {
        // 2^32 = 429496729 * 10 + 6, so 4294967290..=u32::MAX is a partial bucket
        let mut rng = ScriptedRng::new(&[u32::MAX, 4_294_967_290, 42]);
        assert_eq!(bounded_rand(&mut rng, ten()), 2);
        assert_eq!(rng.next, 3, "both top-bucket draws must be redrawn");
    }

    #[test]
    fn test_last_full_bucket_is_kept() {
        // Bucket 4294967280..=4294967289 ends exactly at 2^32 - 6 - 1
        let mut rng = ScriptedRng::new(&[4_294_967_289]);
        assert_eq!(bounded_rand(&mut rng, ten()), 9);
        assert_eq!(rng.next, 1);
    }

    #[test]
    fn test_power_of_two_range_never_rejects() {
        let mut rng = ScriptedRng::new(&[u32::MAX]);
        let range = NonZeroU32::new(16).unwrap();
        assert_eq!(bounded_rand(&mut rng, range), 15);
        assert_eq!(rng.next, 1);
    }

    #[test]
    fn test_speeds_are_uniform() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let draws = 200_000;
        let mut counts = [0usize; 10];
        for _ in 0..draws {
            let value = bounded_rand(&mut rng, ten());
            assert!(value < 10);
            counts[value as usize] += 1;
        }

        // Chi-square with 9 degrees of freedom; 27.88 is the 0.1% critical value
        let expected = draws as f64 / 10.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();
        assert!(chi_square < 27.88, "chi-square {} counts {:?}", chi_square, counts);

        // Low values must not be favoured
        let low: usize = counts[..5].iter().sum();
        let high: usize = counts[5..].iter().sum();
        let skew = (low as f64 - high as f64).abs() / draws as f64;
        assert!(skew < 0.01, "low {} high {}", low, high);
    }

    #[test]
    fn test_directions_are_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let direction = random_direction(&mut rng);
            assert!((direction.length() - 1.0).abs() < 1e-5);
            assert_ne!(direction, Vec2::ZERO);
        }
    }

    #[test]
    fn test_directions_cover_all_quadrants() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut quadrants = [false; 4];
        for _ in 0..200 {
            let d = random_direction(&mut rng);
            let q = (d.x >= 0.0) as usize + 2 * (d.y >= 0.0) as usize;
            quadrants[q] = true;
        }
        assert!(quadrants.iter().all(|&seen| seen));
    }
}
