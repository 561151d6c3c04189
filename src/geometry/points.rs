use glam::Vec3;
use rand::Rng;

/// `count` points scattered uniformly in a cube of side `spread` around the origin
pub fn star_field<R: Rng + ?Sized>(rng: &mut R, count: usize, spread: f32) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_star_field_count_and_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let stars = star_field(&mut rng, 500, 2000.0);

        assert_eq!(stars.len(), 500);
        for star in stars {
            assert!(star.abs().max_element() <= 1000.0);
        }
    }

    #[test]
    fn test_star_field_is_reproducible() {
        let a = star_field(&mut StdRng::seed_from_u64(42), 10, 100.0);
        let b = star_field(&mut StdRng::seed_from_u64(42), 10, 100.0);
        assert_eq!(a, b);
    }
}
