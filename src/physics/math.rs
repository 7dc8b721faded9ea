use crate::physics::aabb2d::Aabb2d;
use rand::Rng;

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 2D vector type for positions, velocities, and accelerations
pub type Vector = bevy::math::DVec2;

/// Mass of a uniform sphere of the given radius and density.
///
/// Particles are drawn as circles but weigh as spheres, so mass grows with r³.
#[inline]
pub fn sphere_mass(radius: Scalar, density: Scalar) -> Scalar {
    density * 4.0 / 3.0 * core::f64::consts::PI * radius * radius * radius
}

/// Floor of `value / cell_size` as a signed grid coordinate.
///
/// NaN maps to `i64::MIN` so callers clamp it into the first cell.
#[inline]
pub fn grid_coordinate(value: Scalar, cell_size: Scalar) -> i64 {
    let coordinate = libm::floor(value / cell_size);
    if coordinate.is_nan() {
        i64::MIN
    } else {
        coordinate as i64
    }
}

/// Uniform radius in `[min_radius, max_radius]`.
pub fn random_radius(rng: &mut impl Rng, min_radius: Scalar, max_radius: Scalar) -> Scalar {
    if max_radius <= min_radius {
        return min_radius;
    }
    rng.random_range(min_radius..=max_radius)
}

/// Uniform position inside `bounds`, kept `margin` away from every edge.
///
/// When the margin leaves no room on an axis the position sits on that axis' center.
pub fn random_position_within(rng: &mut impl Rng, bounds: &Aabb2d, margin: Scalar) -> Vector {
    let shrunk = bounds.inset(margin);
    let center = bounds.center();

    let x = if shrunk.min.x < shrunk.max.x {
        rng.random_range(shrunk.min.x..shrunk.max.x)
    } else {
        center.x
    };
    let y = if shrunk.min.y < shrunk.max.y {
        rng.random_range(shrunk.min.y..shrunk.max.y)
    } else {
        center.y
    };

    Vector::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sphere_mass_scales_with_cube_of_radius() {
        let small = sphere_mass(1.0, 1.0);
        let large = sphere_mass(2.0, 1.0);

        assert!((small - 4.0 / 3.0 * std::f64::consts::PI).abs() < 1e-12);
        assert!((large / small - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_coordinate_uses_floor_semantics() {
        assert_eq!(grid_coordinate(0.0, 10.0), 0);
        assert_eq!(grid_coordinate(9.999, 10.0), 0);
        assert_eq!(grid_coordinate(10.0, 10.0), 1);
        assert_eq!(grid_coordinate(-0.001, 10.0), -1);
        assert_eq!(grid_coordinate(Scalar::NAN, 10.0), i64::MIN);
    }

    #[test]
    fn test_random_position_respects_margin() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let bounds = Aabb2d::from_size(100.0, 50.0);

        for _ in 0..1_000 {
            let position = random_position_within(&mut rng, &bounds, 5.0);
            assert!(position.x >= 5.0 && position.x < 95.0);
            assert!(position.y >= 5.0 && position.y < 45.0);
        }
    }

    #[test]
    fn test_random_position_with_oversized_margin_centers() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let bounds = Aabb2d::from_size(10.0, 10.0);

        let position = random_position_within(&mut rng, &bounds, 20.0);
        assert_eq!(position, Vector::new(5.0, 5.0));
    }

    #[test]
    fn test_random_radius_degenerate_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(random_radius(&mut rng, 3.0, 3.0), 3.0);

        for _ in 0..100 {
            let radius = random_radius(&mut rng, 2.0, 8.0);
            assert!((2.0..=8.0).contains(&radius));
        }
    }
}
