//! Fibonacci Lattice Point Distribution
//!
//! Generates near-uniform point distributions on the unit sphere using the
//! offset Fibonacci spiral (golden angle) with optional seeded jitter.
//!
//! # Algorithm
//!
//! Point `k` of `N` sits at height `z = 1 - dz/2 - k·dz` with `dz = 2/N`, and its
//! longitude advances by the golden angle `π(3 - √5)` per point. Jitter perturbs
//! latitude and longitude by a signed random sample scaled by the local spacing
//! `s = 3.6/√N`, so cells become irregular without clumping.
//!
//! # References
//!
//! - [Evenly distributed points on sphere](http://web.archive.org/web/20120421191837/http://www.cgafaq.info/wiki/Evenly_distributed_points_on_sphere)

use glam::Vec3;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::rng::SeededRng;

/// Fold a latitude pushed past a pole back over it
///
/// Crossing the pole lands on the opposite meridian, so the longitude turns by
/// half a revolution. The position is the one `sin`/`cos` would give for the
/// unfolded angle.
#[inline]
fn wrap_over_pole(lat: f64, lon: f64) -> (f64, f64) {
    if lat > FRAC_PI_2 {
        (PI - lat, lon + PI)
    } else if lat < -FRAC_PI_2 {
        (-PI - lat, lon + PI)
    } else {
        (lat, lon)
    }
}

/// Generate `count` (latitude, longitude) pairs in radians
///
/// With `jitter == 0.0` the output is the exact golden-spiral lattice and does
/// not depend on the generator state.
pub fn fibonacci_lat_lon(count: usize, jitter: f32, rng: &mut SeededRng) -> Vec<(f64, f64)> {
    if count == 0 {
        return Vec::new();
    }

    let n = count as f64;
    let jitter = jitter as f64;
    let spacing = 3.6 / n.sqrt();
    let dlong = PI * (3.0 - 5f64.sqrt());
    let dz = 2.0 / n;

    let mut out = Vec::with_capacity(count);
    let mut long = 0.0;
    let mut z = 1.0 - dz / 2.0;

    for _ in 0..count {
        let r = (1.0 - z * z).sqrt();
        let mut lat = z.asin();
        let mut lon = long;

        // Always draw, so the sequence is independent of the jitter amount
        let lat_sample = rng.next_signed() as f64;
        let lon_sample = rng.next_signed() as f64;

        let next_lat = (z - dz * 2.0 * PI * r / spacing).max(-1.0).asin();
        lat += jitter * lat_sample * (lat - next_lat);
        lon += jitter * lon_sample * (spacing / r);

        let (lat, lon) = wrap_over_pole(lat, lon);
        out.push((lat, lon % (2.0 * PI)));

        long += dlong;
        z -= dz;
    }

    out
}

/// Convert latitude/longitude in radians to a unit vector; +Z is north
#[inline]
pub fn spherical_to_cartesian(lat: f64, lon: f64) -> Vec3 {
    Vec3::new(
        (lat.cos() * lon.cos()) as f32,
        (lat.cos() * lon.sin()) as f32,
        lat.sin() as f32,
    )
}

/// Generate `count` points on the unit sphere using the jittered Fibonacci lattice
///
/// # Example
///
/// ```rust
/// use voronoi_worldgen::generation::generate_fibonacci_sphere_points;
/// use voronoi_worldgen::rng::{RngStream, SeededRng};
///
/// let mut rng = SeededRng::new(42, RngStream::Sampler);
/// let points = generate_fibonacci_sphere_points(1000, 0.75, &mut rng);
/// assert_eq!(points.len(), 1000);
/// ```
pub fn generate_fibonacci_sphere_points(count: usize, jitter: f32, rng: &mut SeededRng) -> Vec<Vec3> {
    fibonacci_lat_lon(count, jitter, rng)
        .into_iter()
        .map(|(lat, lon)| spherical_to_cartesian(lat, lon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngStream;

    fn points(count: usize, jitter: f32, seed: u32) -> Vec<Vec3> {
        let mut rng = SeededRng::new(seed, RngStream::Sampler);
        generate_fibonacci_sphere_points(count, jitter, &mut rng)
    }

    #[test]
    fn test_fibonacci_point_count() {
        for count in [1, 10, 100, 1000, 5000] {
            assert_eq!(points(count, 0.75, 42).len(), count);
        }
    }

    #[test]
    fn test_fibonacci_empty() {
        assert!(points(0, 0.75, 42).is_empty());
    }

    #[test]
    fn test_fibonacci_points_on_unit_sphere() {
        for point in points(500, 0.75, 42) {
            assert!(
                (point.length() - 1.0).abs() < 1e-5,
                "Point length {} should be 1",
                point.length()
            );
        }
    }

    #[test]
    fn test_zero_jitter_is_closed_form_lattice() {
        let count = 400;
        let n = count as f64;
        let dz = 2.0 / n;
        let dlong = PI * (3.0 - 5f64.sqrt());

        let lattice = points(count, 0.0, 1);
        for (k, point) in lattice.iter().enumerate() {
            let z = 1.0 - dz / 2.0 - k as f64 * dz;
            let r = (1.0 - z * z).sqrt();
            let lon = k as f64 * dlong;
            let expected = Vec3::new((r * lon.cos()) as f32, (r * lon.sin()) as f32, z as f32);
            assert!(
                (*point - expected).length() < 1e-4,
                "Point {} is {:?}, expected {:?}",
                k,
                point,
                expected
            );
        }
    }

    #[test]
    fn test_zero_jitter_ignores_seed() {
        assert_eq!(points(300, 0.0, 1), points(300, 0.0, 987_654));
    }

    #[test]
    fn test_fibonacci_determinism() {
        assert_eq!(points(200, 0.75, 42), points(200, 0.75, 42));
    }

    #[test]
    fn test_fibonacci_different_seeds() {
        let a = points(100, 0.75, 12345);
        let b = points(100, 0.75, 67890);
        assert!(
            a.iter().zip(&b).any(|(p, q)| (*p - *q).length() > 1e-3),
            "Different seeds should produce different jitter"
        );
    }

    #[test]
    fn test_wrap_over_pole_keeps_position() {
        for (lat, lon) in [(FRAC_PI_2 + 0.01, 0.3), (-FRAC_PI_2 - 0.2, 5.0), (0.4, 1.0)] {
            let (wrapped_lat, wrapped_lon) = wrap_over_pole(lat, lon);
            assert!(wrapped_lat.abs() <= FRAC_PI_2);
            let a = spherical_to_cartesian(lat, lon);
            let b = spherical_to_cartesian(wrapped_lat, wrapped_lon);
            assert!((a - b).length() < 1e-6, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_full_jitter_latitudes_stay_in_range() {
        for seed in 0..300 {
            let mut rng = SeededRng::new(seed, RngStream::Sampler);
            for (lat, lon) in fibonacci_lat_lon(999, 1.0, &mut rng) {
                assert!(lat.abs() <= FRAC_PI_2, "seed {} latitude {}", seed, lat);
                assert!(lon.is_finite());
            }
        }
    }

    #[test]
    fn test_fibonacci_spans_both_hemispheres() {
        let pts = points(1000, 0.75, 42);
        assert!(pts[0].z > 0.9, "First point z={} should be near north pole", pts[0].z);
        assert!(pts[999].z < -0.9, "Last point z={} should be near south pole", pts[999].z);
    }
}
