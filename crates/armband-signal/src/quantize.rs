use crate::types::OrientationTicks;
use glam::Quat;
use std::f64::consts::{FRAC_PI_2, PI};

/// Number of buckets each angle range is split into.
pub const TICKS_PER_RANGE: i32 = 18;

/// Convert an orientation quaternion into roll/pitch/yaw ticks.
///
/// Roll and yaw cover `[-π, π]`, pitch covers `[-π/2, π/2]`. An angle sitting
/// exactly on the upper bound would land in bucket 18, so every result is
/// clamped to `0..TICKS_PER_RANGE`.
pub fn quantize(quat: Quat) -> OrientationTicks {
    let (w, x, y, z) = (
        f64::from(quat.w),
        f64::from(quat.x),
        f64::from(quat.y),
        f64::from(quat.z),
    );

    let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
    // Slightly denormalized input can push the argument past ±1.
    let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
    let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

    OrientationTicks {
        roll: to_ticks(roll, PI),
        pitch: to_ticks(pitch, FRAC_PI_2),
        yaw: to_ticks(yaw, PI),
    }
}

/// Rescale an angle in `[-half_range, half_range]` into a bucket index.
fn to_ticks(angle: f64, half_range: f64) -> i32 {
    let scaled = (angle + half_range) / (2.0 * half_range) * f64::from(TICKS_PER_RANGE);
    (scaled.floor() as i32).clamp(0, TICKS_PER_RANGE - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2 as HALF_PI, FRAC_PI_4, PI as PI32};

    #[test]
    fn identity_is_center_bucket() {
        let ticks = quantize(Quat::IDENTITY);
        assert_eq!(ticks, OrientationTicks { roll: 9, pitch: 9, yaw: 9 });
    }

    #[test]
    fn known_angles_land_in_expected_buckets() {
        // 90 degrees of yaw: (π/2 + π) / 2π * 18 = 13.5
        assert_eq!(quantize(Quat::from_rotation_z(HALF_PI)).yaw, 13);
        // 45 degrees of pitch: (π/4 + π/2) / π * 18 = 13.5
        assert_eq!(quantize(Quat::from_rotation_y(FRAC_PI_4)).pitch, 13);
        // -90 degrees of roll: (-π/2 + π) / 2π * 18 = 4.5
        assert_eq!(quantize(Quat::from_rotation_x(-HALF_PI)).roll, 4);
    }

    #[test]
    fn upper_boundary_is_clamped() {
        // Half turn about x gives roll = atan2(0, -1) = π exactly.
        let ticks = quantize(Quat::from_xyzw(1.0, 0.0, 0.0, 0.0));
        assert_eq!(ticks.roll, TICKS_PER_RANGE - 1);
        assert_eq!(ticks.pitch, 9);
        assert_eq!(ticks.yaw, 9);
    }

    #[test]
    fn denormalized_input_does_not_produce_nan() {
        // 2(wy - zx) = 1.02 here, beyond the arcsine domain.
        let q = Quat::from_xyzw(0.0, 0.714, 0.0, 0.714);
        let ticks = quantize(q);
        assert_eq!(ticks.pitch, TICKS_PER_RANGE - 1);
        assert!((0..TICKS_PER_RANGE).contains(&ticks.roll));
        assert!((0..TICKS_PER_RANGE).contains(&ticks.yaw));
    }

    #[test]
    fn ticks_are_monotonic_in_each_angle() {
        let steps = 200;
        let sweep = |half: f32| {
            (0..=steps).map(move |i| -half + 0.01 + (2.0 * half - 0.02) * i as f32 / steps as f32)
        };

        let rolls: Vec<i32> = sweep(PI32).map(|a| quantize(Quat::from_rotation_x(a)).roll).collect();
        let pitches: Vec<i32> = sweep(HALF_PI)
            .map(|a| quantize(Quat::from_rotation_y(a)).pitch)
            .collect();
        let yaws: Vec<i32> = sweep(PI32).map(|a| quantize(Quat::from_rotation_z(a)).yaw).collect();

        for ticks in [&rolls, &pitches, &yaws] {
            assert!(ticks.windows(2).all(|w| w[0] <= w[1]), "{ticks:?}");
            assert_eq!(ticks.first(), Some(&0));
            assert_eq!(ticks.last(), Some(&(TICKS_PER_RANGE - 1)));
        }
    }

    #[test]
    fn repeated_quantization_is_stable() {
        let q = Quat::from_euler(glam::EulerRot::ZYX, 0.7, -0.3, 1.9);
        assert_eq!(quantize(q), quantize(q));
    }
}
