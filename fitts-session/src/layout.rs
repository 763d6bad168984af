use fitts_core::RingTarget;

/// Places `count` targets evenly on a circle of `ring_radius` around `center`,
/// starting at 0° and proceeding in increasing angle (clockwise on screen).
pub fn ring_layout(
    count: usize,
    center: (f32, f32),
    ring_radius: f32,
    target_radius: f32,
) -> Vec<RingTarget> {
    let step = 360.0 / count as f64;
    (0..count)
        .map(|k| {
            let theta = (k as f64 * step).to_radians();
            RingTarget {
                center_x: center.0 + (f64::from(ring_radius) * theta.cos()) as f32,
                center_y: center.1 + (f64::from(ring_radius) * theta.sin()) as f32,
                radius: target_radius,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn eight_targets_sit_on_the_compass_points_and_diagonals() {
        let targets = ring_layout(8, (625.0, 375.0), 275.0, 40.0);
        assert_eq!(targets.len(), 8);
        assert!(close(targets[0].center_x, 900.0) && close(targets[0].center_y, 375.0));
        assert!(close(targets[2].center_x, 625.0) && close(targets[2].center_y, 650.0));
        assert!(close(targets[4].center_x, 350.0) && close(targets[4].center_y, 375.0));
        assert!(close(targets[6].center_x, 625.0) && close(targets[6].center_y, 100.0));
        let diag = 275.0 * std::f32::consts::FRAC_1_SQRT_2;
        assert!(close(targets[1].center_x, 625.0 + diag));
        assert!(close(targets[1].center_y, 375.0 + diag));
        assert!(targets.iter().all(|t| t.radius == 40.0));
    }

    #[test]
    fn every_target_is_on_the_ring() {
        for count in [3, 5, 7, 12] {
            for t in ring_layout(count, (0.0, 0.0), 100.0, 10.0) {
                assert!(close(t.center_x.hypot(t.center_y), 100.0), "n={count}");
            }
        }
    }
}
