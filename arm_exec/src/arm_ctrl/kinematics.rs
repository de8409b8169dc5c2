//! Two-link planar kinematics for the arm
//!
//! Inverse kinematics is described in
//! https://en.wikipedia.org/wiki/Inverse_kinematics. The arm is a two-link
//! planar manipulator operating in a vertical plane fixed to the chassis:
//! the anchor link pivots at the chassis and carries the floating link at
//! its far end. Targets are given as (horizontal, vertical) offsets of the
//! end effector from the anchor pivot.
//!
//! The inverse solve uses the law of cosines form, which is closed form and
//! two-valued in general. The elbow-down branch is chosen, see
//! [`TwoLinkKinematics::solve`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

// Internal
use super::NUM_JOINTS;
use util::maths::{clamp, wrap_to_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A pair of joint angle positions for the arm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    /// Angle of the anchor joint, measured anticlockwise from the horizontal
    /// axis of the operating plane.
    ///
    /// Units: radians
    pub anchor_pos_rad: f64,

    /// Angle of the floating joint, measured anticlockwise from the anchor
    /// link's direction.
    ///
    /// Units: radians
    pub floating_pos_rad: f64,
}

/// Solver for the arm's two-link planar kinematics.
///
/// Link lengths are validated on construction, a solver instance always
/// holds a usable geometry.
#[derive(Clone, Copy, Debug)]
pub struct TwoLinkKinematics {
    /// The length of the anchor link.
    ///
    /// Units: meters
    anchor_length_m: f64,

    /// The length of the floating link.
    ///
    /// Units: meters
    floating_length_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while solving the arm's kinematics.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    #[error(
        "Link lengths must be positive, got anchor = {anchor_length_m} m, \
         floating = {floating_length_m} m"
    )]
    InvalidConfiguration {
        anchor_length_m: f64,
        floating_length_m: f64,
    },

    #[error(
        "Target ({horizontal_m:.3}, {vertical_m:.3}) m is {distance_m:.3} m \
         from the pivot, outside the reachable range \
         [{min_reach_m:.3}, {max_reach_m:.3}] m"
    )]
    Unreachable {
        horizontal_m: f64,
        vertical_m: f64,
        distance_m: f64,
        min_reach_m: f64,
        max_reach_m: f64,
    },

    #[error("Target coincides with the anchor pivot, the anchor angle is undefined")]
    Degenerate,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointAngles {
    /// Get the angles as an array indexed by the joint index constants.
    pub fn as_array(&self) -> [f64; NUM_JOINTS] {
        [self.anchor_pos_rad, self.floating_pos_rad]
    }

    /// Build a `JointAngles` from an array indexed by the joint index
    /// constants.
    pub fn from_array(pos_rad: [f64; NUM_JOINTS]) -> Self {
        Self {
            anchor_pos_rad: pos_rad[super::ANCHOR_JOINT_IDX],
            floating_pos_rad: pos_rad[super::FLOATING_JOINT_IDX],
        }
    }
}

impl TwoLinkKinematics {
    /// Create a new solver for the given link lengths.
    ///
    /// Both lengths must be positive.
    pub fn new(anchor_length_m: f64, floating_length_m: f64) -> Result<Self, KinematicsError> {
        if anchor_length_m <= 0.0 || floating_length_m <= 0.0 {
            return Err(KinematicsError::InvalidConfiguration {
                anchor_length_m,
                floating_length_m,
            });
        }

        Ok(Self {
            anchor_length_m,
            floating_length_m,
        })
    }

    /// The furthest distance from the pivot the arm can reach.
    ///
    /// Units: meters
    pub fn max_reach_m(&self) -> f64 {
        self.anchor_length_m + self.floating_length_m
    }

    /// The closest distance to the pivot the arm can reach.
    ///
    /// Units: meters
    pub fn min_reach_m(&self) -> f64 {
        (self.anchor_length_m - self.floating_length_m).abs()
    }

    /// Solve the inverse kinematics for the given target position.
    ///
    /// The target is the desired end effector position in the operating
    /// plane, as a (horizontal, vertical) offset from the anchor pivot in
    /// meters.
    ///
    /// Targets on the boundary of the reachable region succeed, giving the
    /// fully extended (floating angle zero) or fully folded (floating angle
    /// pi) configuration. Targets outside it fail with
    /// [`KinematicsError::Unreachable`], and a target on the pivot itself
    /// fails with [`KinematicsError::Degenerate`] since the anchor angle is
    /// unconstrained there.
    ///
    /// Of the two mirror-image solutions the elbow-down branch is always
    /// returned, the floating angle is in [0, pi] so the floating joint
    /// lies on the clockwise side of the pivot-to-target chord. The solve
    /// is a pure calculation, equal inputs give bit-equal outputs.
    pub fn solve(
        &self,
        horizontal_distance_m: f64,
        vertical_distance_m: f64,
    ) -> Result<JointAngles, KinematicsError> {
        let distance_m =
            (horizontal_distance_m.powi(2) + vertical_distance_m.powi(2)).sqrt();

        if distance_m > self.max_reach_m() || distance_m < self.min_reach_m() {
            return Err(KinematicsError::Unreachable {
                horizontal_m: horizontal_distance_m,
                vertical_m: vertical_distance_m,
                distance_m,
                min_reach_m: self.min_reach_m(),
                max_reach_m: self.max_reach_m(),
            });
        }

        // Only inside the reachable region when the links are equal length,
        // in which case the arm folds back on itself and any anchor angle
        // puts the end effector on the pivot.
        if distance_m == 0.0 {
            return Err(KinematicsError::Degenerate);
        }

        // Law of cosines for the floating joint. The cosine is clamped to
        // absorb floating point drift when the target sits on the reach
        // boundary.
        let cos_floating = (distance_m.powi(2)
            - self.anchor_length_m.powi(2)
            - self.floating_length_m.powi(2))
            / (2.0 * self.anchor_length_m * self.floating_length_m);

        let floating_pos_rad = clamp(&cos_floating, &-1.0, &1.0).acos();

        // The anchor angle is the direction to the target minus the offset
        // the floating joint's bend introduces between the anchor link and
        // the pivot-to-target chord.
        let chord_offset_rad = (self.floating_length_m * floating_pos_rad.sin())
            .atan2(self.anchor_length_m + self.floating_length_m * floating_pos_rad.cos());

        let anchor_pos_rad = wrap_to_pi(
            vertical_distance_m.atan2(horizontal_distance_m) - chord_offset_rad,
        );

        Ok(JointAngles {
            anchor_pos_rad,
            floating_pos_rad,
        })
    }

    /// Compute the end effector position for the given joint angles.
    ///
    /// This is the forward counterpart of [`TwoLinkKinematics::solve`],
    /// used to verify solved setpoints.
    pub fn forward(&self, angles: &JointAngles) -> Point2<f64> {
        let floating_abs_rad = angles.anchor_pos_rad + angles.floating_pos_rad;

        Point2::new(
            self.anchor_length_m * angles.anchor_pos_rad.cos()
                + self.floating_length_m * floating_abs_rad.cos(),
            self.anchor_length_m * angles.anchor_pos_rad.sin()
                + self.floating_length_m * floating_abs_rad.sin(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FRAC_PI_2: f64 = std::f64::consts::FRAC_PI_2;
    const PI: f64 = std::f64::consts::PI;

    /// Maximum position error accepted when round-tripping through the
    /// forward kinematics.
    const ROUND_TRIP_TOL_M: f64 = 1e-9;

    #[test]
    fn test_rejects_non_positive_links() {
        assert!(matches!(
            TwoLinkKinematics::new(0.0, 1.0),
            Err(KinematicsError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            TwoLinkKinematics::new(1.0, -0.5),
            Err(KinematicsError::InvalidConfiguration { .. })
        ));
        assert!(TwoLinkKinematics::new(0.925, 0.6).is_ok());
    }

    #[test]
    fn test_fully_extended() {
        let kin = TwoLinkKinematics::new(1.0, 1.0).unwrap();

        // Straight out along the horizontal axis
        let angles = kin.solve(2.0, 0.0).unwrap();
        assert_eq!(angles.anchor_pos_rad, 0.0);
        assert_eq!(angles.floating_pos_rad, 0.0);

        // Straight up
        let angles = kin.solve(0.0, 2.0).unwrap();
        assert_eq!(angles.anchor_pos_rad, FRAC_PI_2);
        assert_eq!(angles.floating_pos_rad, 0.0);
    }

    #[test]
    fn test_fully_folded() {
        let kin = TwoLinkKinematics::new(1.0, 0.5).unwrap();

        // Target on the inner reach boundary folds the arm completely
        let angles = kin.solve(0.5, 0.0).unwrap();
        assert!((angles.floating_pos_rad - PI).abs() < 1e-7);
        assert!(angles.anchor_pos_rad.abs() < 1e-7);
    }

    #[test]
    fn test_unreachable_too_far() {
        let kin = TwoLinkKinematics::new(1.0, 1.0).unwrap();

        assert!(matches!(
            kin.solve(3.0, 0.0),
            Err(KinematicsError::Unreachable { .. })
        ));
        assert!(matches!(
            kin.solve(0.0, -2.1),
            Err(KinematicsError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_unreachable_inside_dead_zone() {
        let kin = TwoLinkKinematics::new(1.0, 0.5).unwrap();

        assert!(matches!(
            kin.solve(0.2, 0.0),
            Err(KinematicsError::Unreachable { .. })
        ));
        assert!(matches!(
            kin.solve(0.0, 0.0),
            Err(KinematicsError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_degenerate_target_on_pivot() {
        // Equal link lengths shrink the inner boundary to the pivot itself
        let kin = TwoLinkKinematics::new(1.0, 1.0).unwrap();

        assert_eq!(kin.solve(0.0, 0.0), Err(KinematicsError::Degenerate));
    }

    #[test]
    fn test_elbow_down_branch() {
        let kin = TwoLinkKinematics::new(0.925, 0.6).unwrap();

        // The chosen branch always has a non-negative floating angle
        for &(y, z) in &[(1.0, 0.5), (0.8, -0.3), (-0.9, 0.4), (0.4, 0.0)] {
            let angles = kin.solve(y, z).unwrap();
            assert!(angles.floating_pos_rad >= 0.0);
            assert!(angles.floating_pos_rad <= PI);
        }
    }

    #[test]
    fn test_round_trip() {
        let kin = TwoLinkKinematics::new(0.925, 0.6).unwrap();

        // Sweep of targets strictly inside the reachable region
        for i in 0..36 {
            let bearing_rad = (i as f64) * 10f64.to_radians();

            for j in 1..10 {
                let distance_m = kin.min_reach_m()
                    + (kin.max_reach_m() - kin.min_reach_m()) * (j as f64) / 10.0;

                let y = distance_m * bearing_rad.cos();
                let z = distance_m * bearing_rad.sin();

                let angles = kin.solve(y, z).unwrap();
                let fk = kin.forward(&angles);

                assert!(
                    ((fk.x - y).powi(2) + (fk.y - z).powi(2)).sqrt() < ROUND_TRIP_TOL_M,
                    "round trip failed for target ({}, {}): got ({}, {})",
                    y,
                    z,
                    fk.x,
                    fk.y
                );
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let kin = TwoLinkKinematics::new(0.925, 0.6).unwrap();

        let a = kin.solve(0.7, -0.2).unwrap();
        let b = kin.solve(0.7, -0.2).unwrap();

        assert_eq!(a.anchor_pos_rad.to_bits(), b.anchor_pos_rad.to_bits());
        assert_eq!(a.floating_pos_rad.to_bits(), b.floating_pos_rad.to_bits());
    }

    #[test]
    fn test_joint_angles_array_round_trip() {
        let angles = JointAngles {
            anchor_pos_rad: 0.4,
            floating_pos_rad: 1.2,
        };

        assert_eq!(JointAngles::from_array(angles.as_array()), angles);
    }
}
