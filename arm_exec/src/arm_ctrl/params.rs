//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{ArmCtrlError, KinematicsError, NUM_JOINTS};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
///
/// All per-joint arrays are indexed by the joint index constants
/// (`ANCHOR_JOINT_IDX`, `FLOATING_JOINT_IDX`).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- GEOMETRY ----
    /// The length of each arm link.
    ///
    /// Units: meters.
    pub link_length_m: [f64; NUM_JOINTS],

    // ---- CAPABILITIES ----
    /// Whether the soft position limits are enforced for each joint.
    pub enable_soft_limits: [bool; NUM_JOINTS],

    /// Maximum joint absolute position (highest positive value)
    ///
    /// Units: radians
    pub max_abs_pos_rad: [f64; NUM_JOINTS],

    /// Minimum joint absolute position (lowest negative value)
    ///
    /// Units: radians
    pub min_abs_pos_rad: [f64; NUM_JOINTS],

    /// Maximum joint rotation rate used by the motion profile of the
    /// external control layer.
    ///
    /// Units: radians/second
    pub max_abs_rate_rads: [f64; NUM_JOINTS],

    /// Maximum joint rotational acceleration used by the motion profile of
    /// the external control layer.
    ///
    /// Units: radians/second^2
    pub max_abs_accel_radss: [f64; NUM_JOINTS],

    /// Position tolerance within which a joint is considered on target.
    ///
    /// Units: radians
    pub pos_tolerance_rad: [f64; NUM_JOINTS],

    // ---- CONTROL GAINS ----
    /// Closed-loop position gains for each joint, consumed by the external
    /// control layer.
    pub pid_gains: [PidGains; NUM_JOINTS],

    /// Feedforward gains for each joint, consumed by the external control
    /// layer.
    pub feedforward_gains: [FeedforwardGains; NUM_JOINTS],

    // ---- CONVERSIONS ----
    /// Gear reduction between each joint's motor and the mechanism.
    ///
    /// Units: mechanism rotations / motor rotation
    pub gear_ratio: [f64; NUM_JOINTS],

    // ---- ELECTRICAL ----
    /// Controller bus port of each joint's motor.
    pub motor_port: [u8; NUM_JOINTS],

    /// Controller bus port of each joint's encoder.
    pub encoder_port: [u8; NUM_JOINTS],

    /// Whether each joint's motor direction is inverted.
    pub motor_inverted: [bool; NUM_JOINTS],

    /// Current limit applied to each joint's motor.
    ///
    /// Units: amps
    pub current_limit_a: [u32; NUM_JOINTS],

    /// Maximum normalised motor output (raising direction).
    pub max_output: [f64; NUM_JOINTS],

    /// Minimum normalised motor output (lowering direction).
    pub min_output: [f64; NUM_JOINTS],

    // ---- SETPOINTS ----
    /// Named end effector targets to be solved into joint angles at
    /// initialisation.
    pub setpoints: Vec<NamedTarget>,
}

/// Proportional-integral-derivative gains for one joint.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,

    /// Gain slot on the motor controller these gains are written to.
    pub slot: u8,
}

/// Static/gravity/velocity/acceleration feedforward gains for one joint.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct FeedforwardGains {
    pub ks: f64,
    pub kg: f64,
    pub kv: f64,
    pub ka: f64,
}

/// A named end effector target in the arm's operating plane.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct NamedTarget {
    /// Name the setpoint is looked up by.
    pub name: String,

    /// Horizontal offset of the target from the anchor pivot.
    ///
    /// Units: meters
    pub horizontal_distance_m: f64,

    /// Vertical offset of the target from the anchor pivot.
    ///
    /// Units: meters
    pub vertical_distance_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Validate the loaded parameters.
    ///
    /// Checks the constraints a well formed parameter file must meet:
    /// positive link lengths and correctly ordered soft limit pairs.
    pub fn validate(&self) -> Result<(), ArmCtrlError> {
        if self.link_length_m.iter().any(|l| *l <= 0.0) {
            return Err(ArmCtrlError::InvalidGeometry(
                KinematicsError::InvalidConfiguration {
                    anchor_length_m: self.link_length_m[super::ANCHOR_JOINT_IDX],
                    floating_length_m: self.link_length_m[super::FLOATING_JOINT_IDX],
                },
            ));
        }

        for i in 0..NUM_JOINTS {
            if self.enable_soft_limits[i] && self.min_abs_pos_rad[i] > self.max_abs_pos_rad[i] {
                return Err(ArmCtrlError::InvalidLimits { joint_idx: i });
            }
        }

        Ok(())
    }
}
