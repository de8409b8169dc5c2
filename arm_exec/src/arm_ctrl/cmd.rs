//! Commands passed into ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command that can be executed by arm control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ArmCmd {
    /// Move the end effector to a setpoint from the named setpoint table.
    NamedSetpoint {
        /// Name of the setpoint, as declared in the parameter file.
        name: String,
    },

    /// Move the end effector to an arbitrary position in the operating
    /// plane, the joint angles are solved by the inverse kinematics.
    InverseKinematics {
        /// Horizontal distance from the anchor pivot.
        ///
        /// Positive is away from the chassis.
        ///
        /// Units: meters
        horizontal_distance_m: f64,

        /// Vertical distance from the anchor pivot.
        ///
        /// Positive is up.
        ///
        /// Units: meters
        vertical_distance_m: f64,
    },

    /// Stop the arm, holding the previously demanded joint angles.
    Stop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArmCmd {
    /// Determine if the command is valid (i.e. contains usable data).
    pub fn is_valid(&self) -> bool {
        match self {
            ArmCmd::NamedSetpoint { name } => !name.is_empty(),
            ArmCmd::InverseKinematics {
                horizontal_distance_m,
                vertical_distance_m,
            } => horizontal_distance_m.is_finite() && vertical_distance_m.is_finite(),
            ArmCmd::Stop => true,
        }
    }
}
