//! Arm control module

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod kinematics;
mod params;
mod setpoints;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use kinematics::*;
pub use params::*;
pub use setpoints::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of rotational joints on the arm.
pub const NUM_JOINTS: usize = 2;

/// Index of the anchor (shoulder) joint, the joint fixed to the chassis.
pub const ANCHOR_JOINT_IDX: usize = 0;

/// Index of the floating (elbow) joint, carried at the end of the anchor
/// link.
pub const FLOATING_JOINT_IDX: usize = 1;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Failed to load ArmCtrl parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Invalid arm geometry parameters: {0}")]
    InvalidGeometry(#[source] KinematicsError),

    #[error("Setpoint {name:?} cannot be reached by the arm: {source}")]
    UnachievableSetpoint {
        name: String,
        #[source]
        source: KinematicsError,
    },

    #[error("No setpoint named {0:?} in the setpoint table")]
    UnknownSetpoint(String),

    #[error("Soft limits for joint {joint_idx} are inverted (min above max)")]
    InvalidLimits { joint_idx: usize },

    #[error("Cannot solve for the commanded target: {0}")]
    TargetNotSolvable(#[from] KinematicsError),

    #[error("Expected there to be an arm command but couldn't find one")]
    NoArmCmd,

    #[error("Recieved an invalid arm command")]
    InvalidArmCmd,

    #[error("ArmCtrl has not been initialised")]
    NotInitialised,
}
