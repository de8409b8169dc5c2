//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::{Deserialize, Serialize};

// Internal
use super::{
    ArmCmd, ArmCtrlError, JointAngles, Params, SetpointTable, TwoLinkKinematics,
    ANCHOR_JOINT_IDX, FLOATING_JOINT_IDX, NUM_JOINTS,
};
use util::{maths::clamp, module::State, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
#[derive(Default)]
pub struct ArmCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    pub(crate) current_cmd: Option<ArmCmd>,

    /// Kinematics solver built from the configured geometry, `None` until
    /// the module is initialised.
    pub(crate) kinematics: Option<TwoLinkKinematics>,

    /// Precomputed joint angles for all named setpoints.
    pub(crate) setpoint_table: SetpointTable,

    pub(crate) target_angles: Option<JointAngles>,

    pub(crate) output: Option<JointAngles>,
}

/// Input data to Arm Control.
#[derive(Default)]
pub struct InputData {
    /// The command to be executed, or `None` if there is no new command on
    /// this cycle.
    pub cmd: Option<ArmCmd>,
}

/// Status report for ArmCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug)]
pub struct StatusReport {
    pub abs_pos_limited: [bool; NUM_JOINTS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ArmCtrl {
    type InitData = &'static str;
    type InitError = ArmCtrlError;

    type InputData = InputData;
    type OutputData = JointAngles;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// Expected init data is the path to the parameter file. Initialisation
    /// solves every named setpoint in the parameters, so a file declaring a
    /// target the arm cannot reach fails here rather than during
    /// processing.
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        // Load the parameters
        self.params = util::params::load(init_data)?;
        self.params.validate()?;

        // Build the solver from the configured geometry
        let kinematics = TwoLinkKinematics::new(
            self.params.link_length_m[ANCHOR_JOINT_IDX],
            self.params.link_length_m[FLOATING_JOINT_IDX],
        )
        .map_err(ArmCtrlError::InvalidGeometry)?;

        // Solve all named setpoints
        self.setpoint_table = SetpointTable::build(&kinematics, &self.params.setpoints)?;

        self.kinematics = Some(kinematics);
        self.target_angles = Some(JointAngles::default());

        Ok(())
    }

    /// Perform cyclic processing of Arm Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // Check to see if there's a new command
        if let Some(cmd) = &input_data.cmd {
            // Update the internal copy of the command
            self.current_cmd = Some(cmd.clone());

            // Output the command in debug mode
            debug!("New ArmCtrl ArmCmd::{:?}", cmd);

            // Calculate the target angles based on this new command.
            self.calc_target_angles()?;
        }

        // The output demand is the (limited) target
        self.output = self.target_angles;

        Ok((self.output.unwrap_or_default(), self.report))
    }
}

impl ArmCtrl {
    /// Access the precomputed named setpoint table.
    pub fn setpoint_table(&self) -> &SetpointTable {
        &self.setpoint_table
    }

    /// Access the kinematics solver, `None` before initialisation.
    pub fn kinematics(&self) -> Option<&TwoLinkKinematics> {
        self.kinematics.as_ref()
    }

    /// Based on the current command calculate the target joint angles.
    ///
    /// A valid command should be set in `self.current_cmd` before calling
    /// this function.
    fn calc_target_angles(&mut self) -> Result<(), ArmCtrlError> {
        // Check we have a valid command
        let cmd = match &self.current_cmd {
            Some(c) => c.clone(),
            None => return Err(ArmCtrlError::NoArmCmd),
        };

        if !cmd.is_valid() {
            return Err(ArmCtrlError::InvalidArmCmd);
        }

        let kinematics = self.kinematics.ok_or(ArmCtrlError::NotInitialised)?;

        // Perform calculations for each command type. These calculations
        // shall update `self.target_angles`.
        match cmd {
            ArmCmd::Stop => self.calc_stop(),

            ArmCmd::NamedSetpoint { name } => {
                let angles = self
                    .setpoint_table
                    .get(&name)
                    .ok_or(ArmCtrlError::UnknownSetpoint(name.clone()))?;

                self.target_angles = Some(*angles);
            }

            ArmCmd::InverseKinematics {
                horizontal_distance_m,
                vertical_distance_m,
            } => {
                let angles = kinematics.solve(horizontal_distance_m, vertical_distance_m)?;

                self.target_angles = Some(angles);
            }
        }

        // Limit target to the arm's capabilities
        self.enforce_limits();

        Ok(())
    }

    /// Perform the stop command calculations.
    ///
    /// The stop command shall maintain the previously demanded joint
    /// angles. Stop never errors.
    fn calc_stop(&mut self) {
        if let Some(output) = self.output {
            self.target_angles = Some(output);
        }
    }

    /// Enforce the soft position limits in the arm's capabilities.
    ///
    /// This function shall modify the current target angles to ensure that
    /// no limit of the arm is exceeded.
    ///
    /// If a limit is reached the corresponding flag in the status report
    /// will be raised.
    fn enforce_limits(&mut self) {
        if let Some(ref mut target) = self.target_angles {
            let mut pos_rad = target.as_array();

            for i in 0..NUM_JOINTS {
                if !self.params.enable_soft_limits[i] {
                    continue;
                }

                let limited = clamp(
                    &pos_rad[i],
                    &self.params.min_abs_pos_rad[i],
                    &self.params.max_abs_pos_rad[i],
                );

                if limited != pos_rad[i] {
                    self.report.abs_pos_limited[i] = true;
                    pos_rad[i] = limited;
                }
            }

            *target = JointAngles::from_array(pos_rad);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::NamedTarget;

    /// Build an initialised ArmCtrl without going through a parameter file.
    fn test_arm_ctrl() -> ArmCtrl {
        let mut params = Params::default();
        params.link_length_m = [0.925, 0.6];
        params.enable_soft_limits = [true, false];
        params.min_abs_pos_rad = [-0.5, 0.0];
        params.max_abs_pos_rad = [1.0, 0.0];
        params.setpoints = vec![NamedTarget {
            name: "stow".into(),
            horizontal_distance_m: 0.35,
            vertical_distance_m: 0.15,
        }];

        let kinematics = TwoLinkKinematics::new(0.925, 0.6).unwrap();
        let setpoint_table = SetpointTable::build(&kinematics, &params.setpoints).unwrap();

        ArmCtrl {
            params,
            kinematics: Some(kinematics),
            setpoint_table,
            target_angles: Some(JointAngles::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_named_setpoint_cmd() {
        let mut arm_ctrl = test_arm_ctrl();
        let expected = *arm_ctrl.setpoint_table().get("stow").unwrap();

        let (output, report) = arm_ctrl
            .proc(&InputData {
                cmd: Some(ArmCmd::NamedSetpoint {
                    name: "stow".into(),
                }),
            })
            .unwrap();

        assert_eq!(output, expected);
        assert!(!report.abs_pos_limited.iter().any(|l| *l));
    }

    #[test]
    fn test_unknown_setpoint_cmd() {
        let mut arm_ctrl = test_arm_ctrl();

        let result = arm_ctrl.proc(&InputData {
            cmd: Some(ArmCmd::NamedSetpoint {
                name: "no_such_setpoint".into(),
            }),
        });

        assert!(matches!(result, Err(ArmCtrlError::UnknownSetpoint(_))));
    }

    #[test]
    fn test_inverse_kinematics_cmd() {
        let mut arm_ctrl = test_arm_ctrl();

        // Target chosen so the solution sits inside the soft limits
        let expected = arm_ctrl.kinematics().unwrap().solve(1.2, 0.3).unwrap();

        let (output, _) = arm_ctrl
            .proc(&InputData {
                cmd: Some(ArmCmd::InverseKinematics {
                    horizontal_distance_m: 1.2,
                    vertical_distance_m: 0.3,
                }),
            })
            .unwrap();

        assert_eq!(output, expected);
    }

    #[test]
    fn test_unreachable_target_cmd() {
        let mut arm_ctrl = test_arm_ctrl();

        let result = arm_ctrl.proc(&InputData {
            cmd: Some(ArmCmd::InverseKinematics {
                horizontal_distance_m: 5.0,
                vertical_distance_m: 0.0,
            }),
        });

        assert!(matches!(result, Err(ArmCtrlError::TargetNotSolvable(_))));
    }

    #[test]
    fn test_soft_limits_enforced() {
        let mut arm_ctrl = test_arm_ctrl();

        // A target high above the pivot demands an anchor angle past the
        // 1.0 rad soft limit
        let (output, report) = arm_ctrl
            .proc(&InputData {
                cmd: Some(ArmCmd::InverseKinematics {
                    horizontal_distance_m: 0.1,
                    vertical_distance_m: 1.4,
                }),
            })
            .unwrap();

        assert_eq!(output.anchor_pos_rad, 1.0);
        assert!(report.abs_pos_limited[ANCHOR_JOINT_IDX]);
        assert!(!report.abs_pos_limited[FLOATING_JOINT_IDX]);
    }

    #[test]
    fn test_stop_holds_previous_output() {
        let mut arm_ctrl = test_arm_ctrl();

        let (first, _) = arm_ctrl
            .proc(&InputData {
                cmd: Some(ArmCmd::NamedSetpoint {
                    name: "stow".into(),
                }),
            })
            .unwrap();

        let (held, _) = arm_ctrl
            .proc(&InputData {
                cmd: Some(ArmCmd::Stop),
            })
            .unwrap();

        assert_eq!(held, first);
    }

    #[test]
    fn test_no_cmd_keeps_target() {
        let mut arm_ctrl = test_arm_ctrl();

        let (output, _) = arm_ctrl.proc(&InputData::default()).unwrap();

        assert_eq!(output, JointAngles::default());
    }
}
