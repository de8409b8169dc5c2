//! Main arm-side executable entry point.
//!
//! # Architecture
//!
//! The execution methodology consists of:
//!
//!     - Initialise the session and logging
//!     - Initialise the ArmCtrl module, which loads the parameter file and
//!       solves all named setpoints
//!     - Report the solved setpoint table, verifying each entry through the
//!       forward kinematics
//!     - If a target was given on the command line, solve it and report the
//!       joint angle demands
//!
//! The exec accepts either zero arguments or a `<horizontal_m> <vertical_m>`
//! pair describing an end effector target relative to the anchor pivot.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use arm_lib::arm_ctrl::{ArmCmd, ArmCtrl, InputData, ANCHOR_JOINT_IDX, FLOATING_JOINT_IDX};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use std::env;

// Internal
use util::{
    convert::rad_to_deg,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("arm_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut arm_ctrl = ArmCtrl::default();
    arm_ctrl
        .init("arm_ctrl.toml", &session)
        .wrap_err("Failed to initialise ArmCtrl")?;

    info!("ArmCtrl init complete\n");

    // ---- SETPOINT TABLE REPORT ----

    let kinematics = *arm_ctrl
        .kinematics()
        .ok_or_else(|| eyre!("ArmCtrl provided no kinematics solver after init"))?;

    info!("{} named setpoints solved:", arm_ctrl.setpoint_table().len());

    for (name, angles) in arm_ctrl.setpoint_table().iter() {
        // Verify the entry by running it back through the forward kinematics
        let end_effector = kinematics.forward(angles);

        info!(
            "    {}: anchor {:7.2} deg, floating {:7.2} deg -> end effector ({:.3}, {:.3}) m",
            name,
            rad_to_deg(angles.anchor_pos_rad),
            rad_to_deg(angles.floating_pos_rad),
            end_effector.x,
            end_effector.y
        );
    }

    // Archive the solved table in the session directory
    session.save("setpoints.json", arm_ctrl.setpoint_table());

    // ---- AD-HOC TARGET ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    match args.len() {
        // No target requested
        1 => (),

        // Target given as a (horizontal, vertical) pair
        3 => {
            let horizontal_distance_m: f64 = args[1]
                .parse()
                .wrap_err("Could not parse the horizontal distance")?;
            let vertical_distance_m: f64 = args[2]
                .parse()
                .wrap_err("Could not parse the vertical distance")?;

            info!(
                "\nSolving for target ({}, {}) m",
                horizontal_distance_m, vertical_distance_m
            );

            let (output, report) = arm_ctrl
                .proc(&InputData {
                    cmd: Some(ArmCmd::InverseKinematics {
                        horizontal_distance_m,
                        vertical_distance_m,
                    }),
                })
                .wrap_err("Failed to solve for the requested target")?;

            if report.abs_pos_limited[ANCHOR_JOINT_IDX]
                || report.abs_pos_limited[FLOATING_JOINT_IDX]
            {
                warn!("Target exceeds the soft limits, the demand has been clamped");
            }

            info!(
                "Anchor demand:   {:8.4} rad ({:7.2} deg)",
                output.anchor_pos_rad,
                rad_to_deg(output.anchor_pos_rad)
            );
            info!(
                "Floating demand: {:8.4} rad ({:7.2} deg)",
                output.floating_pos_rad,
                rad_to_deg(output.floating_pos_rad)
            );
        }

        _ => {
            return Err(eyre!(
                "Expected either zero or two arguments, found {}",
                args.len() - 1
            ))
        }
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}
