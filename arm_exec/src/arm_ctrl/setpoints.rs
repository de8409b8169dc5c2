//! Named setpoint table for ArmCtrl
//!
//! The parameter file declares setpoints as named end effector targets.
//! The table solves each of them through the inverse kinematics exactly
//! once, at initialisation, so an unachievable entry fails the exec at
//! startup rather than at the moment the setpoint is first commanded.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::collections::HashMap;

// Internal
use super::{ArmCtrlError, JointAngles, NamedTarget, TwoLinkKinematics};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Immutable table of precomputed joint angles for the named setpoints.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SetpointTable {
    entries: HashMap<String, JointAngles>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SetpointTable {
    /// Build the table by solving every named target.
    ///
    /// Fails with the name of the first entry the arm cannot reach.
    pub fn build(
        kinematics: &TwoLinkKinematics,
        targets: &[NamedTarget],
    ) -> Result<Self, ArmCtrlError> {
        let mut entries = HashMap::with_capacity(targets.len());

        for target in targets {
            let angles = kinematics
                .solve(target.horizontal_distance_m, target.vertical_distance_m)
                .map_err(|e| ArmCtrlError::UnachievableSetpoint {
                    name: target.name.clone(),
                    source: e,
                })?;

            entries.insert(target.name.clone(), angles);
        }

        Ok(Self { entries })
    }

    /// Look up the joint angles for a named setpoint.
    pub fn get(&self, name: &str) -> Option<&JointAngles> {
        self.entries.get(name)
    }

    /// Number of setpoints in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table holds no setpoints.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the (name, angles) pairs in the table.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &JointAngles)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn targets() -> Vec<NamedTarget> {
        vec![
            NamedTarget {
                name: "stow".into(),
                horizontal_distance_m: 0.35,
                vertical_distance_m: 0.15,
            },
            NamedTarget {
                name: "score_high".into(),
                horizontal_distance_m: 1.1,
                vertical_distance_m: 0.8,
            },
        ]
    }

    #[test]
    fn test_build_from_reachable_targets() {
        let kin = TwoLinkKinematics::new(0.925, 0.6).unwrap();

        let table = SetpointTable::build(&kin, &targets()).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.get("stow").is_some());
        assert!(table.get("score_high").is_some());
        assert!(table.get("missing").is_none());

        // Entries hold the same solution a direct solve gives
        assert_eq!(
            table.get("stow").unwrap(),
            &kin.solve(0.35, 0.15).unwrap()
        );
    }

    #[test]
    fn test_build_fails_loudly_on_unreachable_target() {
        let kin = TwoLinkKinematics::new(0.925, 0.6).unwrap();

        let mut bad = targets();
        bad.push(NamedTarget {
            name: "over_extended".into(),
            horizontal_distance_m: 2.0,
            vertical_distance_m: 0.0,
        });

        match SetpointTable::build(&kin, &bad) {
            Err(ArmCtrlError::UnachievableSetpoint { name, .. }) => {
                assert_eq!(name, "over_extended")
            }
            other => panic!("expected UnachievableSetpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table() {
        let kin = TwoLinkKinematics::new(0.925, 0.6).unwrap();

        let table = SetpointTable::build(&kin, &[]).unwrap();

        assert!(table.is_empty());
    }
}
