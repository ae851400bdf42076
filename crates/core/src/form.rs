//! Flat inbound field mapping.
//!
//! The web form and the CLI both hand the core a flat `key -> string` mapping. Unknown keys are
//! carried along untouched (the enrichment adapter copies the whole mapping) but ignored when the
//! order is built; absent keys read as the empty string.

use crate::fields::Field;
use crate::schema::{
    CommandAndSignal, EnemyForces, Execution, FriendlyForces, OpordData, Situation,
    SubordinateUnit, Sustainment, TaskAssignments,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw user-submitted fields, possibly partially filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value for `field`.
    pub fn value(&self, field: Field) -> &str {
        self.get(field.form_key()).trim()
    }

    /// True when `key` is absent or only whitespace.
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).trim().is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`FormFields::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build the typed order from these fields.
    ///
    /// Values are trimmed. A blank classification or time zone takes its constant default;
    /// subordinate tasks are read in catalog order and blank tasks are dropped.
    pub fn to_opord_data(&self) -> OpordData {
        let get = |field: Field| -> String {
            match self.value(field) {
                "" => field.default_value().to_string(),
                value => value.to_string(),
            }
        };

        let mut tasks = TaskAssignments::new();
        for unit in SubordinateUnit::ALL {
            tasks.assign(unit, self.get(unit.form_key()));
        }

        OpordData {
            operation_name: get(Field::OperationName),
            classification: get(Field::Classification),
            dtg: get(Field::Dtg),
            reference_maps: get(Field::ReferenceMaps),
            time_zone: get(Field::TimeZone),
            insert_method: get(Field::InsertMethod),
            dz_lz: get(Field::DzLz),
            situation: Situation {
                enemy: EnemyForces {
                    composition: get(Field::EnemyComposition),
                    disposition: get(Field::EnemyDisposition),
                    strength: get(Field::EnemyStrength),
                    recent_activity: get(Field::EnemyRecentActivity),
                    capabilities: get(Field::EnemyCapabilities),
                    most_likely_coa: get(Field::EnemyMostLikelyCoa),
                    most_dangerous_coa: get(Field::EnemyMostDangerousCoa),
                },
                friendly: FriendlyForces {
                    higher_hq_mission: get(Field::HigherHqMission),
                    adjacent_units: get(Field::AdjacentUnits),
                    supporting_units: get(Field::SupportingUnits),
                },
                attachments_detachments: get(Field::AttachmentsDetachments),
                civil_considerations: get(Field::CivilConsiderations),
            },
            mission: get(Field::Mission),
            execution: Execution {
                commanders_intent: get(Field::CommandersIntent),
                higher_commanders_intent: get(Field::HigherCommandersIntent),
                concept_of_operations: get(Field::ConceptOfOperations),
                scheme_of_maneuver: get(Field::SchemeOfManeuver),
                scheme_of_fires: get(Field::SchemeOfFires),
                tasks_to_subordinates: tasks,
                coordinating_instructions: get(Field::CoordinatingInstructions),
                rules_of_engagement: get(Field::RulesOfEngagement),
            },
            sustainment: Sustainment {
                logistics: get(Field::Logistics),
                personnel: get(Field::Personnel),
                medical: get(Field::Medical),
            },
            command_and_signal: CommandAndSignal {
                command: get(Field::CpLocation),
                succession_of_command: get(Field::SuccessionOfCommand),
                signal: get(Field::Signal),
                frequencies: get(Field::Frequencies),
                challenge_and_password: get(Field::ChallengeAndPassword),
            },
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_form() -> FormFields {
        FormFields::new()
            .with("operation_name", "IRON HAWK")
            .with("classification", "UNCLASSIFIED // TRAINING USE ONLY")
            .with("dtg", "231500Z FEB 2025")
            .with("time_zone", "ZULU")
            .with("insert_method", "Airborne (Static Line)")
            .with("dz_lz", "DZ FALCON")
            .with("enemy_composition", "OPFOR platoon")
            .with("enemy_capabilities", "")
            .with(
                "mission",
                "C/1-7 CAV conducts an airborne assault on OBJ EAGLE NLT 231800Z FEB 25.",
            )
            .with("task_1st", "Assault OBJ EAGLE.")
            .with("task_2nd", "Secure flanks.")
            .with("task_weapons", "")
            .with("command_cp", "Grid 12ABC12345")
            .with("frequencies", "CMD: 46.250")
    }

    #[test]
    fn maps_heading_and_mission() {
        let data = minimal_form().to_opord_data();
        assert_eq!(data.operation_name, "IRON HAWK");
        assert!(data.mission.contains("OBJ EAGLE"));
        assert_eq!(data.insert_method, "Airborne (Static Line)");
    }

    #[test]
    fn maps_nested_fields() {
        let data = minimal_form().to_opord_data();
        assert_eq!(data.situation.enemy.composition, "OPFOR platoon");
        assert_eq!(data.command_and_signal.command, "Grid 12ABC12345");
        assert!(data.command_and_signal.frequencies.contains("46.250"));
    }

    #[test]
    fn maps_tasks_and_excludes_blank_ones() {
        let data = minimal_form().to_opord_data();
        let tasks = &data.execution.tasks_to_subordinates;
        assert_eq!(
            tasks.get(SubordinateUnit::FirstPlatoon),
            Some("Assault OBJ EAGLE.")
        );
        assert!(!tasks.contains(SubordinateUnit::WeaponsPlatoon));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn trims_values_and_ignores_unknown_keys() {
        let data = FormFields::new()
            .with("operation_name", "  STEEL TALON \n")
            .with("use_ai", "on")
            .to_opord_data();
        assert_eq!(data.operation_name, "STEEL TALON");
    }

    #[test]
    fn blank_classification_and_time_zone_take_defaults() {
        let data = FormFields::new()
            .with("classification", "   ")
            .with("time_zone", "")
            .to_opord_data();
        assert_eq!(data.classification, "UNCLASSIFIED // TRAINING USE ONLY");
        assert_eq!(data.time_zone, "ZULU");
    }

    #[test]
    fn empty_form_matches_default_order() {
        assert_eq!(FormFields::new().to_opord_data(), OpordData::default());
    }

    #[test]
    fn deserializes_from_flat_json() {
        let form: FormFields =
            serde_json::from_str(r#"{"operation_name":"IRON HAWK","signal":"PACE"}"#).unwrap();
        assert_eq!(form.get("signal"), "PACE");
        assert_eq!(form.get("missing"), "");
        assert!(form.is_blank("missing"));
    }
}
