//! Nested mapping form of an order.
//!
//! `OpordDocument` is the single intermediate representation: the text renderer, the export
//! adapter, the session store and the JSON API all consume it. It mirrors the schema tree
//! one-to-one, holds raw values only (no fallbacks), and adds the constant unit descriptors and
//! the subordinate catalog.

use crate::constants::{HIGHER_HQ, UNIT_NAME, UNIT_SHORT, UNIT_TYPE};
use crate::error::{OpordError, OpordResult};
use crate::fields::Field;
use crate::schema::{CommandAndSignal, Execution, OpordData, Situation, SubordinateUnit, Sustainment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpordDocument {
    pub unit: String,
    pub unit_short: String,
    pub unit_type: String,
    pub higher_hq: String,
    pub classification: String,
    pub operation_name: String,
    pub dtg: String,
    pub time_zone: String,
    pub reference_maps: String,
    pub insert_method: String,
    pub dz_lz: String,
    pub situation: Situation,
    pub mission: String,
    pub execution: Execution,
    pub sustainment: Sustainment,
    pub command_and_signal: CommandAndSignal,
    pub subordinate_units: Vec<String>,
}

impl Default for OpordDocument {
    fn default() -> Self {
        Self::from(&OpordData::default())
    }
}

impl From<&OpordData> for OpordDocument {
    fn from(data: &OpordData) -> Self {
        Self {
            unit: UNIT_NAME.to_string(),
            unit_short: UNIT_SHORT.to_string(),
            unit_type: UNIT_TYPE.to_string(),
            higher_hq: HIGHER_HQ.to_string(),
            classification: data.classification.clone(),
            operation_name: data.operation_name.clone(),
            dtg: data.dtg.clone(),
            time_zone: data.time_zone.clone(),
            reference_maps: data.reference_maps.clone(),
            insert_method: data.insert_method.clone(),
            dz_lz: data.dz_lz.clone(),
            situation: data.situation.clone(),
            mission: data.mission.clone(),
            execution: data.execution.clone(),
            sustainment: data.sustainment.clone(),
            command_and_signal: data.command_and_signal.clone(),
            subordinate_units: SubordinateUnit::catalog_names(),
        }
    }
}

impl OpordDocument {
    /// Raw value of `field`, possibly empty.
    pub fn value(&self, field: Field) -> &str {
        let situation = &self.situation;
        let enemy = &situation.enemy;
        let friendly = &situation.friendly;
        let execution = &self.execution;
        let sustainment = &self.sustainment;
        let cs = &self.command_and_signal;

        match field {
            Field::OperationName => &self.operation_name,
            Field::Classification => &self.classification,
            Field::Dtg => &self.dtg,
            Field::TimeZone => &self.time_zone,
            Field::ReferenceMaps => &self.reference_maps,
            Field::InsertMethod => &self.insert_method,
            Field::DzLz => &self.dz_lz,
            Field::EnemyComposition => &enemy.composition,
            Field::EnemyDisposition => &enemy.disposition,
            Field::EnemyStrength => &enemy.strength,
            Field::EnemyRecentActivity => &enemy.recent_activity,
            Field::EnemyCapabilities => &enemy.capabilities,
            Field::EnemyMostLikelyCoa => &enemy.most_likely_coa,
            Field::EnemyMostDangerousCoa => &enemy.most_dangerous_coa,
            Field::HigherHqMission => &friendly.higher_hq_mission,
            Field::AdjacentUnits => &friendly.adjacent_units,
            Field::SupportingUnits => &friendly.supporting_units,
            Field::AttachmentsDetachments => &situation.attachments_detachments,
            Field::CivilConsiderations => &situation.civil_considerations,
            Field::Mission => &self.mission,
            Field::CommandersIntent => &execution.commanders_intent,
            Field::HigherCommandersIntent => &execution.higher_commanders_intent,
            Field::ConceptOfOperations => &execution.concept_of_operations,
            Field::SchemeOfManeuver => &execution.scheme_of_maneuver,
            Field::SchemeOfFires => &execution.scheme_of_fires,
            Field::CoordinatingInstructions => &execution.coordinating_instructions,
            Field::RulesOfEngagement => &execution.rules_of_engagement,
            Field::Logistics => &sustainment.logistics,
            Field::Personnel => &sustainment.personnel,
            Field::Medical => &sustainment.medical,
            Field::CpLocation => &cs.command,
            Field::SuccessionOfCommand => &cs.succession_of_command,
            Field::Signal => &cs.signal,
            Field::Frequencies => &cs.frequencies,
            Field::ChallengeAndPassword => &cs.challenge_and_password,
        }
    }

    /// Serialise for the session store or a file.
    pub fn to_json(&self) -> OpordResult<String> {
        serde_json::to_string(self).map_err(OpordError::Serialization)
    }

    /// Restore a previously stored document.
    pub fn from_json(json: &str) -> OpordResult<Self> {
        serde_json::from_str(json).map_err(OpordError::Deserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_CLASSIFICATION, DEFAULT_TIME_ZONE};
    use crate::schema::TaskAssignments;

    fn sample() -> OpordData {
        let mut data = OpordData {
            operation_name: "STEEL TALON".into(),
            dtg: "231500Z FEB 2025".into(),
            mission: "Seize OBJ EAGLE.".into(),
            ..OpordData::default()
        };
        data.situation.enemy.strength = "~40 personnel".into();
        data.command_and_signal.command = "Grid 12ABC12345".into();
        data.execution.tasks_to_subordinates = TaskAssignments::new()
            .with(SubordinateUnit::SecondPlatoon, "Secure OBJ HAWK.")
            .with(SubordinateUnit::FirstPlatoon, "Assault OBJ EAGLE.");
        data
    }

    #[test]
    fn carries_unit_constants_and_catalog() {
        let doc = OpordDocument::from(&OpordData::default());
        assert_eq!(doc.unit_short, "C/1-7 CAV");
        assert!(doc.unit.contains("Charlie Company"));
        assert!(doc.higher_hq.contains("1st Battalion"));
        assert_eq!(doc.subordinate_units.len(), 5);
        assert_eq!(doc.subordinate_units[3], "Weapons Platoon");
    }

    #[test]
    fn value_reads_raw_fields_without_fallbacks() {
        let doc = OpordDocument::from(&sample());
        assert_eq!(doc.value(Field::EnemyStrength), "~40 personnel");
        assert_eq!(doc.value(Field::CpLocation), "Grid 12ABC12345");
        assert_eq!(doc.value(Field::EnemyComposition), "");
    }

    #[test]
    fn json_nests_sections_and_keeps_task_order() {
        let doc = OpordDocument::from(&sample());
        let json = doc.to_json().unwrap();

        assert!(json.contains(r#""enemy":{"composition":"","disposition":"","strength":"~40 personnel""#));
        let second = json.find("2nd Platoon (Rifle)").unwrap();
        let first = json.find("1st Platoon (Rifle)\":\"Assault").unwrap();
        assert!(second < first);

        assert_eq!(OpordDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn missing_keys_take_document_defaults() {
        let doc = OpordDocument::from_json(r#"{"operation_name":"IRON HAWK"}"#).unwrap();
        assert_eq!(doc.operation_name, "IRON HAWK");
        assert_eq!(doc.classification, DEFAULT_CLASSIFICATION);
        assert_eq!(doc.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(doc.value(Field::Signal), "");
        assert!(doc.execution.tasks_to_subordinates.is_empty());
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        assert!(matches!(
            OpordDocument::from_json("{not json"),
            Err(OpordError::Deserialization(_))
        ));
    }
}
