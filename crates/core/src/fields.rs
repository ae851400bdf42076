//! The field table.
//!
//! One closed enum names every leaf of the order. Inbound form keys, doctrinal fallback
//! phrases, template placeholder names and display labels are all looked up here, so none of
//! them is repeated as a literal anywhere else in the crate.
//!
//! Tasks to subordinate units are not a leaf field; see [`crate::schema::TaskAssignments`].

use crate::constants::{DEFAULT_CLASSIFICATION, DEFAULT_TIME_ZONE};

/// Every leaf field of an OPORD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    OperationName,
    Classification,
    Dtg,
    TimeZone,
    ReferenceMaps,
    InsertMethod,
    DzLz,

    EnemyComposition,
    EnemyDisposition,
    EnemyStrength,
    EnemyRecentActivity,
    EnemyCapabilities,
    EnemyMostLikelyCoa,
    EnemyMostDangerousCoa,

    HigherHqMission,
    AdjacentUnits,
    SupportingUnits,
    AttachmentsDetachments,
    CivilConsiderations,

    Mission,

    CommandersIntent,
    HigherCommandersIntent,
    ConceptOfOperations,
    SchemeOfManeuver,
    SchemeOfFires,
    CoordinatingInstructions,
    RulesOfEngagement,

    Logistics,
    Personnel,
    Medical,

    CpLocation,
    SuccessionOfCommand,
    Signal,
    Frequencies,
    ChallengeAndPassword,
}

impl Field {
    /// All fields in document order.
    pub const ALL: [Field; 35] = [
        Field::OperationName,
        Field::Classification,
        Field::Dtg,
        Field::TimeZone,
        Field::ReferenceMaps,
        Field::InsertMethod,
        Field::DzLz,
        Field::EnemyComposition,
        Field::EnemyDisposition,
        Field::EnemyStrength,
        Field::EnemyRecentActivity,
        Field::EnemyCapabilities,
        Field::EnemyMostLikelyCoa,
        Field::EnemyMostDangerousCoa,
        Field::HigherHqMission,
        Field::AdjacentUnits,
        Field::SupportingUnits,
        Field::AttachmentsDetachments,
        Field::CivilConsiderations,
        Field::Mission,
        Field::CommandersIntent,
        Field::HigherCommandersIntent,
        Field::ConceptOfOperations,
        Field::SchemeOfManeuver,
        Field::SchemeOfFires,
        Field::CoordinatingInstructions,
        Field::RulesOfEngagement,
        Field::Logistics,
        Field::Personnel,
        Field::Medical,
        Field::CpLocation,
        Field::SuccessionOfCommand,
        Field::Signal,
        Field::Frequencies,
        Field::ChallengeAndPassword,
    ];

    /// The seven Para 1a fields.
    pub const ENEMY: [Field; 7] = [
        Field::EnemyComposition,
        Field::EnemyDisposition,
        Field::EnemyStrength,
        Field::EnemyRecentActivity,
        Field::EnemyCapabilities,
        Field::EnemyMostLikelyCoa,
        Field::EnemyMostDangerousCoa,
    ];

    /// The three Para 1b fields.
    pub const FRIENDLY: [Field; 3] = [
        Field::HigherHqMission,
        Field::AdjacentUnits,
        Field::SupportingUnits,
    ];

    /// Key of the flat inbound mapping that carries this field.
    pub fn form_key(&self) -> &'static str {
        match self {
            Field::OperationName => "operation_name",
            Field::Classification => "classification",
            Field::Dtg => "dtg",
            Field::TimeZone => "time_zone",
            Field::ReferenceMaps => "reference_maps",
            Field::InsertMethod => "insert_method",
            Field::DzLz => "dz_lz",
            Field::EnemyComposition => "enemy_composition",
            Field::EnemyDisposition => "enemy_disposition",
            Field::EnemyStrength => "enemy_strength",
            Field::EnemyRecentActivity => "enemy_recent_activity",
            Field::EnemyCapabilities => "enemy_capabilities",
            Field::EnemyMostLikelyCoa => "enemy_most_likely_coa",
            Field::EnemyMostDangerousCoa => "enemy_most_dangerous_coa",
            Field::HigherHqMission => "friendly_higher_hq_mission",
            Field::AdjacentUnits => "friendly_adjacent_units",
            Field::SupportingUnits => "friendly_supporting_units",
            Field::AttachmentsDetachments => "attachments_detachments",
            Field::CivilConsiderations => "civil_considerations",
            Field::Mission => "mission",
            Field::CommandersIntent => "commanders_intent",
            Field::HigherCommandersIntent => "higher_commanders_intent",
            Field::ConceptOfOperations => "concept_of_operations",
            Field::SchemeOfManeuver => "scheme_of_maneuver",
            Field::SchemeOfFires => "scheme_of_fires",
            Field::CoordinatingInstructions => "coordinating_instructions",
            Field::RulesOfEngagement => "rules_of_engagement",
            Field::Logistics => "sustainment_logistics",
            Field::Personnel => "sustainment_personnel",
            Field::Medical => "sustainment_medical",
            Field::CpLocation => "command_cp",
            Field::SuccessionOfCommand => "succession_of_command",
            Field::Signal => "signal",
            Field::Frequencies => "frequencies",
            Field::ChallengeAndPassword => "challenge_and_password",
        }
    }

    /// Doctrinal text shown in the rendered order when the field is blank.
    ///
    /// `None` means the field has no fallback: classification and time zone are never blank,
    /// and the insert method and DZ/LZ lines are omitted instead.
    pub fn fallback(&self) -> Option<&'static str> {
        let phrase = match self {
            Field::Classification | Field::TimeZone | Field::InsertMethod | Field::DzLz => {
                return None
            }
            Field::OperationName => "TBD",
            Field::Dtg => "DTG TBD",
            Field::ReferenceMaps => "N/A",
            Field::EnemyComposition
            | Field::EnemyDisposition
            | Field::EnemyStrength
            | Field::EnemyRecentActivity
            | Field::EnemyCapabilities
            | Field::EnemyMostLikelyCoa
            | Field::EnemyMostDangerousCoa => "Not reported.",
            Field::HigherHqMission => "See higher OPORD.",
            Field::AdjacentUnits | Field::SupportingUnits => "None identified.",
            Field::AttachmentsDetachments => "None.",
            Field::CivilConsiderations => "None assessed at this time.",
            Field::Mission => "Mission not specified.",
            Field::CommandersIntent
            | Field::ConceptOfOperations
            | Field::SchemeOfManeuver
            | Field::SchemeOfFires => "Not specified.",
            Field::HigherCommandersIntent => "See higher OPORD.",
            Field::CoordinatingInstructions => "As required.",
            Field::RulesOfEngagement => "Standard ROE apply. PID required prior to engagement.",
            Field::Logistics => "Standard combat load. Resupply via higher HQ.",
            Field::Personnel => "See unit manning roster.",
            Field::Medical => "Casevac IAW unit SOP. Nearest MTF: TBD.",
            Field::CpLocation => "TBD",
            Field::SuccessionOfCommand => "1PSG, then 1PLT LDR, then 2PLT LDR",
            Field::Signal => "PACE plan IAW unit SOP.",
            Field::Frequencies => "See signal annex.",
            Field::ChallengeAndPassword => "TBD",
        };
        Some(phrase)
    }

    /// Value used when the inbound mapping leaves the field blank.
    pub fn default_value(&self) -> &'static str {
        match self {
            Field::Classification => DEFAULT_CLASSIFICATION,
            Field::TimeZone => DEFAULT_TIME_ZONE,
            _ => "",
        }
    }

    /// Template placeholder name, matched as `{{NAME}}`.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::OperationName => "OPERATION_NAME",
            Field::Classification => "CLASSIFICATION",
            Field::Dtg => "DTG",
            Field::TimeZone => "TIME_ZONE",
            Field::ReferenceMaps => "REFERENCE_MAPS",
            Field::InsertMethod => "INSERT_METHOD",
            Field::DzLz => "DZ_LZ",
            Field::EnemyComposition => "ENEMY_COMPOSITION",
            Field::EnemyDisposition => "ENEMY_DISPOSITION",
            Field::EnemyStrength => "ENEMY_STRENGTH",
            Field::EnemyRecentActivity => "ENEMY_RECENT_ACTIVITY",
            Field::EnemyCapabilities => "ENEMY_CAPABILITIES",
            Field::EnemyMostLikelyCoa => "ENEMY_MOST_LIKELY_COA",
            Field::EnemyMostDangerousCoa => "ENEMY_MOST_DANGEROUS_COA",
            Field::HigherHqMission => "HIGHER_HQ_MISSION",
            Field::AdjacentUnits => "ADJACENT_UNITS",
            Field::SupportingUnits => "SUPPORTING_UNITS",
            Field::AttachmentsDetachments => "ATTACHMENTS_DETACHMENTS",
            Field::CivilConsiderations => "CIVIL_CONSIDERATIONS",
            Field::Mission => "MISSION",
            Field::CommandersIntent => "COMMANDERS_INTENT",
            Field::HigherCommandersIntent => "HIGHER_COMMANDERS_INTENT",
            Field::ConceptOfOperations => "CONCEPT_OF_OPS",
            Field::SchemeOfManeuver => "SCHEME_OF_MANEUVER",
            Field::SchemeOfFires => "SCHEME_OF_FIRES",
            Field::CoordinatingInstructions => "COORDINATING_INSTRUCTIONS",
            Field::RulesOfEngagement => "RULES_OF_ENGAGEMENT",
            Field::Logistics => "SUSTAINMENT_LOGISTICS",
            Field::Personnel => "SUSTAINMENT_PERSONNEL",
            Field::Medical => "SUSTAINMENT_MEDICAL",
            Field::CpLocation => "CP_LOCATION",
            Field::SuccessionOfCommand => "SUCCESSION_OF_COMMAND",
            Field::Signal => "SIGNAL",
            Field::Frequencies => "FREQUENCIES",
            Field::ChallengeAndPassword => "CHALLENGE_AND_PASSWORD",
        }
    }

    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Field::OperationName => "Operation",
            Field::Classification => "Classification",
            Field::Dtg => "DTG",
            Field::TimeZone => "Time Zone",
            Field::ReferenceMaps => "Reference Maps",
            Field::InsertMethod => "Insert Method",
            Field::DzLz => "DZ/LZ",
            Field::EnemyComposition => "Composition",
            Field::EnemyDisposition => "Disposition",
            Field::EnemyStrength => "Strength",
            Field::EnemyRecentActivity => "Recent Activity",
            Field::EnemyCapabilities => "Capabilities",
            Field::EnemyMostLikelyCoa => "Most Likely COA",
            Field::EnemyMostDangerousCoa => "Most Dangerous COA",
            Field::HigherHqMission => "Higher HQ Mission",
            Field::AdjacentUnits => "Adjacent Units",
            Field::SupportingUnits => "Supporting Units",
            Field::AttachmentsDetachments => "Attachments/Detachments",
            Field::CivilConsiderations => "Civil Considerations",
            Field::Mission => "Mission",
            Field::CommandersIntent => "Commander's Intent",
            Field::HigherCommandersIntent => "Higher Commander's Intent",
            Field::ConceptOfOperations => "Concept of Operations",
            Field::SchemeOfManeuver => "Scheme of Maneuver",
            Field::SchemeOfFires => "Scheme of Fires",
            Field::CoordinatingInstructions => "Coordinating Instructions",
            Field::RulesOfEngagement => "Rules of Engagement",
            Field::Logistics => "Logistics",
            Field::Personnel => "Personnel",
            Field::Medical => "Medical",
            Field::CpLocation => "CP Location",
            Field::SuccessionOfCommand => "Succession of Command",
            Field::Signal => "Signal",
            Field::Frequencies => "Frequencies",
            Field::ChallengeAndPassword => "Challenge/Password",
        }
    }

    /// `value`, or this field's doctrinal fallback when `value` is blank.
    pub fn or_fallback<'a>(&self, value: &'a str) -> &'a str {
        if value.is_empty() {
            self.fallback().unwrap_or("")
        } else {
            value
        }
    }
}
