//! OPORD data model.
//!
//! Typed records for the five-paragraph order (FM 6-0, Appendix C). Every leaf is a plain
//! `String` that defaults to empty; "absent" and "not yet provided" are the same thing here and
//! the renderer decides what to show in their place.
//!
//! The only structured leaf is [`TaskAssignments`], which is keyed by the closed
//! [`SubordinateUnit`] catalog and never stores a blank task.

use crate::constants::{DEFAULT_CLASSIFICATION, DEFAULT_TIME_ZONE};
use crate::error::{OpordError, OpordResult};
use opord_types::NonEmptyText;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Standard company-level subordinate elements, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubordinateUnit {
    FirstPlatoon,
    SecondPlatoon,
    ThirdPlatoon,
    WeaponsPlatoon,
    HeadquartersSupport,
}

impl SubordinateUnit {
    /// The full catalog in doctrinal order.
    pub const ALL: [SubordinateUnit; 5] = [
        SubordinateUnit::FirstPlatoon,
        SubordinateUnit::SecondPlatoon,
        SubordinateUnit::ThirdPlatoon,
        SubordinateUnit::WeaponsPlatoon,
        SubordinateUnit::HeadquartersSupport,
    ];

    /// Display name, also used as the key in the nested mapping.
    pub fn name(&self) -> &'static str {
        match self {
            SubordinateUnit::FirstPlatoon => "1st Platoon (Rifle)",
            SubordinateUnit::SecondPlatoon => "2nd Platoon (Rifle)",
            SubordinateUnit::ThirdPlatoon => "3rd Platoon (Rifle)",
            SubordinateUnit::WeaponsPlatoon => "Weapons Platoon",
            SubordinateUnit::HeadquartersSupport => "Headquarters & Support Element",
        }
    }

    /// Key of the flat inbound field carrying this unit's task.
    pub fn form_key(&self) -> &'static str {
        match self {
            SubordinateUnit::FirstPlatoon => "task_1st",
            SubordinateUnit::SecondPlatoon => "task_2nd",
            SubordinateUnit::ThirdPlatoon => "task_3rd",
            SubordinateUnit::WeaponsPlatoon => "task_weapons",
            SubordinateUnit::HeadquartersSupport => "task_headquarters",
        }
    }

    /// Look a unit up by its display name.
    pub fn from_name(name: &str) -> OpordResult<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.name() == name)
            .ok_or_else(|| OpordError::UnknownSubordinateUnit(name.to_string()))
    }

    /// Display names of the whole catalog.
    pub fn catalog_names() -> Vec<String> {
        Self::ALL.iter().map(|u| u.name().to_string()).collect()
    }
}

impl std::fmt::Display for SubordinateUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tasks to subordinate units, in the order they were assigned.
///
/// Iteration order is insertion order, not catalog order. Blank tasks are dropped at insertion
/// time so an empty task can never reach a rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskAssignments {
    entries: Vec<(SubordinateUnit, NonEmptyText)>,
}

impl TaskAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `task` to `unit`.
    ///
    /// A blank task is ignored. Re-assigning a unit replaces its task but keeps its original
    /// position.
    pub fn assign(&mut self, unit: SubordinateUnit, task: impl AsRef<str>) {
        let Some(task) = NonEmptyText::parse_optional(task) else {
            return;
        };

        match self.entries.iter_mut().find(|(u, _)| *u == unit) {
            Some(entry) => entry.1 = task,
            None => self.entries.push((unit, task)),
        }
    }

    /// Builder-style variant of [`TaskAssignments::assign`].
    pub fn with(mut self, unit: SubordinateUnit, task: impl AsRef<str>) -> Self {
        self.assign(unit, task);
        self
    }

    pub fn get(&self, unit: SubordinateUnit) -> Option<&str> {
        self.entries
            .iter()
            .find(|(u, _)| *u == unit)
            .map(|(_, task)| task.as_str())
    }

    pub fn contains(&self, unit: SubordinateUnit) -> bool {
        self.get(unit).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubordinateUnit, &str)> + '_ {
        self.entries.iter().map(|(unit, task)| (*unit, task.as_str()))
    }
}

impl Serialize for TaskAssignments {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (unit, task) in &self.entries {
            map.serialize_entry(unit.name(), task.as_str())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TaskAssignments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TasksVisitor;

        impl<'de> Visitor<'de> for TasksVisitor {
            type Value = TaskAssignments;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of subordinate unit name to task text")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut tasks = TaskAssignments::new();
                while let Some((name, task)) = access.next_entry::<String, String>()? {
                    let unit =
                        SubordinateUnit::from_name(&name).map_err(serde::de::Error::custom)?;
                    tasks.assign(unit, task);
                }
                Ok(tasks)
            }
        }

        deserializer.deserialize_map(TasksVisitor)
    }
}

/// Para 1a - Enemy Forces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyForces {
    pub composition: String,
    pub disposition: String,
    pub strength: String,
    pub recent_activity: String,
    pub capabilities: String,
    pub most_likely_coa: String,
    pub most_dangerous_coa: String,
}

/// Para 1b - Friendly Forces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendlyForces {
    pub higher_hq_mission: String,
    pub adjacent_units: String,
    pub supporting_units: String,
}

/// Paragraph 1 - Situation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Situation {
    pub enemy: EnemyForces,
    pub friendly: FriendlyForces,
    pub attachments_detachments: String,
    pub civil_considerations: String,
}

/// Paragraph 3 - Execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Execution {
    pub commanders_intent: String,
    pub higher_commanders_intent: String,
    pub concept_of_operations: String,
    pub scheme_of_maneuver: String,
    pub scheme_of_fires: String,
    pub tasks_to_subordinates: TaskAssignments,
    pub coordinating_instructions: String,
    pub rules_of_engagement: String,
}

/// Paragraph 4 - Sustainment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sustainment {
    pub logistics: String,
    pub personnel: String,
    pub medical: String,
}

/// Paragraph 5 - Command and Signal.
///
/// `command` carries the CP location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandAndSignal {
    pub command: String,
    pub succession_of_command: String,
    pub signal: String,
    pub frequencies: String,
    pub challenge_and_password: String,
}

/// Complete operation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpordData {
    pub operation_name: String,
    pub classification: String,
    pub dtg: String,
    pub reference_maps: String,
    pub time_zone: String,

    // Airborne / air assault insert
    pub insert_method: String,
    pub dz_lz: String,

    pub situation: Situation,
    pub mission: String,
    pub execution: Execution,
    pub sustainment: Sustainment,
    pub command_and_signal: CommandAndSignal,
}

impl Default for OpordData {
    fn default() -> Self {
        Self {
            operation_name: String::new(),
            classification: DEFAULT_CLASSIFICATION.to_string(),
            dtg: String::new(),
            reference_maps: String::new(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            insert_method: String::new(),
            dz_lz: String::new(),
            situation: Situation::default(),
            mission: String::new(),
            execution: Execution::default(),
            sustainment: Sustainment::default(),
            command_and_signal: CommandAndSignal::default(),
        }
    }
}
