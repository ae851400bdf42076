//! Slides API request shaping.
//!
//! Pure functions from an [`OpordDocument`] to the `batchUpdate` request list, for both export
//! modes. Nothing here talks to the network.

use serde::{Deserialize, Serialize};

use crate::constants::{
    EXPORT_FALLBACK, HIGHER_HQ, SLIDE_BODY_MAX_CHARS, TASKS_TBD, UNIT_NAME, UNIT_SHORT, UNIT_TYPE,
};
use crate::document::OpordDocument;
use crate::fields::Field;

/// One entry of a `presentations.batchUpdate` request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideRequest {
    #[serde(rename_all = "camelCase")]
    ReplaceAllText {
        contains_text: SubstringMatch,
        replace_text: String,
    },
    #[serde(rename_all = "camelCase")]
    CreateSlide {
        object_id: String,
        insertion_index: usize,
        slide_layout_reference: LayoutReference,
        placeholder_id_mappings: Vec<PlaceholderIdMapping>,
    },
    #[serde(rename_all = "camelCase")]
    InsertText {
        object_id: String,
        insertion_index: usize,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstringMatch {
    pub text: String,
    pub match_case: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReference {
    pub predefined_layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderIdMapping {
    pub layout_placeholder: LayoutPlaceholder,
    pub object_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPlaceholder {
    #[serde(rename = "type")]
    pub kind: String,
    pub index: u32,
}

/// The parts of a `presentations.create` response the exporter reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Presentation {
    pub presentation_id: String,
    pub slides: Vec<Page>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    pub object_id: String,
    pub page_elements: Vec<PageElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageElement {
    pub object_id: String,
    pub shape: Option<Shape>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Shape {
    pub placeholder: Option<Placeholder>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Placeholder {
    #[serde(rename = "type")]
    pub kind: String,
}

impl PageElement {
    fn placeholder_kind(&self) -> Option<&str> {
        self.shape
            .as_ref()
            .and_then(|s| s.placeholder.as_ref())
            .map(|p| p.kind.as_str())
    }
}

/// Title and body of one freeform slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideContent {
    pub title: String,
    pub body: String,
}

impl SlideContent {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        EXPORT_FALLBACK
    } else {
        value
    }
}

fn replace(placeholder: &str, value: &str) -> SlideRequest {
    SlideRequest::ReplaceAllText {
        contains_text: SubstringMatch {
            text: format!("{{{{{placeholder}}}}}"),
            match_case: true,
        },
        replace_text: or_na(value).to_string(),
    }
}

fn labelled_lines(doc: &OpordDocument, fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.label(), or_na(doc.value(*f))))
        .collect::<Vec<_>>()
        .join("\n")
}

const COMMAND_AND_SIGNAL_FIELDS: [Field; 5] = [
    Field::CpLocation,
    Field::SuccessionOfCommand,
    Field::Signal,
    Field::Frequencies,
    Field::ChallengeAndPassword,
];

/// Template-mode `replaceAllText` requests, one per placeholder.
///
/// Every replacement is non-empty: blanks become `N/A`.
pub fn template_requests(doc: &OpordDocument) -> Vec<SlideRequest> {
    let mut requests = vec![
        replace("UNIT_NAME", UNIT_NAME),
        replace("UNIT_SHORT", UNIT_SHORT),
        replace("UNIT_TYPE", UNIT_TYPE),
        replace("HIGHER_HQ", HIGHER_HQ),
    ];

    requests.extend(
        Field::ALL
            .iter()
            .map(|field| replace(field.placeholder(), doc.value(*field))),
    );

    requests.push(replace("SITUATION_ENEMY", &labelled_lines(doc, &Field::ENEMY)));
    requests.push(replace(
        "SITUATION_FRIENDLY",
        &labelled_lines(doc, &Field::FRIENDLY),
    ));
    requests.push(replace(
        "COMMAND_AND_SIGNAL",
        &labelled_lines(doc, &COMMAND_AND_SIGNAL_FIELDS),
    ));
    requests.push(replace("TASKS_TO_SUBORDINATES", &tasks_block(doc, "")));

    requests
}

/// Tasks one per line, or `Tasks TBD.` when none were assigned.
fn tasks_block(doc: &OpordDocument, indent: &str) -> String {
    let tasks = &doc.execution.tasks_to_subordinates;
    if tasks.is_empty() {
        return format!("{indent}{TASKS_TBD}");
    }
    tasks
        .iter()
        .map(|(unit, task)| format!("{indent}{unit}: {task}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The nine freeform slides, titles and untruncated bodies.
pub fn slide_contents(doc: &OpordDocument) -> Vec<SlideContent> {
    let v = |field: Field| or_na(doc.value(field));
    let operation = Field::OperationName.or_fallback(doc.value(Field::OperationName));

    vec![
        SlideContent::new(
            format!("OPORD {operation} — {}", doc.unit),
            format!(
                "{}\nDTG: {}\nReference Maps: {}",
                v(Field::Classification),
                v(Field::Dtg),
                v(Field::ReferenceMaps)
            ),
        ),
        SlideContent::new(
            "1. SITUATION — Enemy Forces",
            labelled_lines(doc, &Field::ENEMY),
        ),
        SlideContent::new(
            "1. SITUATION — Friendly Forces",
            labelled_lines(
                doc,
                &[
                    Field::HigherHqMission,
                    Field::AdjacentUnits,
                    Field::SupportingUnits,
                    Field::AttachmentsDetachments,
                    Field::CivilConsiderations,
                ],
            ),
        ),
        SlideContent::new(
            "2. MISSION",
            format!(
                "{}\n\nInsert Method: {}\nDZ/LZ: {}",
                v(Field::Mission),
                v(Field::InsertMethod),
                v(Field::DzLz)
            ),
        ),
        SlideContent::new(
            "3. EXECUTION — Commander's Intent & Concept of Ops",
            format!(
                "Commander's Intent:\n{}\n\nConcept of Operations:\n{}",
                v(Field::CommandersIntent),
                v(Field::ConceptOfOperations)
            ),
        ),
        SlideContent::new(
            "3. EXECUTION — Maneuver, Fires & Tasks",
            format!(
                "Scheme of Maneuver:\n{}\n\nScheme of Fires:\n{}\n\nTasks to Subordinates:\n{}",
                v(Field::SchemeOfManeuver),
                v(Field::SchemeOfFires),
                tasks_block(doc, "  ")
            ),
        ),
        SlideContent::new(
            "3. EXECUTION — Coordinating Instructions & ROE",
            format!(
                "Coordinating Instructions:\n{}\n\nRules of Engagement:\n{}",
                v(Field::CoordinatingInstructions),
                v(Field::RulesOfEngagement)
            ),
        ),
        SlideContent::new(
            "4. SUSTAINMENT",
            format!(
                "Logistics:\n{}\n\nPersonnel:\n{}\n\nMedical:\n{}",
                v(Field::Logistics),
                v(Field::Personnel),
                v(Field::Medical)
            ),
        ),
        SlideContent::new(
            "5. COMMAND AND SIGNAL",
            format!(
                "CP Location: {}\nSuccession of Command: {}\n\nSignal:\n{}\nFrequencies: {}\nChallenge/Password: {}",
                v(Field::CpLocation),
                v(Field::SuccessionOfCommand),
                v(Field::Signal),
                v(Field::Frequencies),
                v(Field::ChallengeAndPassword)
            ),
        ),
    ]
}

/// At most [`SLIDE_BODY_MAX_CHARS`] characters of `body`.
pub fn truncate_body(body: &str) -> String {
    body.chars().take(SLIDE_BODY_MAX_CHARS).collect()
}

fn insert_text(object_id: &str, text: String) -> SlideRequest {
    SlideRequest::InsertText {
        object_id: object_id.to_string(),
        insertion_index: 0,
        text,
    }
}

fn mapping(kind: &str, object_id: String) -> PlaceholderIdMapping {
    PlaceholderIdMapping {
        layout_placeholder: LayoutPlaceholder {
            kind: kind.to_string(),
            index: 0,
        },
        object_id,
    }
}

fn create_slide_requests(index: usize, content: &SlideContent) -> Vec<SlideRequest> {
    let title_id = format!("title_{index}");
    let body_id = format!("body_{index}");
    vec![
        SlideRequest::CreateSlide {
            object_id: format!("slide_{index}"),
            insertion_index: index,
            slide_layout_reference: LayoutReference {
                predefined_layout: "TITLE_AND_BODY".to_string(),
            },
            placeholder_id_mappings: vec![
                mapping("TITLE", title_id.clone()),
                mapping("BODY", body_id.clone()),
            ],
        },
        insert_text(&title_id, content.title.clone()),
        insert_text(&body_id, truncate_body(&content.body)),
    ]
}

/// Requests filling the default first slide's title and body placeholders.
fn first_slide_requests(page: &Page, content: &SlideContent) -> Vec<SlideRequest> {
    page.page_elements
        .iter()
        .filter_map(|element| match element.placeholder_kind()? {
            "CENTERED_TITLE" | "TITLE" => {
                Some(insert_text(&element.object_id, content.title.clone()))
            }
            "BODY" | "SUBTITLE" => Some(insert_text(
                &element.object_id,
                truncate_body(&content.body),
            )),
            _ => None,
        })
        .collect()
}

/// Freeform-mode requests for a freshly created presentation.
///
/// The first slide reuses the presentation's default slide when there is one; every later slide
/// is created with the title-and-body layout.
pub fn freeform_requests(presentation: &Presentation, slides: &[SlideContent]) -> Vec<SlideRequest> {
    let mut requests = Vec::new();
    for (index, content) in slides.iter().enumerate() {
        match (index, presentation.slides.first()) {
            (0, Some(page)) => requests.extend(first_slide_requests(page, content)),
            _ => requests.extend(create_slide_requests(index, content)),
        }
    }
    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{OpordData, SubordinateUnit, TaskAssignments};
    use std::collections::HashSet;

    fn document() -> OpordDocument {
        let mut data = OpordData {
            operation_name: "IRON HAWK".into(),
            dtg: "231500Z FEB 2025".into(),
            mission: "Seize OBJ EAGLE.".into(),
            ..OpordData::default()
        };
        data.situation.enemy.composition = "OPFOR platoon".into();
        data.command_and_signal.command = "Grid 12ABC12345".into();
        data.execution.tasks_to_subordinates = TaskAssignments::new()
            .with(SubordinateUnit::FirstPlatoon, "Assault OBJ EAGLE.")
            .with(SubordinateUnit::WeaponsPlatoon, "Support by fire.");
        OpordDocument::from(&data)
    }

    fn replacements(requests: &[SlideRequest]) -> Vec<(String, String)> {
        requests
            .iter()
            .filter_map(|r| match r {
                SlideRequest::ReplaceAllText {
                    contains_text,
                    replace_text,
                } => Some((contains_text.text.clone(), replace_text.clone())),
                _ => None,
            })
            .collect()
    }

    fn replacement(requests: &[SlideRequest], token: &str) -> String {
        replacements(requests)
            .into_iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v)
            .unwrap()
    }

    #[test]
    fn replace_request_serializes_to_slides_shape() {
        let json = serde_json::to_value(replace("MISSION", "")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "replaceAllText": {
                    "containsText": {"text": "{{MISSION}}", "matchCase": true},
                    "replaceText": "N/A"
                }
            })
        );
    }

    #[test]
    fn template_covers_every_placeholder_once_without_empty_values() {
        let requests = template_requests(&document());
        let pairs = replacements(&requests);
        assert_eq!(pairs.len(), requests.len());

        let tokens: HashSet<&str> = pairs.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tokens.len(), pairs.len());
        for field in Field::ALL {
            assert!(tokens.contains(format!("{{{{{}}}}}", field.placeholder()).as_str()));
        }
        for name in [
            "UNIT_NAME",
            "UNIT_SHORT",
            "UNIT_TYPE",
            "HIGHER_HQ",
            "SITUATION_ENEMY",
            "SITUATION_FRIENDLY",
            "COMMAND_AND_SIGNAL",
            "TASKS_TO_SUBORDINATES",
        ] {
            assert!(tokens.contains(format!("{{{{{name}}}}}").as_str()));
        }
        assert!(pairs.iter().all(|(_, v)| !v.is_empty()));
    }

    #[test]
    fn template_values_and_composites() {
        let requests = template_requests(&document());
        assert_eq!(replacement(&requests, "{{OPERATION_NAME}}"), "IRON HAWK");
        assert_eq!(replacement(&requests, "{{UNIT_SHORT}}"), "C/1-7 CAV");
        assert_eq!(replacement(&requests, "{{ENEMY_STRENGTH}}"), "N/A");
        assert_eq!(
            replacement(&requests, "{{TASKS_TO_SUBORDINATES}}"),
            "1st Platoon (Rifle): Assault OBJ EAGLE.\nWeapons Platoon: Support by fire."
        );

        let enemy = replacement(&requests, "{{SITUATION_ENEMY}}");
        assert_eq!(enemy.lines().count(), 7);
        assert!(enemy.starts_with("Composition: OPFOR platoon\nDisposition: N/A"));

        let friendly = replacement(&requests, "{{SITUATION_FRIENDLY}}");
        assert_eq!(
            friendly,
            "Higher HQ Mission: N/A\nAdjacent Units: N/A\nSupporting Units: N/A"
        );

        let cs = replacement(&requests, "{{COMMAND_AND_SIGNAL}}");
        assert_eq!(cs.lines().count(), 5);
        assert!(cs.starts_with("CP Location: Grid 12ABC12345"));
    }

    #[test]
    fn template_without_tasks_says_tbd() {
        let requests = template_requests(&OpordDocument::default());
        assert_eq!(
            replacement(&requests, "{{TASKS_TO_SUBORDINATES}}"),
            "Tasks TBD."
        );
    }

    #[test]
    fn nine_slides_with_fixed_titles() {
        let slides = slide_contents(&document());
        let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "OPORD IRON HAWK — Charlie Company, 1st Battalion, 7th Cavalry Gaming Regiment",
                "1. SITUATION — Enemy Forces",
                "1. SITUATION — Friendly Forces",
                "2. MISSION",
                "3. EXECUTION — Commander's Intent & Concept of Ops",
                "3. EXECUTION — Maneuver, Fires & Tasks",
                "3. EXECUTION — Coordinating Instructions & ROE",
                "4. SUSTAINMENT",
                "5. COMMAND AND SIGNAL",
            ]
        );
    }

    #[test]
    fn slide_bodies_use_na_and_list_tasks() {
        let slides = slide_contents(&document());
        assert_eq!(
            slides[0].body,
            "UNCLASSIFIED // TRAINING USE ONLY\nDTG: 231500Z FEB 2025\nReference Maps: N/A"
        );
        assert_eq!(
            slides[3].body,
            "Seize OBJ EAGLE.\n\nInsert Method: N/A\nDZ/LZ: N/A"
        );
        assert!(slides[5]
            .body
            .ends_with("Tasks to Subordinates:\n  1st Platoon (Rifle): Assault OBJ EAGLE.\n  Weapons Platoon: Support by fire."));
    }

    #[test]
    fn empty_document_slides() {
        let slides = slide_contents(&OpordDocument::default());
        assert!(slides[0].title.starts_with("OPORD TBD — "));
        assert!(slides[5].body.ends_with("Tasks to Subordinates:\n  Tasks TBD."));
        assert!(slides
            .iter()
            .all(|s| !s.body.contains(": \n") && !s.body.ends_with(": ")));
    }

    #[test]
    fn bodies_are_truncated_to_limit() {
        let long = "x".repeat(SLIDE_BODY_MAX_CHARS + 500);
        assert_eq!(truncate_body(&long).chars().count(), SLIDE_BODY_MAX_CHARS);
        assert_eq!(truncate_body("short"), "short");

        let mut data = OpordData::default();
        data.execution.coordinating_instructions = long;
        let doc = OpordDocument::from(&data);
        let requests = freeform_requests(&Presentation::default(), &slide_contents(&doc));
        for request in &requests {
            if let SlideRequest::InsertText { text, .. } = request {
                assert!(text.chars().count() <= SLIDE_BODY_MAX_CHARS);
            }
        }
    }

    fn default_presentation() -> Presentation {
        serde_json::from_value(serde_json::json!({
            "presentationId": "pres-1",
            "slides": [{
                "objectId": "p",
                "pageElements": [
                    {"objectId": "i0", "shape": {"placeholder": {"type": "CENTERED_TITLE"}}},
                    {"objectId": "i1", "shape": {"placeholder": {"type": "SUBTITLE", "index": 0}}},
                    {"objectId": "img"}
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn freeform_reuses_default_slide_then_creates_eight() {
        let slides = slide_contents(&document());
        let requests = freeform_requests(&default_presentation(), &slides);

        assert_eq!(requests.len(), 2 + 8 * 3);
        assert_eq!(
            requests[0],
            insert_text("i0", slides[0].title.clone())
        );
        assert_eq!(requests[1], insert_text("i1", slides[0].body.clone()));

        let created: Vec<String> = requests
            .iter()
            .filter_map(|r| match r {
                SlideRequest::CreateSlide { object_id, .. } => Some(object_id.clone()),
                _ => None,
            })
            .collect();
        let expected: Vec<String> = (1..9).map(|i| format!("slide_{i}")).collect();
        assert_eq!(created, expected);
    }

    #[test]
    fn create_slide_serializes_with_title_and_body_layout() {
        let content = SlideContent::new("2. MISSION", "Seize OBJ EAGLE.");
        let requests = create_slide_requests(3, &content);
        let json = serde_json::to_value(&requests).unwrap();

        assert_eq!(
            json[0],
            serde_json::json!({
                "createSlide": {
                    "objectId": "slide_3",
                    "insertionIndex": 3,
                    "slideLayoutReference": {"predefinedLayout": "TITLE_AND_BODY"},
                    "placeholderIdMappings": [
                        {"layoutPlaceholder": {"type": "TITLE", "index": 0}, "objectId": "title_3"},
                        {"layoutPlaceholder": {"type": "BODY", "index": 0}, "objectId": "body_3"}
                    ]
                }
            })
        );
        assert_eq!(
            json[1],
            serde_json::json!({"insertText": {"objectId": "title_3", "insertionIndex": 0, "text": "2. MISSION"}})
        );
        assert_eq!(json[2]["insertText"]["objectId"], "body_3");
    }

    #[test]
    fn presentation_without_default_slide_creates_all_nine() {
        let requests = freeform_requests(&Presentation::default(), &slide_contents(&document()));
        assert_eq!(requests.len(), 9 * 3);
        assert!(matches!(
            &requests[0],
            SlideRequest::CreateSlide { object_id, insertion_index: 0, .. } if object_id == "slide_0"
        ));
    }
}
