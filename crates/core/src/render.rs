//! Five-paragraph text rendering.
//!
//! Produces the plain-text order (FM 6-0, Appendix C layout) from an [`OpordDocument`]. Every
//! doctrinal line is always present: blank values are replaced by the field table's fallback
//! phrase, except the insert method and DZ/LZ lines which are omitted when blank.
//!
//! The output is a line-for-line format; column padding and indentation below are part of it.

use crate::constants::{RULE_WIDTH, TASKS_TBD, UNIT_NAME, UNIT_SHORT};
use crate::document::OpordDocument;
use crate::fields::Field;
use crate::schema::{OpordData, SubordinateUnit};

/// Text and mapping renderings of one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOrder {
    pub text: String,
    pub document: OpordDocument,
}

/// Renders orders to text and to the nested mapping.
#[derive(Debug, Clone, Default)]
pub struct OpordRenderer;

impl OpordRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render both forms from the same data.
    pub fn generate(&self, data: &OpordData) -> GeneratedOrder {
        let document = self.generate_document(data);
        let text = self.render_text(&document);
        tracing::info!(
            operation = %document.operation_name,
            tasks = document.execution.tasks_to_subordinates.len(),
            "generated OPORD"
        );
        GeneratedOrder { text, document }
    }

    /// The nested mapping for `data`.
    pub fn generate_document(&self, data: &OpordData) -> OpordDocument {
        OpordDocument::from(data)
    }

    /// The complete order as plain text, without a trailing newline.
    pub fn render_text(&self, doc: &OpordDocument) -> String {
        let mut out = TextBuilder::new(doc);
        out.header();
        out.blank();
        out.paragraph_1();
        out.blank();
        out.paragraph_2();
        out.blank();
        out.paragraph_3();
        out.blank();
        out.paragraph_4();
        out.blank();
        out.paragraph_5();
        out.footer();
        out.finish()
    }
}

struct TextBuilder<'a> {
    doc: &'a OpordDocument,
    lines: Vec<String>,
}

impl<'a> TextBuilder<'a> {
    fn new(doc: &'a OpordDocument) -> Self {
        Self {
            doc,
            lines: Vec::with_capacity(128),
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// The field's value, or its fallback phrase.
    fn shown(&self, field: Field) -> &'a str {
        field.or_fallback(self.doc.value(field))
    }

    /// `     {label}{value}` where `label` already carries its padding.
    fn labelled(&mut self, label: &str, field: Field) {
        let value = self.shown(field);
        self.line(format!("     {label}{value}"));
    }

    /// An indented body line.
    fn body(&mut self, field: Field) {
        let value = self.shown(field);
        self.line(format!("     {value}"));
    }

    fn rule(&mut self) {
        self.line("=".repeat(RULE_WIDTH));
    }

    fn header(&mut self) {
        let doc = self.doc;
        let classification = doc.value(Field::Classification);
        let operation = self.shown(Field::OperationName);
        let dtg = self.shown(Field::Dtg);
        let time_zone = doc.value(Field::TimeZone);
        let maps = self.shown(Field::ReferenceMaps);

        self.line(classification);
        self.blank();
        self.line(format!("OPERATION ORDER {operation}-XX"));
        self.line(format!("({dtg} {time_zone})"));
        self.blank();
        self.line(format!("Issuing HQ: {UNIT_NAME}"));
        self.line(format!("Reference Map(s): {maps}"));
        self.blank();
        self.rule();
    }

    fn paragraph_1(&mut self) {
        self.line("1. SITUATION");
        self.blank();
        self.line("  a. Enemy Forces.");
        self.labelled("Composition:        ", Field::EnemyComposition);
        self.labelled("Disposition:        ", Field::EnemyDisposition);
        self.labelled("Strength:           ", Field::EnemyStrength);
        self.labelled("Recent Activity:    ", Field::EnemyRecentActivity);
        self.labelled("Capabilities:       ", Field::EnemyCapabilities);
        self.labelled("Most Likely COA:    ", Field::EnemyMostLikelyCoa);
        self.labelled("Most Dangerous COA: ", Field::EnemyMostDangerousCoa);
        self.blank();
        self.line("  b. Friendly Forces.");
        self.labelled("Higher HQ Mission:  ", Field::HigherHqMission);
        self.labelled("Adjacent Units:     ", Field::AdjacentUnits);
        self.labelled("Supporting Units:   ", Field::SupportingUnits);
        self.blank();
        self.line("  c. Attachments and Detachments.");
        self.body(Field::AttachmentsDetachments);
        self.blank();
        self.line("  d. Civil Considerations.");
        self.body(Field::CivilConsiderations);
    }

    fn paragraph_2(&mut self) {
        let doc = self.doc;
        let mission = self.shown(Field::Mission);
        let insert_method = doc.value(Field::InsertMethod);
        let dz_lz = doc.value(Field::DzLz);

        self.line("2. MISSION");
        self.blank();
        self.line(format!("  {mission}"));
        if !insert_method.is_empty() {
            self.blank();
            self.line(format!("  Insert Method: {insert_method}"));
        }
        if !dz_lz.is_empty() {
            self.line(format!("  DZ/LZ: {dz_lz}"));
        }
    }

    fn paragraph_3(&mut self) {
        self.line("3. EXECUTION");
        self.blank();
        self.line("  a. Commander's Intent.");
        self.labelled("Purpose:    ", Field::CommandersIntent);
        self.blank();
        self.line("  b. Higher Commander's Intent.");
        self.body(Field::HigherCommandersIntent);
        self.blank();
        self.line("  c. Concept of Operations.");
        self.body(Field::ConceptOfOperations);
        self.blank();
        self.line("  d. Scheme of Maneuver.");
        self.body(Field::SchemeOfManeuver);
        self.blank();
        self.line("  e. Scheme of Fires.");
        self.body(Field::SchemeOfFires);
        self.blank();
        self.line("  f. Tasks to Subordinate Units.");
        self.tasks();
        self.blank();
        self.line("  g. Coordinating Instructions.");
        self.body(Field::CoordinatingInstructions);
        self.blank();
        self.line("  h. Rules of Engagement.");
        self.body(Field::RulesOfEngagement);
    }

    fn tasks(&mut self) {
        let doc = self.doc;
        let tasks = &doc.execution.tasks_to_subordinates;
        if tasks.is_empty() {
            for unit in SubordinateUnit::ALL {
                self.line(format!("     ({unit}): {TASKS_TBD}"));
            }
        } else {
            for (unit, task) in tasks.iter() {
                self.line(format!("     ({unit}): {task}"));
            }
        }
    }

    fn paragraph_4(&mut self) {
        self.line("4. SUSTAINMENT");
        self.blank();
        self.line("  a. Logistics.");
        self.body(Field::Logistics);
        self.blank();
        self.line("  b. Personnel.");
        self.body(Field::Personnel);
        self.blank();
        self.line("  c. Medical.");
        self.body(Field::Medical);
    }

    fn paragraph_5(&mut self) {
        self.line("5. COMMAND AND SIGNAL");
        self.blank();
        self.line("  a. Command.");
        self.line(format!("     Commander:               {UNIT_SHORT} CDR"));
        self.labelled("Succession of Command:   ", Field::SuccessionOfCommand);
        self.labelled("CP Location:             ", Field::CpLocation);
        self.blank();
        self.line("  b. Signal.");
        self.body(Field::Signal);
        self.labelled("Frequencies:             ", Field::Frequencies);
        self.labelled("Challenge / Password:    ", Field::ChallengeAndPassword);
    }

    fn footer(&mut self) {
        let doc = self.doc;
        let classification = doc.value(Field::Classification);

        self.blank();
        self.rule();
        self.blank();
        self.line("ACKNOWLEDGE");
        self.blank();
        self.line(format!("  [Commander, {UNIT_SHORT}]"));
        self.blank();
        self.line(classification);
    }
}
