//! # OPORD Core
//!
//! Core business logic for assembling five-paragraph operation orders.
//!
//! This crate contains the document model and its collaborators:
//! - The order schema, the centralised field table and flat form mapping
//! - Rendering to plain text and to the nested JSON document
//! - Optional enrichment of blank fields through a language model
//! - Export of a generated document to Google Slides
//!
//! **No API concerns**: HTTP servers, sessions and command-line handling belong in `api-rest` and
//! `opord-cli`.

pub mod config;
pub mod constants;
pub mod document;
pub mod enrich;
pub mod error;
pub mod export;
pub mod fields;
pub mod form;
pub mod llm;
pub mod render;
pub mod schema;

pub use config::{AiConfig, OpordConfig, SlidesConfig};
pub use document::OpordDocument;
pub use enrich::{Enricher, Enrichment, EnrichmentFailure};
pub use error::{OpordError, OpordResult};
pub use export::{ExportOutcome, SlidesExporter, UnavailableReason};
pub use fields::Field;
pub use form::FormFields;
pub use render::{GeneratedOrder, OpordRenderer};
pub use schema::{OpordData, SubordinateUnit, TaskAssignments};

/// Builds orders from raw form fields, optionally enriching them first.
#[derive(Clone, Debug)]
pub struct OpordService {
    enricher: Enricher,
    renderer: OpordRenderer,
}

/// A generated order plus anything the user should be told about how it was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub order: GeneratedOrder,
    pub failures: Vec<EnrichmentFailure>,
}

impl OpordService {
    pub fn new(enricher: Enricher) -> Self {
        Self {
            enricher,
            renderer: OpordRenderer::new(),
        }
    }

    pub fn ai_available(&self) -> bool {
        self.enricher.available()
    }

    /// Generate an order. Always produces text; enrichment problems are reported in `failures`.
    pub async fn generate(
        &self,
        fields: &FormFields,
        use_ai: bool,
        model: Option<&str>,
    ) -> GenerateOutcome {
        let (fields, failures) = if use_ai && self.enricher.available() {
            let enrichment = self.enricher.enrich(fields, model).await;
            (enrichment.fields, enrichment.failures)
        } else {
            (fields.clone(), Vec::new())
        };

        GenerateOutcome {
            order: self.renderer.generate(&fields.to_opord_data()),
            failures,
        }
    }
}

impl Default for OpordService {
    fn default() -> Self {
        Self::new(Enricher::disabled())
    }
}
