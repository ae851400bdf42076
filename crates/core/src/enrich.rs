//! Enrichment of blank form fields with generated text.
//!
//! Given a partially filled [`FormFields`], the [`Enricher`] asks the language model for each
//! blank target field in turn and returns a copy with the generated text inserted. Fields the
//! user filled in are never touched.
//!
//! A failed call degrades only its own field: the field stays blank (so the renderer falls back to
//! doctrine text), an [`EnrichmentFailure`] is recorded, and the remaining fields are still
//! attempted. Without a configured client the enricher is the identity.

use std::sync::Arc;

use serde::Serialize;

use crate::config::AiConfig;
use crate::constants::{LLM_MAX_TOKENS, LLM_TEMPERATURE, UNIT_NAME, UNIT_TYPE};
use crate::fields::Field;
use crate::form::FormFields;
use crate::llm::{CompletionRequest, HttpLlmClient, HttpLlmClientConfig, LlmClient};
use crate::{OpordError, OpordResult};

/// Fields eligible for generation, with the section label used in the prompt.
pub const TARGET_FIELDS: [(Field, &str); 11] = [
    (Field::EnemyCapabilities, "Enemy Capabilities"),
    (Field::EnemyMostLikelyCoa, "Enemy Most Likely Course of Action"),
    (
        Field::EnemyMostDangerousCoa,
        "Enemy Most Dangerous Course of Action",
    ),
    (Field::CommandersIntent, "Commander's Intent"),
    (Field::ConceptOfOperations, "Concept of Operations"),
    (Field::SchemeOfManeuver, "Scheme of Maneuver"),
    (Field::SchemeOfFires, "Scheme of Fires"),
    (Field::CoordinatingInstructions, "Coordinating Instructions"),
    (Field::Logistics, "Logistics paragraph"),
    (Field::Medical, "Medical paragraph"),
    (Field::Signal, "Command and Signal paragraph"),
];

/// One field whose generation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentFailure {
    pub key: String,
    pub label: String,
    pub error: String,
}

impl EnrichmentFailure {
    /// Advisory text for the user.
    pub fn message(&self) -> String {
        format!("AI generation failed for {}: {}", self.label, self.error)
    }
}

/// Result of one enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub fields: FormFields,
    pub generated: Vec<String>,
    pub failures: Vec<EnrichmentFailure>,
}

/// Fills blank target fields through an [`LlmClient`].
#[derive(Clone)]
pub struct Enricher {
    client: Option<Arc<dyn LlmClient>>,
    default_model: String,
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("available", &self.available())
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl Enricher {
    pub fn new(client: Arc<dyn LlmClient>, default_model: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            default_model: default_model.into(),
        }
    }

    /// An enricher that never calls out.
    pub fn disabled() -> Self {
        Self {
            client: None,
            default_model: AiConfig::disabled().model().to_string(),
        }
    }

    /// Build the HTTP-backed enricher, or a disabled one when no key is configured.
    pub fn from_config(config: &AiConfig) -> OpordResult<Self> {
        let Some(api_key) = config.api_key() else {
            return Ok(Self::disabled());
        };

        let client = HttpLlmClient::new(HttpLlmClientConfig {
            endpoint: config.endpoint().to_string(),
            api_key: api_key.to_string(),
            timeout_secs: config.timeout_secs(),
        })
        .map_err(OpordError::LlmSetup)?;

        Ok(Self::new(Arc::new(client), config.model()))
    }

    pub fn available(&self) -> bool {
        self.client.is_some()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Copy of `fields` with blank target fields generated.
    ///
    /// `model` overrides the configured default when present and non-blank.
    pub async fn enrich(&self, fields: &FormFields, model: Option<&str>) -> Enrichment {
        let mut enrichment = Enrichment {
            fields: fields.clone(),
            ..Enrichment::default()
        };

        let Some(client) = &self.client else {
            return enrichment;
        };

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.default_model);
        let context = operation_context(fields);

        for (field, label) in TARGET_FIELDS {
            let key = field.form_key();
            if !fields.is_blank(key) {
                continue;
            }

            let request = CompletionRequest {
                system: system_prompt(),
                user: section_prompt(label, &context),
                model: model.to_string(),
                temperature: LLM_TEMPERATURE,
                max_tokens: LLM_MAX_TOKENS,
            };

            match client.complete(request).await {
                Ok(text) => {
                    enrichment.fields.insert(key, text.trim());
                    enrichment.generated.push(key.to_string());
                }
                Err(e) => {
                    tracing::warn!(field = key, error = %e, "section generation failed");
                    enrichment.failures.push(EnrichmentFailure {
                        key: key.to_string(),
                        label: label.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            model,
            generated = enrichment.generated.len(),
            failed = enrichment.failures.len(),
            "enrichment complete"
        );
        enrichment
    }
}

/// Short operational summary shared by every section prompt.
pub fn operation_context(fields: &FormFields) -> String {
    let or = |field: Field, missing: &'static str| -> String {
        match fields.value(field) {
            "" => missing.to_string(),
            value => value.to_string(),
        }
    };

    format!(
        "Operation: {}. Mission: {}. Insert method: {}. DZ/LZ: {}. Enemy: {}.",
        or(Field::OperationName, "TBD"),
        or(Field::Mission, "TBD"),
        or(Field::InsertMethod, "TBD"),
        or(Field::DzLz, "TBD"),
        or(Field::EnemyComposition, "unknown"),
    )
}

fn section_prompt(label: &str, context: &str) -> String {
    format!(
        "Generate the '{label}' section of an OPORD for {UNIT_NAME}. \
         Use the following operational notes as context:\n\n{context}\n\n\
         Write only the content of that section (no headings). \
         Keep it under 150 words."
    )
}

fn system_prompt() -> String {
    format!(
        "You are a U.S. Army operations order (OPORD) writing assistant for\n\
         {UNIT_NAME}, an {UNIT_TYPE} company modeled after a Parachute Infantry Regiment (PIR)\n\
         unit in the 82nd Airborne Division.\n\
         \n\
         Your role is to produce concise, doctrinally correct OPORD text following FM 6-0\n\
         and the standard 5-paragraph order format (Situation, Mission, Execution, Sustainment,\n\
         Command and Signal). When writing about this unit always keep in mind:\n\
         - Airborne insert (static line or HALO) and Air Assault (helicopter) operations.\n\
         - References to DZ (drop zone) and LZ (landing zone) as appropriate.\n\
         - The unit is a gaming / simulation regiment; keep language realistic but clearly\n  \
         labelled UNCLASSIFIED // TRAINING USE ONLY.\n\
         - Be concise and use the active voice. Use military time (24-hour clock).\n\
         - Do NOT invent classified information or real-world operational details.\n\
         \n\
         When asked to generate a specific OPORD paragraph or sub-paragraph, output only\n\
         the requested content (do not repeat headings already provided by the caller).\n"
    )
}
