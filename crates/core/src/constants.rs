//! Constants used throughout the OPORD core crate.
//!
//! Unit identity, document defaults, and collaborator limits live here so that the renderer,
//! the enrichment adapter and the export adapter agree on them.

/// Full name of the issuing unit.
pub const UNIT_NAME: &str = "Charlie Company, 1st Battalion, 7th Cavalry Gaming Regiment";

/// Short unit designation used in signature blocks and presentation titles.
pub const UNIT_SHORT: &str = "C/1-7 CAV";

/// Unit type description.
pub const UNIT_TYPE: &str = "Airborne / Air Assault (PIR model)";

/// Higher headquarters of the issuing unit.
pub const HIGHER_HQ: &str = "1st Battalion, 7th Cavalry Gaming Regiment (1-7 CAV)";

/// Classification used when none is supplied.
pub const DEFAULT_CLASSIFICATION: &str = "UNCLASSIFIED // TRAINING USE ONLY";

/// Time zone used when none is supplied.
pub const DEFAULT_TIME_ZONE: &str = "ZULU";

/// Width of the horizontal rule under the heading and above the acknowledgement block.
pub const RULE_WIDTH: usize = 70;

/// Task text shown for every catalog unit when no tasks were assigned.
pub const TASKS_TBD: &str = "Tasks TBD.";

/// Uniform fallback used by the export adapter for any blank value.
pub const EXPORT_FALLBACK: &str = "N/A";

/// Maximum characters of body text submitted per slide.
pub const SLIDE_BODY_MAX_CHARS: usize = 3000;

/// Sampling temperature for section generation.
pub const LLM_TEMPERATURE: f32 = 0.4;

/// Response token budget for section generation.
pub const LLM_MAX_TOKENS: u32 = 300;

/// Default model used when neither the caller nor the environment names one.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";

/// Default OpenAI-compatible chat completions endpoint.
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default HTTP timeout for collaborator calls, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Default on-disk cache for the Google OAuth token.
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

/// OAuth scopes requested for presentation export.
pub const GOOGLE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/presentations",
    "https://www.googleapis.com/auth/drive",
];

/// Most generated documents the REST session store keeps; the oldest is evicted beyond this.
pub const SESSION_CAPACITY: usize = 1024;
