#[derive(Debug, thiserror::Error)]
pub enum OpordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown subordinate unit: {0}")]
    UnknownSubordinateUnit(String),

    #[error("no generated OPORD to export")]
    NothingToExport,
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document: {0}")]
    Deserialization(serde_json::Error),

    #[error("failed to read credential file: {0}")]
    CredentialRead(std::io::Error),
    #[error("failed to write token cache: {0}")]
    CredentialWrite(std::io::Error),
    #[error("failed to parse credential file: {0}")]
    CredentialParse(serde_json::Error),
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("failed to set up language model client: {0}")]
    LlmSetup(crate::llm::LlmError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
    #[error("slides request failed: {0}")]
    SlidesRequest(reqwest::Error),
    #[error("slides API returned {status}: {body}")]
    SlidesApi { status: u16, body: String },
    #[error("unexpected slides response: {0}")]
    SlidesResponse(String),
}

pub type OpordResult<T> = std::result::Result<T, OpordError>;
