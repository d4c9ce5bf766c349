use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Reference lookup failed: no {kind} with index '{index}'")]
    ReferenceLookup { kind: &'static str, index: String },

    #[error("Monster search exhausted for {difficulty} (party levels {party_levels:?})")]
    SearchExhaustion {
        difficulty: String,
        party_levels: Vec<u32>,
    },

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GenError {
    pub fn lookup(kind: &'static str, index: impl Into<String>) -> Self {
        GenError::ReferenceLookup {
            kind,
            index: index.into(),
        }
    }

    /// Errors that end only the current encounter, not the whole run.
    pub fn is_encounter_scoped(&self) -> bool {
        matches!(
            self,
            GenError::ReferenceLookup { .. }
                | GenError::SearchExhaustion { .. }
                | GenError::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
