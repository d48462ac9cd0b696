use thiserror::Error;

use crate::inheritance::ModeOfInheritance;

#[derive(Debug, Error)]
pub enum GenorankError {
    #[error("Invalid region chr{chromosome}:{start}-{end}: start must not exceed end, end must not exceed {}", crate::region::MAX_POSITION)]
    InvalidRegion { chromosome: u8, start: u32, end: u32 },

    #[error("Invalid chromosome number: {0}")]
    InvalidChromosome(u8),

    #[error("Pedigree has no members")]
    EmptyPedigree,

    #[error("Individual {0} appears more than once in the pedigree")]
    DuplicateIndividual(String),

    #[error("Individual {individual} names unknown parent {parent}")]
    UnknownParent { individual: String, parent: String },

    #[error("Segregation check failed for {gene} under {mode}: {message}")]
    Segregation {
        gene: String,
        mode: ModeOfInheritance,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GenorankError>;
