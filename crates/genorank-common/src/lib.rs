//! genorank-common — Shared types, errors, and configuration used across all genorank crates.

pub mod error;
pub mod region;
pub mod variant;
pub mod gene;
pub mod pedigree;
pub mod inheritance;
pub mod config;

// Re-export commonly used types
pub use error::{GenorankError, Result};
pub use region::{ChromosomalRegion, GenomicRegion, TopologicalDomain};
pub use variant::{AlleleCall, Genotype, SampleCall, TranscriptAnnotation, Variant, VariantEffect};
pub use gene::{Gene, PriorityKind, PriorityResult, PriorityResults};
pub use pedigree::{AffectionStatus, Individual, Pedigree, Sex};
pub use inheritance::ModeOfInheritance;
pub use config::{
    AnalysisConfig, CombinationCoefficients, ExecutionConfig, LogisticCoefficients,
    ReassignmentConfig, ScorerKind, ScoringConfig,
};
