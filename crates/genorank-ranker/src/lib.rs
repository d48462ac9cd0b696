//! genorank-ranker — Candidate gene ranking engine.
//!
//! Indexes topological domains, reassigns regulatory variants, checks
//! inheritance compatibility and scores genes.

pub mod region_index;
pub mod domain_index;
pub mod reassign;
pub mod segregation;
pub mod inheritance;
pub mod combine;
pub mod normalise;
pub mod scorer;
pub mod analysis;

pub use analysis::{Analysis, RankedGenes};
pub use domain_index::DomainIndex;
pub use inheritance::InheritanceAnalyser;
pub use reassign::GeneReassigner;
pub use region_index::RegionIndex;
pub use scorer::{GeneScorer, RankBasedGeneScorer, RawScoreGeneScorer};
pub use segregation::{GenotypeList, MockSegregationChecker, SegregationChecker, SegregationError};
