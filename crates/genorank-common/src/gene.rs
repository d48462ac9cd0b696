/// Gene aggregate and prioritiser results.
/// One `Gene` exists per distinct gene symbol per analysis run.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inheritance::ModeOfInheritance;
use crate::variant::Variant;

// ---------------------------------------------------------------------------
// Prioritiser kind
// ---------------------------------------------------------------------------

/// Which prioritisation algorithm produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityKind {
    HiPhive,
    ExomeWalker,
    Phenix,
    Phive,
    Omim,
}

impl PriorityKind {
    pub const COUNT: usize = 5;

    pub const ALL: [PriorityKind; Self::COUNT] = [
        PriorityKind::HiPhive,
        PriorityKind::ExomeWalker,
        PriorityKind::Phenix,
        PriorityKind::Phive,
        PriorityKind::Omim,
    ];

    fn ordinal(self) -> usize {
        match self {
            PriorityKind::HiPhive     => 0,
            PriorityKind::ExomeWalker => 1,
            PriorityKind::Phenix      => 2,
            PriorityKind::Phive       => 3,
            PriorityKind::Omim        => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityKind::HiPhive     => "hiphive",
            PriorityKind::ExomeWalker => "exomewalker",
            PriorityKind::Phenix      => "phenix",
            PriorityKind::Phive       => "phive",
            PriorityKind::Omim        => "omim",
        }
    }
}

impl fmt::Display for PriorityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub kind: PriorityKind,
    /// Prioritiser score in [0, 1].
    pub score: f64,
}

impl PriorityResult {
    pub fn new(kind: PriorityKind, score: f64) -> Self {
        Self { kind, score }
    }
}

/// At most one result per prioritiser kind, stored by kind ordinal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityResults {
    slots: [Option<PriorityResult>; PriorityKind::COUNT],
}

impl PriorityResults {
    /// Insert or replace the result for `result.kind`.
    pub fn insert(&mut self, result: PriorityResult) {
        self.slots[result.kind.ordinal()] = Some(result);
    }

    pub fn get(&self, kind: PriorityKind) -> Option<&PriorityResult> {
        self.slots[kind.ordinal()].as_ref()
    }

    pub fn contains(&self, kind: PriorityKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Present results in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &PriorityResult> {
        self.slots.iter().flatten()
    }
}

// ---------------------------------------------------------------------------
// Gene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub symbol: String,
    pub gene_id: u32,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub priority_results: PriorityResults,
    /// Modes the variants segregate with; empty until analysed.
    #[serde(default)]
    pub inheritance_modes: BTreeSet<ModeOfInheritance>,
    #[serde(default)]
    pub filter_score: f64,
    #[serde(default)]
    pub priority_score: f64,
    #[serde(default)]
    pub combined_score: f64,
}

impl Gene {
    pub fn new(symbol: &str, gene_id: u32) -> Self {
        Self {
            symbol: symbol.to_string(),
            gene_id,
            variants: Vec::new(),
            priority_results: PriorityResults::default(),
            inheritance_modes: BTreeSet::new(),
            filter_score: 0.0,
            priority_score: 0.0,
            combined_score: 0.0,
        }
    }

    pub fn add_variant(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    pub fn add_priority_result(&mut self, result: PriorityResult) {
        self.priority_results.insert(result);
    }

    pub fn priority_result(&self, kind: PriorityKind) -> Option<&PriorityResult> {
        self.priority_results.get(kind)
    }

    /// Variants that survived upstream filtering.
    pub fn passed_variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter().filter(|v| v.passed_filters)
    }

    pub fn has_passed_variants(&self) -> bool {
        self.variants.iter().any(|v| v.passed_filters)
    }

    pub fn is_compatible_with(&self, mode: ModeOfInheritance) -> bool {
        self.inheritance_modes.contains(&mode)
    }
}
