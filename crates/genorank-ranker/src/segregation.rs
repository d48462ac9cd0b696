//! Interface to the pedigree segregation checker.
//!
//! The ranker does not decide Mendelian compatibility itself. It assembles a
//! genotype table for a gene and asks a [`SegregationChecker`] whether the
//! table is compatible with a mode of inheritance.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use genorank_common::{Genotype, ModeOfInheritance, Pedigree};
use thiserror::Error;

/// Genotypes of one gene's passed variants across a pedigree.
///
/// `rows[v][i]` is the genotype of the i-th pedigree member at the v-th
/// variant, in pedigree order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeList {
    pub gene_symbol: String,
    pub is_x_chromosomal: bool,
    pub rows: Vec<Vec<Genotype>>,
}

impl GenotypeList {
    pub fn new(gene_symbol: &str, is_x_chromosomal: bool) -> Self {
        Self {
            gene_symbol: gene_symbol.to_string(),
            is_x_chromosomal,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Genotype>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Internal failure of the checker, as opposed to an incompatible verdict.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SegregationError(pub String);

/// Decides whether observed genotypes segregate with a mode of inheritance.
///
/// Implementations must be deterministic. Any timeout policy belongs to the
/// implementation and is reported as an error.
pub trait SegregationChecker: Send + Sync {
    fn is_compatible(
        &self,
        genotypes: &GenotypeList,
        pedigree: &Pedigree,
        mode: ModeOfInheritance,
    ) -> Result<bool, SegregationError>;
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Mock checker with per-mode verdicts for unit tests.
#[derive(Debug, Default)]
pub struct MockSegregationChecker {
    compatible: Vec<ModeOfInheritance>,
    failing: Option<ModeOfInheritance>,
    calls: AtomicUsize,
    seen: Mutex<Vec<GenotypeList>>,
}

impl MockSegregationChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `mode` as compatible.
    pub fn with(mut self, mode: ModeOfInheritance) -> Self {
        self.compatible.push(mode);
        self
    }

    /// Fail with an internal error when asked about `mode`.
    pub fn failing_on(mut self, mode: ModeOfInheritance) -> Self {
        self.failing = Some(mode);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Genotype tables received so far, in call order.
    pub fn seen(&self) -> Vec<GenotypeList> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl SegregationChecker for MockSegregationChecker {
    fn is_compatible(
        &self,
        genotypes: &GenotypeList,
        _pedigree: &Pedigree,
        mode: ModeOfInheritance,
    ) -> Result<bool, SegregationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(genotypes.clone());
        }
        if self.failing == Some(mode) {
            return Err(SegregationError(format!("checker failure for {mode}")));
        }
        Ok(self.compatible.contains(&mode))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
