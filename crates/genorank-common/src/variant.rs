/// Variant-level types: allele calls, genotypes and the variant record itself.
/// Variants are created by upstream annotation and mutated in place by the
/// reassignment and scoring passes.

use serde::{Deserialize, Serialize};

use crate::region::{ChromosomalRegion, CHROMOSOME_X};

// ---------------------------------------------------------------------------
// Genotype
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genotype {
    HomozygousRef,
    Heterozygous,
    HomozygousAlt,
    NotObserved,
}

/// One allele as reported by the caller; `NoCall` is the VCF `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlleleCall {
    NoCall,
    Called(String),
}

impl AlleleCall {
    pub fn called(allele: &str) -> Self {
        AlleleCall::Called(allele.to_string())
    }

    fn matches(&self, alt: &str) -> bool {
        matches!(self, AlleleCall::Called(a) if a == alt)
    }
}

/// Raw allele calls for one sample at one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCall {
    pub sample: String,
    pub alleles: Vec<AlleleCall>,
}

impl SampleCall {
    pub fn new(sample: &str, alleles: Vec<AlleleCall>) -> Self {
        Self {
            sample: sample.to_string(),
            alleles,
        }
    }

    /// Classify the calls against the variant's alternate allele.
    ///
    /// Fewer than two alleles or any no-call gives `NotObserved`. Only the
    /// first two alleles are classified.
    pub fn genotype(&self, alt: &str) -> Genotype {
        if self.alleles.len() < 2 || self.alleles.iter().any(|a| *a == AlleleCall::NoCall) {
            return Genotype::NotObserved;
        }
        match (self.alleles[0].matches(alt), self.alleles[1].matches(alt)) {
            (true, true) => Genotype::HomozygousAlt,
            (false, false) => Genotype::HomozygousRef,
            _ => Genotype::Heterozygous,
        }
    }
}

// ---------------------------------------------------------------------------
// Effect / annotation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantEffect {
    Frameshift,
    StopGained,
    StopLost,
    StartLost,
    SpliceDonor,
    SpliceAcceptor,
    Missense,
    InframeInsertion,
    InframeDeletion,
    SpliceRegion,
    Synonymous,
    FivePrimeUtr,
    ThreePrimeUtr,
    Intronic,
    Upstream,
    Downstream,
    RegulatoryRegion,
    Intergenic,
}

impl VariantEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantEffect::Frameshift       => "frameshift_variant",
            VariantEffect::StopGained       => "stop_gained",
            VariantEffect::StopLost         => "stop_lost",
            VariantEffect::StartLost        => "start_lost",
            VariantEffect::SpliceDonor      => "splice_donor_variant",
            VariantEffect::SpliceAcceptor   => "splice_acceptor_variant",
            VariantEffect::Missense         => "missense_variant",
            VariantEffect::InframeInsertion => "inframe_insertion",
            VariantEffect::InframeDeletion  => "inframe_deletion",
            VariantEffect::SpliceRegion     => "splice_region_variant",
            VariantEffect::Synonymous       => "synonymous_variant",
            VariantEffect::FivePrimeUtr     => "5_prime_UTR_variant",
            VariantEffect::ThreePrimeUtr    => "3_prime_UTR_variant",
            VariantEffect::Intronic         => "intron_variant",
            VariantEffect::Upstream         => "upstream_gene_variant",
            VariantEffect::Downstream       => "downstream_gene_variant",
            VariantEffect::RegulatoryRegion => "regulatory_region_variant",
            VariantEffect::Intergenic       => "intergenic_variant",
        }
    }
}

/// Transcript-level consequence attached by the annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptAnnotation {
    pub transcript_id: String,
    pub gene_symbol: String,
    pub effect: VariantEffect,
    pub hgvs_c: Option<String>,
}

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub chromosome: u8,
    /// 1-based position of the first reference base.
    pub position: u32,
    pub reference: String,
    pub alternate: String,
    pub effect: VariantEffect,
    pub gene_symbol: String,
    pub gene_id: u32,
    #[serde(default)]
    pub annotations: Vec<TranscriptAnnotation>,
    /// Calls in sample order; the first entry is the proband.
    #[serde(default)]
    pub sample_calls: Vec<SampleCall>,
    /// Upstream filter score in [0, 1].
    pub score: f64,
    #[serde(default = "default_passed")]
    pub passed_filters: bool,
    /// Set by the gene scorer on the variants that determined the filter score.
    #[serde(default)]
    pub contributes_to_gene_score: bool,
}

fn default_passed() -> bool { true }

impl Variant {
    pub fn is_regulatory(&self) -> bool {
        self.effect == VariantEffect::RegulatoryRegion
    }

    pub fn is_x_chromosomal(&self) -> bool {
        self.chromosome == CHROMOSOME_X
    }

    /// Genotype of `sample`, `NotObserved` when the sample has no calls here.
    pub fn genotype_for(&self, sample: &str) -> Genotype {
        self.sample_calls
            .iter()
            .find(|c| c.sample == sample)
            .map(|c| c.genotype(&self.alternate))
            .unwrap_or(Genotype::NotObserved)
    }

    pub fn first_sample_genotype(&self) -> Genotype {
        self.sample_calls
            .first()
            .map(|c| c.genotype(&self.alternate))
            .unwrap_or(Genotype::NotObserved)
    }
}

impl ChromosomalRegion for Variant {
    fn chromosome(&self) -> u8 {
        self.chromosome
    }

    fn start(&self) -> u32 {
        self.position
    }

    fn end(&self) -> u32 {
        let span = u32::try_from(self.reference.len().max(1)).unwrap_or(u32::MAX);
        self.position.saturating_add(span - 1)
    }
}
