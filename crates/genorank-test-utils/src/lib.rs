//! Fixtures shared by genorank tests: variant/gene builders, small
//! pedigrees and domains.

use genorank_common::{
    AffectionStatus, AlleleCall, Gene, Genotype, Individual, Pedigree, PriorityKind,
    PriorityResult, SampleCall, TopologicalDomain, Variant, VariantEffect,
};

pub use pretty_assertions::assert_eq;

pub const PROBAND: &str = "proband";
const REF: &str = "A";
const ALT: &str = "T";

/// Opt into log output for a test run; honours RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Allele calls that classify as `genotype` against the fixture alt allele.
pub fn calls_for(genotype: Genotype) -> Vec<AlleleCall> {
    match genotype {
        Genotype::HomozygousRef => vec![AlleleCall::called(REF), AlleleCall::called(REF)],
        Genotype::Heterozygous => vec![AlleleCall::called(REF), AlleleCall::called(ALT)],
        Genotype::HomozygousAlt => vec![AlleleCall::called(ALT), AlleleCall::called(ALT)],
        Genotype::NotObserved => vec![AlleleCall::NoCall, AlleleCall::NoCall],
    }
}

pub struct VariantBuilder {
    variant: Variant,
}

impl VariantBuilder {
    /// Heterozygous-in-proband missense variant scoring 1.0 in GENE1.
    pub fn new(chromosome: u8, position: u32) -> Self {
        Self {
            variant: Variant {
                chromosome,
                position,
                reference: REF.to_string(),
                alternate: ALT.to_string(),
                effect: VariantEffect::Missense,
                gene_symbol: "GENE1".to_string(),
                gene_id: 1,
                annotations: Vec::new(),
                sample_calls: vec![SampleCall::new(PROBAND, calls_for(Genotype::Heterozygous))],
                score: 1.0,
                passed_filters: true,
                contributes_to_gene_score: false,
            },
        }
    }

    pub fn gene(mut self, symbol: &str, gene_id: u32) -> Self {
        self.variant.gene_symbol = symbol.to_string();
        self.variant.gene_id = gene_id;
        self
    }

    pub fn effect(mut self, effect: VariantEffect) -> Self {
        self.variant.effect = effect;
        self
    }

    pub fn regulatory(self) -> Self {
        self.effect(VariantEffect::RegulatoryRegion)
    }

    pub fn score(mut self, score: f64) -> Self {
        self.variant.score = score;
        self
    }

    pub fn failed(mut self) -> Self {
        self.variant.passed_filters = false;
        self
    }

    /// Replace the proband genotype.
    pub fn proband(self, genotype: Genotype) -> Self {
        self.sample(PROBAND, genotype)
    }

    /// Set (or replace) the genotype of `sample`.
    pub fn sample(mut self, sample: &str, genotype: Genotype) -> Self {
        let call = SampleCall::new(sample, calls_for(genotype));
        match self.variant.sample_calls.iter_mut().find(|c| c.sample == sample) {
            Some(existing) => *existing = call,
            None => self.variant.sample_calls.push(call),
        }
        self
    }

    pub fn annotation(mut self, transcript_id: &str) -> Self {
        self.variant.annotations.push(genorank_common::TranscriptAnnotation {
            transcript_id: transcript_id.to_string(),
            gene_symbol: self.variant.gene_symbol.clone(),
            effect: self.variant.effect,
            hgvs_c: None,
        });
        self
    }

    pub fn build(self) -> Variant {
        self.variant
    }
}

/// Gene with the given variants and priority results.
pub fn gene(symbol: &str, gene_id: u32, variants: Vec<Variant>, priorities: &[(PriorityKind, f64)]) -> Gene {
    let mut gene = Gene::new(symbol, gene_id);
    for variant in variants {
        gene.add_variant(variant);
    }
    for (kind, score) in priorities {
        gene.add_priority_result(PriorityResult::new(*kind, *score));
    }
    gene
}

/// Passed proband variants in `symbol` with the given scores and genotypes.
pub fn scored_variants(symbol: &str, gene_id: u32, calls: &[(f64, Genotype)]) -> Vec<Variant> {
    calls
        .iter()
        .enumerate()
        .map(|(i, (score, genotype))| {
            VariantBuilder::new(1, 1_000 + i as u32 * 10)
                .gene(symbol, gene_id)
                .score(*score)
                .proband(*genotype)
                .build()
        })
        .collect()
}

pub fn domain(chromosome: u8, start: u32, end: u32, genes: &[(&str, u32)]) -> TopologicalDomain {
    TopologicalDomain::new(
        chromosome,
        start,
        end,
        genes.iter().map(|(symbol, id)| (symbol.to_string(), *id)),
    )
    .expect("valid fixture domain")
}

/// Affected proband with unaffected parents, proband first.
pub fn trio() -> Pedigree {
    use genorank_common::Sex;
    Pedigree::new(vec![
        Individual::new(PROBAND, Sex::Male, AffectionStatus::Affected)
            .with_parents(Some("father"), Some("mother")),
        Individual::new("father", Sex::Male, AffectionStatus::Unaffected),
        Individual::new("mother", Sex::Female, AffectionStatus::Unaffected),
    ])
    .expect("valid fixture pedigree")
}
