//! Gene score computation.
//!
//! Every gene gets three scores:
//!
//! - filter score: the best variant evidence under the requested modes
//!   of inheritance
//! - priority score: product of the attached prioritiser scores
//! - combined score: prioritiser-specific blend of the two
//!
//! [`RawScoreGeneScorer`] ranks on the combined score.
//! [`RankBasedGeneScorer`] runs the raw scorer and then replaces each
//! priority score by its shared-rank normalisation.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use genorank_common::{
    CombinationCoefficients, Gene, Genotype, ModeOfInheritance, ScorerKind, ScoringConfig, Variant,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::combine::{combined_score, priority_score};
use crate::normalise::rank_normalise;

/// Filter score with the positions (in `Gene::variants`) of the variants
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterScore {
    pub score: f64,
    pub contributing: Vec<usize>,
}

impl FilterScore {
    fn none() -> Self {
        Self { score: 0.0, contributing: Vec::new() }
    }
}

fn by_score_desc(a: &(usize, &Variant), b: &(usize, &Variant)) -> Ordering {
    b.1.score.total_cmp(&a.1.score)
}

/// Filter score of `variants` under a single mode; `None` means unspecified.
///
/// Only passed variants count. Autosomal recessive takes the better of the
/// top homozygous-alt variant and the mean of the two top heterozygous
/// variants, using the first sample's genotype. Every other mode takes the
/// top variant that is not homozygous reference.
pub fn filter_score_for_mode(variants: &[Variant], mode: Option<ModeOfInheritance>) -> FilterScore {
    let passed: Vec<(usize, &Variant)> = variants
        .iter()
        .enumerate()
        .filter(|(_, v)| v.passed_filters)
        .collect();
    if passed.is_empty() {
        return FilterScore::none();
    }

    if mode == Some(ModeOfInheritance::AutosomalRecessive) {
        let mut homozygous: Vec<(usize, &Variant)> = Vec::new();
        let mut heterozygous: Vec<(usize, &Variant)> = Vec::new();
        for &(i, v) in &passed {
            match v.first_sample_genotype() {
                Genotype::HomozygousAlt => homozygous.push((i, v)),
                Genotype::Heterozygous => heterozygous.push((i, v)),
                _ => {}
            }
        }
        // stable sorts keep input order among equal scores
        homozygous.sort_by(by_score_desc);
        heterozygous.sort_by(by_score_desc);

        let best_homozygous = homozygous.first().map(|(_, v)| v.score).unwrap_or(0.0);
        let best_compound = match heterozygous.as_slice() {
            [first, second, ..] => (first.1.score + second.1.score) / 2.0,
            _ => 0.0,
        };

        if !homozygous.is_empty() && best_homozygous >= best_compound {
            return FilterScore {
                score: best_homozygous,
                contributing: vec![homozygous[0].0],
            };
        }
        if heterozygous.len() >= 2 {
            return FilterScore {
                score: best_compound,
                contributing: vec![heterozygous[0].0, heterozygous[1].0],
            };
        }
        return FilterScore::none();
    }

    let mut best: Option<(usize, &Variant)> = None;
    for &(i, v) in &passed {
        if v.first_sample_genotype() == Genotype::HomozygousRef {
            continue;
        }
        if best.map_or(true, |(_, b)| v.score > b.score) {
            best = Some((i, v));
        }
    }
    match best {
        Some((i, v)) => FilterScore { score: v.score, contributing: vec![i] },
        None => FilterScore::none(),
    }
}

/// Best filter score over `modes`; an empty set scores as unspecified.
/// Ties keep the earlier mode.
pub fn filter_score(variants: &[Variant], modes: &BTreeSet<ModeOfInheritance>) -> FilterScore {
    if modes.is_empty() {
        return filter_score_for_mode(variants, None);
    }
    let mut best = FilterScore::none();
    let mut first = true;
    for mode in modes {
        let candidate = filter_score_for_mode(variants, Some(*mode));
        if first || candidate.score > best.score {
            best = candidate;
            first = false;
        }
    }
    best
}

/// Descending by `key`, ties by ascending gene symbol.
fn sort_genes_by<F>(genes: &mut [Gene], key: F)
where
    F: Fn(&Gene) -> f64,
{
    genes.sort_by(|a, b| {
        key(b)
            .total_cmp(&key(a))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}

// ── Raw ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RawScoreGeneScorer {
    coefficients: CombinationCoefficients,
    parallel: bool,
    use_inheritance_modes: bool,
}

impl RawScoreGeneScorer {
    pub fn new(coefficients: CombinationCoefficients) -> Self {
        Self { coefficients, parallel: false, use_inheritance_modes: false }
    }

    /// Score genes on the rayon pool; sorting still waits for every gene.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Only score each gene under the requested modes its pedigree verdict
    /// allows. A gene left with no mode gets filter score 0; with no
    /// requested modes the verdict alone is used.
    pub fn use_inheritance_modes(mut self, enabled: bool) -> Self {
        self.use_inheritance_modes = enabled;
        self
    }

    fn filter_score_for(&self, gene: &Gene, modes: &BTreeSet<ModeOfInheritance>) -> FilterScore {
        if !self.use_inheritance_modes {
            return filter_score(&gene.variants, modes);
        }
        let allowed: BTreeSet<ModeOfInheritance> = if modes.is_empty() {
            gene.inheritance_modes.clone()
        } else {
            modes.intersection(&gene.inheritance_modes).copied().collect()
        };
        if allowed.is_empty() {
            return FilterScore::none();
        }
        filter_score(&gene.variants, &allowed)
    }

    /// Compute filter, priority and combined scores for one gene and flag
    /// the contributing variants.
    pub fn score_gene(&self, gene: &mut Gene, modes: &BTreeSet<ModeOfInheritance>) {
        let filter = self.filter_score_for(gene, modes);
        for variant in gene.variants.iter_mut() {
            variant.contributes_to_gene_score = false;
        }
        for &i in &filter.contributing {
            gene.variants[i].contributes_to_gene_score = true;
        }

        gene.filter_score = filter.score;
        gene.priority_score = priority_score(&gene.priority_results);
        gene.combined_score = combined_score(
            gene.priority_score,
            gene.filter_score,
            &gene.priority_results,
            &self.coefficients,
        );
    }

    /// Score every gene, then sort by descending combined score.
    pub fn score_genes(&self, genes: &mut [Gene], modes: &BTreeSet<ModeOfInheritance>) {
        if self.parallel {
            genes.par_iter_mut().for_each(|gene| self.score_gene(gene, modes));
        } else {
            for gene in genes.iter_mut() {
                self.score_gene(gene, modes);
            }
        }
        sort_genes_by(genes, |g| g.combined_score);
        debug!("Raw-scored {} genes", genes.len());
    }
}

// ── Rank-based ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RankBasedGeneScorer {
    raw: RawScoreGeneScorer,
}

impl RankBasedGeneScorer {
    pub fn new(raw: RawScoreGeneScorer) -> Self {
        Self { raw }
    }

    /// Raw scoring followed by rank normalisation of the combined scores.
    /// The normalised value is written to `priority_score` and the genes are
    /// re-sorted by it.
    pub fn score_genes(&self, genes: &mut [Gene], modes: &BTreeSet<ModeOfInheritance>) {
        if genes.is_empty() {
            return;
        }
        self.raw.score_genes(genes, modes);

        let raw_scores: Vec<f64> = genes.iter().map(|g| g.combined_score).collect();
        for (gene, normalised) in genes.iter_mut().zip(rank_normalise(&raw_scores)) {
            gene.priority_score = normalised;
        }
        sort_genes_by(genes, |g| g.priority_score);
        debug!("Rank-normalised {} genes", genes.len());
    }
}

// ── Strategy ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum GeneScorer {
    Raw(RawScoreGeneScorer),
    RankBased(RankBasedGeneScorer),
}

impl GeneScorer {
    pub fn from_config(config: &ScoringConfig, parallel: bool) -> Self {
        let raw = RawScoreGeneScorer::new(config.coefficients)
            .parallel(parallel)
            .use_inheritance_modes(config.use_inheritance_modes);
        match config.strategy {
            ScorerKind::Raw => GeneScorer::Raw(raw),
            ScorerKind::RankBased => GeneScorer::RankBased(RankBasedGeneScorer::new(raw)),
        }
    }

    pub fn kind(&self) -> ScorerKind {
        match self {
            GeneScorer::Raw(_) => ScorerKind::Raw,
            GeneScorer::RankBased(_) => ScorerKind::RankBased,
        }
    }

    pub fn score_genes(&self, genes: &mut [Gene], modes: &BTreeSet<ModeOfInheritance>) {
        match self {
            GeneScorer::Raw(scorer) => scorer.score_genes(genes, modes),
            GeneScorer::RankBased(scorer) => scorer.score_genes(genes, modes),
        }
        info!("Scored {} genes with {:?} scorer", genes.len(), self.kind());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use genorank_common::PriorityKind;
    use genorank_test_utils::{gene, scored_variants, VariantBuilder};

    use genorank_common::Genotype::{Heterozygous as Het, HomozygousAlt as HomAlt, HomozygousRef as HomRef};

    fn modes(list: &[ModeOfInheritance]) -> BTreeSet<ModeOfInheritance> {
        list.iter().copied().collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_recessive_compound_het_mean_of_top_two() {
        let variants = scored_variants("GENE1", 1, &[(0.9, Het), (0.7, Het), (0.3, Het)]);
        let score = filter_score_for_mode(&variants, Some(ModeOfInheritance::AutosomalRecessive));
        assert!(approx(score.score, 0.8));
        assert_eq!(score.contributing, vec![0, 1]);
    }

    #[test]
    fn test_recessive_homozygous_beats_weaker_pair() {
        let variants = scored_variants("GENE1", 1, &[(0.6, Het), (0.5, Het), (0.7, HomAlt)]);
        let score = filter_score_for_mode(&variants, Some(ModeOfInheritance::AutosomalRecessive));
        assert!(approx(score.score, 0.7));
        assert_eq!(score.contributing, vec![2]);
    }

    #[test]
    fn test_recessive_single_het_scores_zero() {
        let variants = scored_variants("GENE1", 1, &[(0.9, Het), (0.95, HomRef)]);
        let score = filter_score_for_mode(&variants, Some(ModeOfInheritance::AutosomalRecessive));
        assert_eq!(score, FilterScore { score: 0.0, contributing: vec![] });
    }

    #[test]
    fn test_dominant_takes_max() {
        let variants = scored_variants("GENE1", 1, &[(0.7, Het), (0.9, Het), (0.3, HomAlt)]);
        let score = filter_score_for_mode(&variants, Some(ModeOfInheritance::AutosomalDominant));
        assert!(approx(score.score, 0.9));
        assert_eq!(score.contributing, vec![1]);
    }

    #[test]
    fn test_dominant_ignores_hom_ref_and_failed() {
        let mut variants = scored_variants("GENE1", 1, &[(0.95, HomRef), (0.4, Het)]);
        variants.push(VariantBuilder::new(1, 5_000).score(0.99).failed().build());
        let score = filter_score_for_mode(&variants, None);
        assert!(approx(score.score, 0.4));
    }

    #[test]
    fn test_no_passed_variants_scores_zero() {
        let variants = vec![VariantBuilder::new(1, 100).score(0.9).failed().build()];
        assert_eq!(filter_score(&variants, &modes(&[])).score, 0.0);
        assert_eq!(
            filter_score(&variants, &modes(&[ModeOfInheritance::AutosomalRecessive])).score,
            0.0
        );
    }

    #[test]
    fn test_mode_set_takes_best_mode() {
        let variants = scored_variants("GENE1", 1, &[(0.9, Het), (0.7, Het)]);
        let both = modes(&[ModeOfInheritance::AutosomalDominant, ModeOfInheritance::AutosomalRecessive]);
        assert!(approx(filter_score(&variants, &both).score, 0.9));
    }

    #[test]
    fn test_score_gene_end_to_end_values() {
        let mut g = gene(
            "GENE1",
            1,
            scored_variants("GENE1", 1, &[(0.8, Het), (0.6, Het)]),
            &[(PriorityKind::HiPhive, 0.5)],
        );
        RawScoreGeneScorer::default().score_gene(&mut g, &modes(&[ModeOfInheritance::AutosomalRecessive]));

        assert!(approx(g.filter_score, 0.7));
        assert!(approx(g.priority_score, 0.5));
        assert!((g.combined_score - 0.160).abs() < 1e-3);
        assert!(g.variants.iter().all(|v| v.contributes_to_gene_score));
    }

    #[test]
    fn test_inheritance_verdict_restricts_modes() {
        let scorer = RawScoreGeneScorer::default().use_inheritance_modes(true);
        let variants = scored_variants("GENE1", 1, &[(0.8, Het), (0.6, Het)]);
        let requested = modes(&[ModeOfInheritance::AutosomalRecessive, ModeOfInheritance::AutosomalDominant]);

        // pedigree only allows dominant: the compound-het pair no longer counts
        let mut dominant_only = gene("GENE1", 1, variants.clone(), &[]);
        dominant_only.inheritance_modes = modes(&[ModeOfInheritance::AutosomalDominant]);
        scorer.score_gene(&mut dominant_only, &modes(&[ModeOfInheritance::AutosomalRecessive]));
        assert_eq!(dominant_only.filter_score, 0.0);
        assert!(dominant_only.variants.iter().all(|v| !v.contributes_to_gene_score));

        scorer.score_gene(&mut dominant_only, &requested);
        assert!(approx(dominant_only.filter_score, 0.8));

        let mut recessive = gene("GENE1", 1, variants.clone(), &[]);
        recessive.inheritance_modes = modes(&[ModeOfInheritance::AutosomalRecessive]);
        scorer.score_gene(&mut recessive, &modes(&[]));
        assert!(approx(recessive.filter_score, 0.7));

        let mut incompatible = gene("GENE1", 1, variants, &[]);
        scorer.score_gene(&mut incompatible, &modes(&[]));
        assert_eq!(incompatible.filter_score, 0.0);
    }

    #[test]
    fn test_inheritance_verdict_ignored_by_default() {
        let mut g = gene("GENE1", 1, scored_variants("GENE1", 1, &[(0.8, Het), (0.6, Het)]), &[]);
        g.inheritance_modes = modes(&[ModeOfInheritance::AutosomalDominant]);
        RawScoreGeneScorer::default().score_gene(&mut g, &modes(&[ModeOfInheritance::AutosomalRecessive]));
        assert!(approx(g.filter_score, 0.7));
    }

    #[test]
    fn test_contributing_flags_reset_between_runs() {
        let mut g = gene("GENE1", 1, scored_variants("GENE1", 1, &[(0.9, Het), (0.7, Het)]), &[]);
        let scorer = RawScoreGeneScorer::default();
        scorer.score_gene(&mut g, &modes(&[ModeOfInheritance::AutosomalRecessive]));
        assert!(g.variants[1].contributes_to_gene_score);
        scorer.score_gene(&mut g, &modes(&[ModeOfInheritance::AutosomalDominant]));
        assert!(g.variants[0].contributes_to_gene_score);
        assert!(!g.variants[1].contributes_to_gene_score);
    }

    #[test]
    fn test_raw_sort_descending_with_symbol_tiebreak() {
        let mut genes = vec![
            gene("ZED", 3, scored_variants("ZED", 3, &[(0.5, Het)]), &[]),
            gene("ALPHA", 1, scored_variants("ALPHA", 1, &[(0.5, Het)]), &[]),
            gene("MID", 2, scored_variants("MID", 2, &[(0.9, Het)]), &[]),
            gene("EMPTY", 4, vec![], &[]),
        ];
        RawScoreGeneScorer::default().score_genes(&mut genes, &modes(&[]));
        let order: Vec<&str> = genes.iter().map(|g| g.symbol.as_str()).collect();
        assert_eq!(order, vec!["MID", "ALPHA", "ZED", "EMPTY"]);
        assert_eq!(genes[3].combined_score, 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let build = || -> Vec<Gene> {
            (0..50u32)
                .map(|i| {
                    let symbol = format!("G{i:02}");
                    let score = (i % 7) as f64 / 10.0;
                    gene(
                        &symbol,
                        i,
                        scored_variants(&symbol, i, &[(score, Het), (0.1, Het)]),
                        &[(PriorityKind::Phenix, (i % 5) as f64 / 5.0)],
                    )
                })
                .collect()
        };
        let all = modes(&ModeOfInheritance::ALL);
        let mut sequential = build();
        let mut parallel = build();
        RawScoreGeneScorer::default().score_genes(&mut sequential, &all);
        RawScoreGeneScorer::default().parallel(true).score_genes(&mut parallel, &all);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_rank_based_distinct_scores() {
        let mut genes: Vec<Gene> = [0.2, 0.9, 0.5, 0.7]
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let symbol = format!("G{i}");
                gene(&symbol, i as u32, scored_variants(&symbol, i as u32, &[(*s, Het)]), &[])
            })
            .collect();
        RankBasedGeneScorer::default().score_genes(&mut genes, &modes(&[]));

        let order: Vec<&str> = genes.iter().map(|g| g.symbol.as_str()).collect();
        assert_eq!(order, vec!["G1", "G3", "G2", "G0"]);
        let scores: Vec<f64> = genes.iter().map(|g| g.priority_score).collect();
        assert_eq!(scores, vec![1.0 - 1.0 / 4.0, 1.0 - 2.0 / 4.0, 1.0 - 3.0 / 4.0, 1.0 - 4.0 / 4.0]);
    }

    #[test]
    fn test_rank_based_tied_top_pair() {
        let mut genes: Vec<Gene> = [("B", 0.9), ("A", 0.9), ("C", 0.4), ("D", 0.1)]
            .iter()
            .enumerate()
            .map(|(i, (symbol, s))| gene(symbol, i as u32, scored_variants(symbol, i as u32, &[(*s, Het)]), &[]))
            .collect();
        RankBasedGeneScorer::default().score_genes(&mut genes, &modes(&[]));

        assert_eq!(genes[0].symbol, "A");
        assert_eq!(genes[1].symbol, "B");
        assert_eq!(genes[0].priority_score, 1.0 - 1.5 / 4.0);
        assert_eq!(genes[1].priority_score, genes[0].priority_score);
        assert_eq!(genes[2].priority_score, 1.0 - 3.0 / 4.0);
    }

    #[test]
    fn test_rank_based_empty_list() {
        let mut genes: Vec<Gene> = Vec::new();
        RankBasedGeneScorer::default().score_genes(&mut genes, &modes(&[]));
        assert!(genes.is_empty());
    }

    #[test]
    fn test_strategy_from_config() {
        let mut config = ScoringConfig::default();
        assert_eq!(GeneScorer::from_config(&config, false).kind(), ScorerKind::Raw);
        config.strategy = ScorerKind::RankBased;
        assert_eq!(GeneScorer::from_config(&config, true).kind(), ScorerKind::RankBased);
    }
}
