//! Regulatory variant reassignment.
//!
//! A variant in a regulatory region has no strong native gene. Every gene
//! sharing a topological domain with the variant is a candidate, and the
//! candidate with the highest prioritiser score takes the variant.

use std::collections::{BTreeMap, HashMap};

use genorank_common::{Gene, PriorityKind, Variant};
use tracing::debug;

use crate::domain_index::DomainIndex;

#[derive(Debug)]
pub struct GeneReassigner<'a> {
    domains: &'a DomainIndex,
}

impl<'a> GeneReassigner<'a> {
    pub fn new(domains: &'a DomainIndex) -> Self {
        Self { domains }
    }

    /// Reassign regulatory variants using the `priority_kind` result of the
    /// candidate genes in `all_genes`. Returns how many variants moved.
    pub fn reassign_regulatory_variants(
        &self,
        variants: &mut [Variant],
        all_genes: &HashMap<String, Gene>,
        priority_kind: PriorityKind,
    ) -> usize {
        self.reassign_using(variants, |symbol| {
            all_genes
                .get(symbol)
                .and_then(|gene| gene.priority_result(priority_kind))
                .map(|result| result.score)
        })
    }

    /// As [`reassign_regulatory_variants`](Self::reassign_regulatory_variants),
    /// with candidate scores supplied by `priority_of`. `None` skips the
    /// candidate.
    pub fn reassign_using<F>(&self, variants: &mut [Variant], priority_of: F) -> usize
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut moved = 0;
        for variant in variants.iter_mut().filter(|v| v.is_regulatory()) {
            if self.reassign_variant(variant, &priority_of) {
                moved += 1;
            }
        }
        moved
    }

    fn reassign_variant<F>(&self, variant: &mut Variant, priority_of: &F) -> bool
    where
        F: Fn(&str) -> Option<f64>,
    {
        // symbol order makes ties resolve the same way every run
        let mut candidates: BTreeMap<&str, u32> = BTreeMap::new();
        for domain in self.domains.domains_overlapping(variant) {
            for (symbol, gene_id) in domain.genes() {
                candidates.entry(symbol.as_str()).or_insert(*gene_id);
            }
        }

        let mut best_score = 0.0;
        let mut best: Option<(&str, u32)> = None;
        for (symbol, gene_id) in candidates {
            let Some(score) = priority_of(symbol) else {
                continue;
            };
            if score > best_score {
                best_score = score;
                best = Some((symbol, gene_id));
            }
        }

        let Some((symbol, gene_id)) = best else {
            return false;
        };
        if symbol == variant.gene_symbol && gene_id == variant.gene_id {
            return false;
        }

        debug!(
            "Reassigning chr{}:{} from {} to {} (score {:.4})",
            variant.chromosome, variant.position, variant.gene_symbol, symbol, best_score
        );
        variant.gene_symbol = symbol.to_string();
        variant.gene_id = gene_id;
        variant.annotations.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genorank_test_utils::{domain, gene, VariantBuilder};

    fn genes(kind: PriorityKind, entries: &[(&str, u32, f64)]) -> HashMap<String, Gene> {
        entries
            .iter()
            .map(|(symbol, id, score)| (symbol.to_string(), gene(symbol, *id, vec![], &[(kind, *score)])))
            .collect()
    }

    fn index() -> DomainIndex {
        DomainIndex::new(vec![
            domain(1, 1_000, 10_000, &[("ALPHA", 1), ("BETA", 2), ("GAMMA", 3)]),
            domain(1, 20_000, 30_000, &[("DELTA", 4)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_regulatory_variant_moves_to_best_gene() {
        let index = index();
        let reassigner = GeneReassigner::new(&index);
        let all = genes(PriorityKind::HiPhive, &[
            ("ALPHA", 1, 0.2),
            ("BETA", 2, 0.9),
            ("GAMMA", 3, 0.5),
        ]);
        let mut variants = vec![VariantBuilder::new(1, 5_000)
            .gene("ALPHA", 1)
            .regulatory()
            .annotation("ENST0001")
            .build()];

        let moved = reassigner.reassign_regulatory_variants(&mut variants, &all, PriorityKind::HiPhive);

        assert_eq!(moved, 1);
        assert_eq!(variants[0].gene_symbol, "BETA");
        assert_eq!(variants[0].gene_id, 2);
        assert!(variants[0].annotations.is_empty());
    }

    #[test]
    fn test_non_regulatory_variant_untouched() {
        let index = index();
        let reassigner = GeneReassigner::new(&index);
        let all = genes(PriorityKind::HiPhive, &[("BETA", 2, 0.9)]);
        let mut variants = vec![VariantBuilder::new(1, 5_000).gene("ALPHA", 1).build()];

        assert_eq!(reassigner.reassign_regulatory_variants(&mut variants, &all, PriorityKind::HiPhive), 0);
        assert_eq!(variants[0].gene_symbol, "ALPHA");
    }

    #[test]
    fn test_no_domain_or_no_result_leaves_variant() {
        let index = index();
        let reassigner = GeneReassigner::new(&index);
        let mut all = genes(PriorityKind::Phenix, &[("BETA", 2, 0.9)]);
        all.extend(genes(PriorityKind::HiPhive, &[("DELTA", 4, 0.9)]));
        let mut variants = vec![
            VariantBuilder::new(1, 15_000).gene("ALPHA", 1).regulatory().build(),
            VariantBuilder::new(1, 5_000).gene("ALPHA", 1).regulatory().annotation("ENST0001").build(),
        ];

        assert_eq!(reassigner.reassign_regulatory_variants(&mut variants, &all, PriorityKind::HiPhive), 0);
        assert_eq!(variants[0].gene_symbol, "ALPHA");
        assert_eq!(variants[1].gene_symbol, "ALPHA");
        assert_eq!(variants[1].annotations.len(), 1);
    }

    #[test]
    fn test_zero_scores_never_win() {
        let index = index();
        let reassigner = GeneReassigner::new(&index);
        let all = genes(PriorityKind::HiPhive, &[("BETA", 2, 0.0)]);
        let mut variants = vec![VariantBuilder::new(1, 5_000).gene("ALPHA", 1).regulatory().build()];

        assert_eq!(reassigner.reassign_regulatory_variants(&mut variants, &all, PriorityKind::HiPhive), 0);
        assert_eq!(variants[0].gene_symbol, "ALPHA");
    }

    #[test]
    fn test_tie_resolves_to_first_symbol() {
        let index = index();
        let reassigner = GeneReassigner::new(&index);
        let all = genes(PriorityKind::HiPhive, &[
            ("GAMMA", 3, 0.7),
            ("BETA", 2, 0.7),
        ]);
        let mut variants = vec![VariantBuilder::new(1, 5_000).gene("DELTA", 4).regulatory().build()];

        reassigner.reassign_regulatory_variants(&mut variants, &all, PriorityKind::HiPhive);
        assert_eq!(variants[0].gene_symbol, "BETA");
    }

    #[test]
    fn test_reassignment_is_idempotent() {
        let index = index();
        let reassigner = GeneReassigner::new(&index);
        let all = genes(PriorityKind::HiPhive, &[
            ("ALPHA", 1, 0.2),
            ("GAMMA", 3, 0.6),
        ]);
        let mut variants = vec![VariantBuilder::new(1, 5_000).gene("ALPHA", 1).regulatory().build()];

        assert_eq!(reassigner.reassign_regulatory_variants(&mut variants, &all, PriorityKind::HiPhive), 1);
        let after_first = variants.clone();
        assert_eq!(reassigner.reassign_regulatory_variants(&mut variants, &all, PriorityKind::HiPhive), 0);
        assert_eq!(variants, after_first);
    }

    #[test]
    fn test_gene_missing_from_run_is_ignored() {
        let index = index();
        let reassigner = GeneReassigner::new(&index);
        let mut variants = vec![VariantBuilder::new(1, 25_000).gene("ALPHA", 1).regulatory().build()];
        let moved = reassigner.reassign_using(&mut variants, |_| None);
        assert_eq!(moved, 0);
    }
}
