//! One analysis run: owns the genes and runs reassignment, inheritance
//! analysis and scoring in that order.
//!
//! Components only ever borrow the gene arena for the length of one pass.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use genorank_common::error::Result;
use genorank_common::{AnalysisConfig, Gene, ModeOfInheritance, Pedigree, ScorerKind, Variant};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain_index::DomainIndex;
use crate::inheritance::InheritanceAnalyser;
use crate::reassign::GeneReassigner;
use crate::scorer::GeneScorer;
use crate::segregation::SegregationChecker;

/// Sorted, scored genes handed to the report writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedGenes {
    pub run_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub strategy: ScorerKind,
    pub genes: Vec<Gene>,
}

impl RankedGenes {
    pub fn top(&self, n: usize) -> &[Gene] {
        &self.genes[..n.min(self.genes.len())]
    }
}

pub struct Analysis<'a> {
    config: AnalysisConfig,
    genes: Vec<Gene>,
    domains: Option<&'a DomainIndex>,
    segregation: Option<(&'a dyn SegregationChecker, &'a Pedigree)>,
}

impl<'a> Analysis<'a> {
    pub fn new(config: AnalysisConfig, genes: Vec<Gene>) -> Self {
        Self {
            config,
            genes,
            domains: None,
            segregation: None,
        }
    }

    /// Enable regulatory variant reassignment against these domains.
    pub fn with_domains(mut self, domains: &'a DomainIndex) -> Self {
        self.domains = Some(domains);
        self
    }

    /// Enable pedigree-aware inheritance analysis.
    pub fn with_segregation(
        mut self,
        checker: &'a dyn SegregationChecker,
        pedigree: &'a Pedigree,
    ) -> Self {
        self.segregation = Some((checker, pedigree));
        self
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Run every configured pass and return the ranked genes. Any failure
    /// aborts the whole run.
    pub fn run(mut self) -> Result<RankedGenes> {
        self.config.validate()?;
        info!("Starting analysis of {} genes", self.genes.len());

        self.reassign_regulatory_variants();
        self.analyse_inheritance()?;
        let strategy = self.score_genes();

        Ok(RankedGenes {
            run_id: Uuid::new_v4(),
            completed_at: Utc::now(),
            strategy,
            genes: self.genes,
        })
    }

    /// Reassign regulatory variants and move each one into the gene that now
    /// owns it. Returns the number of variants moved.
    pub fn reassign_regulatory_variants(&mut self) -> usize {
        let Some(domains) = self.domains else {
            return 0;
        };
        if !self.config.reassignment.enabled {
            return 0;
        }

        let kind = self.config.reassignment.priority_kind;
        let scores: HashMap<String, f64> = self
            .genes
            .iter()
            .filter_map(|g| g.priority_result(kind).map(|r| (g.symbol.clone(), r.score)))
            .collect();
        let positions: HashMap<String, usize> = self
            .genes
            .iter()
            .enumerate()
            .map(|(i, g)| (g.symbol.clone(), i))
            .collect();

        let reassigner = GeneReassigner::new(domains);
        let mut moved: Vec<Variant> = Vec::new();
        for gene in self.genes.iter_mut() {
            if reassigner.reassign_using(&mut gene.variants, |s| scores.get(s).copied()) == 0 {
                continue;
            }
            let (stay, go): (Vec<Variant>, Vec<Variant>) =
                std::mem::take(&mut gene.variants).into_iter().partition(|v| {
                    v.gene_symbol == gene.symbol || !positions.contains_key(&v.gene_symbol)
                });
            gene.variants = stay;
            moved.extend(go);
        }

        let count = moved.len();
        for variant in moved {
            match positions.get(&variant.gene_symbol) {
                Some(&i) => self.genes[i].add_variant(variant),
                None => warn!("No gene {} for reassigned variant", variant.gene_symbol),
            }
        }
        info!("Reassigned {count} regulatory variants by {kind} score");
        count
    }

    /// Store compatible modes on every gene. A checker failure on any gene
    /// is returned and no partial result is kept by the caller.
    pub fn analyse_inheritance(&mut self) -> Result<()> {
        let Some((checker, pedigree)) = self.segregation else {
            return Ok(());
        };
        let analyser = InheritanceAnalyser::new(checker, pedigree);

        if self.config.execution.parallel {
            self.genes
                .par_iter_mut()
                .try_for_each(|gene| analyser.analyse_into(gene))?;
        } else {
            for gene in self.genes.iter_mut() {
                analyser.analyse_into(gene)?;
            }
        }

        let compatible = self
            .genes
            .iter()
            .filter(|g| !g.inheritance_modes.is_empty())
            .count();
        info!(
            "Inheritance analysis over {} individuals: {compatible}/{} genes compatible with at least one mode",
            pedigree.len(),
            self.genes.len()
        );
        Ok(())
    }

    /// Score and sort the genes with the configured strategy.
    pub fn score_genes(&mut self) -> ScorerKind {
        let modes: BTreeSet<ModeOfInheritance> =
            self.config.scoring.modes.iter().copied().collect();
        let scorer = GeneScorer::from_config(&self.config.scoring, self.config.execution.parallel);
        scorer.score_genes(&mut self.genes, &modes);
        scorer.kind()
    }
}

impl std::fmt::Debug for Analysis<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analysis")
            .field("genes", &self.genes.len())
            .field("domains", &self.domains.map(DomainIndex::len))
            .field("segregation", &self.segregation.is_some())
            .finish()
    }
}
