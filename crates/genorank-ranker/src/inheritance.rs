//! Mode-of-inheritance compatibility for a gene's passed variants.

use std::collections::BTreeSet;

use genorank_common::error::{GenorankError, Result};
use genorank_common::{Gene, Genotype, ModeOfInheritance, Pedigree};
use tracing::debug;

use crate::segregation::{GenotypeList, SegregationChecker};

pub struct InheritanceAnalyser<'a> {
    checker: &'a dyn SegregationChecker,
    pedigree: &'a Pedigree,
}

impl<'a> InheritanceAnalyser<'a> {
    pub fn new(checker: &'a dyn SegregationChecker, pedigree: &'a Pedigree) -> Self {
        Self { checker, pedigree }
    }

    /// Modes the gene's passed variants are compatible with.
    ///
    /// A gene without passed variants is compatible with nothing and the
    /// checker is not consulted. A checker failure is returned as
    /// [`GenorankError::Segregation`].
    pub fn analyse(&self, gene: &Gene) -> Result<BTreeSet<ModeOfInheritance>> {
        let mut modes = BTreeSet::new();
        let Some(genotypes) = self.genotype_list(gene) else {
            return Ok(modes);
        };

        for mode in ModeOfInheritance::ALL {
            let compatible = self
                .checker
                .is_compatible(&genotypes, self.pedigree, mode)
                .map_err(|e| GenorankError::Segregation {
                    gene: gene.symbol.clone(),
                    mode,
                    message: e.0,
                })?;
            if compatible {
                modes.insert(mode);
            }
        }

        debug!("{} compatible with {:?}", gene.symbol, modes);
        Ok(modes)
    }

    /// Analyse and store the verdict on the gene.
    pub fn analyse_into(&self, gene: &mut Gene) -> Result<()> {
        gene.inheritance_modes = self.analyse(gene)?;
        Ok(())
    }

    /// Genotype table for the gene's passed variants in pedigree order, or
    /// `None` when nothing passed.
    pub fn genotype_list(&self, gene: &Gene) -> Option<GenotypeList> {
        let mut passed = gene.passed_variants().peekable();
        let is_x = passed.peek()?.is_x_chromosomal();

        let mut list = GenotypeList::new(&gene.symbol, is_x);
        for variant in passed {
            let row: Vec<Genotype> = self
                .pedigree
                .names()
                .map(|name| variant.genotype_for(name))
                .collect();
            list.push(row);
        }
        Some(list)
    }
}

impl std::fmt::Debug for InheritanceAnalyser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InheritanceAnalyser")
            .field("pedigree", &self.pedigree.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segregation::MockSegregationChecker;
    use genorank_common::region::CHROMOSOME_X;
    use genorank_test_utils::{assert_eq, gene, trio, VariantBuilder, PROBAND};

    #[test]
    fn test_no_passed_variants_skips_checker() {
        let checker = MockSegregationChecker::new().with(ModeOfInheritance::AutosomalDominant);
        let pedigree = trio();
        let analyser = InheritanceAnalyser::new(&checker, &pedigree);

        let failed = VariantBuilder::new(1, 100).failed().build();
        let modes = analyser.analyse(&gene("GENE1", 1, vec![failed], &[])).unwrap();

        assert!(modes.is_empty());
        assert_eq!(checker.calls(), 0);
    }

    #[test]
    fn test_compatible_modes_collected() {
        let checker = MockSegregationChecker::new()
            .with(ModeOfInheritance::AutosomalDominant)
            .with(ModeOfInheritance::XRecessive);
        let pedigree = trio();
        let analyser = InheritanceAnalyser::new(&checker, &pedigree);

        let modes = analyser
            .analyse(&gene("GENE1", 1, vec![VariantBuilder::new(1, 100).build()], &[]))
            .unwrap();

        assert_eq!(
            modes.into_iter().collect::<Vec<_>>(),
            vec![ModeOfInheritance::AutosomalDominant, ModeOfInheritance::XRecessive]
        );
        assert_eq!(checker.calls(), 3);
    }

    #[test]
    fn test_genotype_table_follows_pedigree_order() {
        let checker = MockSegregationChecker::new();
        let pedigree = trio();
        let analyser = InheritanceAnalyser::new(&checker, &pedigree);

        // calls deliberately listed in a different order from the pedigree
        let variant = VariantBuilder::new(CHROMOSOME_X, 100)
            .sample("mother", Genotype::Heterozygous)
            .proband(Genotype::HomozygousAlt)
            .build();
        let skipped = VariantBuilder::new(CHROMOSOME_X, 200).failed().build();
        let g = gene("GENE1", 1, vec![skipped, variant], &[]);

        let list = analyser.genotype_list(&g).unwrap();
        assert!(list.is_x_chromosomal);
        assert_eq!(list.gene_symbol, "GENE1");
        assert_eq!(
            list.rows,
            vec![vec![Genotype::HomozygousAlt, Genotype::NotObserved, Genotype::Heterozygous]]
        );
        assert_eq!(pedigree.names().next(), Some(PROBAND));
    }

    #[test]
    fn test_checker_failure_is_fatal() {
        let checker = MockSegregationChecker::new()
            .with(ModeOfInheritance::AutosomalDominant)
            .failing_on(ModeOfInheritance::AutosomalRecessive);
        let pedigree = trio();
        let analyser = InheritanceAnalyser::new(&checker, &pedigree);
        let mut g = gene("GENE1", 1, vec![VariantBuilder::new(1, 100).build()], &[]);

        let err = analyser.analyse_into(&mut g).unwrap_err();
        assert!(matches!(
            err,
            GenorankError::Segregation { ref gene, mode: ModeOfInheritance::AutosomalRecessive, .. }
                if gene == "GENE1"
        ));
        assert!(g.inheritance_modes.is_empty());
    }

    #[test]
    fn test_analyse_into_stores_modes() {
        let checker = MockSegregationChecker::new().with(ModeOfInheritance::AutosomalRecessive);
        let pedigree = trio();
        let analyser = InheritanceAnalyser::new(&checker, &pedigree);
        let mut g = gene("GENE1", 1, vec![VariantBuilder::new(1, 100).build()], &[]);

        analyser.analyse_into(&mut g).unwrap();
        assert!(g.is_compatible_with(ModeOfInheritance::AutosomalRecessive));
        assert!(!g.is_compatible_with(ModeOfInheritance::AutosomalDominant));
    }
}
