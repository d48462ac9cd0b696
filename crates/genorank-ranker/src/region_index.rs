//! Per-chromosome interval index over chromosomal regions.
//!
//! Regions are stored in one `COITree` per chromosome. The tree node
//! carries the position of the region in `regions`, so a query returns
//! references into the owned collection.
//!
//! Coordinates follow the zero-based half-open convention internally:
//! a region `start..=end` (1-based) becomes `[start - 1, end)`. COITree
//! intervals are closed, so the stored node is `[start - 1, end - 1]`,
//! and a 1-based query position `p` is looked up as `p - 1`.

use std::collections::HashMap;

use coitrees::{COITree, IntervalNode, IntervalTree};
use genorank_common::error::{GenorankError, Result};
use genorank_common::region::{validate_region, ChromosomalRegion, MAX_POSITION};
use genorank_common::Variant;
use tracing::debug;

pub struct RegionIndex<T> {
    regions: Vec<T>,
    trees: HashMap<u8, COITree<usize, u32>>,
}

impl<T: ChromosomalRegion> RegionIndex<T> {
    /// Build the index, failing on the first malformed region.
    pub fn new(regions: impl IntoIterator<Item = T>) -> Result<Self> {
        let regions: Vec<T> = regions.into_iter().collect();
        let mut nodes_by_chrom: HashMap<u8, Vec<IntervalNode<usize, u32>>> = HashMap::new();

        for (i, region) in regions.iter().enumerate() {
            validate_region(region.chromosome(), region.start(), region.end())?;

            let zero_start = region.start().saturating_sub(1);
            let half_open_end = region.end();
            // closed interval for COITree
            let last = half_open_end.saturating_sub(1).max(zero_start);
            let (Ok(first), Ok(last)) = (i32::try_from(zero_start), i32::try_from(last)) else {
                return Err(GenorankError::InvalidRegion {
                    chromosome: region.chromosome(),
                    start: region.start(),
                    end: region.end(),
                });
            };

            nodes_by_chrom
                .entry(region.chromosome())
                .or_default()
                .push(IntervalNode::new(first, last, i));
        }

        let mut trees = HashMap::with_capacity(nodes_by_chrom.len());
        for (chromosome, nodes) in nodes_by_chrom {
            trees.insert(chromosome, COITree::new(&nodes));
        }

        debug!(
            "Built region index: {} regions on {} chromosomes",
            regions.len(),
            trees.len()
        );

        Ok(Self { regions, trees })
    }

    /// All regions on `chromosome` containing the 1-based `position`.
    ///
    /// Unknown chromosomes, position 0 and positions past `MAX_POSITION`
    /// yield an empty list. Results are ordered by insertion order of the
    /// regions.
    pub fn regions_overlapping(&self, chromosome: u8, position: u32) -> Vec<&T> {
        let Some(tree) = self.trees.get(&chromosome) else {
            return Vec::new();
        };
        if position == 0 || position > MAX_POSITION {
            return Vec::new();
        }
        let Ok(zero_based) = i32::try_from(position - 1) else {
            return Vec::new();
        };

        let mut hits: Vec<usize> = Vec::new();
        tree.query(zero_based, zero_based, |node| {
            hits.push(node.metadata.to_owned());
        });
        hits.sort_unstable();
        hits.into_iter().map(|i| &self.regions[i]).collect()
    }

    pub fn regions_overlapping_variant(&self, variant: &Variant) -> Vec<&T> {
        self.regions_overlapping(variant.chromosome, variant.position)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Chromosomes holding at least one region, ascending.
    pub fn chromosomes(&self) -> Vec<u8> {
        let mut chromosomes: Vec<u8> = self.trees.keys().copied().collect();
        chromosomes.sort_unstable();
        chromosomes
    }

    pub fn regions(&self) -> &[T] {
        &self.regions
    }
}

impl<T> std::fmt::Debug for RegionIndex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionIndex")
            .field("regions", &self.regions.len())
            .field("chromosomes", &self.trees.len())
            .finish()
    }
}
