//! Topological domain lookup for variants.

use genorank_common::error::Result;
use genorank_common::{TopologicalDomain, Variant};
use tracing::info;

use crate::region_index::RegionIndex;

#[derive(Debug)]
pub struct DomainIndex {
    index: RegionIndex<TopologicalDomain>,
}

impl DomainIndex {
    pub fn new(domains: impl IntoIterator<Item = TopologicalDomain>) -> Result<Self> {
        let index = RegionIndex::new(domains)?;
        info!(
            "Indexed {} topological domains across {} chromosomes",
            index.len(),
            index.chromosomes().len()
        );
        Ok(Self { index })
    }

    /// Domains whose span contains the variant's position.
    pub fn domains_overlapping(&self, variant: &Variant) -> Vec<&TopologicalDomain> {
        self.index.regions_overlapping_variant(variant)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
