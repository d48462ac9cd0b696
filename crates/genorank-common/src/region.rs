//! Chromosomal regions and topological domains.
//!
//! Coordinates are 1-based and fully closed, so a region `chr1:100-200`
//! covers both position 100 and position 200. Chromosomes are numbered
//! 1..=25 with X, Y and MT mapped to 23, 24 and 25.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GenorankError, Result};

pub const CHROMOSOME_X: u8 = 23;
pub const CHROMOSOME_Y: u8 = 24;
pub const CHROMOSOME_MT: u8 = 25;
pub const MAX_CHROMOSOME: u8 = CHROMOSOME_MT;

/// Largest position an indexed region may cover.
pub const MAX_POSITION: u32 = i32::MAX as u32;

/// Anything that occupies a closed, 1-based span on one chromosome.
pub trait ChromosomalRegion {
    fn chromosome(&self) -> u8;

    /// First covered position (1-based, inclusive).
    fn start(&self) -> u32;

    /// Last covered position (1-based, inclusive).
    fn end(&self) -> u32;

    fn contains(&self, chromosome: u8, position: u32) -> bool {
        self.chromosome() == chromosome && self.start() <= position && position <= self.end()
    }
}

/// Check the region invariants: a known chromosome, `start <= end` and
/// `end <= MAX_POSITION`.
pub fn validate_region(chromosome: u8, start: u32, end: u32) -> Result<()> {
    if chromosome == 0 || chromosome > MAX_CHROMOSOME {
        return Err(GenorankError::InvalidChromosome(chromosome));
    }
    if start > end || end > MAX_POSITION {
        return Err(GenorankError::InvalidRegion { chromosome, start, end });
    }
    Ok(())
}

/// Plain region with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicRegion {
    chromosome: u8,
    start: u32,
    end: u32,
}

impl GenomicRegion {
    pub fn new(chromosome: u8, start: u32, end: u32) -> Result<Self> {
        validate_region(chromosome, start, end)?;
        Ok(Self { chromosome, start, end })
    }
}

impl ChromosomalRegion for GenomicRegion {
    fn chromosome(&self) -> u8 {
        self.chromosome
    }

    fn start(&self) -> u32 {
        self.start
    }

    fn end(&self) -> u32 {
        self.end
    }
}

/// Topologically associating domain (TAD).
///
/// Owns the symbol → gene id mapping of every gene considered inside the
/// domain. The mapping is ordered by symbol, which gives callers a stable
/// iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologicalDomain {
    region: GenomicRegion,
    genes: BTreeMap<String, u32>,
}

impl TopologicalDomain {
    pub fn new(
        chromosome: u8,
        start: u32,
        end: u32,
        genes: impl IntoIterator<Item = (String, u32)>,
    ) -> Result<Self> {
        Ok(Self {
            region: GenomicRegion::new(chromosome, start, end)?,
            genes: genes.into_iter().collect(),
        })
    }

    /// Gene symbol → gene id for every gene inside the domain.
    pub fn genes(&self) -> &BTreeMap<String, u32> {
        &self.genes
    }

    pub fn gene_symbols(&self) -> impl Iterator<Item = &str> {
        self.genes.keys().map(String::as_str)
    }
}

impl ChromosomalRegion for TopologicalDomain {
    fn chromosome(&self) -> u8 {
        self.region.chromosome
    }

    fn start(&self) -> u32 {
        self.region.start
    }

    fn end(&self) -> u32 {
        self.region.end
    }
}
