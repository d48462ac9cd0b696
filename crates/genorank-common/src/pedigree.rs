//! Family structure for segregation analysis.
//!
//! The order of individuals is fixed at construction and defines the column
//! order of every genotype table built from this pedigree.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{GenorankError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectionStatus {
    Affected,
    Unaffected,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub name: String,
    pub sex: Sex,
    pub status: AffectionStatus,
    pub father: Option<String>,
    pub mother: Option<String>,
}

impl Individual {
    pub fn new(name: &str, sex: Sex, status: AffectionStatus) -> Self {
        Self {
            name: name.to_string(),
            sex,
            status,
            father: None,
            mother: None,
        }
    }

    pub fn with_parents(mut self, father: Option<&str>, mother: Option<&str>) -> Self {
        self.father = father.map(str::to_string);
        self.mother = mother.map(str::to_string);
        self
    }

    pub fn is_affected(&self) -> bool {
        self.status == AffectionStatus::Affected
    }

    pub fn is_founder(&self) -> bool {
        self.father.is_none() && self.mother.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pedigree {
    individuals: Vec<Individual>,
}

impl Pedigree {
    /// Build a pedigree, rejecting empty families, duplicate names and
    /// parents that are not themselves members.
    pub fn new(individuals: Vec<Individual>) -> Result<Self> {
        if individuals.is_empty() {
            return Err(GenorankError::EmptyPedigree);
        }

        let mut names = HashSet::with_capacity(individuals.len());
        for individual in &individuals {
            if !names.insert(individual.name.as_str()) {
                return Err(GenorankError::DuplicateIndividual(individual.name.clone()));
            }
        }

        for individual in &individuals {
            for parent in [&individual.father, &individual.mother].into_iter().flatten() {
                if !names.contains(parent.as_str()) {
                    return Err(GenorankError::UnknownParent {
                        individual: individual.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        Ok(Self { individuals })
    }

    /// Pedigree of one affected individual of unknown sex.
    pub fn single_sample(name: &str) -> Self {
        Self {
            individuals: vec![Individual::new(name, Sex::Unknown, AffectionStatus::Affected)],
        }
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.individuals.iter().map(|i| i.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Individual> {
        self.individuals.iter().find(|i| i.name == name)
    }

    pub fn affected(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter().filter(|i| i.is_affected())
    }

    pub fn unaffected(&self) -> impl Iterator<Item = &Individual> {
        self.individuals
            .iter()
            .filter(|i| i.status == AffectionStatus::Unaffected)
    }
}
