use std::fmt;

use serde::{Deserialize, Serialize};

/// Mendelian inheritance modes evaluated by the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeOfInheritance {
    AutosomalDominant,
    AutosomalRecessive,
    XRecessive,
}

impl ModeOfInheritance {
    pub const ALL: [ModeOfInheritance; 3] = [
        ModeOfInheritance::AutosomalDominant,
        ModeOfInheritance::AutosomalRecessive,
        ModeOfInheritance::XRecessive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeOfInheritance::AutosomalDominant  => "autosomal_dominant",
            ModeOfInheritance::AutosomalRecessive => "autosomal_recessive",
            ModeOfInheritance::XRecessive         => "x_recessive",
        }
    }
}

impl fmt::Display for ModeOfInheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
