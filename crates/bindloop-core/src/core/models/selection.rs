use super::structure::Structure;
use std::fmt;

/// Refers to a chain either by its ordinal position in the file or by its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainRef {
    Index(usize),
    Label(char),
}

impl ChainRef {
    fn matches(&self, structure: &Structure, chain_index: usize) -> bool {
        match *self {
            ChainRef::Index(index) => index == chain_index,
            ChainRef::Label(label) => structure
                .chain(chain_index)
                .is_some_and(|chain| chain.label == label),
        }
    }
}

impl fmt::Display for ChainRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainRef::Index(index) => write!(f, "{}", index),
            ChainRef::Label(label) => write!(f, "'{}'", label),
        }
    }
}

/// Inclusive range of residue sequence numbers, as written in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueRange {
    pub start: isize,
    pub end: isize,
}

impl ResidueRange {
    pub fn new(start: isize, end: isize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, number: isize) -> bool {
        self.start <= number && number <= self.end
    }
}

/// Selects atoms by chain, atom name and residue number.
///
/// Every criterion is a conjunction; an empty list places no restriction. The default
/// selection therefore matches every atom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomSelection {
    pub chains: Vec<ChainRef>,
    pub atom_names: Vec<String>,
    pub residue_range: Option<ResidueRange>,
}

impl AtomSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn chains(chains: impl IntoIterator<Item = ChainRef>) -> Self {
        Self {
            chains: chains.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_atom_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.atom_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_residue_range(mut self, start: isize, end: isize) -> Self {
        self.residue_range = Some(ResidueRange::new(start, end));
        self
    }

    /// Returns the indices of matching atoms in file order.
    pub fn select(&self, structure: &Structure) -> Vec<usize> {
        structure
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, atom)| {
                self.atom_names.is_empty() || self.atom_names.iter().any(|n| n == &atom.name)
            })
            .filter_map(|(index, atom)| {
                let residue = structure.residue(atom.residue_index)?;
                let chain_ok = self.chains.is_empty()
                    || self
                        .chains
                        .iter()
                        .any(|c| c.matches(structure, residue.chain_index));
                let range_ok = self
                    .residue_range
                    .is_none_or(|range| range.contains(residue.number));
                (chain_ok && range_ok).then_some(index)
            })
            .collect()
    }
}

impl fmt::Display for AtomSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut clauses = Vec::new();
        if !self.chains.is_empty() {
            let chains: Vec<String> = self.chains.iter().map(ToString::to_string).collect();
            clauses.push(format!("chain {}", chains.join(" ")));
        }
        if !self.atom_names.is_empty() {
            clauses.push(format!("name {}", self.atom_names.join(" ")));
        }
        if let Some(range) = self.residue_range {
            clauses.push(format!("residue {} to {}", range.start, range.end));
        }
        if clauses.is_empty() {
            write!(f, "all")
        } else {
            write!(f, "{}", clauses.join(" and "))
        }
    }
}
