use nalgebra::Point3;

/// An atom of a predicted structure.
///
/// Positions are stored in nanometres. The atom knows the ordinal index of its parent
/// residue, which is also the row/column used for that residue in the pairwise error
/// matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "CB").
    pub name: String,
    /// Element symbol (e.g., "C", "N").
    pub element: String,
    /// The 3D coordinates of the atom in nanometres.
    pub position: Point3<f64>,
    /// Ordinal index of the parent residue within the structure.
    pub residue_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                // Residue sequence number from the source file
    pub insertion_code: Option<char>, // PDB insertion code, if any
    pub name: String,                 // Residue name (e.g., "ALA")
    pub chain_index: usize,           // Ordinal index of the parent chain
    pub(crate) atoms: Vec<usize>,     // Ordinal indices of the residue's atoms
}

impl Residue {
    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub label: char,                 // Chain identifier from the source file (e.g., 'A')
    pub(crate) residues: Vec<usize>, // Ordinal indices of the chain's residues
}

impl Chain {
    pub fn residues(&self) -> &[usize] {
        &self.residues
    }
}

/// A read-only predicted complex: atoms, the atom→residue mapping and the
/// residue→chain mapping.
///
/// Residues and chains are addressed by their ordinal position in the source file. Two
/// chains may share a label (for example after a `TER` record), so chains are always
/// identified by index internally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<Atom>,
    residues: Vec<Residue>,
    chains: Vec<Chain>,
}

impl Structure {
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn chain(&self, index: usize) -> Option<&Chain> {
        self.chains.get(index)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of residues, i.e. the dimension a matching pairwise error matrix must have.
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Returns the chain index owning the given atom.
    pub fn chain_of_atom(&self, atom_index: usize) -> Option<usize> {
        let atom = self.atoms.get(atom_index)?;
        self.residues
            .get(atom.residue_index)
            .map(|residue| residue.chain_index)
    }
}

/// Incrementally assembles a [`Structure`] in file order.
///
/// Chains and residues are opened explicitly; atoms are appended to the residue opened
/// last. This mirrors how coordinate files are read record by record.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    structure: Structure,
    current_chain: Option<usize>,
    current_residue: Option<usize>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new chain. Subsequent residues belong to it.
    pub fn start_chain(&mut self, label: char) -> usize {
        let index = self.structure.chains.len();
        self.structure.chains.push(Chain {
            label,
            residues: Vec::new(),
        });
        self.current_chain = Some(index);
        self.current_residue = None;
        index
    }

    /// Opens a new residue in the current chain, opening chain `'A'` if none is open.
    pub fn start_residue(
        &mut self,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> usize {
        let chain_index = match self.current_chain {
            Some(index) => index,
            None => self.start_chain('A'),
        };
        let index = self.structure.residues.len();
        self.structure.residues.push(Residue {
            number,
            insertion_code,
            name: name.to_string(),
            chain_index,
            atoms: Vec::new(),
        });
        self.structure.chains[chain_index].residues.push(index);
        self.current_residue = Some(index);
        index
    }

    /// Appends an atom to the current residue.
    ///
    /// Returns `None` if no residue has been opened yet.
    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        element: &str,
        position: Point3<f64>,
    ) -> Option<usize> {
        let residue_index = self.current_residue?;
        let index = self.structure.atoms.len();
        self.structure.atoms.push(Atom {
            serial,
            name: name.to_string(),
            element: element.to_string(),
            position,
            residue_index,
        });
        self.structure.residues[residue_index].atoms.push(index);
        Some(index)
    }

    pub fn current_residue(&self) -> Option<&Residue> {
        self.current_residue
            .and_then(|index| self.structure.residues.get(index))
    }

    pub fn current_chain(&self) -> Option<&Chain> {
        self.current_chain
            .and_then(|index| self.structure.chains.get(index))
    }

    pub fn build(self) -> Structure {
        self.structure
    }
}
