#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LabId(pub usize);

/// A lab section, derived from the students whose `lab` field carries its code.
#[derive(Clone, Debug)]
pub struct Lab {
    pub id: LabId,
    pub code: String,
    pub population: usize,
}
