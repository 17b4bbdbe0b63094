//! Binary assignments returned by optimizer backends.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// One bit per QUBO variable: 0 places the item in the keep group, 1 in the
/// trade group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Assignment(Vec<u8>);

impl Assignment {
    /// Validate and wrap raw bits.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBit`] if any entry is not 0 or 1.
    pub fn try_new(bits: Vec<u8>) -> Result<Self, DomainError> {
        if let Some((index, &value)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(DomainError::InvalidBit { index, value });
        }
        Ok(Self(bits))
    }

    /// All-zero assignment of length `n`.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self(vec![0; n])
    }

    /// Assignment whose bit `i` is bit `i` of `value`.
    #[must_use]
    pub fn from_bits_of(value: u64, n: usize) -> Self {
        Self((0..n).map(|i| ((value >> i) & 1) as u8).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bit at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Raw bits.
    #[must_use]
    pub fn bits(&self) -> &[u8] {
        &self.0
    }

    /// Flip bit `index` in place.
    pub fn flip(&mut self, index: usize) {
        self.0[index] ^= 1;
    }

    /// The complementary assignment; it cuts exactly the same edges.
    #[must_use]
    pub fn complement(&self) -> Self {
        Self(self.0.iter().map(|b| b ^ 1).collect())
    }
}

impl TryFrom<Vec<u8>> for Assignment {
    type Error = DomainError;

    fn try_from(bits: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_new(bits)
    }
}

impl From<Assignment> for Vec<u8> {
    fn from(assignment: Assignment) -> Self {
        assignment.0
    }
}

impl FromIterator<bool> for Assignment {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().map(u8::from).collect())
    }
}

/// A solution reported by an optimizer: the assignment and its energy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub assignment: Assignment,
    pub energy: f64,
}

impl Sample {
    /// The trivial sample of a zero-variable problem.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            assignment: Assignment::default(),
            energy: 0.0,
        }
    }
}
