use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Strand a read was aligned to.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strand {
    Forward,
    Reverse,
    Unstranded,
}

impl FromStr for Strand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "." => Ok(Strand::Unstranded),
            _ => Err(ValidationError::InvalidStrand(s.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unstranded => '.',
        };
        write!(f, "{}", c)
    }
}

///
/// One aligned read, zero-based half-open `[start, end)`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReadInterval {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
}

impl ReadInterval {
    pub fn new(chr: impl Into<String>, start: u32, end: u32, strand: Strand) -> Self {
        ReadInterval {
            chr: chr.into(),
            start,
            end,
            strand,
        }
    }

    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn mid_point(&self) -> u32 {
        self.start + self.width() / 2
    }

    /// Check the interval is non-empty and fits a chromosome of `chrom_size` bases.
    pub fn validate(&self, chrom_size: u32) -> Result<(), ValidationError> {
        if self.start >= self.end {
            return Err(ValidationError::InvertedInterval {
                chr: self.chr.clone(),
                start: self.start,
                end: self.end,
            });
        }
        if self.end > chrom_size {
            return Err(ValidationError::OutOfRange {
                chr: self.chr.clone(),
                start: self.start,
                end: self.end,
                size: chrom_size,
            });
        }
        Ok(())
    }

    ///
    /// Position this read is counted at.
    ///
    /// The 5' end (the midpoint for unstranded reads) moved `shift` bases
    /// towards the 3' end, clamped into the chromosome. Assumes the read
    /// passed [`ReadInterval::validate`].
    pub fn anchor(&self, shift: u32, chrom_size: u32) -> u32 {
        let last = chrom_size.saturating_sub(1);
        match self.strand {
            Strand::Forward => self.start.saturating_add(shift).min(last),
            Strand::Reverse => (self.end - 1).saturating_sub(shift),
            Strand::Unstranded => self.mid_point().min(last),
        }
    }
}

impl Display for ReadInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.chr, self.start, self.end, self.strand
        )
    }
}
