use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty or inverted interval: {chr}:{start}-{end}")]
    InvertedInterval { chr: String, start: u32, end: u32 },

    #[error("Interval {chr}:{start}-{end} extends past the end of the chromosome ({size} bp)")]
    OutOfRange {
        chr: String,
        start: u32,
        end: u32,
        size: u32,
    },

    #[error("Interval {chr}:{start}-{end} is on a chromosome without a known size")]
    UnknownChromosome { chr: String, start: u32, end: u32 },

    #[error("Can't parse strand: {0}")]
    InvalidStrand(String),
}

impl ValidationError {
    /// Chromosome the offending interval sits on, if any.
    pub fn chr(&self) -> Option<&str> {
        match self {
            ValidationError::InvertedInterval { chr, .. }
            | ValidationError::OutOfRange { chr, .. }
            | ValidationError::UnknownChromosome { chr, .. } => Some(chr),
            ValidationError::InvalidStrand(_) => None,
        }
    }
}
