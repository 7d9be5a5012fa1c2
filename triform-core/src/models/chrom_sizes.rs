use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::utils::sort_chroms;

///
/// Chromosome name to length, the genome that gets binned.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChromSizes {
    sizes: HashMap<String, u32>,
}

impl From<HashMap<String, u32>> for ChromSizes {
    fn from(sizes: HashMap<String, u32>) -> Self {
        ChromSizes { sizes }
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for ChromSizes {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        ChromSizes {
            sizes: iter.into_iter().map(|(chr, size)| (chr.into(), size)).collect(),
        }
    }
}

impl ChromSizes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chr: impl Into<String>, size: u32) -> Option<u32> {
        self.sizes.insert(chr.into(), size)
    }

    pub fn get(&self, chr: &str) -> Option<u32> {
        self.sizes.get(chr).copied()
    }

    pub fn contains(&self, chr: &str) -> bool {
        self.sizes.contains_key(chr)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of all chromosome lengths.
    pub fn total_length(&self) -> u64 {
        self.sizes.values().map(|&s| s as u64).sum()
    }

    /// Chromosome names in karyotypic order.
    pub fn chroms(&self) -> Vec<&str> {
        let mut chroms: Vec<&str> = self.sizes.keys().map(|k| k.as_str()).collect();
        sort_chroms(&mut chroms);
        chroms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_chrom_sizes() {
        let mut sizes: ChromSizes = [("chr2", 500), ("chrX", 300), ("chr1", 1000)]
            .into_iter()
            .collect();
        assert_eq!(sizes.chroms(), vec!["chr1", "chr2", "chrX"]);
        assert_eq!(sizes.total_length(), 1800);
        assert_eq!(sizes.get("chr2"), Some(500));
        assert_eq!(sizes.get("chr3"), None);

        assert_eq!(sizes.insert("chr2", 600), Some(500));
        assert!(sizes.contains("chr2"));
        assert_eq!(sizes.len(), 3);
    }
}
