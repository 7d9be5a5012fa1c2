use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};

use crate::models::{ReadInterval, Strand};

///
/// ReadSet struct, the aligned reads of one sample (or several pooled
/// replicates of it).
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadSet {
    pub reads: Vec<ReadInterval>,
}

impl From<Vec<ReadInterval>> for ReadSet {
    fn from(reads: Vec<ReadInterval>) -> Self {
        ReadSet { reads }
    }
}

impl FromIterator<ReadInterval> for ReadSet {
    fn from_iter<T: IntoIterator<Item = ReadInterval>>(iter: T) -> Self {
        ReadSet {
            reads: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ReadSet {
    type Item = &'a ReadInterval;
    type IntoIter = std::slice::Iter<'a, ReadInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl ReadSet {
    ///
    /// Pool replicates into a single read set.
    ///
    pub fn pool(sets: &[ReadSet]) -> ReadSet {
        sets.iter().flat_map(|s| s.reads.iter().cloned()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReadInterval> {
        self.reads.iter()
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    ///
    /// Iterate unique chromosomes, in order of first appearance
    ///
    pub fn iter_chroms(&self) -> impl Iterator<Item = &String> {
        let mut seen = HashSet::new();
        self.reads
            .iter()
            .map(|r| &r.chr)
            .filter(move |chr| seen.insert(*chr))
    }

    pub fn iter_chr_reads<'a>(&'a self, chr: &'a str) -> impl Iterator<Item = &'a ReadInterval> {
        self.reads.iter().filter(move |r| r.chr == chr)
    }

    ///
    /// Group reads by chromosome, keeping their relative order.
    ///
    pub fn by_chrom(&self) -> HashMap<&str, Vec<&ReadInterval>> {
        let mut grouped: HashMap<&str, Vec<&ReadInterval>> = HashMap::new();
        for read in &self.reads {
            grouped.entry(read.chr.as_str()).or_default().push(read);
        }
        grouped
    }

    /// Number of reads on each strand: (forward, reverse, unstranded).
    pub fn strand_counts(&self) -> (usize, usize, usize) {
        self.reads
            .iter()
            .fold((0, 0, 0), |(f, r, u), read| match read.strand {
                Strand::Forward => (f + 1, r, u),
                Strand::Reverse => (f, r + 1, u),
                Strand::Unstranded => (f, r, u + 1),
            })
    }
}

impl Display for ReadSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} reads", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn reads() -> ReadSet {
        ReadSet::from(vec![
            ReadInterval::new("chr2", 50, 100, Strand::Forward),
            ReadInterval::new("chr1", 30, 80, Strand::Reverse),
            ReadInterval::new("chr2", 10, 60, Strand::Reverse),
            ReadInterval::new("chr1", 5, 55, Strand::Unstranded),
        ])
    }

    #[rstest]
    fn test_iter_chroms(reads: ReadSet) {
        let chroms: Vec<&String> = reads.iter_chroms().collect();
        assert_eq!(chroms, vec!["chr2", "chr1"]);
    }

    #[rstest]
    fn test_iter(reads: ReadSet) {
        let starts: Vec<(&str, u32)> = reads.iter().map(|r| (r.chr.as_str(), r.start)).collect();
        assert_eq!(
            starts,
            vec![("chr2", 50), ("chr1", 30), ("chr2", 10), ("chr1", 5)]
        );
        assert_eq!((&reads).into_iter().count(), 4);
        assert_eq!(reads.to_string(), "4 reads");
    }

    #[rstest]
    fn test_by_chrom(reads: ReadSet) {
        let grouped = reads.by_chrom();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["chr2"].len(), 2);
        assert_eq!(grouped["chr2"][0].start, 50);
        assert_eq!(reads.iter_chr_reads("chr1").count(), 2);
    }

    #[rstest]
    fn test_pool_and_strand_counts(reads: ReadSet) {
        let pooled = ReadSet::pool(&[reads.clone(), reads]);
        assert_eq!(pooled.len(), 8);
        assert_eq!(pooled.strand_counts(), (2, 4, 2));
        assert!(ReadSet::default().is_empty());
    }
}
