pub mod chrom_sizes;
pub mod read;
pub mod read_set;

// re-export for cleaner imports
pub use self::chrom_sizes::ChromSizes;
pub use self::read::{ReadInterval, Strand};
pub use self::read_set::ReadSet;
