#[cfg(feature = "core")]
#[doc(inline)]
pub use triform_core as core;

#[cfg(feature = "peaks")]
#[doc(inline)]
pub use triform_peaks as peaks;
