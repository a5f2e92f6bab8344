//! Data-driven content for the skirmish core.
//!
//! Currently this is the tunable [`GameConfig`](skirmish_core::GameConfig),
//! read from TOML. Every peer of a session must load the same file.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult};
