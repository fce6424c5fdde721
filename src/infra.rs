//! Supporting infrastructure that is not part of the graph semantics:
//! structural consistency checking for tests and fuzzing, and the
//! `arbitrary`-driven mutation-op model (feature `arbitrary`).

#[cfg(feature = "arbitrary")]
pub mod arbitrary;
pub mod testing;
