//! Thin re-export so call sites in this crate read `crate::patch::apply_patch`
//! rather than reaching into `mem_core` directly everywhere.

pub use mem_core::model::apply_patch;
