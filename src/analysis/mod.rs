//! Read-only analyses over the program model.
//!
//! Analyzers never mutate the repository and never fail: lookups that miss contribute
//! nothing and results are plain owned snapshots. Everything here is syntactic - computed
//! from declarations and instruction operands as they sit in the model - so results are
//! under-approximations of runtime behavior, suitable for guiding transformations and
//! reporting, not for proving code removable.

mod dependencies;
mod unused;

pub use dependencies::DependencyAnalyzer;
pub use unused::UnusedCodeAnalyzer;
