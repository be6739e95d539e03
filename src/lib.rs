// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # jarscope
//!
//! An in-memory program model plus analysis/transformation engine for JVM bytecode - the kind of
//! substrate used by deobfuscators, optimizers, and static analyzers. Built in pure Rust,
//! `jarscope` models a compiled program as a mutable repository of classes, members, and linear
//! instruction sequences, and provides the analyses and transformations that operate on it.
//!
//! ## Features
//!
//! - **🗂 Mutable program model** - Program classes, read-only library classes, and opaque
//!   resources keyed by qualified name, with thread-safe per-map access
//! - **🔍 Dependency analysis** - Reference-graph construction, topological ordering, and
//!   circular-dependency detection
//! - **🧹 Unused/dead-code analysis** - Entry-point heuristics, reference closures, complexity
//!   estimation, and reachability-based dead-instruction detection
//! - **🔧 Transformation engine** - Staged class/field/method renames with full internal
//!   reference fixups, plus predicate-driven instruction edit primitives
//! - **🧩 Plugin pipeline** - Priority-ordered, independently-failing transformation units with
//!   an init→process→cleanup lifecycle
//!
//! ## Quick Start
//!
//! ```rust
//! use jarscope::prelude::*;
//!
//! let repo = ProgramRepository::new();
//! repo.add_class(ProgramClass::new("com/example/Main"));
//!
//! let analyzer = DependencyAnalyzer::new();
//! let graph = analyzer.build_dependency_graph(&repo);
//! println!("{} classes analyzed", graph.len());
//! ```
//!
//! ## Architecture
//!
//! `jarscope` is organized into several key modules:
//!
//! - [`model`] - The program repository and the class/member/attribute/instruction model
//! - [`analysis`] - Read-only derived views: dependency graphs and unused/dead-code reports
//! - [`transform`] - The rename-and-fixup engine and instruction edit primitives
//! - [`plugin`] - The plugin trait, configuration surface, and pipeline manager
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ## Scope
//!
//! The binary bytecode codec (decoding raw class bytes into this model and re-encoding mutated
//! state, including stack-size/frame recomputation) and container/archive I/O are external
//! collaborators: the model accepts decoded headers and member tables, and hands back
//! structurally-equivalent mutated state. Resources pass through as opaque byte blobs.
//!
//! ## Concurrency
//!
//! The repository's maps tolerate concurrent reads and writes from independent operations,
//! enabling parallel per-class analysis. Single operations are atomic; composite sequences
//! (rename-then-relookup and the like) are not linearizable across threads and must be
//! serialized externally. The intended discipline is one exclusive analyze→transform cycle at
//! a time, with read-only analyzer passes parallelized internally.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Analyzer read paths are total:
//! an empty repository yields empty results, and lookups of absent names return `None` or are
//! silent no-ops rather than failures.

pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types from across the
/// jarscope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use jarscope::prelude::*;
///
/// let repo = ProgramRepository::new();
/// assert_eq!(repo.total_class_count(), 0);
/// ```
pub mod prelude;

/// The program model: repository, classes, members, attributes, and instructions.
///
/// This module owns all mutable program state:
///
/// - [`model::ProgramRepository`] - name-keyed program classes, library classes, and resources
/// - [`model::ProgramClass`] / [`model::LibraryClass`] - class entities with member tables
/// - [`model::ProgramField`] / [`model::ProgramMethod`] - members with attribute bags
/// - [`model::Instruction`] - opcode plus decoded operand payload
/// - [`model::Attribute`] - closed enum of typed attribute records
pub mod model;

/// Read-only derived analyses over the program model.
///
/// Produces ephemeral views - dependency graphs, unused-code reports, complexity estimates -
/// that are rebuilt on demand and never stored in the model. All entry points are total:
/// an empty repository yields empty results.
pub mod analysis;

/// The transformation engine: staged renames with reference fixups, and instruction editing.
pub mod transform;

/// The plugin pipeline: plugin trait, configuration surface, and priority-ordered manager.
pub mod plugin;

pub use error::Error;

/// Result type alias for all jarscope operations.
pub type Result<T> = std::result::Result<T, Error>;
