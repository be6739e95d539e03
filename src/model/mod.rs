//! The in-memory program model.
//!
//! This module holds the entity layer every other part of the crate works against: the
//! [`ProgramRepository`] root container, mutable [`ProgramClass`] / [`ProgramField`] /
//! [`ProgramMethod`] entities, their read-only library counterparts, the typed
//! [`Attribute`] model, and the flat [`Instruction`] sequence representation.
//!
//! # Ownership and sharing
//!
//! Entities are handed out as `Arc` handles (`ProgramClassRc` and friends) with interior
//! mutability, so a handle obtained before a mutation still observes it afterwards -
//! renaming a class and renaming it back restores the exact same object. Collection
//! accessors return owned snapshots; iterating a snapshot while the entity mutates is
//! always safe.
//!
//! # Name-keyed references
//!
//! Cross-entity references (a member's owner, a class's supertype, operand targets) are
//! stored as qualified-name strings resolved through the repository on demand, never as
//! live pointers. Keeping those strings consistent under renames is split between the
//! container (re-keying, owner back-references) and the transform engine (references held
//! by *other* classes).

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

mod attribute;
mod class;
mod descriptor;
mod field;
mod flags;
mod instruction;
mod method;
mod repository;

pub use attribute::{Attribute, BootstrapMethod, MethodParameter};
pub use class::{InnerClass, LibraryClass, LibraryClassRc, ProgramClass, ProgramClassRc};
pub use descriptor::object_types;
pub use field::{ConstantValue, LibraryField, LibraryFieldRc, ProgramField, ProgramFieldRc};
pub use flags::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
pub use instruction::{
    opcode_name, opcodes, ConstantOperand, Instruction, LabelId, Operand, OperandKind, NO_OPCODE,
};
pub use method::{
    ExceptionHandler, LibraryMethod, LibraryMethodRc, LineNumber, LocalVariable, ProgramMethod,
    ProgramMethodRc,
};
pub use repository::ProgramRepository;

/// Acquires a read guard, recovering the data from a poisoned lock.
///
/// Entity state is plain data behind the lock; a panicking writer cannot leave it in a
/// state a reader can't handle, so poisoning is not propagated.
pub(crate) fn lock_read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Acquires a write guard, recovering the data from a poisoned lock.
pub(crate) fn lock_write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}
