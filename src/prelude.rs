//! # jarscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the jarscope library. Import this module to get quick access to the essential
//! types for program analysis and transformation.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all jarscope operations
pub use crate::Error;

/// The result type used throughout jarscope
pub use crate::Result;

// ================================================================================================
// Program Model
// ================================================================================================

/// The root container for a loaded program
pub use crate::model::ProgramRepository;

/// Class entities and their shared handles
pub use crate::model::{
    InnerClass, LibraryClass, LibraryClassRc, ProgramClass, ProgramClassRc,
};

/// Member entities and their shared handles
pub use crate::model::{
    ConstantValue, LibraryField, LibraryFieldRc, LibraryMethod, LibraryMethodRc, ProgramField,
    ProgramFieldRc, ProgramMethod, ProgramMethodRc,
};

/// Method body metadata
pub use crate::model::{ExceptionHandler, LineNumber, LocalVariable};

/// The typed attribute model
pub use crate::model::{Attribute, BootstrapMethod, MethodParameter};

/// Instructions, operands, and the opcode table
pub use crate::model::{
    opcode_name, opcodes, ConstantOperand, Instruction, LabelId, Operand, OperandKind, NO_OPCODE,
};

/// Access-flag bitflag types
pub use crate::model::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};

// ================================================================================================
// Analysis
// ================================================================================================

/// Read-only analyses over the program model
pub use crate::analysis::{DependencyAnalyzer, UnusedCodeAnalyzer};

// ================================================================================================
// Transformation
// ================================================================================================

/// Rename staging/batch application and instruction editing
pub use crate::transform::{ClassTransformer, InstructionTransformer};

// ================================================================================================
// Plugin Pipeline
// ================================================================================================

/// The plugin trait, configuration surface, and pipeline manager
pub use crate::plugin::{ConfigValue, Plugin, PluginConfig, PluginManager};
