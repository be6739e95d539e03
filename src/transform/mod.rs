//! Mutating transformations over the program model.
//!
//! Two engines live here. [`ClassTransformer`] stages symbol renames against a whole
//! repository and applies them in one consistent batch, rewriting every internal reference
//! to the renamed entities. [`InstructionTransformer`] edits a single method's instruction
//! sequence with positional and predicate-driven operations.
//!
//! Both follow the model's forgiving-lookup convention: targets that don't exist make the
//! operation a silent no-op rather than an error.

mod class;
mod instruction;

pub use class::ClassTransformer;
pub use instruction::InstructionTransformer;
