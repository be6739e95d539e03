//! Method entities: mutable program methods with instruction sequences, and read-only
//! library methods.

use std::sync::{Arc, RwLock};

use crate::model::{
    lock_read, lock_write, Attribute, Instruction, LabelId, MethodAccessFlags, Operand,
};

/// Reference-counted handle to a [`ProgramMethod`].
pub type ProgramMethodRc = Arc<ProgramMethod>;

/// Reference-counted handle to a [`LibraryMethod`].
pub type LibraryMethodRc = Arc<LibraryMethod>;

/// A local-variable table entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    /// Variable name
    pub name: String,
    /// Variable type descriptor
    pub descriptor: String,
    /// Generic-type signature, if any
    pub signature: Option<String>,
    /// First instruction index at which the variable is live
    pub start: u32,
    /// Instruction index past the variable's live range
    pub end: u32,
    /// Local-variable slot index
    pub index: u16,
}

/// A line-number table entry mapping an instruction position to a source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    /// Source line number
    pub line: u32,
    /// Instruction index the line starts at
    pub start: u32,
}

/// An exception-handler range, expressed in label ids.
///
/// The protected range runs from `start` (inclusive) to `end` (exclusive); control transfers
/// to `handler` when a matching exception is raised inside it. A `catch_type` of `None` is a
/// catch-all (finally) handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandler {
    /// Label marking the start of the protected range
    pub start: LabelId,
    /// Label marking the end of the protected range
    pub end: LabelId,
    /// Label marking the handler entry
    pub handler: LabelId,
    /// Internal name of the caught exception class; `None` catches everything
    pub catch_type: Option<String>,
}

impl ExceptionHandler {
    /// Is this a catch-all (finally) handler?
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.catch_type.is_none()
    }
}

/// A mutable method of a program class.
///
/// Owns the ordered instruction sequence plus the local-variable, line-number, and
/// exception-handler tables. Instruction position is list-index based: removing an
/// instruction shifts every subsequent index down by one. The owner back-reference is the
/// owning class's qualified name, maintained by the class on add/remove/rename.
///
/// # Examples
///
/// ```rust
/// use jarscope::model::{Instruction, MethodAccessFlags, ProgramMethod, opcodes};
///
/// let method = ProgramMethod::new("main", "([Ljava/lang/String;)V", MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC);
/// method.add_instruction(Instruction::new(opcodes::RETURN));
/// assert_eq!(method.instruction_count(), 1);
/// assert!(method.is_static());
/// ```
#[derive(Debug)]
pub struct ProgramMethod {
    name: RwLock<String>,
    descriptor: RwLock<String>,
    signature: RwLock<Option<String>>,
    access: RwLock<MethodAccessFlags>,
    exceptions: RwLock<Vec<String>>,
    max_stack: RwLock<u16>,
    max_locals: RwLock<u16>,
    owner: RwLock<Option<String>>,
    instructions: RwLock<Vec<Instruction>>,
    local_variables: RwLock<Vec<LocalVariable>>,
    line_numbers: RwLock<Vec<LineNumber>>,
    exception_handlers: RwLock<Vec<ExceptionHandler>>,
    attributes: RwLock<Vec<Attribute>>,
}

impl ProgramMethod {
    /// Creates a new method with the given name, descriptor, and access flags.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, access: MethodAccessFlags) -> Self {
        Self {
            name: RwLock::new(name.into()),
            descriptor: RwLock::new(descriptor.into()),
            signature: RwLock::new(None),
            access: RwLock::new(access),
            exceptions: RwLock::new(Vec::new()),
            max_stack: RwLock::new(0),
            max_locals: RwLock::new(0),
            owner: RwLock::new(None),
            instructions: RwLock::new(Vec::new()),
            local_variables: RwLock::new(Vec::new()),
            line_numbers: RwLock::new(Vec::new()),
            exception_handlers: RwLock::new(Vec::new()),
            attributes: RwLock::new(Vec::new()),
        }
    }

    /// The method name.
    #[must_use]
    pub fn name(&self) -> String {
        lock_read(&self.name).clone()
    }

    /// Sets the method name. Re-keying the owning class's method map is the caller's job;
    /// [`ProgramClass::rename_method`](crate::model::ProgramClass::rename_method) does both.
    pub fn set_name(&self, name: impl Into<String>) {
        *lock_write(&self.name) = name.into();
    }

    /// The method descriptor.
    #[must_use]
    pub fn descriptor(&self) -> String {
        lock_read(&self.descriptor).clone()
    }

    /// Sets the method descriptor.
    pub fn set_descriptor(&self, descriptor: impl Into<String>) {
        *lock_write(&self.descriptor) = descriptor.into();
    }

    /// The generic signature, if any.
    #[must_use]
    pub fn signature(&self) -> Option<String> {
        lock_read(&self.signature).clone()
    }

    /// Sets or clears the generic signature.
    pub fn set_signature(&self, signature: Option<String>) {
        *lock_write(&self.signature) = signature;
    }

    /// The access flags.
    #[must_use]
    pub fn access(&self) -> MethodAccessFlags {
        *lock_read(&self.access)
    }

    /// Sets the access flags.
    pub fn set_access(&self, access: MethodAccessFlags) {
        *lock_write(&self.access) = access;
    }

    /// The declared (checked) exceptions.
    #[must_use]
    pub fn exceptions(&self) -> Vec<String> {
        lock_read(&self.exceptions).clone()
    }

    /// Sets the declared exceptions.
    pub fn set_exceptions(&self, exceptions: Vec<String>) {
        *lock_write(&self.exceptions) = exceptions;
    }

    /// Operand-stack size hint. The codec recomputes this at re-encode time.
    #[must_use]
    pub fn max_stack(&self) -> u16 {
        *lock_read(&self.max_stack)
    }

    /// Sets the operand-stack size hint.
    pub fn set_max_stack(&self, max_stack: u16) {
        *lock_write(&self.max_stack) = max_stack;
    }

    /// Local-variable slot count hint. The codec recomputes this at re-encode time.
    #[must_use]
    pub fn max_locals(&self) -> u16 {
        *lock_read(&self.max_locals)
    }

    /// Sets the local-variable slot count hint.
    pub fn set_max_locals(&self, max_locals: u16) {
        *lock_write(&self.max_locals) = max_locals;
    }

    /// The qualified name of the owning class, if this method is currently attached to one.
    #[must_use]
    pub fn owner(&self) -> Option<String> {
        lock_read(&self.owner).clone()
    }

    pub(crate) fn set_owner(&self, owner: Option<String>) {
        *lock_write(&self.owner) = owner;
    }

    /// The `name + descriptor` key this method occupies in its class's method map.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{}", self.name(), self.descriptor())
    }

    /// The fully qualified `Owner.name+descriptor` form used by analyzer reports.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.owner() {
            Some(owner) => format!("{}.{}{}", owner, self.name(), self.descriptor()),
            None => self.key(),
        }
    }

    // ---- instruction sequence ----

    /// Read-only snapshot of the instruction sequence.
    #[must_use]
    pub fn instructions(&self) -> Vec<Instruction> {
        lock_read(&self.instructions).clone()
    }

    /// Replaces the entire instruction sequence.
    pub fn set_instructions(&self, instructions: Vec<Instruction>) {
        *lock_write(&self.instructions) = instructions;
    }

    /// Number of instructions in the sequence.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        lock_read(&self.instructions).len()
    }

    /// Does the method have any instructions?
    #[must_use]
    pub fn has_instructions(&self) -> bool {
        !lock_read(&self.instructions).is_empty()
    }

    /// Appends an instruction at the end of the sequence.
    pub fn add_instruction(&self, instruction: Instruction) {
        lock_write(&self.instructions).push(instruction);
    }

    /// Inserts an instruction at `index`, shifting subsequent instructions up by one.
    /// An index past the end appends.
    pub fn insert_instruction(&self, index: usize, instruction: Instruction) {
        let mut instructions = lock_write(&self.instructions);
        let index = index.min(instructions.len());
        instructions.insert(index, instruction);
    }

    /// Removes and returns the instruction at `index`, shifting subsequent instructions
    /// down by one. Out-of-range indices are a silent no-op.
    pub fn remove_instruction(&self, index: usize) -> Option<Instruction> {
        let mut instructions = lock_write(&self.instructions);
        if index < instructions.len() {
            Some(instructions.remove(index))
        } else {
            None
        }
    }

    /// Replaces the instruction at `index`, returning the previous one. Out-of-range
    /// indices are a silent no-op.
    pub fn replace_instruction(&self, index: usize, instruction: Instruction) -> Option<Instruction> {
        let mut instructions = lock_write(&self.instructions);
        if index < instructions.len() {
            Some(std::mem::replace(&mut instructions[index], instruction))
        } else {
            None
        }
    }

    /// Removes every instruction.
    pub fn clear_instructions(&self) {
        lock_write(&self.instructions).clear();
    }

    /// Runs `f` over the instruction sequence under a single write lock, so a batch of
    /// edits observes and produces one consistent sequence.
    pub(crate) fn with_instructions_mut<R>(&self, f: impl FnOnce(&mut Vec<Instruction>) -> R) -> R {
        f(&mut lock_write(&self.instructions))
    }

    /// Allocates a label id strictly greater than any label referenced in the sequence.
    #[must_use]
    pub fn fresh_label(&self) -> LabelId {
        let instructions = lock_read(&self.instructions);
        let mut max = None;
        for insn in instructions.iter() {
            let seen = match &insn.operand {
                Operand::Label(id) | Operand::Jump(id) => Some(*id),
                Operand::Switch { default, targets } => {
                    Some(targets.iter().copied().fold(*default, LabelId::max))
                }
                _ => None,
            };
            if let Some(id) = seen {
                max = Some(max.map_or(id, |m: LabelId| m.max(id)));
            }
        }
        max.map_or(0, |m| m + 1)
    }

    // ---- tables ----

    /// Read-only snapshot of the local-variable table.
    #[must_use]
    pub fn local_variables(&self) -> Vec<LocalVariable> {
        lock_read(&self.local_variables).clone()
    }

    /// Appends a local-variable table entry.
    pub fn add_local_variable(&self, variable: LocalVariable) {
        lock_write(&self.local_variables).push(variable);
    }

    /// Read-only snapshot of the line-number table.
    #[must_use]
    pub fn line_numbers(&self) -> Vec<LineNumber> {
        lock_read(&self.line_numbers).clone()
    }

    /// Appends a line-number table entry.
    pub fn add_line_number(&self, line_number: LineNumber) {
        lock_write(&self.line_numbers).push(line_number);
    }

    /// Read-only snapshot of the exception-handler ranges.
    #[must_use]
    pub fn exception_handlers(&self) -> Vec<ExceptionHandler> {
        lock_read(&self.exception_handlers).clone()
    }

    /// Registers an exception-handler range.
    pub fn add_exception_handler(&self, handler: ExceptionHandler) {
        lock_write(&self.exception_handlers).push(handler);
    }

    // ---- attributes ----

    /// Read-only snapshot of the attribute bag.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        lock_read(&self.attributes).clone()
    }

    /// Appends an attribute to the bag.
    pub fn add_attribute(&self, attribute: Attribute) {
        lock_write(&self.attributes).push(attribute);
    }

    /// The first attribute with the given class-file name, if any.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Attribute> {
        lock_read(&self.attributes)
            .iter()
            .find(|attr| attr.name() == name)
            .cloned()
    }

    /// Does the bag contain an attribute with the given class-file name?
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        lock_read(&self.attributes).iter().any(|attr| attr.name() == name)
    }

    /// Removes every attribute with the given class-file name.
    pub fn remove_attribute(&self, name: &str) {
        lock_write(&self.attributes).retain(|attr| attr.name() != name);
    }

    // ---- predicates ----

    /// Is the method declared public?
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access().contains(MethodAccessFlags::PUBLIC)
    }

    /// Is the method declared private?
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.access().contains(MethodAccessFlags::PRIVATE)
    }

    /// Is the method declared static?
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.access().contains(MethodAccessFlags::STATIC)
    }

    /// Is the method declared abstract?
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.access().contains(MethodAccessFlags::ABSTRACT)
    }

    /// Is the method declared native?
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.access().contains(MethodAccessFlags::NATIVE)
    }

    /// Is the method compiler-generated?
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.access().contains(MethodAccessFlags::SYNTHETIC)
    }

    /// Is this an instance constructor (`<init>`)?
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name() == "<init>"
    }

    /// Is this the static initializer (`<clinit>`)?
    #[must_use]
    pub fn is_static_initializer(&self) -> bool {
        self.name() == "<clinit>"
    }
}

/// A read-only method of a library class.
#[derive(Debug, Clone)]
pub struct LibraryMethod {
    /// Method name
    pub name: String,
    /// Method descriptor
    pub descriptor: String,
    /// Access flags
    pub access: MethodAccessFlags,
    /// Declared (checked) exceptions
    pub exceptions: Vec<String>,
}

impl LibraryMethod {
    /// Creates a new library method.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, access: MethodAccessFlags) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access,
            exceptions: Vec::new(),
        }
    }

    /// The `name + descriptor` key this method occupies in its class's method map.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{}", self.name, self.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::opcodes;

    #[test]
    fn test_instruction_index_semantics() {
        let method = ProgramMethod::new("run", "()V", MethodAccessFlags::PUBLIC);
        method.add_instruction(Instruction::new(opcodes::NOP));
        method.add_instruction(Instruction::new(opcodes::ICONST_0));
        method.add_instruction(Instruction::new(opcodes::RETURN));
        assert_eq!(method.instruction_count(), 3);

        // Removal shifts subsequent indices down by one.
        let removed = method.remove_instruction(1);
        assert_eq!(removed.map(|i| i.opcode), Some(opcodes::ICONST_0));
        let insns = method.instructions();
        assert_eq!(insns[1].opcode, opcodes::RETURN);

        // Out-of-range removal is a silent no-op.
        assert!(method.remove_instruction(10).is_none());
        assert_eq!(method.instruction_count(), 2);

        method.insert_instruction(1, Instruction::new(opcodes::ACONST_NULL));
        assert_eq!(method.instructions()[1].opcode, opcodes::ACONST_NULL);
    }

    #[test]
    fn test_replace_instruction() {
        let method = ProgramMethod::new("run", "()V", MethodAccessFlags::PUBLIC);
        method.add_instruction(Instruction::new(opcodes::NOP));
        let old = method.replace_instruction(0, Instruction::new(opcodes::RETURN));
        assert_eq!(old.map(|i| i.opcode), Some(opcodes::NOP));
        assert_eq!(method.instructions()[0].opcode, opcodes::RETURN);
        assert!(method.replace_instruction(5, Instruction::new(opcodes::NOP)).is_none());
    }

    #[test]
    fn test_fresh_label_allocation() {
        let method = ProgramMethod::new("run", "()V", MethodAccessFlags::PUBLIC);
        assert_eq!(method.fresh_label(), 0);

        method.add_instruction(Instruction::label(3));
        method.add_instruction(Instruction::with_operand(opcodes::GOTO, Operand::Jump(7)));
        assert_eq!(method.fresh_label(), 8);
    }

    #[test]
    fn test_predicates_and_keys() {
        let ctor = ProgramMethod::new("<init>", "()V", MethodAccessFlags::PUBLIC);
        assert!(ctor.is_constructor());
        assert!(!ctor.is_static_initializer());
        assert_eq!(ctor.key(), "<init>()V");
        assert_eq!(ctor.full_name(), "<init>()V");

        ctor.set_owner(Some("com/example/A".into()));
        assert_eq!(ctor.full_name(), "com/example/A.<init>()V");
    }

    #[test]
    fn test_exception_handler_catch_all() {
        let handler = ExceptionHandler {
            start: 0,
            end: 1,
            handler: 2,
            catch_type: None,
        };
        assert!(handler.is_catch_all());
    }
}
