//! Positional and predicate-driven instruction editing for a single method.

use crate::model::{ExceptionHandler, Instruction, ProgramMethodRc};

/// Edits the instruction sequence of one method.
///
/// Positional edits are index-guarded: an out-of-range index is a silent no-op, never a
/// panic. Predicate-driven edits collect every matching index first and then apply the
/// whole batch under one lock, so a replacement can never shift later matches and the
/// visible sequence is consistent after every call.
///
/// # Examples
///
/// ```rust
/// use jarscope::model::{opcodes, Instruction, MethodAccessFlags, ProgramMethod};
/// use jarscope::transform::InstructionTransformer;
/// use std::sync::Arc;
///
/// let method = Arc::new(ProgramMethod::new("run", "()V", MethodAccessFlags::PUBLIC));
/// method.add_instruction(Instruction::new(opcodes::NOP));
/// method.add_instruction(Instruction::new(opcodes::RETURN));
///
/// let transformer = InstructionTransformer::new(method.clone());
/// transformer.remove_matching(|insn| insn.opcode == opcodes::NOP);
/// assert_eq!(method.instruction_count(), 1);
/// ```
#[derive(Debug)]
pub struct InstructionTransformer {
    method: ProgramMethodRc,
}

impl InstructionTransformer {
    /// Creates a transformer editing the given method.
    #[must_use]
    pub fn new(method: ProgramMethodRc) -> Self {
        Self { method }
    }

    /// The method being edited.
    #[must_use]
    pub fn method(&self) -> &ProgramMethodRc {
        &self.method
    }

    /// Replaces the instruction at `index`. Out-of-range indices are a silent no-op.
    pub fn replace_at(&self, index: usize, instruction: Instruction) {
        self.method.replace_instruction(index, instruction);
    }

    /// Inserts before the instruction at `index`. Out-of-range indices are a silent
    /// no-op; appending goes through [`insert_at_end`](Self::insert_at_end).
    pub fn insert_before(&self, index: usize, instruction: Instruction) {
        self.method.with_instructions_mut(|instructions| {
            if index < instructions.len() {
                instructions.insert(index, instruction);
            }
        });
    }

    /// Inserts after the instruction at `index`. Out-of-range indices are a silent no-op.
    pub fn insert_after(&self, index: usize, instruction: Instruction) {
        self.method.with_instructions_mut(|instructions| {
            if index < instructions.len() {
                instructions.insert(index + 1, instruction);
            }
        });
    }

    /// Removes the instruction at `index`; later indices shift down by one. Out-of-range
    /// indices are a silent no-op.
    pub fn remove_at(&self, index: usize) {
        self.method.remove_instruction(index);
    }

    /// Replaces every matching instruction with the replacer's output; a replacer
    /// returning `None` removes the instruction instead.
    ///
    /// Matches are collected up front and applied as one batch, so replacements cannot
    /// re-match and removals cannot shift pending targets.
    pub fn replace_matching(
        &self,
        matcher: impl Fn(&Instruction) -> bool,
        replacer: impl Fn(&Instruction) -> Option<Instruction>,
    ) {
        self.method.with_instructions_mut(|instructions| {
            let matches: Vec<usize> = instructions
                .iter()
                .enumerate()
                .filter(|(_, instruction)| matcher(instruction))
                .map(|(index, _)| index)
                .collect();

            // Walk back to front so removals never shift a pending index.
            for index in matches.into_iter().rev() {
                match replacer(&instructions[index]) {
                    Some(replacement) => instructions[index] = replacement,
                    None => {
                        instructions.remove(index);
                    }
                }
            }
        });
    }

    /// Removes every matching instruction as one batch.
    pub fn remove_matching(&self, matcher: impl Fn(&Instruction) -> bool) {
        self.method
            .with_instructions_mut(|instructions| instructions.retain(|insn| !matcher(insn)));
    }

    /// Inserts the given instructions, in order, at the start of the sequence.
    pub fn insert_at_start(&self, instructions: Vec<Instruction>) {
        self.method.with_instructions_mut(|existing| {
            existing.splice(0..0, instructions);
        });
    }

    /// Appends the given instructions, in order, at the end of the sequence.
    pub fn insert_at_end(&self, instructions: Vec<Instruction>) {
        self.method.with_instructions_mut(|existing| {
            existing.extend(instructions);
        });
    }

    /// Inserts the given instructions immediately before every return instruction
    /// (the 172..=177 family), preserving their order at each site.
    pub fn insert_before_returns(&self, instructions: Vec<Instruction>) {
        self.method.with_instructions_mut(|existing| {
            let returns: Vec<usize> = existing
                .iter()
                .enumerate()
                .filter(|(_, insn)| insn.is_return())
                .map(|(index, _)| index)
                .collect();

            for index in returns.into_iter().rev() {
                existing.splice(index..index, instructions.iter().cloned());
            }
        });
    }

    /// Index of the first matching instruction, if any.
    #[must_use]
    pub fn find_first(&self, matcher: impl Fn(&Instruction) -> bool) -> Option<usize> {
        self.method
            .instructions()
            .iter()
            .position(|instruction| matcher(instruction))
    }

    /// Indices of every matching instruction, in sequence order.
    #[must_use]
    pub fn find_all(&self, matcher: impl Fn(&Instruction) -> bool) -> Vec<usize> {
        self.method
            .instructions()
            .iter()
            .enumerate()
            .filter(|(_, instruction)| matcher(instruction))
            .map(|(index, _)| index)
            .collect()
    }

    /// Wraps the whole body in a try/catch: brackets the existing instructions with fresh
    /// start/end labels, appends the handler label and the catch block after them, and
    /// registers the handler range on the method.
    ///
    /// The three label ids are allocated above every id the method currently references.
    pub fn wrap_with_try_catch(
        &self,
        catch_type: impl Into<String>,
        catch_instructions: Vec<Instruction>,
    ) {
        let start = self.method.fresh_label();
        let end = start + 1;
        let handler = start + 2;

        self.method.with_instructions_mut(|instructions| {
            instructions.insert(0, Instruction::label(start));
            instructions.push(Instruction::label(end));
            instructions.push(Instruction::label(handler));
            instructions.extend(catch_instructions);
        });

        self.method.add_exception_handler(ExceptionHandler {
            start,
            end,
            handler,
            catch_type: Some(catch_type.into()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{opcodes, MethodAccessFlags, Operand, ProgramMethod};
    use std::sync::Arc;

    fn method_with(opcode_list: &[i32]) -> ProgramMethodRc {
        let method = Arc::new(ProgramMethod::new("body", "()V", MethodAccessFlags::PUBLIC));
        for &opcode in opcode_list {
            method.add_instruction(Instruction::new(opcode));
        }
        method
    }

    #[test]
    fn test_positional_edits_are_index_guarded() {
        let method = method_with(&[opcodes::NOP, opcodes::RETURN]);
        let transformer = InstructionTransformer::new(method.clone());

        transformer.replace_at(99, Instruction::new(opcodes::ACONST_NULL));
        transformer.insert_after(99, Instruction::new(opcodes::ACONST_NULL));
        transformer.remove_at(99);
        assert_eq!(method.instruction_count(), 2);

        // `len` is not a valid instruction index, so no append happens either.
        transformer.insert_before(2, Instruction::new(opcodes::ACONST_NULL));
        transformer.insert_after(1, Instruction::new(opcodes::ACONST_NULL));
        assert_eq!(method.instruction_count(), 3);
        transformer.remove_at(2);

        transformer.insert_before(1, Instruction::new(opcodes::ALOAD));
        assert_eq!(method.instructions()[1].opcode, opcodes::ALOAD);
        assert_eq!(method.instruction_count(), 3);
    }

    #[test]
    fn test_replace_matching_applies_one_batch() {
        let method = method_with(&[opcodes::NOP, opcodes::ALOAD, opcodes::NOP, opcodes::RETURN]);
        let transformer = InstructionTransformer::new(method.clone());

        // Replacements that would themselves match must not be revisited.
        transformer.replace_matching(
            |insn| insn.opcode == opcodes::NOP,
            |_| Some(Instruction::new(opcodes::NOP)),
        );
        assert_eq!(method.instruction_count(), 4);

        transformer.replace_matching(|insn| insn.opcode == opcodes::NOP, |_| None);
        let opcode_list: Vec<i32> = method.instructions().iter().map(|i| i.opcode).collect();
        assert_eq!(opcode_list, vec![opcodes::ALOAD, opcodes::RETURN]);
    }

    #[test]
    fn test_insert_before_every_return() {
        let method = method_with(&[
            opcodes::IRETURN,
            opcodes::NOP,
            opcodes::RETURN,
        ]);
        let transformer = InstructionTransformer::new(method.clone());

        transformer.insert_before_returns(vec![
            Instruction::new(opcodes::ALOAD),
            Instruction::new(opcodes::ASTORE),
        ]);

        let opcode_list: Vec<i32> = method.instructions().iter().map(|i| i.opcode).collect();
        assert_eq!(
            opcode_list,
            vec![
                opcodes::ALOAD,
                opcodes::ASTORE,
                opcodes::IRETURN,
                opcodes::NOP,
                opcodes::ALOAD,
                opcodes::ASTORE,
                opcodes::RETURN,
            ]
        );
    }

    #[test]
    fn test_bulk_inserts() {
        let method = method_with(&[opcodes::RETURN]);
        let transformer = InstructionTransformer::new(method.clone());

        transformer.insert_at_start(vec![Instruction::new(opcodes::NOP), Instruction::new(opcodes::ALOAD)]);
        transformer.insert_at_end(vec![Instruction::new(opcodes::ATHROW)]);

        let opcode_list: Vec<i32> = method.instructions().iter().map(|i| i.opcode).collect();
        assert_eq!(
            opcode_list,
            vec![opcodes::NOP, opcodes::ALOAD, opcodes::RETURN, opcodes::ATHROW]
        );
    }

    #[test]
    fn test_find_first_and_all() {
        let method = method_with(&[opcodes::NOP, opcodes::ALOAD, opcodes::NOP]);
        let transformer = InstructionTransformer::new(method);

        assert_eq!(transformer.find_first(|insn| insn.opcode == opcodes::NOP), Some(0));
        assert_eq!(transformer.find_first(|insn| insn.opcode == opcodes::RETURN), None);
        assert_eq!(transformer.find_all(|insn| insn.opcode == opcodes::NOP), vec![0, 2]);
    }

    #[test]
    fn test_wrap_with_try_catch_uses_fresh_labels() {
        let method = method_with(&[]);
        method.add_instruction(Instruction::label(4));
        method.add_instruction(Instruction::new(opcodes::RETURN));
        let transformer = InstructionTransformer::new(method.clone());

        transformer.wrap_with_try_catch(
            "java/lang/Exception",
            vec![Instruction::new(opcodes::ATHROW)],
        );

        let instructions = method.instructions();
        assert_eq!(instructions[0].operand, Operand::Label(5));
        assert_eq!(instructions.last().map(|i| i.opcode), Some(opcodes::ATHROW));
        assert_eq!(instructions[instructions.len() - 2].operand, Operand::Label(7));
        assert_eq!(instructions[instructions.len() - 3].operand, Operand::Label(6));

        let handlers = method.exception_handlers();
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].start, 5);
        assert_eq!(handlers[0].end, 6);
        assert_eq!(handlers[0].handler, 7);
        assert_eq!(handlers[0].catch_type.as_deref(), Some("java/lang/Exception"));
    }
}
