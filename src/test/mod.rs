//! Shared factory helpers for unit tests.

use std::sync::Arc;

use crate::model::{
    opcodes, Instruction, MethodAccessFlags, Operand, ProgramClass, ProgramClassRc, ProgramMethod,
    ProgramMethodRc, ProgramRepository,
};

/// Creates a repository pre-populated with empty program classes.
pub fn repository_with(names: &[&str]) -> ProgramRepository {
    let repository = ProgramRepository::new();
    for name in names {
        repository.add_class(ProgramClass::new(*name));
    }
    repository
}

/// Creates a program class with the given supertype.
pub fn class_with_super(name: &str, super_name: &str) -> ProgramClassRc {
    let class = ProgramClass::new(name);
    class.set_super_name(Some(super_name.to_string()));
    Arc::new(class)
}

/// Creates a `()V` method whose body invokes `run()V` on the given class, giving the
/// enclosing class a method-reference dependency on it.
pub fn method_calling(name: &str, target_class: &str) -> ProgramMethodRc {
    let method = Arc::new(ProgramMethod::new(name, "()V", MethodAccessFlags::PUBLIC));
    method.add_instruction(Instruction::with_operand(
        opcodes::INVOKEVIRTUAL,
        Operand::Method {
            owner: target_class.to_string(),
            name: "run".to_string(),
            descriptor: "()V".to_string(),
        },
    ));
    method
}

/// Creates a `()V` method whose body is the given opcodes with no operands.
pub fn method_with_opcodes(name: &str, opcode_list: &[i32]) -> ProgramMethodRc {
    let method = Arc::new(ProgramMethod::new(name, "()V", MethodAccessFlags::PUBLIC));
    for &opcode in opcode_list {
        method.add_instruction(Instruction::new(opcode));
    }
    method
}
