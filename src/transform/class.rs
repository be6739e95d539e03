//! Staged, batch-applied renames and replace-in-place entity mapping.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{
    Operand, ProgramClassRc, ProgramFieldRc, ProgramMethodRc, ProgramRepository,
};

/// Stages class/field/method renames against a repository and applies them as one batch.
///
/// Renames accumulate in three independent tables (class `old -> new`, field
/// `(class, field) -> new`, method `(class, method, descriptor) -> new`) and touch nothing
/// until [`apply_transformations`](Self::apply_transformations) runs. The batch is a
/// two-phase commit: every symbolic reference in the program is first rewritten against
/// the frozen pre-transform names, then the entities themselves are re-keyed, so the
/// outcome never depends on table iteration order. Keys that match nothing are silent
/// no-ops.
///
/// Member descriptors and dynamic-call-site descriptors are left untouched: type names
/// embedded inside descriptor strings are the codec's concern, not the rename engine's.
///
/// # Examples
///
/// ```rust
/// use jarscope::prelude::*;
///
/// let repo = ProgramRepository::new();
/// repo.add_class(ProgramClass::new("com/example/Obfuscated"));
///
/// let mut transformer = ClassTransformer::new(&repo);
/// transformer.rename_class("com/example/Obfuscated", "com/example/Parser");
/// transformer.apply_transformations();
///
/// assert!(repo.program_class("com/example/Parser").is_some());
/// ```
#[derive(Debug)]
pub struct ClassTransformer<'a> {
    repository: &'a ProgramRepository,
    class_mappings: HashMap<String, String>,
    field_mappings: HashMap<(String, String), String>,
    method_mappings: HashMap<(String, String, String), String>,
}

impl<'a> ClassTransformer<'a> {
    /// Creates a transformer staging against the given repository.
    #[must_use]
    pub fn new(repository: &'a ProgramRepository) -> Self {
        Self {
            repository,
            class_mappings: HashMap::new(),
            field_mappings: HashMap::new(),
            method_mappings: HashMap::new(),
        }
    }

    /// Stages a class rename. Names are pre-transform names.
    pub fn rename_class(&mut self, old_name: impl Into<String>, new_name: impl Into<String>) {
        self.class_mappings.insert(old_name.into(), new_name.into());
    }

    /// Stages a field rename. The class name is the pre-transform name.
    pub fn rename_field(
        &mut self,
        class_name: impl Into<String>,
        old_field_name: impl Into<String>,
        new_field_name: impl Into<String>,
    ) {
        self.field_mappings
            .insert((class_name.into(), old_field_name.into()), new_field_name.into());
    }

    /// Stages a method rename. The class name is the pre-transform name.
    pub fn rename_method(
        &mut self,
        class_name: impl Into<String>,
        old_method_name: impl Into<String>,
        descriptor: impl Into<String>,
        new_method_name: impl Into<String>,
    ) {
        self.method_mappings.insert(
            (class_name.into(), old_method_name.into(), descriptor.into()),
            new_method_name.into(),
        );
    }

    /// Snapshot of the staged class renames.
    #[must_use]
    pub fn class_mappings(&self) -> HashMap<String, String> {
        self.class_mappings.clone()
    }

    /// Snapshot of the staged field renames.
    #[must_use]
    pub fn field_mappings(&self) -> HashMap<(String, String), String> {
        self.field_mappings.clone()
    }

    /// Snapshot of the staged method renames.
    #[must_use]
    pub fn method_mappings(&self) -> HashMap<(String, String, String), String> {
        self.method_mappings.clone()
    }

    /// Discards all staged renames without applying anything.
    pub fn clear_mappings(&mut self) {
        self.class_mappings.clear();
        self.field_mappings.clear();
        self.method_mappings.clear();
    }

    /// Applies every staged rename to the repository, then clears the tables.
    ///
    /// Phase 1 rewrites references while all entities still carry their pre-transform
    /// names: every method body's field/method-reference owner+name and type operands,
    /// and every class's supertype and interface names. Phase 2 commits the renames
    /// themselves - fields, then methods, then classes - through the normal model paths,
    /// which re-key maps and keep owner back-references current.
    pub fn apply_transformations(&mut self) {
        self.rewrite_references();

        for ((class_name, old_name), new_name) in &self.field_mappings {
            if let Some(class) = self.repository.program_class(class_name) {
                class.rename_field(old_name, new_name);
            }
        }
        for ((class_name, old_name, descriptor), new_name) in &self.method_mappings {
            if let Some(class) = self.repository.program_class(class_name) {
                class.rename_method(old_name, descriptor, new_name);
            }
        }
        self.commit_class_renames();

        self.clear_mappings();
    }

    /// Commits the staged class renames as one batch: every staged class is detached from
    /// the repository first, then renamed and re-registered. Overlapping tables (swaps,
    /// chains whose new name equals another staged old name) therefore never collide with
    /// an entry that is itself about to move.
    fn commit_class_renames(&self) {
        let mut program = Vec::new();
        let mut library = Vec::new();
        for (old_name, new_name) in &self.class_mappings {
            if let Some(class) = self.repository.program_class(old_name) {
                self.repository.remove_class(old_name);
                program.push((class, new_name));
            } else if let Some(class) = self.repository.library_class(old_name) {
                self.repository.remove_class(old_name);
                library.push((class, new_name));
            }
        }

        for (class, new_name) in program {
            class.set_name(new_name.clone());
            self.repository.add_class(class);
        }
        for (class, new_name) in library {
            class.set_name(new_name.clone());
            self.repository.add_library_class(class);
        }
    }

    fn rewrite_references(&self) {
        for class in self.repository.program_classes() {
            if let Some(super_name) = class.super_name() {
                if let Some(new_name) = self.class_mappings.get(&super_name) {
                    class.set_super_name(Some(new_name.clone()));
                }
            }

            let interfaces: Vec<String> = class
                .interfaces()
                .into_iter()
                .map(|name| self.class_mappings.get(&name).cloned().unwrap_or(name))
                .collect();
            class.set_interfaces(interfaces);

            for method in class.methods() {
                self.rewrite_method_references(&method);
            }
        }
    }

    /// Rewrites one method body. Field/method rename keys are matched against the frozen
    /// pre-transform owner names, then owners are mapped through the class table, so a
    /// combined class+member rename lands on the post-transform pair.
    fn rewrite_method_references(&self, method: &ProgramMethodRc) {
        method.with_instructions_mut(|instructions| {
            for instruction in instructions.iter_mut() {
                match &mut instruction.operand {
                    Operand::Field { owner, name, .. } => {
                        let key = (owner.clone(), name.clone());
                        if let Some(new_name) = self.field_mappings.get(&key) {
                            *name = new_name.clone();
                        }
                        if let Some(new_owner) = self.class_mappings.get(owner) {
                            *owner = new_owner.clone();
                        }
                    }
                    Operand::Method { owner, name, descriptor } => {
                        let key = (owner.clone(), name.clone(), descriptor.clone());
                        if let Some(new_name) = self.method_mappings.get(&key) {
                            *name = new_name.clone();
                        }
                        if let Some(new_owner) = self.class_mappings.get(owner) {
                            *owner = new_owner.clone();
                        }
                    }
                    Operand::Type(name) => {
                        if let Some(new_name) = self.class_mappings.get(name) {
                            *name = new_name.clone();
                        }
                    }
                    _ => {}
                }
            }
        });
    }

    /// Maps every program class through `f`, replacing in place.
    ///
    /// Returning the same handle (pointer-equal) leaves the entry alone; returning a
    /// different one removes the old class and registers the replacement through the
    /// normal model path.
    pub fn transform_classes(&self, f: impl Fn(&ProgramClassRc) -> ProgramClassRc) {
        for class in self.repository.program_classes() {
            let transformed = f(&class);
            if !Arc::ptr_eq(&class, &transformed) {
                self.repository.remove_class(&class.name());
                self.repository.add_class(transformed);
            }
        }
    }

    /// Maps every method of every program class through `f`, replacing in place.
    ///
    /// A different returned handle detaches the old method and attaches the new one,
    /// rewiring the owner back-reference.
    pub fn transform_methods(&self, f: impl Fn(&ProgramMethodRc) -> ProgramMethodRc) {
        for class in self.repository.program_classes() {
            for method in class.methods() {
                let transformed = f(&method);
                if !Arc::ptr_eq(&method, &transformed) {
                    class.remove_method(&method.name(), &method.descriptor());
                    class.add_method(transformed);
                }
            }
        }
    }

    /// Maps every field of every program class through `f`, replacing in place.
    pub fn transform_fields(&self, f: impl Fn(&ProgramFieldRc) -> ProgramFieldRc) {
        for class in self.repository.program_classes() {
            for field in class.fields() {
                let transformed = f(&field);
                if !Arc::ptr_eq(&field, &transformed) {
                    class.remove_field(&field.name());
                    class.add_field(transformed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        opcodes, FieldAccessFlags, Instruction, MethodAccessFlags, ProgramClass, ProgramField,
        ProgramMethod,
    };

    fn repo_with_reference() -> ProgramRepository {
        let repo = ProgramRepository::new();

        let target = std::sync::Arc::new(ProgramClass::new("com/example/Target"));
        target.add_field(ProgramField::new("counter", "I", FieldAccessFlags::PUBLIC));
        target.add_method(ProgramMethod::new("work", "()V", MethodAccessFlags::PUBLIC));
        repo.add_class(target);

        let caller = std::sync::Arc::new(ProgramClass::new("com/example/Caller"));
        caller.set_super_name(Some("com/example/Target".into()));
        let body = caller.add_method(ProgramMethod::new("call", "()V", MethodAccessFlags::PUBLIC));
        body.add_instruction(Instruction::with_operand(
            opcodes::GETFIELD,
            Operand::Field {
                owner: "com/example/Target".into(),
                name: "counter".into(),
                descriptor: "I".into(),
            },
        ));
        body.add_instruction(Instruction::with_operand(
            opcodes::INVOKEVIRTUAL,
            Operand::Method {
                owner: "com/example/Target".into(),
                name: "work".into(),
                descriptor: "()V".into(),
            },
        ));
        body.add_instruction(Instruction::with_operand(
            opcodes::NEW,
            Operand::Type("com/example/Target".into()),
        ));
        repo.add_class(caller);
        repo
    }

    #[test]
    fn test_class_rename_rewrites_all_reference_kinds() {
        let repo = repo_with_reference();
        let mut transformer = ClassTransformer::new(&repo);
        transformer.rename_class("com/example/Target", "com/example/Renamed");
        transformer.apply_transformations();

        assert!(repo.program_class("com/example/Target").is_none());
        assert!(repo.program_class("com/example/Renamed").is_some());

        let caller = repo.program_class("com/example/Caller").unwrap();
        assert_eq!(caller.super_name().as_deref(), Some("com/example/Renamed"));

        let body = caller.method("call", "()V").unwrap();
        let instructions = body.instructions();
        assert_eq!(
            instructions[0].operand,
            Operand::Field {
                owner: "com/example/Renamed".into(),
                name: "counter".into(),
                descriptor: "I".into(),
            }
        );
        assert_eq!(
            instructions[1].operand,
            Operand::Method {
                owner: "com/example/Renamed".into(),
                name: "work".into(),
                descriptor: "()V".into(),
            }
        );
        assert_eq!(instructions[2].operand, Operand::Type("com/example/Renamed".into()));
    }

    #[test]
    fn test_combined_class_and_member_rename() {
        let repo = repo_with_reference();
        let mut transformer = ClassTransformer::new(&repo);
        // Member keys use pre-transform owner names; ordering must not matter.
        transformer.rename_class("com/example/Target", "com/example/Renamed");
        transformer.rename_field("com/example/Target", "counter", "total");
        transformer.rename_method("com/example/Target", "work", "()V", "execute");
        transformer.apply_transformations();

        let renamed = repo.program_class("com/example/Renamed").unwrap();
        assert!(renamed.field("total").is_some());
        assert!(renamed.method("execute", "()V").is_some());

        let body = repo
            .program_class("com/example/Caller")
            .unwrap()
            .method("call", "()V")
            .unwrap();
        let instructions = body.instructions();
        assert_eq!(
            instructions[0].operand,
            Operand::Field {
                owner: "com/example/Renamed".into(),
                name: "total".into(),
                descriptor: "I".into(),
            }
        );
        assert_eq!(
            instructions[1].operand,
            Operand::Method {
                owner: "com/example/Renamed".into(),
                name: "execute".into(),
                descriptor: "()V".into(),
            }
        );
    }

    #[test]
    fn test_rename_back_restores_identity() {
        let repo = ProgramRepository::new();
        let original = repo.add_class(ProgramClass::new("com/example/A"));

        let mut transformer = ClassTransformer::new(&repo);
        transformer.rename_class("com/example/A", "com/example/B");
        transformer.apply_transformations();
        transformer.rename_class("com/example/B", "com/example/A");
        transformer.apply_transformations();

        let back = repo.program_class("com/example/A").unwrap();
        assert!(Arc::ptr_eq(&original, &back));
        assert_eq!(back.name(), "com/example/A");
    }

    #[test]
    fn test_swapped_renames_keep_both_classes() {
        let repo = ProgramRepository::new();
        let a = repo.add_class(ProgramClass::new("com/example/A"));
        let b = repo.add_class(ProgramClass::new("com/example/B"));

        let mut transformer = ClassTransformer::new(&repo);
        transformer.rename_class("com/example/A", "com/example/B");
        transformer.rename_class("com/example/B", "com/example/A");
        transformer.apply_transformations();

        assert_eq!(repo.program_class_count(), 2);
        let now_b = repo.program_class("com/example/B").unwrap();
        let now_a = repo.program_class("com/example/A").unwrap();
        assert!(Arc::ptr_eq(&a, &now_b));
        assert!(Arc::ptr_eq(&b, &now_a));
        assert_eq!(now_b.name(), "com/example/B");
        assert_eq!(now_a.name(), "com/example/A");
    }

    #[test]
    fn test_chained_renames_are_order_independent() {
        let repo = ProgramRepository::new();
        let a = repo.add_class(ProgramClass::new("com/example/A"));
        let b = repo.add_class(ProgramClass::new("com/example/B"));

        // A moves onto B's old name while B moves away; neither may clobber the other.
        let mut transformer = ClassTransformer::new(&repo);
        transformer.rename_class("com/example/A", "com/example/B");
        transformer.rename_class("com/example/B", "com/example/C");
        transformer.apply_transformations();

        assert_eq!(repo.program_class_count(), 2);
        assert!(repo.program_class("com/example/A").is_none());
        let now_b = repo.program_class("com/example/B").unwrap();
        let now_c = repo.program_class("com/example/C").unwrap();
        assert!(Arc::ptr_eq(&a, &now_b));
        assert!(Arc::ptr_eq(&b, &now_c));
    }

    #[test]
    fn test_apply_clears_staged_tables() {
        let repo = repo_with_reference();
        let mut transformer = ClassTransformer::new(&repo);
        transformer.rename_class("com/example/Target", "com/example/Renamed");
        assert_eq!(transformer.class_mappings().len(), 1);

        transformer.apply_transformations();
        assert!(transformer.class_mappings().is_empty());

        // Nothing left staged: a second apply is a no-op.
        transformer.apply_transformations();
        assert!(repo.program_class("com/example/Renamed").is_some());
    }

    #[test]
    fn test_missing_keys_are_silent() {
        let repo = repo_with_reference();
        let mut transformer = ClassTransformer::new(&repo);
        transformer.rename_class("com/example/Missing", "com/example/Whatever");
        transformer.rename_field("com/example/Missing", "x", "y");
        transformer.rename_method("com/example/Missing", "m", "()V", "n");
        transformer.apply_transformations();
        assert_eq!(repo.program_class_count(), 2);
    }

    #[test]
    fn test_transform_methods_rewires_owner() {
        let repo = repo_with_reference();
        let transformer = ClassTransformer::new(&repo);

        transformer.transform_methods(|method| {
            if method.name() == "work" {
                let replacement =
                    ProgramMethod::new("work", "()V", MethodAccessFlags::PUBLIC | MethodAccessFlags::FINAL);
                std::sync::Arc::new(replacement)
            } else {
                method.clone()
            }
        });

        let target = repo.program_class("com/example/Target").unwrap();
        let replaced = target.method("work", "()V").unwrap();
        assert!(replaced.access().contains(MethodAccessFlags::FINAL));
        assert_eq!(replaced.owner().as_deref(), Some("com/example/Target"));
    }
}
