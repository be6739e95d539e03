//! Class-level dependency extraction and graph queries.

use std::collections::{BTreeSet, HashMap, HashSet};

use rayon::prelude::*;

use crate::model::{
    object_types, ConstantOperand, Operand, ProgramClassRc, ProgramMethodRc, ProgramRepository,
};

/// Extracts and queries the class-reference graph of a repository.
///
/// Dependency sets are qualified class names gathered syntactically from declarations and
/// instruction operands; they are an under-approximation of true runtime coupling
/// (reflection is invisible to it). Graph queries operate on program classes only - edges
/// into library classes are recorded in the per-class sets but ignored by order/cycle
/// computations.
///
/// # Examples
///
/// ```rust
/// use jarscope::prelude::*;
///
/// let repo = ProgramRepository::new();
/// let class = ProgramClass::new("com/example/Child");
/// class.set_super_name(Some("com/example/Base".into()));
/// repo.add_class(class);
/// repo.add_class(ProgramClass::new("com/example/Base"));
///
/// let analyzer = DependencyAnalyzer::new();
/// let graph = analyzer.build_dependency_graph(&repo);
/// assert!(graph["com/example/Child"].contains("com/example/Base"));
/// ```
#[derive(Debug, Default)]
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// Creates a new analyzer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Every class name the given class references: its supertype, its interfaces, and the
    /// union of its methods' dependencies.
    #[must_use]
    pub fn find_class_dependencies(&self, class: &ProgramClassRc) -> HashSet<String> {
        let mut dependencies = HashSet::new();
        if let Some(super_name) = class.super_name() {
            dependencies.insert(super_name);
        }
        dependencies.extend(class.interfaces());
        for method in class.methods() {
            dependencies.extend(self.find_method_dependencies(&method));
        }
        dependencies
    }

    /// Every class name referenced from the method's instruction operands.
    ///
    /// Type and multi-array operands contribute their name/descriptor string verbatim;
    /// field and method references contribute their owner; type-literal constants
    /// contribute the named class; dynamic call sites contribute the object-sorted
    /// argument and return types of their descriptor. All other operand kinds contribute
    /// nothing.
    #[must_use]
    pub fn find_method_dependencies(&self, method: &ProgramMethodRc) -> HashSet<String> {
        let mut dependencies = HashSet::new();
        for instruction in method.instructions() {
            match &instruction.operand {
                Operand::Type(name) => {
                    dependencies.insert(name.clone());
                }
                Operand::Field { owner, .. } | Operand::Method { owner, .. } => {
                    dependencies.insert(owner.clone());
                }
                Operand::Constant(ConstantOperand::Class(name)) => {
                    dependencies.insert(name.clone());
                }
                Operand::MultiArray { descriptor, .. } => {
                    dependencies.insert(descriptor.clone());
                }
                Operand::InvokeDynamic { descriptor, .. } => {
                    dependencies.extend(object_types(descriptor));
                }
                _ => {}
            }
        }
        dependencies
    }

    /// Builds the full dependency graph: one entry per program class, computed in
    /// parallel. The result is a plain snapshot; later repository mutations do not
    /// affect it.
    #[must_use]
    pub fn build_dependency_graph(
        &self,
        repository: &ProgramRepository,
    ) -> HashMap<String, HashSet<String>> {
        repository
            .program_classes()
            .par_iter()
            .map(|class| (class.name(), self.find_class_dependencies(class)))
            .collect()
    }

    /// Program classes no other class references: names with zero in-degree in the
    /// dependency graph.
    ///
    /// A static syntactic under-approximation - entry classes invoked externally or via
    /// reflection show up here too.
    #[must_use]
    pub fn find_unused_classes(&self, repository: &ProgramRepository) -> HashSet<String> {
        let graph = self.build_dependency_graph(repository);
        let referenced: HashSet<&String> = graph.values().flatten().collect();
        graph
            .keys()
            .filter(|name| !referenced.contains(*name))
            .cloned()
            .collect()
    }

    /// Program classes that participate in a reference cycle.
    ///
    /// Runs a depth-first search with a recursion stack over a single visited set shared
    /// across all roots; an edge into a class currently on the stack marks both endpoints
    /// cyclic. Soundness holds for the union of all searches, but a class visited under
    /// one root is not re-examined as a later root, so some cycle members can go
    /// unreported. Roots are taken in sorted-name order so results are deterministic.
    #[must_use]
    pub fn find_circular_dependencies(&self, repository: &ProgramRepository) -> HashSet<String> {
        let graph = self.build_dependency_graph(repository);
        let mut roots: Vec<&String> = graph.keys().collect();
        roots.sort_unstable();

        let mut visited = HashSet::new();
        let mut cyclic = HashSet::new();
        for root in roots {
            if !visited.contains(root.as_str()) {
                let mut stack = HashSet::new();
                Self::visit(root, &graph, &mut visited, &mut stack, &mut cyclic);
            }
        }
        cyclic
    }

    fn visit(
        name: &str,
        graph: &HashMap<String, HashSet<String>>,
        visited: &mut HashSet<String>,
        stack: &mut HashSet<String>,
        cyclic: &mut HashSet<String>,
    ) {
        visited.insert(name.to_string());
        stack.insert(name.to_string());
        if let Some(dependencies) = graph.get(name) {
            for dependency in dependencies {
                if !graph.contains_key(dependency) {
                    continue;
                }
                if stack.contains(dependency) {
                    cyclic.insert(name.to_string());
                    cyclic.insert(dependency.clone());
                } else if !visited.contains(dependency) {
                    Self::visit(dependency, graph, visited, stack, cyclic);
                }
            }
        }
        stack.remove(name);
    }

    /// A dependency-respecting order of the program classes: whenever B depends on A and
    /// both are program classes, A precedes B.
    ///
    /// Kahn's algorithm restricted to program classes; edges leaving the program set are
    /// ignored. Classes inside a cycle never reach zero remaining dependencies and are
    /// silently omitted, so the result can be shorter than the class count. The ready
    /// queue drains in sorted-name order, making the result deterministic; ordering among
    /// independent classes carries no meaning beyond that.
    #[must_use]
    pub fn topological_order(&self, repository: &ProgramRepository) -> Vec<String> {
        let graph = self.build_dependency_graph(repository);

        // Remaining internal-dependency count per class, plus reverse edges for decrement.
        let mut remaining: HashMap<&String, usize> = HashMap::new();
        let mut dependents: HashMap<&String, Vec<&String>> = HashMap::new();
        for (name, dependencies) in &graph {
            let internal = dependencies.iter().filter(|dep| graph.contains_key(*dep));
            let mut count = 0;
            for dependency in internal {
                count += 1;
                dependents.entry(dependency).or_default().push(name);
            }
            remaining.insert(name, count);
        }

        let mut ready: BTreeSet<&String> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut order = Vec::with_capacity(graph.len());
        while let Some(name) = ready.pop_first() {
            order.push(name.clone());
            if let Some(dependents) = dependents.get(name) {
                for dependent in dependents {
                    let count = remaining.get_mut(*dependent).map(|c| {
                        *c -= 1;
                        *c
                    });
                    if count == Some(0) {
                        ready.insert(dependent);
                    }
                }
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{opcodes, Instruction, MethodAccessFlags, ProgramClass, ProgramMethod};
    use crate::test::{class_with_super, method_calling, repository_with};

    #[test]
    fn test_class_dependencies_are_declarations_plus_methods() {
        let class = ProgramClass::new("com/example/C");
        class.set_super_name(Some("com/example/S".into()));
        class.add_interface("com/example/I1");
        class.add_interface("com/example/I2");
        let class = std::sync::Arc::new(class);

        let deps = DependencyAnalyzer::new().find_class_dependencies(&class);
        let expected: HashSet<String> = ["com/example/S", "com/example/I1", "com/example/I2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(deps, expected);
    }

    #[test]
    fn test_method_dependencies_by_operand_kind() {
        let method = std::sync::Arc::new(ProgramMethod::new("run", "()V", MethodAccessFlags::PUBLIC));
        method.add_instruction(Instruction::with_operand(
            opcodes::NEW,
            Operand::Type("com/example/Widget".into()),
        ));
        method.add_instruction(Instruction::with_operand(
            opcodes::GETFIELD,
            Operand::Field {
                owner: "com/example/Holder".into(),
                name: "value".into(),
                descriptor: "I".into(),
            },
        ));
        method.add_instruction(Instruction::with_operand(
            opcodes::LDC,
            Operand::Constant(ConstantOperand::Class("com/example/Literal".into())),
        ));
        method.add_instruction(Instruction::with_operand(
            opcodes::INVOKEDYNAMIC,
            Operand::InvokeDynamic {
                name: "apply".into(),
                descriptor: "(Lcom/example/Arg;I)Lcom/example/Ret;".into(),
            },
        ));
        // Var and Int operands contribute nothing.
        method.add_instruction(Instruction::with_operand(opcodes::ILOAD, Operand::Var(1)));

        let deps = DependencyAnalyzer::new().find_method_dependencies(&method);
        let expected: HashSet<String> = [
            "com/example/Widget",
            "com/example/Holder",
            "com/example/Literal",
            "com/example/Arg",
            "com/example/Ret",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(deps, expected);
    }

    #[test]
    fn test_graph_has_one_entry_per_program_class() {
        let repo = repository_with(&["a/A", "b/B", "c/C"]);
        let graph = DependencyAnalyzer::new().build_dependency_graph(&repo);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_unused_classes_have_zero_in_degree() {
        let repo = ProgramRepository::new();
        repo.add_class(ProgramClass::new("com/example/A"));
        let b = class_with_super("com/example/B", "java/lang/Object");
        b.add_method(method_calling("use", "com/example/A"));
        repo.add_class(b);
        repo.add_class(ProgramClass::new("com/example/C"));

        let unused = DependencyAnalyzer::new().find_unused_classes(&repo);
        let expected: HashSet<String> =
            ["com/example/B", "com/example/C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(unused, expected);
    }

    #[test]
    fn test_two_cycle_is_detected_exactly() {
        let repo = ProgramRepository::new();
        let d = std::sync::Arc::new(ProgramClass::new("com/example/D"));
        d.add_method(method_calling("useE", "com/example/E"));
        repo.add_class(d);
        let e = std::sync::Arc::new(ProgramClass::new("com/example/E"));
        e.add_method(method_calling("useD", "com/example/D"));
        repo.add_class(e);

        let cyclic = DependencyAnalyzer::new().find_circular_dependencies(&repo);
        let expected: HashSet<String> =
            ["com/example/D", "com/example/E"].iter().map(|s| s.to_string()).collect();
        assert_eq!(cyclic, expected);
    }

    #[test]
    fn test_topological_order_puts_dependencies_first() {
        let repo = ProgramRepository::new();
        repo.add_class(class_with_super("com/example/A", "java/lang/Object"));
        repo.add_class(class_with_super("com/example/B", "com/example/A"));
        repo.add_class(class_with_super("com/example/C", "com/example/B"));

        let order = DependencyAnalyzer::new().topological_order(&repo);
        assert_eq!(
            order,
            vec![
                "com/example/A".to_string(),
                "com/example/B".to_string(),
                "com/example/C".to_string()
            ]
        );
    }

    #[test]
    fn test_topological_order_omits_cycle_members() {
        let repo = ProgramRepository::new();
        repo.add_class(class_with_super("com/example/D", "com/example/E"));
        repo.add_class(class_with_super("com/example/E", "com/example/D"));
        repo.add_class(ProgramClass::new("com/example/Free"));

        let order = DependencyAnalyzer::new().topological_order(&repo);
        assert_eq!(order, vec!["com/example/Free".to_string()]);
    }
}
