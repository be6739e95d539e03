//! Unused-member detection, complexity scoring, and dead-code reachability.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::{opcodes, Instruction, Operand, ProgramMethodRc, ProgramRepository};

/// Opcodes counted as decision points: the conditional branch family, `goto`/`jsr`, both
/// switches, and the null tests.
const DECISION_OPCODES: [i32; 20] = [
    153, 154, 155, 156, 157, 158, 159, 160, 161, 162, 163, 164, 165, 166, 167, 168, 170, 171,
    198, 199,
];

/// Finds members nothing references and methods with unreachable instructions.
///
/// All detection here is syntactic: method usage is method-reference operands plus a naming
/// heuristic for entry points, field usage is field-reference operands, and dead-code
/// reachability follows fallthrough and branch edges only. None of it is whole-program
/// reachability; results are candidates for inspection, not safe-to-delete facts.
///
/// Method keys are `Owner.name+descriptor`; field keys are `Owner.name`.
#[derive(Debug, Default)]
pub struct UnusedCodeAnalyzer;

impl UnusedCodeAnalyzer {
    /// Creates a new analyzer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Methods no instruction references and no entry-point heuristic protects.
    ///
    /// The entry-point heuristic treats a method as externally invoked when it is public
    /// and is named `main`, is a constructor, or carries a `get`/`set`/`is` accessor
    /// prefix. A naming-based proxy for true reachability - reflective call sites are
    /// invisible here.
    #[must_use]
    pub fn find_unused_methods(&self, repository: &ProgramRepository) -> HashSet<String> {
        let mut all_methods = HashSet::new();
        let mut referenced = HashSet::new();

        for class in repository.program_classes() {
            for method in class.methods() {
                let key = format!("{}.{}{}", class.name(), method.name(), method.descriptor());
                all_methods.insert(key.clone());
                if Self::is_entry_point(&method) {
                    referenced.insert(key);
                }
            }
        }

        for class in repository.program_classes() {
            for method in class.methods() {
                for instruction in method.instructions() {
                    if let Operand::Method { owner, name, descriptor } = &instruction.operand {
                        referenced.insert(format!("{owner}.{name}{descriptor}"));
                    }
                }
            }
        }

        all_methods.difference(&referenced).cloned().collect()
    }

    /// Fields no instruction references. No entry-point seeding applies to fields.
    #[must_use]
    pub fn find_unused_fields(&self, repository: &ProgramRepository) -> HashSet<String> {
        let mut all_fields = HashSet::new();
        let mut referenced = HashSet::new();

        for class in repository.program_classes() {
            for field in class.fields() {
                all_fields.insert(format!("{}.{}", class.name(), field.name()));
            }
        }

        for class in repository.program_classes() {
            for method in class.methods() {
                for instruction in method.instructions() {
                    if let Operand::Field { owner, name, .. } = &instruction.operand {
                        referenced.insert(format!("{owner}.{name}"));
                    }
                }
            }
        }

        all_fields.difference(&referenced).cloned().collect()
    }

    fn is_entry_point(method: &ProgramMethodRc) -> bool {
        let name = method.name();
        method.is_public()
            && (name == "main"
                || method.is_constructor()
                || name.starts_with("get")
                || name.starts_with("set")
                || name.starts_with("is"))
    }

    /// Decision-point complexity score of every method, keyed by full method name.
    #[must_use]
    pub fn method_complexity(&self, repository: &ProgramRepository) -> HashMap<String, u32> {
        let mut complexity = HashMap::new();
        for class in repository.program_classes() {
            for method in class.methods() {
                complexity.insert(method.full_name(), Self::calculate_complexity(&method));
            }
        }
        complexity
    }

    /// 1 + number of decision-point instructions. An approximation of cyclomatic
    /// complexity over the flat sequence, not a control-flow-graph count.
    fn calculate_complexity(method: &ProgramMethodRc) -> u32 {
        let decisions = method
            .instructions()
            .iter()
            .filter(|instruction| DECISION_OPCODES.contains(&instruction.opcode))
            .count();
        1 + u32::try_from(decisions).unwrap_or(u32::MAX - 1)
    }

    /// Methods containing instructions unreachable from the method entry.
    ///
    /// Reachability is a breadth-first search from instruction 0 over fallthrough and
    /// branch-target edges. Exception-handler entries are not edge sources, so a handler
    /// block reachable only through an exception edge reports as dead - a documented
    /// limitation of this analysis.
    #[must_use]
    pub fn find_dead_code(&self, repository: &ProgramRepository) -> HashSet<String> {
        let mut dead = HashSet::new();
        for class in repository.program_classes() {
            for method in class.methods() {
                if Self::has_unreachable_code(&method.instructions()) {
                    dead.insert(method.full_name());
                }
            }
        }
        dead
    }

    fn has_unreachable_code(instructions: &[Instruction]) -> bool {
        if instructions.is_empty() {
            return false;
        }

        // Label id -> index, for resolving branch targets.
        let mut label_indices = HashMap::new();
        for (index, instruction) in instructions.iter().enumerate() {
            if let Operand::Label(id) = instruction.operand {
                label_indices.insert(id, index);
            }
        }

        let mut reachable = HashSet::new();
        let mut queue = VecDeque::new();
        reachable.insert(0);
        queue.push_back(0);

        while let Some(index) = queue.pop_front() {
            let instruction = &instructions[index];

            if !instruction.is_unconditional_transfer() && index + 1 < instructions.len() {
                let next = index + 1;
                if reachable.insert(next) {
                    queue.push_back(next);
                }
            }

            let mut targets = Vec::new();
            match &instruction.operand {
                Operand::Jump(label) => targets.push(*label),
                Operand::Switch { default, targets: cases } => {
                    targets.push(*default);
                    targets.extend(cases);
                }
                _ => {}
            }
            for label in targets {
                if let Some(&target) = label_indices.get(&label) {
                    if reachable.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }

        reachable.len() < instructions.len()
    }

    /// The `limit` largest methods by instruction count, descending. Ties break on the
    /// method key so the result is deterministic.
    #[must_use]
    pub fn largest_methods(&self, repository: &ProgramRepository, limit: usize) -> Vec<String> {
        let mut sizes: Vec<(String, usize)> = repository
            .program_classes()
            .iter()
            .flat_map(|class| {
                class
                    .methods()
                    .into_iter()
                    .map(|method| (method.full_name(), method.instruction_count()))
            })
            .collect();
        sizes.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sizes.truncate(limit);
        sizes.into_iter().map(|(key, _)| key).collect()
    }
}
