//! The instruction model: opcode plus decoded operand payload.
//!
//! An [`Instruction`] pairs an integer opcode with an [`Operand`] describing the decoded
//! payload the codec attached to it. Pseudo-instructions (labels, stack-map frames, line
//! markers) carry the [`NO_OPCODE`] sentinel. Instruction position within a method is
//! list-index based: removing an instruction shifts every subsequent index down by one.
//!
//! Unknown opcodes never fail - they render as `UNKNOWN` (for the sentinel) or
//! `UNKNOWN_{n}` so diagnostics stay total over arbitrary codec output.

use std::fmt;

use strum::Display;

/// Sentinel opcode carried by pseudo-instructions (labels, frames, line markers).
pub const NO_OPCODE: i32 = -1;

/// Identifier for a label pseudo-instruction.
///
/// Jump and switch operands reference their targets by label id; the label itself occupies
/// an index in the instruction list like any other instruction.
pub type LabelId = u32;

/// A constant operand loaded by an `ldc`-family instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantOperand {
    /// An integer constant.
    Int(i32),
    /// A long constant.
    Long(i64),
    /// A float constant.
    Float(f32),
    /// A double constant.
    Double(f64),
    /// A string constant.
    String(String),
    /// A type-literal constant; the payload is the internal class name.
    Class(String),
}

/// The decoded operand payload of an instruction.
///
/// Each variant corresponds to one operand kind the codec can produce. Kinds not relevant
/// to a given analysis simply contribute nothing - dependency extraction, for example, only
/// inspects type, field-reference, method-reference, dynamic-call-site, constant, and
/// multi-array operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand.
    None,
    /// A type operand (`new`, `checkcast`, `instanceof`, `anewarray`); internal class name
    /// or array descriptor.
    Type(String),
    /// A field reference (`getfield`, `putfield`, `getstatic`, `putstatic`).
    Field {
        /// Internal name of the class owning the field
        owner: String,
        /// Field name
        name: String,
        /// Field type descriptor
        descriptor: String,
    },
    /// A method reference (`invokevirtual`, `invokespecial`, `invokestatic`,
    /// `invokeinterface`).
    Method {
        /// Internal name of the class owning the method
        owner: String,
        /// Method name
        name: String,
        /// Method descriptor
        descriptor: String,
    },
    /// A local-variable index operand (`iload`, `astore`, `ret`, ...).
    Var(u16),
    /// An immediate integer operand (`bipush`, `sipush`, `newarray`).
    Int(i32),
    /// A constant-pool operand (`ldc` family).
    Constant(ConstantOperand),
    /// A jump target (`goto`, `jsr`, and the conditional branch family).
    Jump(LabelId),
    /// A multi-dimensional array allocation (`multianewarray`).
    MultiArray {
        /// Array type descriptor
        descriptor: String,
        /// Number of dimensions to allocate
        dimensions: u8,
    },
    /// A dynamic call site (`invokedynamic`).
    InvokeDynamic {
        /// Call-site name
        name: String,
        /// Call-site method descriptor
        descriptor: String,
    },
    /// A switch dispatch (`tableswitch`, `lookupswitch`).
    Switch {
        /// Default branch target
        default: LabelId,
        /// Case branch targets
        targets: Vec<LabelId>,
    },
    /// A label pseudo-instruction marking a branch target position.
    Label(LabelId),
    /// A stack-map frame pseudo-instruction.
    Frame,
    /// A line-number marker pseudo-instruction.
    Line(u32),
}

/// The operand kind tag, derived from the payload variant.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// No operand
    None,
    /// Type operand
    Type,
    /// Field reference
    FieldRef,
    /// Method reference
    MethodRef,
    /// Local-variable index
    VarIndex,
    /// Immediate integer
    IntOperand,
    /// Constant-pool value
    Constant,
    /// Jump target
    JumpTarget,
    /// Multi-dimensional array allocation
    MultiArray,
    /// Dynamic call site
    DynamicCallSite,
    /// Switch dispatch
    Switch,
    /// Label pseudo-instruction
    Label,
    /// Stack-map frame pseudo-instruction
    Frame,
    /// Line-number marker pseudo-instruction
    LineMarker,
}

impl Operand {
    /// The kind tag for this operand payload.
    #[must_use]
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::None => OperandKind::None,
            Operand::Type(_) => OperandKind::Type,
            Operand::Field { .. } => OperandKind::FieldRef,
            Operand::Method { .. } => OperandKind::MethodRef,
            Operand::Var(_) => OperandKind::VarIndex,
            Operand::Int(_) => OperandKind::IntOperand,
            Operand::Constant(_) => OperandKind::Constant,
            Operand::Jump(_) => OperandKind::JumpTarget,
            Operand::MultiArray { .. } => OperandKind::MultiArray,
            Operand::InvokeDynamic { .. } => OperandKind::DynamicCallSite,
            Operand::Switch { .. } => OperandKind::Switch,
            Operand::Label(_) => OperandKind::Label,
            Operand::Frame => OperandKind::Frame,
            Operand::Line(_) => OperandKind::LineMarker,
        }
    }
}

/// A single instruction in a method's linear sequence.
///
/// # Examples
///
/// ```rust
/// use jarscope::model::{Instruction, Operand, opcodes};
///
/// let ret = Instruction::new(opcodes::RETURN);
/// assert_eq!(ret.opcode_name(), "RETURN");
/// assert_eq!(ret.to_string(), "RETURN (177)");
///
/// let call = Instruction::with_operand(
///     opcodes::INVOKEVIRTUAL,
///     Operand::Method {
///         owner: "java/io/PrintStream".into(),
///         name: "println".into(),
///         descriptor: "(Ljava/lang/String;)V".into(),
///     },
/// );
/// assert!(call.is_method_ref());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The opcode; [`NO_OPCODE`] for pseudo-instructions.
    pub opcode: i32,
    /// The decoded operand payload.
    pub operand: Operand,
}

impl Instruction {
    /// Creates an instruction with no operand.
    #[must_use]
    pub fn new(opcode: i32) -> Self {
        Self {
            opcode,
            operand: Operand::None,
        }
    }

    /// Creates an instruction with the given operand payload.
    #[must_use]
    pub fn with_operand(opcode: i32, operand: Operand) -> Self {
        Self { opcode, operand }
    }

    /// Creates a label pseudo-instruction.
    #[must_use]
    pub fn label(id: LabelId) -> Self {
        Self::with_operand(NO_OPCODE, Operand::Label(id))
    }

    /// Creates a line-number marker pseudo-instruction.
    #[must_use]
    pub fn line(line: u32) -> Self {
        Self::with_operand(NO_OPCODE, Operand::Line(line))
    }

    /// The operand kind tag.
    #[must_use]
    pub fn kind(&self) -> OperandKind {
        self.operand.kind()
    }

    /// The mnemonic for this instruction's opcode.
    #[must_use]
    pub fn opcode_name(&self) -> String {
        opcode_name(self.opcode)
    }

    /// Is this a field-reference instruction?
    #[must_use]
    pub fn is_field_ref(&self) -> bool {
        matches!(self.operand, Operand::Field { .. })
    }

    /// Is this a method-reference instruction?
    #[must_use]
    pub fn is_method_ref(&self) -> bool {
        matches!(self.operand, Operand::Method { .. })
    }

    /// Is this a jump instruction (conditional or unconditional)?
    #[must_use]
    pub fn is_jump(&self) -> bool {
        matches!(self.operand, Operand::Jump(_))
    }

    /// Is this a switch dispatch?
    #[must_use]
    pub fn is_switch(&self) -> bool {
        matches!(self.operand, Operand::Switch { .. })
    }

    /// Is this a label pseudo-instruction?
    #[must_use]
    pub fn is_label(&self) -> bool {
        matches!(self.operand, Operand::Label(_))
    }

    /// Is this one of the return-family instructions (`ireturn` .. `return`)?
    #[must_use]
    pub fn is_return(&self) -> bool {
        (opcodes::IRETURN..=opcodes::RETURN).contains(&self.opcode)
    }

    /// Does control never fall through to the next instruction?
    ///
    /// True for `goto`/`goto_w`, the return family, `athrow`, and both switch forms.
    /// Conditional branches and `jsr` keep their fallthrough edge.
    #[must_use]
    pub fn is_unconditional_transfer(&self) -> bool {
        matches!(
            self.opcode,
            opcodes::GOTO
                | opcodes::GOTO_W
                | opcodes::ATHROW
                | opcodes::TABLESWITCH
                | opcodes::LOOKUPSWITCH
        ) || self.is_return()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.opcode_name(), self.opcode)
    }
}

/// Returns the mnemonic for an opcode.
///
/// This is a pure diagnostic surface with no side effects: the reserved sentinel
/// [`NO_OPCODE`] maps to `UNKNOWN`, and any other value outside the known table maps to
/// `UNKNOWN_{n}` rather than failing.
///
/// # Examples
///
/// ```rust
/// use jarscope::model::opcode_name;
///
/// assert_eq!(opcode_name(177), "RETURN");
/// assert_eq!(opcode_name(-1), "UNKNOWN");
/// assert_eq!(opcode_name(999), "UNKNOWN_999");
/// ```
#[must_use]
pub fn opcode_name(opcode: i32) -> String {
    if opcode == NO_OPCODE {
        return "UNKNOWN".to_string();
    }
    match usize::try_from(opcode).ok().and_then(|op| MNEMONICS.get(op)) {
        Some(name) => (*name).to_string(),
        None => format!("UNKNOWN_{opcode}"),
    }
}

/// JVM opcode constants used throughout the crate.
///
/// Only the opcodes the analyses and transformations inspect by name are spelled out;
/// everything else is still representable as a plain integer.
pub mod opcodes {
    /// No operation.
    pub const NOP: i32 = 0;
    /// Push `null`.
    pub const ACONST_NULL: i32 = 1;
    /// Push int constant 0.
    pub const ICONST_0: i32 = 3;
    /// Push a constant-pool entry.
    pub const LDC: i32 = 18;
    /// Load int from local variable.
    pub const ILOAD: i32 = 21;
    /// Load reference from local variable.
    pub const ALOAD: i32 = 25;
    /// Store reference into local variable.
    pub const ASTORE: i32 = 58;
    /// Branch if int equals zero.
    pub const IFEQ: i32 = 153;
    /// Branch if int not equal to zero.
    pub const IFNE: i32 = 154;
    /// Branch if int comparison eq succeeds.
    pub const IF_ICMPEQ: i32 = 159;
    /// Unconditional branch.
    pub const GOTO: i32 = 167;
    /// Jump to subroutine.
    pub const JSR: i32 = 168;
    /// Return from subroutine.
    pub const RET: i32 = 169;
    /// Table-indexed switch dispatch.
    pub const TABLESWITCH: i32 = 170;
    /// Key-matched switch dispatch.
    pub const LOOKUPSWITCH: i32 = 171;
    /// Return int.
    pub const IRETURN: i32 = 172;
    /// Return void.
    pub const RETURN: i32 = 177;
    /// Get static field.
    pub const GETSTATIC: i32 = 178;
    /// Put static field.
    pub const PUTSTATIC: i32 = 179;
    /// Get instance field.
    pub const GETFIELD: i32 = 180;
    /// Put instance field.
    pub const PUTFIELD: i32 = 181;
    /// Invoke instance method (dispatch on class).
    pub const INVOKEVIRTUAL: i32 = 182;
    /// Invoke instance method (direct).
    pub const INVOKESPECIAL: i32 = 183;
    /// Invoke static method.
    pub const INVOKESTATIC: i32 = 184;
    /// Invoke interface method.
    pub const INVOKEINTERFACE: i32 = 185;
    /// Invoke dynamic call site.
    pub const INVOKEDYNAMIC: i32 = 186;
    /// Create new object.
    pub const NEW: i32 = 187;
    /// Throw exception.
    pub const ATHROW: i32 = 191;
    /// Check cast.
    pub const CHECKCAST: i32 = 192;
    /// Instance-of test.
    pub const INSTANCEOF: i32 = 193;
    /// Create new multi-dimensional array.
    pub const MULTIANEWARRAY: i32 = 197;
    /// Branch if reference is null.
    pub const IFNULL: i32 = 198;
    /// Branch if reference is not null.
    pub const IFNONNULL: i32 = 199;
    /// Unconditional branch (wide offset).
    pub const GOTO_W: i32 = 200;
}

/// Mnemonic table indexed by opcode value.
static MNEMONICS: [&str; 202] = [
    "NOP",
    "ACONST_NULL",
    "ICONST_M1",
    "ICONST_0",
    "ICONST_1",
    "ICONST_2",
    "ICONST_3",
    "ICONST_4",
    "ICONST_5",
    "LCONST_0",
    "LCONST_1",
    "FCONST_0",
    "FCONST_1",
    "FCONST_2",
    "DCONST_0",
    "DCONST_1",
    "BIPUSH",
    "SIPUSH",
    "LDC",
    "LDC_W",
    "LDC2_W",
    "ILOAD",
    "LLOAD",
    "FLOAD",
    "DLOAD",
    "ALOAD",
    "ILOAD_0",
    "ILOAD_1",
    "ILOAD_2",
    "ILOAD_3",
    "LLOAD_0",
    "LLOAD_1",
    "LLOAD_2",
    "LLOAD_3",
    "FLOAD_0",
    "FLOAD_1",
    "FLOAD_2",
    "FLOAD_3",
    "DLOAD_0",
    "DLOAD_1",
    "DLOAD_2",
    "DLOAD_3",
    "ALOAD_0",
    "ALOAD_1",
    "ALOAD_2",
    "ALOAD_3",
    "IALOAD",
    "LALOAD",
    "FALOAD",
    "DALOAD",
    "AALOAD",
    "BALOAD",
    "CALOAD",
    "SALOAD",
    "ISTORE",
    "LSTORE",
    "FSTORE",
    "DSTORE",
    "ASTORE",
    "ISTORE_0",
    "ISTORE_1",
    "ISTORE_2",
    "ISTORE_3",
    "LSTORE_0",
    "LSTORE_1",
    "LSTORE_2",
    "LSTORE_3",
    "FSTORE_0",
    "FSTORE_1",
    "FSTORE_2",
    "FSTORE_3",
    "DSTORE_0",
    "DSTORE_1",
    "DSTORE_2",
    "DSTORE_3",
    "ASTORE_0",
    "ASTORE_1",
    "ASTORE_2",
    "ASTORE_3",
    "IASTORE",
    "LASTORE",
    "FASTORE",
    "DASTORE",
    "AASTORE",
    "BASTORE",
    "CASTORE",
    "SASTORE",
    "POP",
    "POP2",
    "DUP",
    "DUP_X1",
    "DUP_X2",
    "DUP2",
    "DUP2_X1",
    "DUP2_X2",
    "SWAP",
    "IADD",
    "LADD",
    "FADD",
    "DADD",
    "ISUB",
    "LSUB",
    "FSUB",
    "DSUB",
    "IMUL",
    "LMUL",
    "FMUL",
    "DMUL",
    "IDIV",
    "LDIV",
    "FDIV",
    "DDIV",
    "IREM",
    "LREM",
    "FREM",
    "DREM",
    "INEG",
    "LNEG",
    "FNEG",
    "DNEG",
    "ISHL",
    "LSHL",
    "ISHR",
    "LSHR",
    "IUSHR",
    "LUSHR",
    "IAND",
    "LAND",
    "IOR",
    "LOR",
    "IXOR",
    "LXOR",
    "IINC",
    "I2L",
    "I2F",
    "I2D",
    "L2I",
    "L2F",
    "L2D",
    "F2I",
    "F2L",
    "F2D",
    "D2I",
    "D2L",
    "D2F",
    "I2B",
    "I2C",
    "I2S",
    "LCMP",
    "FCMPL",
    "FCMPG",
    "DCMPL",
    "DCMPG",
    "IFEQ",
    "IFNE",
    "IFLT",
    "IFGE",
    "IFGT",
    "IFLE",
    "IF_ICMPEQ",
    "IF_ICMPNE",
    "IF_ICMPLT",
    "IF_ICMPGE",
    "IF_ICMPGT",
    "IF_ICMPLE",
    "IF_ACMPEQ",
    "IF_ACMPNE",
    "GOTO",
    "JSR",
    "RET",
    "TABLESWITCH",
    "LOOKUPSWITCH",
    "IRETURN",
    "LRETURN",
    "FRETURN",
    "DRETURN",
    "ARETURN",
    "RETURN",
    "GETSTATIC",
    "PUTSTATIC",
    "GETFIELD",
    "PUTFIELD",
    "INVOKEVIRTUAL",
    "INVOKESPECIAL",
    "INVOKESTATIC",
    "INVOKEINTERFACE",
    "INVOKEDYNAMIC",
    "NEW",
    "NEWARRAY",
    "ANEWARRAY",
    "ARRAYLENGTH",
    "ATHROW",
    "CHECKCAST",
    "INSTANCEOF",
    "MONITORENTER",
    "MONITOREXIT",
    "WIDE",
    "MULTIANEWARRAY",
    "IFNULL",
    "IFNONNULL",
    "GOTO_W",
    "JSR_W",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_names() {
        assert_eq!(opcode_name(1), "ACONST_NULL");
        assert_eq!(opcode_name(3), "ICONST_0");
        assert_eq!(opcode_name(177), "RETURN");
        assert_eq!(opcode_name(182), "INVOKEVIRTUAL");
        assert_eq!(opcode_name(187), "NEW");
        assert_eq!(opcode_name(201), "JSR_W");
        assert_eq!(opcode_name(-1), "UNKNOWN");
        assert_eq!(opcode_name(999), "UNKNOWN_999");
        assert_eq!(opcode_name(-42), "UNKNOWN_-42");
    }

    #[test]
    fn test_display() {
        let insn = Instruction::new(opcodes::RETURN);
        assert_eq!(insn.to_string(), "RETURN (177)");
        let insn = Instruction::new(opcodes::ACONST_NULL);
        assert_eq!(insn.to_string(), "ACONST_NULL (1)");
    }

    #[test]
    fn test_operand_kind_tags() {
        assert_eq!(Instruction::new(opcodes::NOP).kind(), OperandKind::None);
        assert_eq!(Instruction::label(1).kind(), OperandKind::Label);
        assert_eq!(Instruction::line(42).kind(), OperandKind::LineMarker);

        let insn = Instruction::with_operand(
            opcodes::GETFIELD,
            Operand::Field {
                owner: "com/example/A".into(),
                name: "value".into(),
                descriptor: "I".into(),
            },
        );
        assert_eq!(insn.kind(), OperandKind::FieldRef);
        assert!(insn.is_field_ref());
        assert!(!insn.is_method_ref());
    }

    #[test]
    fn test_control_flow_predicates() {
        assert!(Instruction::with_operand(opcodes::GOTO, Operand::Jump(0)).is_unconditional_transfer());
        assert!(Instruction::new(opcodes::RETURN).is_unconditional_transfer());
        assert!(Instruction::new(opcodes::ATHROW).is_unconditional_transfer());
        assert!(!Instruction::with_operand(opcodes::IFEQ, Operand::Jump(0)).is_unconditional_transfer());
        assert!(!Instruction::with_operand(opcodes::JSR, Operand::Jump(0)).is_unconditional_transfer());

        assert!(Instruction::new(opcodes::IRETURN).is_return());
        assert!(Instruction::new(opcodes::RETURN).is_return());
        assert!(!Instruction::new(opcodes::GOTO).is_return());
    }
}
