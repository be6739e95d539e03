//! The typed attribute model.
//!
//! Attributes are modeled as a closed enum-with-payload keyed by attribute kind, rather than
//! a string-named subtype hierarchy. Classification predicates (debug / runtime / structural)
//! derive from the tag and are never stored. Kinds the codec does not decode pass through as
//! [`Attribute::Raw`] so re-encoding can round-trip them untouched.

use crate::model::{ExceptionHandler, InnerClass, LineNumber, LocalVariable};

/// A bootstrap method record backing one or more dynamic call sites.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapMethod {
    /// Internal name of the class owning the bootstrap handler
    pub owner: String,
    /// Handler method name
    pub name: String,
    /// Handler method descriptor
    pub descriptor: String,
    /// Static bootstrap arguments, rendered as constant-pool strings
    pub arguments: Vec<String>,
}

/// A single method-parameter metadata record.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameter {
    /// Parameter name, absent when compiled without parameter metadata
    pub name: Option<String>,
    /// Parameter access flags (final/synthetic/mandated mask)
    pub access: u32,
}

/// A named typed attribute record attached to a class, field, or method.
///
/// # Examples
///
/// ```rust
/// use jarscope::model::Attribute;
///
/// let attr = Attribute::SourceFile("Main.java".to_string());
/// assert_eq!(attr.name(), "SourceFile");
/// assert!(attr.is_debug_info());
/// assert!(!attr.is_structural());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Bytecode-offset to source-line mapping.
    LineNumberTable(Vec<LineNumber>),
    /// Local-variable names and scopes.
    LocalVariableTable(Vec<LocalVariable>),
    /// Local-variable generic-type signatures and scopes.
    LocalVariableTypeTable(Vec<LocalVariable>),
    /// Declared (checked) exceptions of a method.
    Exceptions(Vec<String>),
    /// Inner-class records of a class.
    InnerClasses(Vec<InnerClass>),
    /// Bootstrap methods backing the class's dynamic call sites.
    BootstrapMethods(Vec<BootstrapMethod>),
    /// Method-parameter metadata.
    MethodParameters(Vec<MethodParameter>),
    /// The code body of a method.
    Code {
        /// Operand-stack size hint
        max_stack: u16,
        /// Local-variable slot count hint
        max_locals: u16,
        /// Exception-handler ranges covering the body
        handlers: Vec<ExceptionHandler>,
    },
    /// Generic signature.
    Signature(String),
    /// Source-file name of a class.
    SourceFile(String),
    /// Extended debug metadata of a class.
    SourceDebug(String),
    /// Marks a compiler-generated entity.
    Synthetic,
    /// Marks a deprecated entity.
    Deprecated,
    /// Runtime annotation metadata.
    RuntimeAnnotations {
        /// Whether the annotations are runtime-visible
        visible: bool,
    },
    /// An attribute kind the codec did not decode; passed through untouched.
    Raw {
        /// Attribute name as found in the class file
        name: String,
        /// Undecoded payload bytes
        data: Vec<u8>,
    },
}

impl Attribute {
    /// The class-file attribute name for this kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Attribute::LineNumberTable(_) => "LineNumberTable",
            Attribute::LocalVariableTable(_) => "LocalVariableTable",
            Attribute::LocalVariableTypeTable(_) => "LocalVariableTypeTable",
            Attribute::Exceptions(_) => "Exceptions",
            Attribute::InnerClasses(_) => "InnerClasses",
            Attribute::BootstrapMethods(_) => "BootstrapMethods",
            Attribute::MethodParameters(_) => "MethodParameters",
            Attribute::Code { .. } => "Code",
            Attribute::Signature(_) => "Signature",
            Attribute::SourceFile(_) => "SourceFile",
            Attribute::SourceDebug(_) => "SourceDebugExtension",
            Attribute::Synthetic => "Synthetic",
            Attribute::Deprecated => "Deprecated",
            Attribute::RuntimeAnnotations { visible: true } => "RuntimeVisibleAnnotations",
            Attribute::RuntimeAnnotations { visible: false } => "RuntimeInvisibleAnnotations",
            Attribute::Raw { name, .. } => name,
        }
    }

    /// Is this attribute debug metadata that can be stripped without changing behavior?
    #[must_use]
    pub fn is_debug_info(&self) -> bool {
        matches!(
            self,
            Attribute::LineNumberTable(_)
                | Attribute::LocalVariableTable(_)
                | Attribute::LocalVariableTypeTable(_)
                | Attribute::SourceFile(_)
                | Attribute::SourceDebug(_)
        )
    }

    /// Is this attribute structural - required to faithfully re-encode the entity?
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Attribute::Code { .. }
                | Attribute::Exceptions(_)
                | Attribute::InnerClasses(_)
                | Attribute::BootstrapMethods(_)
                | Attribute::MethodParameters(_)
                | Attribute::Signature(_)
        )
    }

    /// Is this attribute runtime-reflective metadata (annotations and markers)?
    #[must_use]
    pub fn is_runtime_metadata(&self) -> bool {
        matches!(
            self,
            Attribute::RuntimeAnnotations { .. } | Attribute::Synthetic | Attribute::Deprecated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names() {
        assert_eq!(Attribute::LineNumberTable(Vec::new()).name(), "LineNumberTable");
        assert_eq!(Attribute::Signature("Ljava/util/List<TT;>;".into()).name(), "Signature");
        assert_eq!(
            Attribute::RuntimeAnnotations { visible: true }.name(),
            "RuntimeVisibleAnnotations"
        );
        assert_eq!(
            Attribute::RuntimeAnnotations { visible: false }.name(),
            "RuntimeInvisibleAnnotations"
        );
        assert_eq!(
            Attribute::Raw {
                name: "CustomThing".into(),
                data: vec![1, 2, 3]
            }
            .name(),
            "CustomThing"
        );
    }

    #[test]
    fn test_classification_is_derived_from_tag() {
        let code = Attribute::Code {
            max_stack: 2,
            max_locals: 1,
            handlers: Vec::new(),
        };
        assert!(code.is_structural());
        assert!(!code.is_debug_info());
        assert!(!code.is_runtime_metadata());

        let lnt = Attribute::LineNumberTable(Vec::new());
        assert!(lnt.is_debug_info());
        assert!(!lnt.is_structural());

        let ann = Attribute::RuntimeAnnotations { visible: true };
        assert!(ann.is_runtime_metadata());
        assert!(!ann.is_debug_info());
    }
}
