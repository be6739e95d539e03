//! Field entities: mutable program fields and read-only library fields.

use std::sync::{Arc, RwLock};

use crate::model::{lock_read, lock_write, Attribute, FieldAccessFlags};

/// Reference-counted handle to a [`ProgramField`].
pub type ProgramFieldRc = Arc<ProgramField>;

/// Reference-counted handle to a [`LibraryField`].
pub type LibraryFieldRc = Arc<LibraryField>;

/// A compile-time constant value attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// An integer constant (also covers boolean/byte/char/short).
    Int(i32),
    /// A long constant.
    Long(i64),
    /// A float constant.
    Float(f32),
    /// A double constant.
    Double(f64),
    /// A string constant.
    String(String),
}

/// A mutable field of a program class.
///
/// The owner back-reference is a lookup key (the owning class's qualified name), not a live
/// pointer; it is set and cleared by the owning class on add/remove and kept current when the
/// class is renamed.
///
/// # Examples
///
/// ```rust
/// use jarscope::model::{FieldAccessFlags, ProgramField};
///
/// let field = ProgramField::new("count", "I", FieldAccessFlags::PRIVATE);
/// assert_eq!(field.name(), "count");
/// assert!(field.is_private());
/// assert!(field.owner().is_none());
/// ```
#[derive(Debug)]
pub struct ProgramField {
    name: RwLock<String>,
    descriptor: RwLock<String>,
    signature: RwLock<Option<String>>,
    access: RwLock<FieldAccessFlags>,
    constant_value: RwLock<Option<ConstantValue>>,
    owner: RwLock<Option<String>>,
    attributes: RwLock<Vec<Attribute>>,
}

impl ProgramField {
    /// Creates a new field with the given name, type descriptor, and access flags.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, access: FieldAccessFlags) -> Self {
        Self {
            name: RwLock::new(name.into()),
            descriptor: RwLock::new(descriptor.into()),
            signature: RwLock::new(None),
            access: RwLock::new(access),
            constant_value: RwLock::new(None),
            owner: RwLock::new(None),
            attributes: RwLock::new(Vec::new()),
        }
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> String {
        lock_read(&self.name).clone()
    }

    /// Sets the field name. Re-keying the owning class's field map is the caller's job;
    /// [`ProgramClass::rename_field`](crate::model::ProgramClass::rename_field) does both.
    pub fn set_name(&self, name: impl Into<String>) {
        *lock_write(&self.name) = name.into();
    }

    /// The field type descriptor.
    #[must_use]
    pub fn descriptor(&self) -> String {
        lock_read(&self.descriptor).clone()
    }

    /// Sets the field type descriptor.
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
    pub fn access(&self) -> FieldAccessFlags {
        *lock_read(&self.access)
    }

    /// Sets the access flags.
    pub fn set_access(&self, access: FieldAccessFlags) {
        *lock_write(&self.access) = access;
    }

    /// The compile-time constant value, if any.
    #[must_use]
    pub fn constant_value(&self) -> Option<ConstantValue> {
        lock_read(&self.constant_value).clone()
    }

    /// Sets or clears the compile-time constant value.
    pub fn set_constant_value(&self, value: Option<ConstantValue>) {
        *lock_write(&self.constant_value) = value;
    }

    /// The qualified name of the owning class, if this field is currently attached to one.
    #[must_use]
    pub fn owner(&self) -> Option<String> {
        lock_read(&self.owner).clone()
    }

    pub(crate) fn set_owner(&self, owner: Option<String>) {
        *lock_write(&self.owner) = owner;
    }

    /// Read-only snapshot of the attribute bag.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        lock_read(&self.attributes).clone()
    }

    /// Appends an attribute to the bag.
    pub fn add_attribute(&self, attribute: Attribute) {
        lock_write(&self.attributes).push(attribute);
    }

    /// Removes every attribute with the given class-file name.
    pub fn remove_attribute(&self, name: &str) {
        lock_write(&self.attributes).retain(|attr| attr.name() != name);
    }

    /// Is the field declared public?
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access().contains(FieldAccessFlags::PUBLIC)
    }

    /// Is the field declared private?
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.access().contains(FieldAccessFlags::PRIVATE)
    }

    /// Is the field declared static?
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.access().contains(FieldAccessFlags::STATIC)
    }

    /// Is the field declared final?
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.access().contains(FieldAccessFlags::FINAL)
    }
}

/// A read-only field of a library class.
#[derive(Debug, Clone)]
pub struct LibraryField {
    /// Field name
    pub name: String,
    /// Field type descriptor
    pub descriptor: String,
    /// Access flags
    pub access: FieldAccessFlags,
    /// Compile-time constant value, if any
    pub constant_value: Option<ConstantValue>,
}

impl LibraryField {
    /// Creates a new library field.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, access: FieldAccessFlags) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access,
            constant_value: None,
        }
    }
}
