//! Class entities: mutable program classes and read-only library classes.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::model::{
    lock_read, lock_write, Attribute, ClassAccessFlags, LibraryFieldRc, LibraryMethodRc,
    ProgramFieldRc, ProgramMethodRc,
};

/// Reference-counted handle to a [`ProgramClass`].
pub type ProgramClassRc = Arc<ProgramClass>;

/// Reference-counted handle to a [`LibraryClass`].
pub type LibraryClassRc = Arc<LibraryClass>;

/// An inner-class record of a program class.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerClass {
    /// Internal name of the inner class
    pub name: String,
    /// Internal name of the enclosing class, if compiled with one
    pub outer_name: Option<String>,
    /// Simple (source) name of the inner class; `None` for anonymous classes
    pub inner_name: Option<String>,
    /// Access flags of the inner class as declared in the enclosing class
    pub access: ClassAccessFlags,
}

/// A fully mutable, internally-defined class subject to analysis and transformation.
///
/// Fields are keyed by name; methods by `name + descriptor`. Member back-references (owner
/// names) are maintained on add/remove and kept current when the class is renamed. The
/// interface list is ordered and duplicate-free. The opaque `raw` handle carries whatever
/// re-encoding form the codec attached at decode time; it passes through untouched.
///
/// All returned collections are read-only snapshots: mutating the class after taking a
/// snapshot does not invalidate it.
///
/// # Examples
///
/// ```rust
/// use jarscope::model::{FieldAccessFlags, ProgramClass, ProgramField};
/// use std::sync::Arc;
///
/// let class = ProgramClass::new("com/example/Main");
/// class.set_super_name(Some("java/lang/Object".into()));
/// class.add_field(Arc::new(ProgramField::new("count", "I", FieldAccessFlags::PRIVATE)));
///
/// assert_eq!(class.simple_name(), "Main");
/// assert_eq!(class.field("count").and_then(|f| f.owner()).as_deref(), Some("com/example/Main"));
/// ```
#[derive(Debug)]
pub struct ProgramClass {
    name: RwLock<String>,
    super_name: RwLock<Option<String>>,
    interfaces: RwLock<Vec<String>>,
    access: RwLock<ClassAccessFlags>,
    signature: RwLock<Option<String>>,
    source_file: RwLock<Option<String>>,
    source_debug: RwLock<Option<String>>,
    outer_class: RwLock<Option<String>>,
    outer_method: RwLock<Option<String>>,
    outer_method_descriptor: RwLock<Option<String>>,
    fields: DashMap<String, ProgramFieldRc>,
    methods: DashMap<String, ProgramMethodRc>,
    attributes: RwLock<Vec<Attribute>>,
    inner_classes: RwLock<Vec<InnerClass>>,
    raw: RwLock<Option<Vec<u8>>>,
}

impl ProgramClass {
    /// Creates a new empty class with the given qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: RwLock::new(name.into()),
            super_name: RwLock::new(None),
            interfaces: RwLock::new(Vec::new()),
            access: RwLock::new(ClassAccessFlags::empty()),
            signature: RwLock::new(None),
            source_file: RwLock::new(None),
            source_debug: RwLock::new(None),
            outer_class: RwLock::new(None),
            outer_method: RwLock::new(None),
            outer_method_descriptor: RwLock::new(None),
            fields: DashMap::new(),
            methods: DashMap::new(),
            attributes: RwLock::new(Vec::new()),
            inner_classes: RwLock::new(Vec::new()),
            raw: RwLock::new(None),
        }
    }

    /// The qualified class name.
    #[must_use]
    pub fn name(&self) -> String {
        lock_read(&self.name).clone()
    }

    /// Sets the qualified class name and rewrites every member's owner back-reference.
    ///
    /// Re-keying the repository map is the caller's job;
    /// [`ProgramRepository::rename_class`](crate::model::ProgramRepository::rename_class)
    /// does both. Renaming a class does not propagate into other classes' references - that
    /// is the transform engine's explicit responsibility.
    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        *lock_write(&self.name) = name.clone();
        for field in self.fields.iter() {
            field.value().set_owner(Some(name.clone()));
        }
        for method in self.methods.iter() {
            method.value().set_owner(Some(name.clone()));
        }
    }

    /// The supertype name, if any.
    #[must_use]
    pub fn super_name(&self) -> Option<String> {
        lock_read(&self.super_name).clone()
    }

    /// Sets or clears the supertype name.
    pub fn set_super_name(&self, super_name: Option<String>) {
        *lock_write(&self.super_name) = super_name;
    }

    /// Read-only snapshot of the ordered interface list.
    #[must_use]
    pub fn interfaces(&self) -> Vec<String> {
        lock_read(&self.interfaces).clone()
    }

    /// Replaces the interface list, dropping duplicates while keeping first-seen order.
    pub fn set_interfaces(&self, interfaces: Vec<String>) {
        let mut deduped = Vec::with_capacity(interfaces.len());
        for name in interfaces {
            if !deduped.contains(&name) {
                deduped.push(name);
            }
        }
        *lock_write(&self.interfaces) = deduped;
    }

    /// Appends an interface name; already-present names are a no-op.
    pub fn add_interface(&self, name: impl Into<String>) {
        let name = name.into();
        let mut interfaces = lock_write(&self.interfaces);
        if !interfaces.contains(&name) {
            interfaces.push(name);
        }
    }

    /// Removes an interface name; absent names are a no-op.
    pub fn remove_interface(&self, name: &str) {
        lock_write(&self.interfaces).retain(|i| i != name);
    }

    /// The access flags.
    #[must_use]
    pub fn access(&self) -> ClassAccessFlags {
        *lock_read(&self.access)
    }

    /// Sets the access flags.
    pub fn set_access(&self, access: ClassAccessFlags) {
        *lock_write(&self.access) = access;
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

    /// The source-file name, if compiled with debug metadata.
    #[must_use]
    pub fn source_file(&self) -> Option<String> {
        lock_read(&self.source_file).clone()
    }

    /// Sets or clears the source-file name.
    pub fn set_source_file(&self, source_file: Option<String>) {
        *lock_write(&self.source_file) = source_file;
    }

    /// Extended debug metadata, if any.
    #[must_use]
    pub fn source_debug(&self) -> Option<String> {
        lock_read(&self.source_debug).clone()
    }

    /// Sets or clears the extended debug metadata.
    pub fn set_source_debug(&self, source_debug: Option<String>) {
        *lock_write(&self.source_debug) = source_debug;
    }

    /// The enclosing class name, if this is a nested class.
    #[must_use]
    pub fn outer_class(&self) -> Option<String> {
        lock_read(&self.outer_class).clone()
    }

    /// Sets or clears the enclosing class name.
    pub fn set_outer_class(&self, outer_class: Option<String>) {
        *lock_write(&self.outer_class) = outer_class;
    }

    /// The enclosing method name, if this class is local to a method.
    #[must_use]
    pub fn outer_method(&self) -> Option<String> {
        lock_read(&self.outer_method).clone()
    }

    /// Sets or clears the enclosing method name.
    pub fn set_outer_method(&self, outer_method: Option<String>) {
        *lock_write(&self.outer_method) = outer_method;
    }

    /// The enclosing method descriptor, if this class is local to a method.
    #[must_use]
    pub fn outer_method_descriptor(&self) -> Option<String> {
        lock_read(&self.outer_method_descriptor).clone()
    }

    /// Sets or clears the enclosing method descriptor.
    pub fn set_outer_method_descriptor(&self, descriptor: Option<String>) {
        *lock_write(&self.outer_method_descriptor) = descriptor;
    }

    /// The opaque raw-form handle the codec attached at decode time, if any.
    #[must_use]
    pub fn raw(&self) -> Option<Vec<u8>> {
        lock_read(&self.raw).clone()
    }

    /// Sets or clears the opaque raw-form handle.
    pub fn set_raw(&self, raw: Option<Vec<u8>>) {
        *lock_write(&self.raw) = raw;
    }

    // ---- members ----

    /// Attaches a field, keyed by its name, and sets its owner back-reference.
    /// A same-named field is replaced.
    pub fn add_field(&self, field: impl Into<ProgramFieldRc>) -> ProgramFieldRc {
        let field = field.into();
        field.set_owner(Some(self.name()));
        self.fields.insert(field.name(), field.clone());
        field
    }

    /// The field with the given name, if declared here.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<ProgramFieldRc> {
        self.fields.get(name).map(|entry| entry.value().clone())
    }

    /// Read-only snapshot of all declared fields.
    #[must_use]
    pub fn fields(&self) -> Vec<ProgramFieldRc> {
        self.fields.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Detaches the field with the given name, clearing its owner back-reference.
    /// Absent names are a silent no-op.
    pub fn remove_field(&self, name: &str) -> Option<ProgramFieldRc> {
        let removed = self.fields.remove(name).map(|(_, field)| field);
        if let Some(field) = &removed {
            field.set_owner(None);
        }
        removed
    }

    /// Renames a declared field, re-keying the field map. Absent names are a silent no-op.
    pub fn rename_field(&self, old_name: &str, new_name: &str) {
        if let Some((_, field)) = self.fields.remove(old_name) {
            field.set_name(new_name);
            self.fields.insert(new_name.to_string(), field);
        }
    }

    /// Attaches a method, keyed by `name + descriptor`, and sets its owner back-reference.
    /// A method with the same key is replaced.
    pub fn add_method(&self, method: impl Into<ProgramMethodRc>) -> ProgramMethodRc {
        let method = method.into();
        method.set_owner(Some(self.name()));
        self.methods.insert(method.key(), method.clone());
        method
    }

    /// The method with the given name and descriptor, if declared here.
    #[must_use]
    pub fn method(&self, name: &str, descriptor: &str) -> Option<ProgramMethodRc> {
        self.methods
            .get(&format!("{name}{descriptor}"))
            .map(|entry| entry.value().clone())
    }

    /// Read-only snapshot of all declared methods.
    #[must_use]
    pub fn methods(&self) -> Vec<ProgramMethodRc> {
        self.methods.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Detaches the method with the given name and descriptor, clearing its owner
    /// back-reference. Absent keys are a silent no-op.
    pub fn remove_method(&self, name: &str, descriptor: &str) -> Option<ProgramMethodRc> {
        let removed = self
            .methods
            .remove(&format!("{name}{descriptor}"))
            .map(|(_, method)| method);
        if let Some(method) = &removed {
            method.set_owner(None);
        }
        removed
    }

    /// Renames a declared method, re-keying the method map. Absent keys are a silent no-op.
    pub fn rename_method(&self, old_name: &str, descriptor: &str, new_name: &str) {
        if let Some((_, method)) = self.methods.remove(&format!("{old_name}{descriptor}")) {
            method.set_name(new_name);
            self.methods.insert(method.key(), method);
        }
    }

    // ---- attributes and inner classes ----

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

    /// Read-only snapshot of the inner-class records.
    #[must_use]
    pub fn inner_classes(&self) -> Vec<InnerClass> {
        lock_read(&self.inner_classes).clone()
    }

    /// Appends an inner-class record.
    pub fn add_inner_class(&self, inner_class: InnerClass) {
        lock_write(&self.inner_classes).push(inner_class);
    }

    /// Removes every inner-class record with the given name.
    pub fn remove_inner_class(&self, name: &str) {
        lock_write(&self.inner_classes).retain(|inner| inner.name != name);
    }

    // ---- derived ----

    /// The class name without its package prefix.
    #[must_use]
    pub fn simple_name(&self) -> String {
        let name = self.name();
        match name.rfind('/') {
            Some(pos) => name[pos + 1..].to_string(),
            None => name,
        }
    }

    /// The package name in dotted form; empty for the default package.
    #[must_use]
    pub fn package_name(&self) -> String {
        let name = self.name();
        match name.rfind('/') {
            Some(pos) => name[..pos].replace('/', "."),
            None => String::new(),
        }
    }

    /// Is this an interface?
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.access().contains(ClassAccessFlags::INTERFACE)
    }

    /// Is the class declared abstract?
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.access().contains(ClassAccessFlags::ABSTRACT)
    }

    /// Is the class declared final?
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.access().contains(ClassAccessFlags::FINAL)
    }

    /// Is the class declared public?
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access().contains(ClassAccessFlags::PUBLIC)
    }

    /// Is this an enum class?
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.access().contains(ClassAccessFlags::ENUM)
    }

    /// Is this an annotation interface?
    #[must_use]
    pub fn is_annotation(&self) -> bool {
        self.access().contains(ClassAccessFlags::ANNOTATION)
    }
}

/// An external, read-only class referenced only as a dependency target.
///
/// Library classes carry declaration-level metadata (supertype, interfaces, members) but no
/// instruction data, and nothing besides the name - which the repository re-keys on rename -
/// is mutable after construction.
#[derive(Debug)]
pub struct LibraryClass {
    name: RwLock<String>,
    super_name: Option<String>,
    interfaces: Vec<String>,
    access: ClassAccessFlags,
    signature: Option<String>,
    fields: DashMap<String, LibraryFieldRc>,
    methods: DashMap<String, LibraryMethodRc>,
}

impl LibraryClass {
    /// Creates a new library class with the given qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: RwLock::new(name.into()),
            super_name: None,
            interfaces: Vec::new(),
            access: ClassAccessFlags::empty(),
            signature: None,
            fields: DashMap::new(),
            methods: DashMap::new(),
        }
    }

    /// Sets the supertype name.
    #[must_use]
    pub fn with_super_name(mut self, super_name: impl Into<String>) -> Self {
        self.super_name = Some(super_name.into());
        self
    }

    /// Sets the interface list.
    #[must_use]
    pub fn with_interfaces(mut self, interfaces: Vec<String>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Sets the access flags.
    #[must_use]
    pub fn with_access(mut self, access: ClassAccessFlags) -> Self {
        self.access = access;
        self
    }

    /// Sets the generic signature.
    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// The qualified class name.
    #[must_use]
    pub fn name(&self) -> String {
        lock_read(&self.name).clone()
    }

    pub(crate) fn set_name(&self, name: impl Into<String>) {
        *lock_write(&self.name) = name.into();
    }

    /// The supertype name, if any.
    #[must_use]
    pub fn super_name(&self) -> Option<String> {
        self.super_name.clone()
    }

    /// Read-only snapshot of the interface list.
    #[must_use]
    pub fn interfaces(&self) -> Vec<String> {
        self.interfaces.clone()
    }

    /// The access flags.
    #[must_use]
    pub fn access(&self) -> ClassAccessFlags {
        self.access
    }

    /// The generic signature, if any.
    #[must_use]
    pub fn signature(&self) -> Option<String> {
        self.signature.clone()
    }

    /// Attaches a field declaration, keyed by its name.
    pub fn add_field(&self, field: impl Into<LibraryFieldRc>) {
        let field = field.into();
        self.fields.insert(field.name.clone(), field);
    }

    /// The field with the given name, if declared here.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<LibraryFieldRc> {
        self.fields.get(name).map(|entry| entry.value().clone())
    }

    /// Read-only snapshot of all declared fields.
    #[must_use]
    pub fn fields(&self) -> Vec<LibraryFieldRc> {
        self.fields.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Attaches a method declaration, keyed by `name + descriptor`.
    pub fn add_method(&self, method: impl Into<LibraryMethodRc>) {
        let method = method.into();
        self.methods.insert(method.key(), method);
    }

    /// The method with the given name and descriptor, if declared here.
    #[must_use]
    pub fn method(&self, name: &str, descriptor: &str) -> Option<LibraryMethodRc> {
        self.methods
            .get(&format!("{name}{descriptor}"))
            .map(|entry| entry.value().clone())
    }

    /// Read-only snapshot of all declared methods.
    #[must_use]
    pub fn methods(&self) -> Vec<LibraryMethodRc> {
        self.methods.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldAccessFlags, MethodAccessFlags, ProgramField, ProgramMethod};

    #[test]
    fn test_member_back_references() {
        let class = ProgramClass::new("com/example/A");
        let field = class.add_field(ProgramField::new("x", "I", FieldAccessFlags::PRIVATE));
        let method = class.add_method(ProgramMethod::new("run", "()V", MethodAccessFlags::PUBLIC));

        assert_eq!(field.owner().as_deref(), Some("com/example/A"));
        assert_eq!(method.owner().as_deref(), Some("com/example/A"));

        // Rename rewrites every member's owner name.
        class.set_name("com/example/B");
        assert_eq!(field.owner().as_deref(), Some("com/example/B"));
        assert_eq!(method.owner().as_deref(), Some("com/example/B"));

        // Removal clears the back-reference.
        class.remove_field("x");
        assert!(field.owner().is_none());
        class.remove_method("run", "()V");
        assert!(method.owner().is_none());
    }

    #[test]
    fn test_member_rename_rekeys() {
        let class = ProgramClass::new("com/example/A");
        class.add_field(ProgramField::new("x", "I", FieldAccessFlags::PRIVATE));
        class.rename_field("x", "y");
        assert!(class.field("x").is_none());
        assert_eq!(class.field("y").map(|f| f.name()).as_deref(), Some("y"));

        class.add_method(ProgramMethod::new("run", "()V", MethodAccessFlags::PUBLIC));
        class.rename_method("run", "()V", "go");
        assert!(class.method("run", "()V").is_none());
        let renamed = class.method("go", "()V").unwrap();
        assert_eq!(renamed.name(), "go");

        // Renaming an absent member is a silent no-op.
        class.rename_field("missing", "whatever");
        class.rename_method("missing", "()V", "whatever");
    }

    #[test]
    fn test_interface_list_is_ordered_and_unique() {
        let class = ProgramClass::new("com/example/A");
        class.add_interface("java/io/Serializable");
        class.add_interface("java/lang/Cloneable");
        class.add_interface("java/io/Serializable");
        assert_eq!(
            class.interfaces(),
            vec!["java/io/Serializable".to_string(), "java/lang/Cloneable".to_string()]
        );

        class.remove_interface("java/io/Serializable");
        assert_eq!(class.interfaces(), vec!["java/lang/Cloneable".to_string()]);

        class.set_interfaces(vec!["a/B".into(), "a/B".into(), "a/C".into()]);
        assert_eq!(class.interfaces(), vec!["a/B".to_string(), "a/C".to_string()]);
    }

    #[test]
    fn test_derived_names() {
        let class = ProgramClass::new("com/example/Main");
        assert_eq!(class.simple_name(), "Main");
        assert_eq!(class.package_name(), "com.example");

        let default_pkg = ProgramClass::new("Main");
        assert_eq!(default_pkg.simple_name(), "Main");
        assert_eq!(default_pkg.package_name(), "");
    }

    #[test]
    fn test_library_class_is_declaration_only() {
        let class = LibraryClass::new("java/lang/String")
            .with_super_name("java/lang/Object")
            .with_interfaces(vec!["java/io/Serializable".into()])
            .with_access(ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL);

        assert_eq!(class.name(), "java/lang/String");
        assert_eq!(class.super_name().as_deref(), Some("java/lang/Object"));
        assert!(class.access().contains(ClassAccessFlags::FINAL));
        assert!(class.field("missing").is_none());
    }
}
