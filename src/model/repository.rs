//! The repository: the root container for a loaded program.

use dashmap::DashMap;

use crate::model::{lock_read, lock_write, LibraryClassRc, ProgramClassRc};
use std::sync::RwLock;

/// The root container for one loaded program: program classes, library classes, and
/// opaque resources, all keyed by name.
///
/// Program and library classes share a single namespace: adding a class under a name held
/// by the other category evicts the older entry, so a name resolves to at most one class.
/// Lookups return `None` for absent names rather than failing.
///
/// All maps are concurrent; the repository is shared freely across threads behind an `Arc`.
///
/// # Examples
///
/// ```rust
/// use jarscope::prelude::*;
///
/// let repo = ProgramRepository::new();
/// repo.add_class(ProgramClass::new("com/example/Main"));
///
/// assert!(repo.contains_class("com/example/Main"));
/// repo.rename_class("com/example/Main", "com/example/App");
/// assert!(repo.program_class("com/example/Main").is_none());
/// assert!(repo.program_class("com/example/App").is_some());
/// ```
#[derive(Debug, Default)]
pub struct ProgramRepository {
    program_classes: DashMap<String, ProgramClassRc>,
    library_classes: DashMap<String, LibraryClassRc>,
    resources: DashMap<String, Vec<u8>>,
    origin: RwLock<Option<String>>,
}

impl ProgramRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The origin the program was loaded from (an archive path or similar), if recorded.
    #[must_use]
    pub fn origin(&self) -> Option<String> {
        lock_read(&self.origin).clone()
    }

    /// Records or clears the load origin.
    pub fn set_origin(&self, origin: Option<String>) {
        *lock_write(&self.origin) = origin;
    }

    /// Registers a program class under its current name, returning the stored handle.
    ///
    /// A same-named program class is replaced; a same-named library class is evicted so the
    /// name stays unambiguous.
    pub fn add_class(&self, class: impl Into<ProgramClassRc>) -> ProgramClassRc {
        let class = class.into();
        let name = class.name();
        self.library_classes.remove(&name);
        self.program_classes.insert(name, class.clone());
        class
    }

    /// Registers a library class under its current name.
    ///
    /// A same-named library class is replaced; a same-named program class is evicted.
    pub fn add_library_class(&self, class: impl Into<LibraryClassRc>) -> LibraryClassRc {
        let class = class.into();
        let name = class.name();
        self.program_classes.remove(&name);
        self.library_classes.insert(name, class.clone());
        class
    }

    /// The program class with the given name, if present.
    #[must_use]
    pub fn program_class(&self, name: &str) -> Option<ProgramClassRc> {
        self.program_classes.get(name).map(|entry| entry.value().clone())
    }

    /// The library class with the given name, if present.
    #[must_use]
    pub fn library_class(&self, name: &str) -> Option<LibraryClassRc> {
        self.library_classes.get(name).map(|entry| entry.value().clone())
    }

    /// Is a class (program or library) registered under this name?
    #[must_use]
    pub fn contains_class(&self, name: &str) -> bool {
        self.program_classes.contains_key(name) || self.library_classes.contains_key(name)
    }

    /// Read-only snapshot of all program classes.
    #[must_use]
    pub fn program_classes(&self) -> Vec<ProgramClassRc> {
        self.program_classes.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Read-only snapshot of all library classes.
    #[must_use]
    pub fn library_classes(&self) -> Vec<LibraryClassRc> {
        self.library_classes.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Every registered class name, program and library alike.
    #[must_use]
    pub fn all_class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .program_classes
            .iter()
            .map(|entry| entry.key().clone())
            .chain(self.library_classes.iter().map(|entry| entry.key().clone()))
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of program classes.
    #[must_use]
    pub fn program_class_count(&self) -> usize {
        self.program_classes.len()
    }

    /// Number of registered classes, program and library combined.
    #[must_use]
    pub fn total_class_count(&self) -> usize {
        self.program_classes.len() + self.library_classes.len()
    }

    /// Unregisters the class with the given name from whichever category holds it.
    /// Absent names are a silent no-op.
    pub fn remove_class(&self, name: &str) {
        self.program_classes.remove(name);
        self.library_classes.remove(name);
    }

    /// Renames a registered class, re-keying its map entry and updating the class's own
    /// name (which for program classes rewrites member owner back-references).
    /// Absent names are a silent no-op.
    ///
    /// References from other classes are untouched; propagating a rename through the whole
    /// program is the transform engine's job.
    pub fn rename_class(&self, old_name: &str, new_name: &str) {
        if let Some((_, class)) = self.program_classes.remove(old_name) {
            class.set_name(new_name);
            self.program_classes.insert(new_name.to_string(), class);
        } else if let Some((_, class)) = self.library_classes.remove(old_name) {
            class.set_name(new_name);
            self.library_classes.insert(new_name.to_string(), class);
        }
    }

    /// Stores a resource under the given path, replacing any previous bytes.
    pub fn add_resource(&self, path: impl Into<String>, data: Vec<u8>) {
        self.resources.insert(path.into(), data);
    }

    /// The resource bytes stored under the given path, if present.
    #[must_use]
    pub fn resource(&self, path: &str) -> Option<Vec<u8>> {
        self.resources.get(path).map(|entry| entry.value().clone())
    }

    /// Removes the resource stored under the given path. Absent paths are a silent no-op.
    pub fn remove_resource(&self, path: &str) {
        self.resources.remove(path);
    }

    /// Every stored resource path.
    #[must_use]
    pub fn resource_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.iter().map(|entry| entry.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Number of stored resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LibraryClass, ProgramClass};
    use std::sync::Arc;

    #[test]
    fn test_one_class_per_name() {
        let repo = ProgramRepository::new();
        repo.add_library_class(LibraryClass::new("com/example/A"));
        assert!(repo.library_class("com/example/A").is_some());

        // Registering a program class under the same name evicts the library entry.
        repo.add_class(ProgramClass::new("com/example/A"));
        assert!(repo.library_class("com/example/A").is_none());
        assert!(repo.program_class("com/example/A").is_some());
        assert_eq!(repo.total_class_count(), 1);

        // And the other way around.
        repo.add_library_class(LibraryClass::new("com/example/A"));
        assert!(repo.program_class("com/example/A").is_none());
        assert_eq!(repo.total_class_count(), 1);
    }

    #[test]
    fn test_rename_class_rekeys_and_renames() {
        let repo = ProgramRepository::new();
        let class = repo.add_class(ProgramClass::new("com/example/Old"));

        repo.rename_class("com/example/Old", "com/example/New");
        assert!(repo.program_class("com/example/Old").is_none());
        let renamed = repo.program_class("com/example/New").unwrap();
        assert_eq!(renamed.name(), "com/example/New");
        assert!(Arc::ptr_eq(&class, &renamed));

        // Absent names are a no-op.
        repo.rename_class("com/example/Missing", "com/example/Whatever");
        assert_eq!(repo.total_class_count(), 1);
    }

    #[test]
    fn test_rename_library_class() {
        let repo = ProgramRepository::new();
        repo.add_library_class(LibraryClass::new("org/lib/Util"));
        repo.rename_class("org/lib/Util", "org/lib/Helper");
        assert!(repo.library_class("org/lib/Util").is_none());
        assert_eq!(
            repo.library_class("org/lib/Helper").map(|c| c.name()).as_deref(),
            Some("org/lib/Helper")
        );
    }

    #[test]
    fn test_resources() {
        let repo = ProgramRepository::new();
        repo.add_resource("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec());
        repo.add_resource("assets/logo.png", vec![0x89, 0x50]);

        assert_eq!(repo.resource_count(), 2);
        assert_eq!(
            repo.resource("META-INF/MANIFEST.MF").as_deref(),
            Some(b"Manifest-Version: 1.0\n".as_slice())
        );
        assert!(repo.resource("missing.txt").is_none());

        repo.remove_resource("assets/logo.png");
        assert_eq!(repo.resource_names(), vec!["META-INF/MANIFEST.MF".to_string()]);
    }

    #[test]
    fn test_all_class_names_sorted() {
        let repo = ProgramRepository::new();
        repo.add_class(ProgramClass::new("b/B"));
        repo.add_library_class(LibraryClass::new("a/A"));
        repo.add_class(ProgramClass::new("c/C"));
        assert_eq!(
            repo.all_class_names(),
            vec!["a/A".to_string(), "b/B".to_string(), "c/C".to_string()]
        );
    }
}
