//! Method-descriptor scanning.
//!
//! A method descriptor has the form `(ParameterDescriptors)ReturnDescriptor`, e.g.
//! `(Ljava/lang/String;I)V`. The dependency analyzer only cares about object-sorted
//! parameter and return types (the `L...;` internal names); primitives and array
//! descriptors contribute nothing. Scanning is total - malformed input simply yields
//! whatever well-formed prefix could be read.

/// Extracts the internal names of all object-sorted argument and return types from a
/// method descriptor.
///
/// Array types and primitives are skipped: only types whose outermost sort is an object
/// reference (`Lcom/example/Foo;` → `com/example/Foo`) are returned. Duplicates are kept;
/// callers that need a set collect into one.
///
/// # Arguments
/// * `descriptor` - The method descriptor, e.g. `"(Ljava/lang/String;)Ljava/util/List;"`
///
/// # Examples
///
/// ```rust
/// use jarscope::model::object_types;
///
/// let types = object_types("(Ljava/lang/String;I)Ljava/util/List;");
/// assert_eq!(types, vec!["java/lang/String", "java/util/List"]);
/// ```
#[must_use]
pub fn object_types(descriptor: &str) -> Vec<String> {
    let mut types = Vec::new();
    let bytes = descriptor.as_bytes();
    let mut pos = 0;

    if bytes.first() == Some(&b'(') {
        pos = 1;
        while pos < bytes.len() && bytes[pos] != b')' {
            pos = scan_type(bytes, pos, &mut types);
        }
        pos += 1; // skip ')'
    }

    if pos < bytes.len() {
        scan_type(bytes, pos, &mut types);
    }

    types
}

/// Scans a single field descriptor starting at `pos`, pushing the internal name when the
/// outermost sort is an object reference. Returns the position after the scanned type.
fn scan_type(bytes: &[u8], mut pos: usize, types: &mut Vec<String>) -> usize {
    let mut array = false;
    while pos < bytes.len() && bytes[pos] == b'[' {
        array = true;
        pos += 1;
    }

    match bytes.get(pos) {
        Some(b'L') => {
            let start = pos + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end] != b';' {
                end += 1;
            }
            if !array {
                if let Ok(name) = std::str::from_utf8(&bytes[start..end]) {
                    types.push(name.to_string());
                }
            }
            end + 1
        }
        Some(_) => pos + 1, // primitive (or V)
        None => pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_argument_and_return_types() {
        let types = object_types("(Ljava/lang/String;I)Ljava/util/List;");
        assert_eq!(types, vec!["java/lang/String", "java/util/List"]);
    }

    #[test]
    fn test_primitives_only() {
        assert!(object_types("(IJD)V").is_empty());
    }

    #[test]
    fn test_arrays_are_skipped() {
        // Only outermost object sorts count, matching the analyzer contract.
        let types = object_types("([Ljava/lang/String;[I)Lcom/example/Foo;");
        assert_eq!(types, vec!["com/example/Foo"]);
    }

    #[test]
    fn test_void_return() {
        let types = object_types("(Lcom/example/A;Lcom/example/B;)V");
        assert_eq!(types, vec!["com/example/A", "com/example/B"]);
    }

    #[test]
    fn test_malformed_input_is_total() {
        assert!(object_types("").is_empty());
        assert!(object_types("(").is_empty());
        assert_eq!(object_types("(Lunterminated"), vec!["unterminated"]);
    }
}
