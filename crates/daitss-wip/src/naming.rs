//! # Naming Validator
//!
//! Character-set and length rules for package names and content file
//! names. Both rules share a forbidden set (whitespace, quote characters,
//! a leading dot). Content file names are relative paths, so each `/`
//! separated segment is checked and path traversal is rejected.

/// Longest accepted package name, in characters.
pub const MAX_PACKAGE_NAME_LEN: usize = 32;

/// Longest accepted content file path segment, in bytes.
pub const MAX_SEGMENT_LEN: usize = 255;

const QUOTE_CHARS: [char; 2] = ['"', '\''];

fn has_forbidden_char(s: &str) -> bool {
    s.chars()
        .any(|c| c.is_whitespace() || c.is_control() || QUOTE_CHARS.contains(&c))
}

/// Check a package name.
///
/// Invalid when empty, starting with `.`, containing whitespace or a quote
/// character, or longer than [`MAX_PACKAGE_NAME_LEN`] characters.
pub fn package_name_valid(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !has_forbidden_char(name)
        && name.chars().count() <= MAX_PACKAGE_NAME_LEN
}

/// Check a declared content file name.
///
/// The name must be a relative path staying inside the content directory,
/// and every segment must obey the package-name character rules (no
/// leading dot, no whitespace, no quotes) and be at most
/// [`MAX_SEGMENT_LEN`] bytes.
pub fn content_file_name_valid(name: &str) -> bool {
    is_contained_path(name)
        && name.split('/').all(|segment| {
            !segment.starts_with('.')
                && !has_forbidden_char(segment)
                && segment.len() <= MAX_SEGMENT_LEN
        })
}

/// Whether `name` is a relative `/`-separated path that cannot escape the
/// directory it is resolved against.
///
/// This is the minimum a name needs before any file under it is opened.
/// It is weaker than [`content_file_name_valid`].
pub fn is_contained_path(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.contains('\\')
        && !name.contains('\0')
        && name
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
