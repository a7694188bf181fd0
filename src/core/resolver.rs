// src/core/resolver.rs

use crate::{
    constants::BATCH_EXTENSIONS,
    models::{Extension, Platform},
};

/// Applies an explicit [`Extension::Suffix`] to the executable name.
///
/// Suffixes only mean something on Windows; elsewhere, and for the other
/// `Extension` variants, the name is returned unchanged.
pub fn apply_extension(executable: &str, extension: &Extension, platform: Platform) -> String {
    match (platform, extension) {
        (Platform::Windows, Extension::Suffix(suffix)) => format!("{}{}", executable, suffix),
        _ => executable.to_string(),
    }
}

/// Returns true if `name` ends in `.bat` or `.cmd`, ignoring ASCII case.
pub fn is_batch_script(name: &str) -> bool {
    BATCH_EXTENSIONS.iter().any(|ext| {
        name.len()
            .checked_sub(ext.len())
            .and_then(|start| name.get(start..))
            .is_some_and(|tail| tail.eq_ignore_ascii_case(ext))
    })
}

/// Decides whether the interpreter must wrap the invocation.
///
/// `resolved` is the executable after [`apply_extension`]. A `PATH` lookup on
/// Windows always wraps, because the extension it will resolve to is unknown.
pub fn requires_wrapping(resolved: &str, extension: &Extension, platform: Platform) -> bool {
    let path_lookup = platform == Platform::Windows && *extension == Extension::PathLookup;
    path_lookup || is_batch_script(resolved)
}
