// src/core/escape.rs

use crate::constants::PERCENT_ESCAPE;
use crate::core::error::PlanError;
use std::iter;

/// Escapes one argument so that it survives the interpreter's parse pass and
/// the target program's C-runtime argv parser, in that order, unchanged.
///
/// The result is always wrapped in double quotes. Inside it:
/// 1. a run of backslashes directly before a `"` or the end of the argument is
///    doubled, so the runtime never reads the quotes as escaped;
/// 2. each `"` becomes `""`, which the runtime reads as a literal quote while
///    the interpreter just toggles its quote state twice;
/// 3. each `%` becomes `%%cd:~,%`, an empty substring expansion that breaks
///    every `%name%` pair without changing the visible text.
///
/// # Errors
/// Returns [`PlanError::InvalidArgument`] if `arg` contains NUL, CR or LF.
pub fn escape_cmd_arg(arg: &str) -> Result<String, PlanError> {
    if arg.contains(['\0', '\r', '\n']) {
        return Err(PlanError::InvalidArgument {
            argument: arg.to_string(),
        });
    }

    let mut escaped = String::with_capacity(arg.len() + 2);
    escaped.push('"');

    let mut backslashes = 0usize;
    for ch in arg.chars() {
        if ch == '\\' {
            backslashes += 1;
            continue;
        }

        let run = if ch == '"' { backslashes * 2 } else { backslashes };
        escaped.extend(iter::repeat_n('\\', run));
        backslashes = 0;

        match ch {
            '"' => escaped.push_str("\"\""),
            '%' => escaped.push_str(PERCENT_ESCAPE),
            _ => escaped.push(ch),
        }
    }

    // Trailing run sits before the closing quote.
    escaped.extend(iter::repeat_n('\\', backslashes * 2));
    escaped.push('"');
    Ok(escaped)
}
