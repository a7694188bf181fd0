// src/core/batch.rs

use crate::{
    constants::INTERPRETER_FLAGS,
    core::{error::PlanError, escape::escape_cmd_arg},
    models::{ShellOption, SpawnOptions, SpawnPlan},
};

/// Builds the single command-line string handed to the interpreter after `/c`.
///
/// The executable and every argument are escaped and joined with spaces, and
/// the whole line gets one extra pair of quotes. `/s /c` strips exactly that
/// outer pair, leaving each token individually quoted.
///
/// # Errors
/// - [`PlanError::InvalidCommand`] if `executable` contains a double quote.
/// - [`PlanError::InvalidArgument`] if any token contains NUL, CR or LF.
pub fn make_bat_command_line(executable: &str, args: &[String]) -> Result<String, PlanError> {
    if executable.contains('"') {
        return Err(PlanError::InvalidCommand {
            command: executable.to_string(),
        });
    }

    let tokens = std::iter::once(executable)
        .chain(args.iter().map(String::as_str))
        .map(escape_cmd_arg)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!("\"{}\"", tokens.join(" ")))
}

/// Rewrites a batch-script invocation into an interpreter invocation.
///
/// The returned plan runs `interpreter` with the fixed flags followed by the
/// wrapped line. Its options are the caller's, with shell execution disabled
/// and verbatim argument pass-through enabled: the line is already final and
/// any extra quoting by process creation would corrupt it.
pub fn build_bat_plan(
    executable: &str,
    args: &[String],
    options: &SpawnOptions,
    interpreter: &str,
) -> Result<SpawnPlan, PlanError> {
    let line = make_bat_command_line(executable, args)?;
    log::debug!("Wrapped '{}' for {}: {}", executable, interpreter, line);

    let mut final_args: Vec<String> = INTERPRETER_FLAGS.iter().map(|f| f.to_string()).collect();
    final_args.push(line);

    let options = SpawnOptions {
        shell: Some(ShellOption::Enabled(false)),
        windows_verbatim_arguments: Some(true),
        ..options.clone()
    };

    Ok(SpawnPlan::new(
        interpreter.to_string(),
        final_args,
        options,
        true,
    ))
}
