//! Turns an invocation request into a [`SpawnPlan`].
//!
//! Each accepted call shape has its own named constructor on [`CommandSpec`]:
//!
//! | shape                                   | constructor                          |
//! |-----------------------------------------|--------------------------------------|
//! | `(command)`                             | [`CommandSpec::new`]                 |
//! | `(command, options)`                    | [`CommandSpec::with_options`]        |
//! | `(command, args)`                       | [`CommandSpec::with_args`]           |
//! | `(command, args, options)`              | [`CommandSpec::with_args_and_options`] |
//! | `(command, extension, ...)`             | the `with_extension*` family         |

use crate::{
    constants::DEFAULT_INTERPRETER,
    core::{batch, error::PlanError, resolver},
    models::{CommandSpec, Extension, Platform, SpawnOptions, SpawnPlan},
};

impl CommandSpec {
    /// `(command)`: no arguments, default options.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            extension: Extension::None,
            args: Vec::new(),
            options: SpawnOptions::default(),
        }
    }

    /// `(command, options)`.
    pub fn with_options(executable: impl Into<String>, options: SpawnOptions) -> Self {
        Self::new(executable).options(options)
    }

    /// `(command, args)`.
    pub fn with_args<I, S>(executable: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(executable).args(args)
    }

    /// `(command, args, options)`.
    pub fn with_args_and_options<I, S>(
        executable: impl Into<String>,
        args: I,
        options: SpawnOptions,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(executable).args(args).options(options)
    }

    /// `(command, extension)`.
    pub fn with_extension(executable: impl Into<String>, extension: Extension) -> Self {
        Self::new(executable).extension(extension)
    }

    /// `(command, extension, options)`.
    pub fn with_extension_and_options(
        executable: impl Into<String>,
        extension: Extension,
        options: SpawnOptions,
    ) -> Self {
        Self::new(executable).extension(extension).options(options)
    }

    /// `(command, extension, args)`.
    pub fn with_extension_and_args<I, S>(
        executable: impl Into<String>,
        extension: Extension,
        args: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(executable).extension(extension).args(args)
    }

    /// `(command, extension, args, options)`.
    pub fn with_extension_args_and_options<I, S>(
        executable: impl Into<String>,
        extension: Extension,
        args: I,
        options: SpawnOptions,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(executable)
            .extension(extension)
            .args(args)
            .options(options)
    }

    #[must_use]
    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    /// Replaces the extension override.
    pub fn extension(mut self, extension: Extension) -> Self {
        self.extension = extension;
        self
    }

    #[must_use]
    /// Replaces the spawn options.
    pub fn options(mut self, options: SpawnOptions) -> Self {
        self.options = options;
        self
    }
}

/// Rejects options that the batch builder sets itself.
///
/// Any value counts, including `shell: false`: letting the caller pick one
/// would silently break the escaping contract.
pub fn validate_options(options: &SpawnOptions) -> Result<(), PlanError> {
    if options.shell.is_some() {
        return Err(PlanError::UnsupportedOption { option: "shell" });
    }
    if options.windows_verbatim_arguments.is_some() {
        return Err(PlanError::UnsupportedOption {
            option: "windows_verbatim_arguments",
        });
    }
    Ok(())
}

/// Computes the spawn plan for `spec` on `platform` using the default interpreter.
pub fn get_spawn_plan(spec: &CommandSpec, platform: Platform) -> Result<SpawnPlan, PlanError> {
    get_spawn_plan_with(spec, platform, DEFAULT_INTERPRETER)
}

/// Computes the spawn plan for `spec` on `platform`.
///
/// Batch scripts (and `PATH` lookups on Windows) are rewritten into an
/// `interpreter` invocation; everything else passes through with its args and
/// options unchanged.
pub fn get_spawn_plan_with(
    spec: &CommandSpec,
    platform: Platform,
    interpreter: &str,
) -> Result<SpawnPlan, PlanError> {
    validate_options(&spec.options)?;

    let executable = resolver::apply_extension(&spec.executable, &spec.extension, platform);
    if resolver::requires_wrapping(&executable, &spec.extension, platform) {
        log::debug!("'{}' requires interpreter wrapping on {}", executable, platform);
        return batch::build_bat_plan(&executable, &spec.args, &spec.options, interpreter);
    }

    log::debug!("'{}' runs directly on {}", executable, platform);
    Ok(SpawnPlan::new(
        executable,
        spec.args.clone(),
        spec.options.clone(),
        false,
    ))
}
