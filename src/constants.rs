// src/constants.rs

/// The interpreter that executes `.bat` and `.cmd` scripts.
pub const DEFAULT_INTERPRETER: &str = "cmd.exe";

/// Fixed flags passed to the interpreter ahead of the wrapped command line.
///
/// - `/E:ON`  enables command extensions (needed for `%var:~,%` substring expansion).
/// - `/F:OFF` disables file and directory name completion characters.
/// - `/V:OFF` disables delayed expansion, so `!` is never special.
/// - `/d`     skips the `AutoRun` registry commands.
/// - `/s`     strips exactly one pair of quotes around the text after `/c`.
/// - `/c`     runs the command line and exits.
pub const INTERPRETER_FLAGS: [&str; 6] = ["/E:ON", "/F:OFF", "/V:OFF", "/d", "/s", "/c"];

/// Script suffixes that are executed by the interpreter rather than run natively.
pub const BATCH_EXTENSIONS: [&str; 2] = [".bat", ".cmd"];

/// Replacement for every `%` in an argument. `%cd:~,%` is an always-empty
/// substring expansion, so the interpreter never sees a complete `%name%` pair.
pub const PERCENT_ESCAPE: &str = "%%cd:~,%";

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "BATSPAWN_CONFIG";

/// Name of the directory (inside the system config dir) holding the config file.
pub const CONFIG_DIR_NAME: &str = "batspawn";

/// Name of the configuration file.
pub const CONFIG_FILENAME: &str = "config.toml";
