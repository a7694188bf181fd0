mod common;

use batspawn::core::batch::make_bat_command_line;
use batspawn::core::error::PlanError;
use batspawn::core::escape::escape_cmd_arg;
use common::{default_env, expand_percent, parse_argv, round_trip, simulate_cmd, strings};
use proptest::prelude::*;

fn assert_round_trip(args: &[&str]) {
    let args = strings(args);
    assert_eq!(round_trip(&args).unwrap(), args, "round trip of {:?}", args);
}

// --- Sanity checks for the parser models ---

#[test]
fn test_argv_model_matches_microsoft_table() {
    // https://learn.microsoft.com/en-us/cpp/c-language/parsing-c-command-line-arguments
    assert_eq!(parse_argv(r#""a b c" d e"#), strings(&["a b c", "d", "e"]));
    assert_eq!(parse_argv(r#""ab\"c" "\\" d"#), strings(&["ab\"c", "\\", "d"]));
    assert_eq!(parse_argv(r#"a\\\b d"e f"g h"#), strings(&[r"a\\\b", "de fg", "h"]));
    assert_eq!(parse_argv(r#"a\\\"b c d"#), strings(&[r#"a\"b"#, "c", "d"]));
    assert_eq!(parse_argv(r#"a\\\\"b c" d e"#), strings(&[r"a\\b c", "d", "e"]));
    assert_eq!(parse_argv(r#"a"b"" c d"#), strings(&["ab\" c d"]));
}

#[test]
fn test_interpreter_model_expands_variables() {
    let env = default_env();
    assert_eq!(expand_percent("%TMP%", &env), r"C:\Temp");
    assert_eq!(expand_percent("%undefined%", &env), "%undefined%");
    assert_eq!(expand_percent("100%", &env), "100%");
    assert_eq!(expand_percent("%cd:~3,4%", &env), "work");
    assert_eq!(expand_percent("%cd:~,%", &env), "");
}

#[test]
fn test_naive_quoting_is_unsafe() {
    // Plain quoting leaves both the variable and a quote-breakout exposed.
    let env = default_env();
    let (_, forwarded) = simulate_cmd(r#""x.cmd "%HELLO%"""#, &env).unwrap();
    assert_eq!(parse_argv(&forwarded), strings(&["injected"]));

    let err = simulate_cmd(r#""x.cmd "\"&calc"""#, &env).unwrap_err();
    assert!(err.contains("unquoted operator '&'"));
}

// --- Example-based round trips ---

#[test]
fn test_escape_percent() {
    assert_round_trip(&["%PATH%", "%cd%"]);
    assert_round_trip(&["%path%", "%CD%"]);
}

#[test]
fn test_escape_spaces() {
    assert_round_trip(&["hello  world", "are you here"]);
}

#[test]
fn test_escape_backslash() {
    assert_round_trip(&["hello \\ world", "\\ world"]);
}

#[test]
fn test_escape_quote() {
    assert_round_trip(&["hello \" there", "my \" world"]);
}

#[test]
fn test_escape_backslash_quote() {
    assert_round_trip(&["hello \\\" there", "my \\\" world"]);
}

#[test]
fn test_escape_double_backslash_quote() {
    assert_round_trip(&["hello \\\\\" there", "my \\\\\" world"]);
}

#[test]
fn test_escape_ampersand() {
    assert_round_trip(&["&calc"]);
    assert_round_trip(&["\"&calc"]);
}

#[test]
fn test_microsoft_examples() {
    let examples: &[&[&str]] = &[
        &["a b c", "d", "e"],
        &["ab\"c", "\\", "d"],
        &["a\\\\\\b", "de fg", "h"],
        &["a\\\"b", "c", "d"],
        &["a\\\\b c", "d", "e"],
        &["ab\" c d"],
    ];
    for args in examples {
        assert_round_trip(args);
    }
}

#[test]
fn test_std_batch_argument_cases() {
    let examples: &[&[&str]] = &[
        &["a", "b"],
        &["c is for cat", "d is for dog"],
        &["\"", " \""],
        &["\\", "\\"],
        &[">file.txt"],
        &["whoami.exe"],
        &["&a.exe"],
        &["&echo hello "],
        &["&echo hello", "&whoami", ">file.txt"],
        &["!TMP!"],
        &["key=value"],
        &["\"key=value\""],
        &["key = value"],
        &["key=[\"value\"],"],
        &["", "a=b"],
        &["key=\"foo bar\""],
        &["key=[\"my_value],"],
        &["key=[\"my_value\",\"other-value\"],"],
        &["key\\=value"],
        &["key=\"&whoami\""],
        &["key=\"value\"=5"],
        &["key=[\">file.txt\"],"],
        &["%hello"],
        &["%PATH%"],
        &["%%cd:~,%"],
        &["%PATH%PATH%"],
        &["\">file.txt"],
        &["abc\"&echo hello"],
        &["123\">file.txt"],
        &["\"&echo hello&whoami.exe"],
        &["\"hello^\"world\"", "hello &echo oh no >file.txt"],
    ];
    for args in examples {
        assert_round_trip(args);
    }
}

#[test]
fn test_no_arguments() {
    assert_round_trip(&[]);
}

#[test]
fn test_percent_escape_survives_defined_cd_override() {
    // A user-defined `cd` replaces the dynamic one; the empty-length
    // substring still expands to nothing.
    let mut env = default_env();
    env.insert("CD".to_string(), "%PATH%&calc".to_string());
    let line = make_bat_command_line("x.cmd", &strings(&["%PATH%"])).unwrap();
    let (_, forwarded) = simulate_cmd(&line, &env).unwrap();
    assert_eq!(parse_argv(&forwarded), strings(&["%PATH%"]));
}

// --- Properties ---

fn bad_char() -> impl Strategy<Value = char> {
    prop_oneof![Just('\0'), Just('\r'), Just('\n')]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_round_trip(args in prop::collection::vec("[^\\x00\\r\\n]{0,24}", 0..6)) {
        prop_assert_eq!(round_trip(&args), Ok(args.clone()));
    }

    #[test]
    fn prop_round_trip_metacharacter_heavy(
        args in prop::collection::vec("[\"\\\\%&|<>^! a-c]{0,16}", 0..6)
    ) {
        prop_assert_eq!(round_trip(&args), Ok(args.clone()));
    }

    #[test]
    fn prop_rejects_control_characters(
        prefix in "[^\\x00\\r\\n]{0,8}",
        bad in bad_char(),
        suffix in ".{0,8}",
    ) {
        let arg = format!("{prefix}{bad}{suffix}");
        prop_assert_eq!(
            escape_cmd_arg(&arg),
            Err(PlanError::InvalidArgument { argument: arg.clone() })
        );
        let args = vec!["ok".to_string(), arg];
        let rejected = matches!(
            make_bat_command_line("test.bat", &args),
            Err(PlanError::InvalidArgument { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn prop_escaping_ignores_siblings(
        args in prop::collection::vec("[^\\x00\\r\\n]{0,12}", 1..5)
    ) {
        let tokens: Vec<String> = std::iter::once("x.bat")
            .chain(args.iter().map(String::as_str))
            .map(|a| escape_cmd_arg(a).unwrap())
            .collect();
        let line = make_bat_command_line("x.bat", &args).unwrap();
        prop_assert_eq!(line, format!("\"{}\"", tokens.join(" ")));
    }

    #[test]
    fn prop_quote_in_command_is_rejected(
        before in "[^\"]{0,8}",
        after in "[^\"]{0,8}",
    ) {
        let command = format!("{before}\"{after}.bat");
        prop_assert_eq!(
            make_bat_command_line(&command, &[]),
            Err(PlanError::InvalidCommand { command: command.clone() })
        );
    }
}
