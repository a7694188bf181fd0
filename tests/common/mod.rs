//! Models of the two parsers an interpreter-wrapped argument passes through:
//! `cmd.exe /d /s /c "<line>"` running a forwarding script, and the C runtime
//! argv splitter of the program that script forwards `%*` to.

#![allow(dead_code)]

use batspawn::core::batch::make_bat_command_line;
use std::collections::HashMap;
use std::iter;

pub const FORWARDER: &str = "forward-args.cmd";

/// Environment seen by the simulated interpreter. Names are upper-case.
pub fn default_env() -> HashMap<String, String> {
    [
        ("PATH", r"C:\Windows\system32;C:\Windows"),
        ("CD", r"C:\work"),
        ("TMP", r"C:\Temp"),
        ("HELLO", "injected"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Runs `line` through the interpreter model.
///
/// Returns the script token and the text the script receives as `%*`, or an
/// error naming the operator that would have split the command.
pub fn simulate_cmd(line: &str, env: &HashMap<String, String>) -> Result<(String, String), String> {
    // `/s /c` removes the first and the last quote of the line.
    let inner = line
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| format!("line is not wrapped in quotes: {line}"))?;

    let expanded = expand_percent(inner, env);

    let mut text = String::new();
    let mut in_quotes = false;
    let mut chars = expanded.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                text.push(c);
            }
            '&' | '|' | '<' | '>' if !in_quotes => {
                return Err(format!("unquoted operator '{c}' in {expanded}"));
            }
            '^' if !in_quotes => {
                if let Some(next) = chars.next() {
                    text.push(next);
                }
            }
            _ => text.push(c),
        }
    }

    let mut in_quotes = false;
    let split = text.char_indices().find(|&(_, c)| {
        if c == '"' {
            in_quotes = !in_quotes;
        }
        !in_quotes && (c == ' ' || c == '\t')
    });
    match split {
        Some((at, _)) => {
            let (script, rest) = text.split_at(at);
            Ok((
                script.to_string(),
                rest.trim_start_matches([' ', '\t']).to_string(),
            ))
        }
        None => Ok((text, String::new())),
    }
}

/// Command-line mode `%` expansion, including `%name:~start,len%`.
///
/// An undefined or empty name leaves the text as is and scanning resumes at
/// the closing `%`, which may open the next reference.
pub fn expand_percent(text: &str, env: &HashMap<String, String>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let Some(offset) = chars[i + 1..].iter().position(|&c| c == '%') else {
            out.extend(&chars[i..]);
            break;
        };
        let close = i + 1 + offset;
        let name: String = chars[i + 1..close].iter().collect();
        match lookup(&name, env) {
            Some(value) => {
                out.push_str(&value);
                i = close + 1;
            }
            None => {
                out.push('%');
                out.push_str(&name);
                i = close;
            }
        }
    }
    out
}

fn lookup(name: &str, env: &HashMap<String, String>) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    let Some((base, spec)) = name.split_once(":~") else {
        return env.get(&name.to_uppercase()).cloned();
    };
    let value: Vec<char> = env.get(&base.to_uppercase())?.chars().collect();
    let (start, len) = match spec.split_once(',') {
        Some((start, len)) => (parse_or_zero(start)?, Some(parse_or_zero(len)?)),
        None => (parse_or_zero(spec)?, None),
    };
    let start = start.min(value.len());
    let end = len.map_or(value.len(), |len| (start + len).min(value.len()));
    Some(value[start..end].iter().collect())
}

fn parse_or_zero(text: &str) -> Option<usize> {
    if text.is_empty() {
        Some(0)
    } else {
        text.parse().ok()
    }
}

/// Splits a command line the way the Microsoft C runtime does.
pub fn parse_argv(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut args = Vec::new();
    let mut i = 0;
    loop {
        while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let mut arg = String::new();
        let mut in_quotes = false;
        while i < chars.len() {
            match chars[i] {
                '\\' => {
                    let start = i;
                    while i < chars.len() && chars[i] == '\\' {
                        i += 1;
                    }
                    let run = i - start;
                    if chars.get(i) == Some(&'"') {
                        arg.extend(iter::repeat_n('\\', run / 2));
                        if run % 2 == 1 {
                            arg.push('"');
                            i += 1;
                        }
                    } else {
                        arg.extend(iter::repeat_n('\\', run));
                    }
                }
                '"' => {
                    if in_quotes && chars.get(i + 1) == Some(&'"') {
                        arg.push('"');
                        i += 2;
                    } else {
                        in_quotes = !in_quotes;
                        i += 1;
                    }
                }
                ' ' | '\t' if !in_quotes => break,
                c => {
                    arg.push(c);
                    i += 1;
                }
            }
        }
        args.push(arg);
    }
    args
}

/// Builds the wrapped line for the forwarding script and recovers the
/// arguments the forwarded-to program would see.
pub fn round_trip(args: &[String]) -> Result<Vec<String>, String> {
    let line = make_bat_command_line(FORWARDER, args).map_err(|e| e.to_string())?;
    let (script, forwarded) = simulate_cmd(&line, &default_env())?;
    if parse_argv(&script) != [FORWARDER] {
        return Err(format!("script token mangled: {script}"));
    }
    Ok(parse_argv(&forwarded))
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
