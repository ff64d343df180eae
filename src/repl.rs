// ABOUTME: Interactive REPL loop and one-shot file executor

use crate::config;
use crate::env::Environment;
use crate::error::ReplError;
use crate::eval::evaluate;
use crate::highlighter::SigmaFHelper;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Object;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Read a source module as UTF-8 text.
pub fn read_module(path: &Path) -> Result<String, ReplError> {
    std::fs::read_to_string(path).map_err(|_| ReplError::FileNotFound {
        path: path.display().to_string(),
    })
}

/// Strip `--` line comments and non-nesting `/* … */` block comments.
/// String literals are left untouched.
pub fn strip_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut result = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                result.push('"');
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    result.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    result.push('"');
                    i += 1;
                }
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
            }
            c => {
                result.push(c);
                i += 1;
            }
        }
    }
    result
}

/// Whether `(`, `[`, or `{` groups remain open outside string literals.
/// The REPL keeps prompting continuation lines while this holds.
pub fn unbalanced(source: &str) -> bool {
    let mut depth: i64 = 0;
    let mut in_string = false;
    for c in source.chars() {
        match c {
            '"' => in_string = !in_string,
            '(' | '[' | '{' if !in_string => depth += 1,
            ')' | ']' | '}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth > 0
}

/// Lex, parse, and evaluate one input against `env`. Parse diagnostics are
/// printed and block evaluation; `None` also covers input whose last
/// statement produced no value (a binding).
pub fn run_source(source: &str, env: &Rc<Environment>) -> Option<Object> {
    let clean = strip_comments(source);
    let mut parser = Parser::new(Lexer::new(&clean));
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        for error in parser.errors() {
            println!("{}", error);
        }
        return None;
    }
    evaluate(&program, env)
}

/// Execute a source file once against a fresh environment, reporting any
/// error result. Returns the environment for `-r` chaining.
pub fn execute_file(path: &Path) -> Result<Rc<Environment>, ReplError> {
    let env = Environment::new();
    let source = read_module(path)?;
    if let Some(result) = run_source(&source, &env) {
        if result.is_error() {
            println!("{}", result.inspect());
        }
    }
    Ok(env)
}

/// Re-read a module into a fresh environment, then merge its bindings over
/// the current one, replacing colliding names. This is what `update()` and
/// `load(path)` do, enabling live reload without restarting the session.
fn reload(path: &Path, env: &Rc<Environment>) {
    println!("[Warning] Updated the path: {}", path.display());
    let source = match read_module(path) {
        Ok(source) => source,
        Err(error) => {
            println!("{}", error);
            return;
        }
    };

    let fresh = Environment::new();
    if let Some(result) = run_source(&source, &fresh) {
        if result.is_error() {
            println!("{}", result.inspect());
        }
    }
    for name in fresh.names() {
        if let Some(value) = fresh.get(&name) {
            env.remove(&name);
            env.define(name, value);
        }
    }
}

/// Recognize `load(path)` and `load("path")`.
fn parse_load_command(input: &str) -> Option<PathBuf> {
    let rest = input.strip_prefix("load(")?.strip_suffix(')')?;
    let path = rest.trim().trim_matches('"');
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// The interactive loop. Definitions accumulate in the long-lived root
/// environment, so each line sees everything entered before it.
pub fn start(path: Option<PathBuf>, env: Rc<Environment>) -> Result<(), ReplError> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<SigmaFHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(SigmaFHelper::new()));
    let _ = rl.load_history(config::HISTORY_FILE);

    let mut session_path = path;

    loop {
        match rl.readline(config::PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let mut buffer = line;
                while unbalanced(&strip_comments(&buffer)) {
                    match rl.readline(config::PROMPT_CONTINUATION) {
                        Ok(next) => {
                            // A lone `;` abandons the pending input.
                            if next.trim() == ";" {
                                buffer.clear();
                                break;
                            }
                            buffer.push('\n');
                            buffer.push_str(&next);
                        }
                        Err(_) => break,
                    }
                }
                if buffer.trim().is_empty() {
                    continue;
                }

                match buffer.trim() {
                    "exit()" => break,
                    "clear()" => {
                        print!("\x1B[2J\x1B[H");
                        continue;
                    }
                    "update()" => {
                        match &session_path {
                            Some(path) => reload(path, &env),
                            None => println!("[Warning] There is no module to update"),
                        }
                        continue;
                    }
                    command => {
                        if let Some(path) = parse_load_command(command) {
                            reload(&path, &env);
                            session_path = Some(path);
                            continue;
                        }
                    }
                }

                if let Some(result) = run_source(&buffer, &env) {
                    println!("{}", result.inspect());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\n↳ Good bye \n");
                break;
            }
            Err(error) => {
                eprintln!("Error: {}", error);
                break;
            }
        }
    }

    let _ = rl.save_history(config::HISTORY_FILE);
    Ok(())
}
