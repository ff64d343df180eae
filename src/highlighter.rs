// ABOUTME: Syntax highlighter for the REPL with ANSI color support
// Implements rustyline's Highlighter trait for SigmaF syntax elements
// while preserving display width

use rustyline::highlight::{CmdKind, Highlighter};
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;

// ANSI color codes (3-bit/4-bit colors for maximum terminal compatibility)
const COLOR_RESET: &str = "\x1b[0m";
const COLOR_KEYWORD: &str = "\x1b[1;35m"; // Bold magenta
const COLOR_TYPE: &str = "\x1b[36m"; // Cyan
const COLOR_BUILTIN: &str = "\x1b[36m"; // Cyan
const COLOR_NUMBER: &str = "\x1b[33m"; // Yellow
const COLOR_STRING: &str = "\x1b[32m"; // Green
const COLOR_LITERAL: &str = "\x1b[33m"; // Yellow
const COLOR_COMMENT: &str = "\x1b[90m"; // Bright black (gray)
const COLOR_BRACKET: &str = "\x1b[1;34m"; // Bold blue

const KEYWORDS: [&str; 7] = ["let", "fn", "if", "then", "else", "return", "=>"];
const TYPES: [&str; 8] = [
    "int", "str", "bool", "float", "function", "list", "tuple", "void",
];
const LITERALS: [&str; 3] = ["true", "false", "null"];
const BUILTINS: [&str; 7] = ["length", "printLn", "not", "pow", "parse", "append", "type"];

/// REPL helper providing syntax-aware highlighting for SigmaF input.
#[derive(Completer, Helper, Hinter, Validator, Default)]
pub struct SigmaFHelper;

impl SigmaFHelper {
    pub fn new() -> Self {
        SigmaFHelper
    }
}

impl Highlighter for SigmaFHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let highlighted = highlight_line(line);
        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn paint(result: &mut String, color: &str, text: &str) {
    result.push_str(color);
    result.push_str(text);
    result.push_str(COLOR_RESET);
}

/// Tokenize a line loosely and wrap recognized spans in color codes.
fn highlight_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut result = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // Line comments: -- to end of line
            '-' if i + 1 < chars.len() && chars[i + 1] == '-' => {
                let rest: String = chars[i..].iter().collect();
                paint(&mut result, COLOR_COMMENT, &rest);
                i = chars.len();
            }

            // Strings: color through the closing quote (or end of line)
            '"' => {
                let start = i;
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    i += 1;
                }
                if i < chars.len() {
                    i += 1;
                }
                let span: String = chars[start..i].iter().collect();
                paint(&mut result, COLOR_STRING, &span);
            }

            // Numbers, with an optional fractional part
            '0'..='9' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let span: String = chars[start..i].iter().collect();
                paint(&mut result, COLOR_NUMBER, &span);
            }

            '(' | ')' | '[' | ']' | '{' | '}' => {
                paint(&mut result, COLOR_BRACKET, &chars[i].to_string());
                i += 1;
            }

            // The return arrow reads as a keyword
            '=' if i + 1 < chars.len() && chars[i + 1] == '>' => {
                paint(&mut result, COLOR_KEYWORD, "=>");
                i += 2;
            }

            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if KEYWORDS.contains(&word.as_str()) {
                    paint(&mut result, COLOR_KEYWORD, &word);
                } else if TYPES.contains(&word.as_str()) {
                    paint(&mut result, COLOR_TYPE, &word);
                } else if LITERALS.contains(&word.as_str()) {
                    paint(&mut result, COLOR_LITERAL, &word);
                } else if BUILTINS.contains(&word.as_str()) {
                    paint(&mut result, COLOR_BUILTIN, &word);
                } else {
                    result.push_str(&word);
                }
            }

            c => {
                result.push(c);
                i += 1;
            }
        }
    }

    result
}
