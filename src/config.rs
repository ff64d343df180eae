// ABOUTME: Version, banner art, and interpreter limits

pub const VERSION: &str = "1.0.0";

/// One-line banner printed on every start unless `-n` suppresses it.
pub fn head_line() -> String {
    format!("SigmaF v{} | Exit: exit() | Update: update()", VERSION)
}

/// Full cover banner printed with `-c`.
pub fn cover() -> String {
    format!(
        "{}\n\n\nWelcome to SigmaF v{}, the Program Language of the future for the Programming Functional and a lot more\n\n{}\n{}",
        "-".repeat(106),
        VERSION,
        COVER_ART,
        "-".repeat(106),
    )
}

const COVER_ART: &str = r#"                                                .         .
   d888888o.    8 8888     ,o888888o.          ,8.       ,8.                   .8.          8 8888888888
 .`8888:' `88.  8 8888    8888     `88.       ,888.     ,888.                 .888.         8 8888
 8.`8888.   Y8  8 8888 ,8 8888       `8.     .`8888.   .`8888.               :88888.        8 8888
 `8.`8888.      8 8888 88 8888              ,8.`8888. ,8.`8888.             . `88888.       8 8888
  `8.`8888.     8 8888 88 8888             ,8'8.`8888,8^8.`8888.           .8. `88888.      8 888888888888
   `8.`8888.    8 8888 88 8888            ,8' `8.`8888' `8.`8888.         .8`8. `88888.     8 8888
    `8.`8888.   8 8888 88 8888   8888888 ,8'   `8.`88'   `8.`8888.       .8' `8. `88888.    8 8888
8b   `8.`8888.  8 8888 `8 8888       .8',8'     `8.`'     `8.`8888.     .8'   `8. `88888.   8 8888
`8b.  ;8.`8888  8 8888    8888     ,88',8'       `8        `8.`8888.   .888888888. `88888.  8 8888
 `Y8888P ,88P'  8 8888     `8888888P' ,8'         `         `8.`8888. .8'       `8. `88888. 8 8888
"#;

/// User-function call depth before the evaluator reports recursion-depth
/// exhaustion. Kept well under the native stack so the error is always a
/// value, never an abort.
pub const MAX_CALL_DEPTH: usize = 200;

pub const HISTORY_FILE: &str = ".sigmaf_history";

pub const PROMPT: &str = ">> ";
pub const PROMPT_CONTINUATION: &str = ".. ";
