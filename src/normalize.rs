//! Output normalization
//!
//! Both the interpreter's output and the reference output pass through
//! [`normalize`] before comparison. Error detail text, incidental spacing
//! and trailing zeros of decimals are erased; structure and significant
//! digits are kept.

use lazy_static::lazy_static;
use regex::Regex;

const SYNTAX_ERROR: &str = "Syntax error";
const EVALUATION_ERROR: &str = "Evaluation error";

lazy_static! {
    static ref SYNTAX_ERROR_LINE: Regex = Regex::new(r"(?im)^syntax error.*$").unwrap();
    static ref EVALUATION_ERROR_LINE: Regex = Regex::new(r"(?im)^evaluation error.*$").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref OPEN_PAREN_SPACE: Regex = Regex::new(r"\(\s+").unwrap();
    static ref SPACE_CLOSE_PAREN: Regex = Regex::new(r"\s+\)").unwrap();
    static ref ZERO_FRACTION_AT_END: Regex = Regex::new(r"\.0+$").unwrap();
    static ref TRAILING_ZEROS_BEFORE_SPACE: Regex = Regex::new(r"(\.)([1-9]+)(0*)\s+").unwrap();
    static ref TRAILING_ZEROS_AT_END: Regex = Regex::new(r"(\.)([1-9]+)(0*)$").unwrap();
}

/// Rewrite `text` into its comparison form.
///
/// The steps run in a fixed order and each rewrites the whole text:
/// error lines collapse to their category, whitespace runs collapse to one
/// space, spaces inside parentheses vanish, zero fractions are dropped
/// (`2.000` becomes `2`, `1.3200` becomes `1.32`), and the result is trimmed.
pub fn normalize(text: &str) -> String {
    let text = SYNTAX_ERROR_LINE.replace_all(text, SYNTAX_ERROR);
    let text = EVALUATION_ERROR_LINE.replace_all(&text, EVALUATION_ERROR);

    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let text = OPEN_PAREN_SPACE.replace_all(&text, "(");
    let text = SPACE_CLOSE_PAREN.replace_all(&text, ")");

    let text = ZERO_FRACTION_AT_END.replace(&text, "");
    let text = TRAILING_ZEROS_BEFORE_SPACE.replace_all(&text, "${1}${2} ");
    let text = TRAILING_ZEROS_AT_END.replace(&text, "${1}${2}");

    text.trim().to_string()
}
