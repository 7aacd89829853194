//! Multi-value cell tokenizer.
//!
//! Spreadsheet exports store multi-valued links as one comma-separated
//! cell, quoting names that themselves contain commas. This is not a CSV
//! parser: a doubled quote is two toggles, not an escaped quote.

const DELIMITER: char = ',';
const QUOTE: char = '"';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InQuotedSpan,
}

impl ScanState {
    fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::InQuotedSpan,
            Self::InQuotedSpan => Self::Normal,
        }
    }
}

/// Splits `cell` into trimmed, non-blank tokens in order of appearance.
///
/// Commas inside a quoted span are literal. Quote characters are never
/// part of a token, and an unterminated span simply runs to the end.
pub fn parse_multi_value(cell: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::Normal;

    for ch in cell.chars() {
        match (state, ch) {
            (_, QUOTE) => state = state.toggled(),
            (ScanState::Normal, DELIMITER) => emit(&mut tokens, &mut current),
            _ => current.push(ch),
        }
    }
    emit(&mut tokens, &mut current);
    tokens
}

fn emit(tokens: &mut Vec<String>, current: &mut String) {
    let token = current.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
    current.clear();
}
