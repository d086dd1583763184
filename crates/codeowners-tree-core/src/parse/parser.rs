//! Line and file-level parsers for CODEOWNERS files.
//!
//! This module combines the lexer components into a best-effort tokenizer:
//! every line either yields a rule, is skipped, or yields a warning.

use super::error::{ParseResult, ParseWarning};
use super::lexer::{
    is_blank_line, parse_comment_line, parse_rule_tokens, strip_inline_comment, unescape_pattern,
};
use super::rule::Rule;
use crate::matching::normalize;
use log::{debug, trace};

/// What a single line contributed.
enum ParsedLine {
    Skip,
    Rule {
        pattern: String,
        owners: Vec<String>,
        warnings: Vec<ParseWarning>,
    },
    Inert(ParseWarning),
}

fn parse_line(line_text: &str, line_num: usize) -> ParsedLine {
    if is_blank_line(line_text) || parse_comment_line(line_text).is_ok() {
        return ParsedLine::Skip;
    }

    let content = strip_inline_comment(line_text);
    let Ok((_, tokens)) = parse_rule_tokens(content) else {
        // Only whitespace before an inline comment.
        return ParsedLine::Skip;
    };

    let pattern = unescape_pattern(tokens.pattern);
    if normalize(&pattern).is_empty() {
        return ParsedLine::Inert(ParseWarning::empty_pattern(line_num));
    }

    let mut warnings: Vec<ParseWarning> = tokens
        .ignored
        .iter()
        .map(|token| ParseWarning::ignored_token(line_num, *token))
        .collect();
    if tokens.owners.is_empty() {
        warnings.push(ParseWarning::missing_owners(line_num, &*pattern));
    }

    ParsedLine::Rule {
        pattern: pattern.into_owned(),
        owners: tokens.owners.iter().map(|o| o.to_string()).collect(),
        warnings,
    }
}

/// Parses CODEOWNERS text into rules in declaration order.
///
/// Never fails: malformed lines produce warnings and no owners.
pub fn parse_rules(input: &str) -> ParseResult {
    debug!("Parsing CODEOWNERS file ({} bytes)", input.len());
    let mut result = ParseResult::default();

    for (line_idx, line_text) in input.lines().enumerate() {
        let line_num = line_idx + 1;

        match parse_line(line_text, line_num) {
            ParsedLine::Skip => trace!("Line {}: skipped", line_num),
            ParsedLine::Rule {
                pattern,
                owners,
                warnings,
            } => {
                let index = result.rules.len();
                let rule = Rule::new(&pattern, owners, line_num, index);
                trace!("Line {}: rule '{}'", line_num, rule);
                result.rules.push(rule);
                result.warnings.extend(warnings);
            }
            ParsedLine::Inert(warning) => {
                debug!("{}", warning);
                result.warnings.push(warning);
            }
        }
    }

    debug!(
        "Parsing complete: {} rules, {} warnings",
        result.rules.len(),
        result.warnings.len()
    );
    result
}
