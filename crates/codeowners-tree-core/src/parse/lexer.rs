//! Lexer and token parsers for CODEOWNERS files.
//!
//! This module contains nom-based parsers for the pieces of a line:
//! comments, the pattern token and the owner tokens that follow it.

use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::rest,
};
use std::borrow::Cow;

/// Characters that can appear in a token. Only spaces and tabs separate tokens.
fn is_token_char(c: char) -> bool {
    c != ' ' && c != '\t'
}

/// Parses a complete comment line (optional whitespace + # + content).
pub fn parse_comment_line(input: &str) -> IResult<&str, &str> {
    (space0, char('#'), rest)
        .map(|(_, _, content)| content)
        .parse(input)
}

/// Checks if a line is blank (empty or only whitespace).
pub fn is_blank_line(input: &str) -> bool {
    input.trim().is_empty()
}

/// Cuts a line at the first unescaped `#`.
///
/// A `#` preceded by a backslash is part of the pattern (`\#file`).
pub fn strip_inline_comment(input: &str) -> &str {
    let mut escaped = false;
    for (idx, c) in input.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            '#' if !escaped => return &input[..idx],
            _ => escaped = false,
        }
    }
    input
}

/// Replaces `\#` escapes with a literal `#`.
pub fn unescape_pattern(pattern: &str) -> Cow<'_, str> {
    if pattern.contains("\\#") {
        Cow::Owned(pattern.replace("\\#", "#"))
    } else {
        Cow::Borrowed(pattern)
    }
}

/// Returns true if a token is a valid owner identifier (`@` plus a name).
pub fn is_owner_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('@')
}

/// The tokens of a rule line, split into owners and ignored tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTokens<'a> {
    /// The pattern token, as written.
    pub pattern: &'a str,
    /// Tokens that start with `@`.
    pub owners: Vec<&'a str>,
    /// Tokens that are not owner identifiers.
    pub ignored: Vec<&'a str>,
}

/// Parses the tokens of a rule line (comment already stripped).
///
/// Fails only when the line holds no token at all.
pub fn parse_rule_tokens(input: &str) -> IResult<&str, RuleTokens<'_>> {
    let (after_ws, _) = space0(input)?;
    let (mut current, pattern) = take_while1(is_token_char)(after_ws)?;

    let mut owners = Vec::new();
    let mut ignored = Vec::new();

    loop {
        let (after_ws, _) = space0(current)?;
        if after_ws.is_empty() {
            current = after_ws;
            break;
        }

        let (after_token, token) = take_while1(is_token_char)(after_ws)?;
        if is_owner_token(token) {
            owners.push(token);
        } else {
            ignored.push(token);
        }
        current = after_token;
    }

    Ok((
        current,
        RuleTokens {
            pattern,
            owners,
            ignored,
        },
    ))
}
