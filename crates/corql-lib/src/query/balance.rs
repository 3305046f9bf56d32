//! Bracket balance check on the raw query text.
//!
//! Runs before any tree is built, so grammars never see a query whose
//! brackets cannot pair up. Quoted strings are skipped, and so are regex
//! bodies in languages that delimit regexes with slashes. Elsewhere a slash
//! is an ordinary character (CQL modifiers such as `=/stem`).

use std::str::Chars;

/// Returns the offending bracket description on imbalance.
pub(super) fn check(query: &str, slash_regexes: bool) -> Result<(), String> {
    let mut stack: Vec<char> = Vec::new();
    let mut chars = query.chars();
    let mut previous: Option<char> = None;

    while let Some(c) = chars.next() {
        match c {
            '"' => skip_delimited(&mut chars, '"'),
            '/' if slash_regexes && opens_regex(previous) => skip_delimited(&mut chars, '/'),
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let open = opening(c);
                if stack.pop() != Some(open) {
                    return Err(format!("unexpected `{c}`"));
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            previous = Some(c);
        }
    }

    match stack.pop() {
        Some(open) => Err(format!("unbalanced `{open}`")),
        None => Ok(()),
    }
}

fn opening(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

/// A slash after an operator or at the start is a regex delimiter;
/// after a name it separates foundry and layer.
fn opens_regex(previous: Option<char>) -> bool {
    match previous {
        None => true,
        Some(c) => matches!(c, '=' | '~' | '!' | '(' | '[' | '&' | '|' | ','),
    }
}

fn skip_delimited(chars: &mut Chars<'_>, close: char) {
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == close {
            return;
        }
    }
}
