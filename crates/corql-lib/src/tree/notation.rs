//! Bracketed tree notation.
//!
//! A compact textual form for parse trees, close to what ANTLR's
//! `toStringTree` prints. Collaborators that cannot link a grammar hand trees
//! over in this form, and the test suites use it for fixtures.
//!
//! # Syntax
//!
//! - `(category child ...)`: rule node; its text is the concatenation of its leaves
//! - `atom`: leaf whose category and text are the atom
//! - `"quoted"`: leaf with escapes `\"`, `\\`, `\n`, `\t`; needed for `(`, `)`, spaces
//!
//! # Example
//!
//! ```text
//! (andTopExpr (variableExpr (qName (layer cat)) (textOp =) (textSpec "\"" NP "\"")) &)
//! ```

use std::fmt;
use std::ops::Range;

use logos::Logos;

use super::ParseNode;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r]+")]
enum Token<'src> {
    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[regex(r#""(?:[^"\\]|\\.)*""#, |lex| lex.slice())]
    Quoted(&'src str),

    #[regex(r#"[^\s()"]+"#, |lex| lex.slice())]
    Atom(&'src str),

    /// Coalesced run of characters no rule accepts.
    Garbage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty tree notation")]
    Empty,

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("unexpected input {text:?} at offset {}", span.start)]
    UnexpectedInput { text: String, span: Range<usize> },

    #[error("expected a category after `(` at offset {0}")]
    MissingCategory(usize),

    #[error("missing `)` for the node opened at offset {0}")]
    Unclosed(usize),

    #[error("unexpected `)` at offset {0}")]
    UnexpectedClose(usize),

    #[error("trailing input at offset {0}")]
    Trailing(usize),
}

/// Tokenizes `input`, coalescing consecutive lexer errors into one `Garbage` token.
fn lex(input: &str) -> Vec<(Token<'_>, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(input);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(token)) => {
                if let Some(start) = error_start.take() {
                    tokens.push((Token::Garbage, start..lexer.span().start));
                }
                tokens.push((token, lexer.span()));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push((Token::Garbage, start..input.len()));
                }
                break;
            }
        }
    }

    tokens
}

struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    input: &'src str,
}

impl<'src> Parser<'src> {
    fn new(input: &'src str) -> Self {
        Self {
            tokens: lex(input),
            pos: 0,
            input,
        }
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn advance(&mut self) -> Option<(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| s.start)
            .unwrap_or(self.input.len())
    }

    fn garbage(&self, span: Range<usize>) -> NotationError {
        let text = &self.input[span.clone()];
        if text.starts_with('"') {
            NotationError::UnterminatedString(span.start)
        } else {
            NotationError::UnexpectedInput {
                text: text.to_owned(),
                span,
            }
        }
    }

    fn parse_node(&mut self) -> Result<ParseNode, NotationError> {
        let Some((token, span)) = self.advance() else {
            return Err(NotationError::Empty);
        };
        match token {
            Token::Atom(atom) => Ok(ParseNode::leaf(atom)),
            Token::Quoted(quoted) => Ok(ParseNode::leaf(unescape(quoted))),
            Token::ParenClose => Err(NotationError::UnexpectedClose(span.start)),
            Token::Garbage => Err(self.garbage(span)),
            Token::ParenOpen => self.parse_inner(span.start),
        }
    }

    fn parse_inner(&mut self, open: usize) -> Result<ParseNode, NotationError> {
        let category = match self.advance() {
            Some((Token::Atom(atom), _)) => atom.to_owned(),
            Some((Token::Quoted(quoted), _)) => unescape(quoted),
            Some((Token::Garbage, span)) => return Err(self.garbage(span)),
            Some(_) => return Err(NotationError::MissingCategory(open)),
            None => return Err(NotationError::Unclosed(open)),
        };

        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some(Token::ParenClose) => {
                    self.advance();
                    break;
                }
                Some(_) => children.push(self.parse_node()?),
                None => return Err(NotationError::Unclosed(open)),
            }
        }

        Ok(ParseNode::inner(category, children))
    }
}

/// Reads one tree from `input`.
pub fn parse(input: &str) -> Result<ParseNode, NotationError> {
    let mut parser = Parser::new(input);
    if parser.peek().is_none() {
        return Err(NotationError::Empty);
    }
    let node = parser.parse_node()?;
    if parser.peek().is_some() {
        return Err(NotationError::Trailing(parser.current_offset()));
    }
    Ok(node)
}

/// Strips the surrounding quotes and resolves escapes.
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Writes `literal` as an atom when possible, quoted otherwise.
pub(super) fn write_literal(f: &mut fmt::Formatter<'_>, literal: &str) -> fmt::Result {
    let is_atom = !literal.is_empty()
        && !literal
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"'));
    if is_atom {
        return f.write_str(literal);
    }
    f.write_str("\"")?;
    for c in literal.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
