//! ASCII equation notation.
//!
//! The notation is a flat, mostly whitespace-insensitive string:
//! - space and `,` separate terms; `+ - * /` are operators and terms of their own;
//! - `(...)` groups, `sqrt(...)` puts the group under a radical;
//! - `'...'` or `"..."` quote a term verbatim (separators included);
//! - the last `/` of a group splits it into a fraction. A preceding `=` bounds
//!   the numerator, so `y = mx + b/2` divides `mx + b`, not `y = mx + b`.
//!
//! ```
//! use eqdraw::equation::{Node, ascii};
//!
//! let node = ascii::parse("1/2").unwrap();
//! assert_eq!(Some(Node::div(Node::term("1"), Node::term("2"))), node);
//! ```

use crate::equation::{Node, Parenthesis, Term};

/// Why a string is not valid notation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `)` with no open group; `position` counts characters from 1.
    #[error("unmatched end parenthesis at position {position}")]
    UnmatchedEnd { position: usize },

    #[error("unmatched start parenthesis")]
    UnmatchedStart,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
enum GroupKind {
    #[default]
    Terms,
    Parenthesis,
    Root,
}

/// A group being filled while scanning: the top level, or one open `(`.
#[derive(Debug, Default)]
struct Group {
    kind: GroupKind,
    terms: Vec<Node>,
}

impl Group {
    fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            terms: Vec::new(),
        }
    }

    /// Emit the pending characters as a term, if there are any.
    fn flush(&mut self, pending: &mut Vec<char>) {
        if pending.is_empty() {
            return;
        }
        let content = std::mem::take(pending);
        self.terms.push(Node::Term(Term::from_chars(content)));
    }

    /// Replace `num... / den...` with a fraction node. Only the last `/`
    /// splits; earlier ones end up inside the numerator and are split when it
    /// is wrapped. A `/` or `=` in first position never bounds anything.
    fn split_division(&mut self) {
        let Some(slash) = self.terms.iter().rposition(is_division) else {
            return;
        };
        if slash == 0 {
            return;
        }

        let denominator = self.terms.split_off(slash + 1);
        self.terms.truncate(slash);
        let equals = self.terms.iter().skip(1).rposition(is_equals).map(|i| i + 1);
        let numerator = match equals {
            Some(eq) => self.terms.split_off(eq + 1),
            None => std::mem::take(&mut self.terms),
        };

        self.terms.push(Node::div(operand(numerator), operand(denominator)));
    }

    /// Collapse the finished group into a single node.
    fn wrap(mut self) -> Option<Node> {
        self.split_division();

        let inner = match self.terms.len() {
            0 => None,
            1 => self.terms.pop(),
            _ => Some(Node::run(self.terms)),
        };
        match self.kind {
            GroupKind::Terms => inner,
            GroupKind::Parenthesis => Some(Node::Parenthesis(Parenthesis::new(inner))),
            GroupKind::Root => Some(Node::root(inner.unwrap_or_else(|| Node::run(Vec::new())))),
        }
    }
}

fn is_division(node: &Node) -> bool {
    matches!(node, Node::Term(t) if t.is("/"))
}

fn is_equals(node: &Node) -> bool {
    matches!(node, Node::Term(t) if t.is("="))
}

/// One side of a fraction. Brackets around a whole side are implied by the
/// fraction and dropped.
fn operand(terms: Vec<Node>) -> Node {
    let node = Group {
        kind: GroupKind::Terms,
        terms,
    }
    .wrap()
    .unwrap_or_else(|| Node::run(Vec::new()));

    match node {
        Node::Parenthesis(p) => p.into_term().unwrap_or_else(Node::empty_paren),
        node => node,
    }
}

/// Parse `input` into an equation tree, or `None` when it holds no terms.
pub fn parse(input: &str) -> Result<Option<Node>, ParseError> {
    let mut pending: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut current = Group::default();
    let mut open: Vec<Group> = Vec::new();

    for (i, c) in input.chars().enumerate() {
        if let Some(q) = quote {
            if c == q {
                current.flush(&mut pending);
                quote = None;
            } else {
                pending.push(c);
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' => {
                let kind = if pending.iter().copied().eq("sqrt".chars()) {
                    pending.clear();
                    GroupKind::Root
                } else {
                    current.flush(&mut pending);
                    GroupKind::Parenthesis
                };
                open.push(std::mem::replace(&mut current, Group::new(kind)));
            }
            ')' => {
                current.flush(&mut pending);
                let outer = open
                    .pop()
                    .ok_or(ParseError::UnmatchedEnd { position: i + 1 })?;
                let inner = std::mem::replace(&mut current, outer);
                current.terms.extend(inner.wrap());
            }
            ' ' | ',' => current.flush(&mut pending),
            '+' | '-' | '*' | '/' => {
                current.flush(&mut pending);
                current.terms.push(Node::op(c));
            }
            _ => pending.push(c),
        }
    }

    if quote.is_some() {
        log::debug!("unterminated quote in {input:?}");
    }
    current.flush(&mut pending);
    if !open.is_empty() {
        return Err(ParseError::UnmatchedStart);
    }
    Ok(current.wrap())
}
