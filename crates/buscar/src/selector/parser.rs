//! Selector grammar parser.
//!
//! Grammar, per term:
//!
//! ```text
//! *                      universal
//! identifier             type term, case-insensitive
//! .name                  class term (scalar containment / list membership)
//! #{literal}             id term, exact synthetic-id equality
//! [key='value']          attribute equality after string coercion
//! [key~'pattern']        attribute containment (regex, unanchored)
//! [nth=N]                0-based ordinal filter over the term's match set
//! ```
//!
//! Runs of whitespace between terms, and leading/trailing whitespace, are
//! insignificant; whitespace inside bracket quotes is literal.

use super::{Predicate, Selector, Term, TermTarget};
use crate::result::{BuscarError, BuscarResult};
use regex::Regex;

impl Selector {
    /// Compile a selector string into an ordered term chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the string violates the grammar. This is the only
    /// failing condition in the engine; evaluation itself never raises.
    pub fn parse(input: &str) -> BuscarResult<Self> {
        let fragments = tokenize(input)?;
        if fragments.is_empty() {
            return Err(BuscarError::EmptySelector);
        }
        let terms = fragments
            .iter()
            .map(|fragment| parse_term(fragment, input))
            .collect::<BuscarResult<Vec<Term>>>()?;
        Ok(Self {
            terms,
            source: input.trim().to_string(),
        })
    }
}

/// Split a selector into term fragments on whitespace outside brackets.
fn tokenize(input: &str) -> BuscarResult<Vec<String>> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut depth = 0usize;

    for ch in input.chars() {
        match ch {
            '\'' if depth > 0 => {
                in_quote = !in_quote;
                current.push(ch);
            }
            '[' if !in_quote => {
                depth += 1;
                current.push(ch);
            }
            ']' if !in_quote => {
                depth = depth.checked_sub(1).ok_or_else(|| BuscarError::SelectorParse {
                    selector: input.to_string(),
                    message: "unbalanced `]`".to_string(),
                })?;
                current.push(ch);
            }
            ch if ch.is_whitespace() && !in_quote && depth == 0 => {
                if !current.is_empty() {
                    fragments.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }
    if in_quote {
        return Err(BuscarError::UnterminatedQuote {
            selector: input.to_string(),
        });
    }
    if depth > 0 {
        return Err(BuscarError::UnterminatedBracket {
            selector: input.to_string(),
        });
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    Ok(fragments)
}

fn parse_term(fragment: &str, selector: &str) -> BuscarResult<Term> {
    // Quotes only occur inside brackets, so the first `[` ends the head.
    let head_end = fragment.find('[').unwrap_or(fragment.len());
    let (head, brackets) = fragment.split_at(head_end);

    let target = parse_target(head, selector)?;
    let mut predicates = Vec::new();
    let mut nth = None;
    for group in bracket_groups(brackets) {
        match parse_predicate(&group, selector)? {
            Parsed::Predicate(predicate) => predicates.push(predicate),
            Parsed::Nth(ordinal) => nth = Some(ordinal),
        }
    }
    Ok(Term {
        target,
        predicates,
        nth,
    })
}

fn parse_target(head: &str, selector: &str) -> BuscarResult<TermTarget> {
    if head.is_empty() || head == "*" {
        return Ok(TermTarget::Any);
    }
    if let Some(class) = head.strip_prefix('.') {
        if class.is_empty() {
            return Err(BuscarError::SelectorParse {
                selector: selector.to_string(),
                message: "class term `.` missing a name".to_string(),
            });
        }
        return Ok(TermTarget::Class(class.to_string()));
    }
    if head.starts_with('#') {
        let literal = head
            .strip_prefix("#{")
            .and_then(|rest| rest.strip_suffix('}'));
        return match literal {
            Some(id) if !id.is_empty() => Ok(TermTarget::Id(id.to_string())),
            _ => Err(BuscarError::SelectorParse {
                selector: selector.to_string(),
                message: format!("id term `{head}` must take the form #{{literal}}"),
            }),
        };
    }
    Ok(TermTarget::Kind(head.to_string()))
}

/// Split `"[a][b]…"` into inner predicate strings, respecting quotes.
///
/// The tokenizer already validated bracket balance, so this walk cannot
/// encounter a stray delimiter.
fn bracket_groups(brackets: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut open = false;

    for ch in brackets.chars() {
        match ch {
            '\'' => {
                in_quote = !in_quote;
                current.push(ch);
            }
            '[' if !in_quote && !open => open = true,
            ']' if !in_quote && open => {
                open = false;
                groups.push(std::mem::take(&mut current));
            }
            ch => current.push(ch),
        }
    }
    groups
}

enum Parsed {
    Predicate(Predicate),
    Nth(usize),
}

fn parse_predicate(inner: &str, selector: &str) -> BuscarResult<Parsed> {
    let Some(op_index) = inner.find(['=', '~']) else {
        return Err(BuscarError::SelectorParse {
            selector: selector.to_string(),
            message: format!("predicate `[{inner}]` missing `=` or `~`"),
        });
    };
    let key = inner[..op_index].trim();
    let operator = &inner[op_index..=op_index];
    let raw_value = inner[op_index + 1..].trim();

    if key.is_empty() {
        return Err(BuscarError::SelectorParse {
            selector: selector.to_string(),
            message: format!("predicate `[{inner}]` missing a key"),
        });
    }

    if key == "nth" && operator == "=" {
        let ordinal = raw_value.parse::<usize>().map_err(|_| BuscarError::InvalidOrdinal {
            selector: selector.to_string(),
            ordinal: raw_value.to_string(),
        })?;
        return Ok(Parsed::Nth(ordinal));
    }

    let value = raw_value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| BuscarError::SelectorParse {
            selector: selector.to_string(),
            message: format!("value in `[{inner}]` must be single-quoted"),
        })?;

    match operator {
        "=" => Ok(Parsed::Predicate(Predicate::Equals {
            key: key.to_string(),
            value: value.to_string(),
        })),
        _ => {
            let pattern = Regex::new(value).map_err(|err| BuscarError::InvalidPattern {
                selector: selector.to_string(),
                pattern: value.to_string(),
                message: err.to_string(),
            })?;
            Ok(Parsed::Predicate(Predicate::Contains {
                key: key.to_string(),
                pattern,
            }))
        }
    }
}
