//! In-process evaluation of filters and ordering.
//!
//! Filters follow SQL three-valued logic so both backends agree: a
//! comparison involving NULL is unknown (`None`), and only rows whose filter
//! is definitely true are kept.

use std::cmp::Ordering;

use quarry_core::error::AppError;
use quarry_core::result::AppResult;
use quarry_core::traits::Entity;
use quarry_core::types::{FieldValue, Filter, FilterField, FilterOp, SortField};

/// Whether `row` is kept by `filter`.
pub fn matches<T: Entity>(filter: &Filter, row: &T) -> AppResult<bool> {
    Ok(truth(filter, row)? == Some(true))
}

fn truth<T: Entity>(filter: &Filter, row: &T) -> AppResult<Option<bool>> {
    match filter {
        Filter::Field(condition) => condition_truth(condition, row),
        Filter::And(items) => {
            let mut result = Some(true);
            for item in items {
                match truth(item, row)? {
                    Some(false) => return Ok(Some(false)),
                    None => result = None,
                    Some(true) => {}
                }
            }
            Ok(result)
        }
        Filter::Or(items) => {
            let mut result = Some(false);
            for item in items {
                match truth(item, row)? {
                    Some(true) => return Ok(Some(true)),
                    None => result = None,
                    Some(false) => {}
                }
            }
            Ok(result)
        }
        Filter::Not(inner) => Ok(truth(inner, row)?.map(|value| !value)),
    }
}

fn condition_truth<T: Entity>(condition: &FilterField, row: &T) -> AppResult<Option<bool>> {
    let value = column(row, &condition.field)?;

    match condition.op {
        FilterOp::IsNull => Ok(Some(value.is_null())),
        FilterOp::IsNotNull => Ok(Some(!value.is_null())),
        FilterOp::Eq => Ok(value.compare(&condition.value)?.map(|o| o == Ordering::Equal)),
        FilterOp::Ne => Ok(value.compare(&condition.value)?.map(|o| o != Ordering::Equal)),
        FilterOp::Gt => Ok(value.compare(&condition.value)?.map(|o| o == Ordering::Greater)),
        FilterOp::Gte => Ok(value.compare(&condition.value)?.map(|o| o != Ordering::Less)),
        FilterOp::Lt => Ok(value.compare(&condition.value)?.map(|o| o == Ordering::Less)),
        FilterOp::Lte => Ok(value.compare(&condition.value)?.map(|o| o != Ordering::Greater)),
        FilterOp::Like | FilterOp::ILike => {
            let FieldValue::Text(pattern) = &condition.value else {
                return Err(AppError::invalid_argument(format!(
                    "Pattern match on '{}' needs a text pattern",
                    condition.field
                )));
            };
            match value {
                FieldValue::Null => Ok(None),
                FieldValue::Text(text) if condition.op == FilterOp::ILike => {
                    Ok(Some(like(&text.to_lowercase(), &pattern.to_lowercase())))
                }
                FieldValue::Text(text) => Ok(Some(like(&text, pattern))),
                other => Err(AppError::invalid_argument(format!(
                    "Pattern match on '{}' needs a text column, found {}",
                    condition.field,
                    other.type_name()
                ))),
            }
        }
        FilterOp::In => {
            let FieldValue::List(candidates) = &condition.value else {
                return Err(AppError::invalid_argument(format!(
                    "Operator 'in' on '{}' needs a list",
                    condition.field
                )));
            };
            let mut result = Some(false);
            for candidate in candidates {
                match value.compare(candidate)? {
                    Some(Ordering::Equal) => return Ok(Some(true)),
                    None => result = None,
                    Some(_) => {}
                }
            }
            Ok(result)
        }
    }
}

fn column<T: Entity>(row: &T, name: &str) -> AppResult<FieldValue> {
    row.field(name).ok_or_else(|| {
        AppError::invalid_argument(format!(
            "Unknown column '{}' on '{}'",
            name,
            T::descriptor().name
        ))
    })
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one,
/// and `\` makes the next character literal.
pub fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern = tokenize(pattern);
    like_from(&text, &pattern)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Literal(char),
    One,
    Any,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::Any,
            '_' => Token::One,
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        });
    }
    tokens
}

fn like_from(text: &[char], pattern: &[Token]) -> bool {
    // Greedy wildcard matching with backtracking to the last `%`.
    let (mut t, mut p) = (0, 0);
    let mut resume: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(Token::Any) => {
                resume = Some((p, t));
                p += 1;
            }
            Some(Token::One) => {
                t += 1;
                p += 1;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match resume {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    resume = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|token| *token == Token::Any)
}

/// Sort `rows` in place by `key`, keeping store order among equal keys.
///
/// NULL keys sort last ascending and first descending.
pub fn sort_rows<T: Entity>(rows: &mut Vec<T>, key: &SortField) -> AppResult<()> {
    let mut keyed = Vec::with_capacity(rows.len());
    for row in rows.drain(..) {
        let value = column(&row, &key.field)?;
        keyed.push((value, row));
    }

    keyed.sort_by(|(a, _), (b, _)| {
        key.direction.order_keys(a.is_null(), b.is_null(), || {
            a.compare(b).ok().flatten().unwrap_or(Ordering::Equal)
        })
    });

    rows.extend(keyed.into_iter().map(|(_, row)| row));
    Ok(())
}
