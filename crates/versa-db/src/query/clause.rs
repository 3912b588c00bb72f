//! Internal representation of query clauses.
//!
//! These types are shared by the SELECT, UPDATE and DELETE builders and are
//! not part of the public API beyond what [`super`] re-exports for
//! inspection in compiled SQL.

use rusqlite::types::Value;

use crate::{error::Result, ident};

/// The boolean keyword joining a predicate to the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A comparison operator, parsed from caller input.
///
/// The recognized comparison set is `=`, `!=`, `<>`, `>`, `>=`, `<`, `<=`
/// plus a case-insensitive `LIKE`. Anything else falls back to `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Like,
    Cmp(&'static str),
}

impl Operator {
    pub(crate) fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("like") {
            return Self::Like;
        }
        match raw {
            "!=" => Self::Cmp("!="),
            "<>" => Self::Cmp("<>"),
            ">" => Self::Cmp(">"),
            ">=" => Self::Cmp(">="),
            "<" => Self::Cmp("<"),
            "<=" => Self::Cmp("<="),
            // "=" and every unrecognized operator
            _ => Self::Cmp("="),
        }
    }
}

/// ORDER BY direction. Only an exact case-insensitive `desc` descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub(crate) fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One WHERE condition, or a parenthesized group of them.
#[derive(Debug, Clone)]
pub enum Predicate {
    Basic {
        column: String,
        op: Operator,
        value: Value,
        boolean: Connective,
    },
    In {
        column: String,
        values: Vec<Value>,
        boolean: Connective,
    },
    Group {
        predicates: Vec<Predicate>,
        boolean: Connective,
    },
}

impl Predicate {
    fn boolean(&self) -> Connective {
        match self {
            Self::Basic { boolean, .. } | Self::In { boolean, .. } | Self::Group { boolean, .. } => {
                *boolean
            }
        }
    }

    /// Compiles this predicate to a SQL fragment, pushing bound values.
    ///
    /// Returns `None` for a group with no predicates: it contributes
    /// nothing to the clause, not even an empty parenthesis pair.
    fn compile(&self, params: &mut Vec<Value>) -> Result<Option<String>> {
        match self {
            Self::Basic {
                column, op, value, ..
            } => {
                let column = ident::check(column)?;
                match op {
                    Operator::Like => {
                        params.push(Value::Text(format!("%{}%", value_as_text(value))));
                        Ok(Some(format!("{column} LIKE ?")))
                    }
                    Operator::Cmp(op) => {
                        params.push(value.clone());
                        Ok(Some(format!("{column} {op} ?")))
                    }
                }
            }
            Self::In { column, values, .. } => {
                let column = ident::check(column)?;
                let placeholders = vec!["?"; values.len()].join(", ");
                params.extend(values.iter().cloned());
                Ok(Some(format!("{column} IN ({placeholders})")))
            }
            Self::Group { predicates, .. } => {
                let inner = compile_where(predicates, params)?;
                if inner.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(format!("({inner})")))
                }
            }
        }
    }
}

/// An ORDER BY clause.
#[derive(Debug, Clone)]
pub struct OrderClause {
    pub column: String,
    pub direction: Direction,
}

/// Compiles a predicate list into the body of a WHERE clause.
///
/// The connective keyword is decided by emission position, so the output
/// never starts with `AND`/`OR` even when an empty group sits first.
pub(crate) fn compile_where(predicates: &[Predicate], params: &mut Vec<Value>) -> Result<String> {
    let mut parts: Vec<String> = Vec::new();
    for predicate in predicates {
        if let Some(fragment) = predicate.compile(params)? {
            if parts.is_empty() {
                parts.push(fragment);
            } else {
                parts.push(format!("{} {}", predicate.boolean().keyword(), fragment));
            }
        }
    }
    Ok(parts.join(" "))
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Null => String::new(),
        Value::Blob(_) => String::new(),
    }
}
