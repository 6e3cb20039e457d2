//! SQL fragments with named parameters.
//!
//! Conditions are written with `:name` placeholders and carry their bound
//! values alongside. Before execution the placeholders are rewritten to the
//! `$N` form tokio-postgres expects.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::SearchError;

/// A SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Floating point parameter.
    Float(f64),
    /// Integer parameter.
    Integer(i64),
    /// Boolean parameter.
    Bool(bool),
    /// Timestamp parameter.
    Timestamp(DateTime<Utc>),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a text parameter.
    pub fn text(s: impl Into<String>) -> Self {
        SqlParam::Text(s.into())
    }

    /// Returns the text value, if this is a text parameter.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlParam::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Integer(v)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Float(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(v)
    }
}

/// A SQL fragment with named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    /// The SQL string with `:name` placeholders.
    pub sql: String,
    /// Bound values, in binding order.
    pub params: Vec<(String, SqlParam)>,
}

impl SqlFragment {
    /// Creates a new fragment with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<(String, SqlParam)>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Binds a named parameter, replacing any earlier value for the name.
    pub fn bind(mut self, name: impl Into<String>, value: SqlParam) -> Self {
        bind_param(&mut self.params, name.into(), value);
        self
    }

    /// Returns the value bound to `name`.
    pub fn param(&self, name: &str) -> Option<&SqlParam> {
        lookup(&self.params, name)
    }

    /// Combines two fragments with AND.
    pub fn and(self, other: SqlFragment) -> SqlFragment {
        self.combine(other, "AND")
    }

    /// Combines two fragments with OR.
    pub fn or(self, other: SqlFragment) -> SqlFragment {
        self.combine(other, "OR")
    }

    fn combine(self, other: SqlFragment, op: &str) -> SqlFragment {
        let mut params = self.params;
        for (name, value) in other.params {
            bind_param(&mut params, name, value);
        }
        SqlFragment {
            sql: format!("({}) {} ({})", self.sql, op, other.sql),
            params,
        }
    }

    /// Rewrites `:name` placeholders to `$N` and orders the values to match.
    pub fn to_positional(&self) -> Result<(String, Vec<SqlParam>), SearchError> {
        to_positional(&self.sql, &self.params)
    }
}

pub(crate) fn bind_param(params: &mut Vec<(String, SqlParam)>, name: String, value: SqlParam) {
    match params.iter_mut().find(|(n, _)| *n == name) {
        Some((_, existing)) => *existing = value,
        None => params.push((name, value)),
    }
}

pub(crate) fn lookup<'a>(params: &'a [(String, SqlParam)], name: &str) -> Option<&'a SqlParam> {
    params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

/// Rewrites `:name` placeholders in `sql` to `$N`.
///
/// Each distinct name gets one position; repeated uses share it. Quoted
/// literals, quoted identifiers and `::type` casts are left untouched.
pub fn to_positional(
    sql: &str,
    params: &[(String, SqlParam)],
) -> Result<(String, Vec<SqlParam>), SearchError> {
    let mut out = String::with_capacity(sql.len());
    let mut ordered: Vec<SqlParam> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
            }
            ':' => match chars.peek() {
                Some(':') => {
                    out.push_str("::");
                    chars.next();
                }
                Some(&next) if next.is_ascii_alphabetic() || next == '_' => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }

                    let position = match positions.get(&name) {
                        Some(&p) => p,
                        None => {
                            let value = lookup(params, &name).cloned().ok_or_else(|| {
                                SearchError::UnboundParameter { name: name.clone() }
                            })?;
                            ordered.push(value);
                            positions.insert(name, ordered.len());
                            ordered.len()
                        }
                    };
                    out.push('$');
                    out.push_str(&position.to_string());
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    Ok((out, ordered))
}
