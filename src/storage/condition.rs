//! Structured row filters for update and delete.
//!
//! A [`Condition`] is a small expression tree over column comparisons.
//! Column names are checked against the target [`Table`] before SQL is
//! built, and every literal is bound as a parameter, so no caller text is
//! ever interpolated into a statement.
//!
//! Conditions can be built in code or parsed from text:
//!
//! ```
//! use memestore::Condition;
//!
//! let parsed: Condition = "symbol = 'BONK' OR market_cap_usd < 1000".parse().unwrap();
//! let built = Condition::eq("symbol", "BONK").or(Condition::lt("market_cap_usd", 1000));
//! assert_eq!(parsed, built);
//! ```
//!
//! The text form accepts `'quoted'` strings (with `''` as an escaped quote),
//! integer and real numbers, `X'hex'` blob literals and `NULL`. Parentheses
//! nest at most [`MAX_NESTING`] levels deep.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::cell::Cell;
use super::error::StoreError;
use super::table::{quote_ident, Table};

/// Deepest parenthesis nesting accepted by the parser.
pub const MAX_NESTING: usize = 64;

/// Error type for condition parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("condition is empty")]
    Empty,

    #[error("unexpected end of condition")]
    UnexpectedEnd,

    #[error("unexpected {found:?} at position {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("unterminated string starting at position {0}")]
    UnterminatedString(usize),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("invalid blob literal {0:?}")]
    InvalidBlob(String),

    #[error("condition nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("empty {0} group")]
    EmptyGroup(&'static str),
}

/// Comparison operator between a column and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A row filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: String,
        op: CompareOp,
        value: Cell,
    },
    IsNull {
        column: String,
        negated: bool,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    /// Compare `column` against a literal value.
    ///
    /// # Arguments
    ///
    /// * `column` - Column name, checked against the table when rendered
    /// * `op` - Comparison operator
    /// * `value` - Literal bound as a parameter; `Null` with `Eq`/`Ne`
    ///   renders as `IS NULL`/`IS NOT NULL`
    ///
    /// # Examples
    ///
    /// ```
    /// use memestore::storage::CompareOp;
    /// use memestore::Condition;
    ///
    /// let cheap = Condition::compare("price_usd", CompareOp::Le, 0.001);
    /// assert_eq!(cheap.to_string(), "price_usd <= 0.001");
    /// assert_eq!(Condition::eq("symbol", "WIF").to_string(), "symbol = 'WIF'");
    /// ```
    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Cell>) -> Self {
        Self::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// `column = value`.
    pub fn eq(column: impl Into<String>, value: impl Into<Cell>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    /// `column != value`.
    pub fn ne(column: impl Into<String>, value: impl Into<Cell>) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    /// `column < value`.
    pub fn lt(column: impl Into<String>, value: impl Into<Cell>) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    /// `column > value`.
    pub fn gt(column: impl Into<String>, value: impl Into<Cell>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    /// `column IS NULL`.
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
            negated: false,
        }
    }

    /// `column IS NOT NULL`.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
            negated: true,
        }
    }

    /// Conjunction, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        match self {
            Self::And(mut parts) => {
                parts.push(other);
                Self::And(parts)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Disjunction, flattening nested `Or`s.
    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        match self {
            Self::Or(mut parts) => {
                parts.push(other);
                Self::Or(parts)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    /// Render as a SQL expression for `table`, appending bound values to
    /// `params` in placeholder order.
    pub(crate) fn to_sql(&self, table: Table, params: &mut Vec<Cell>) -> Result<String, StoreError> {
        match self {
            Self::Compare { column, op, value } => {
                let column = quote_ident(table.column(column)?);
                match (op, value) {
                    (CompareOp::Eq, Cell::Null) => Ok(format!("{column} IS NULL")),
                    (CompareOp::Ne, Cell::Null) => Ok(format!("{column} IS NOT NULL")),
                    _ => {
                        params.push(value.clone());
                        Ok(format!("{column} {} ?", op.as_sql()))
                    }
                }
            }
            Self::IsNull { column, negated } => {
                let column = quote_ident(table.column(column)?);
                Ok(if *negated {
                    format!("{column} IS NOT NULL")
                } else {
                    format!("{column} IS NULL")
                })
            }
            Self::And(parts) => join(parts, " AND ", "AND", table, params),
            Self::Or(parts) => join(parts, " OR ", "OR", table, params),
        }
    }
}

fn join(
    parts: &[Condition],
    separator: &str,
    label: &'static str,
    table: Table,
    params: &mut Vec<Cell>,
) -> Result<String, StoreError> {
    if parts.is_empty() {
        return Err(ConditionError::EmptyGroup(label).into());
    }
    let rendered = parts
        .iter()
        .map(|part| part.to_sql(table, params))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("({})", rendered.join(separator)))
}

/// Renders the text form accepted by [`FromStr`].
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { column, op, value } => {
                write!(f, "{column} {} ", op.as_sql())?;
                match value {
                    Cell::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
                    // `{:?}` keeps the fraction on whole reals so they reparse as reals
                    Cell::Real(r) => write!(f, "{r:?}"),
                    Cell::Blob(bytes) => write!(f, "X'{}'", hex::encode_upper(bytes)),
                    other => write!(f, "{other}"),
                }
            }
            Self::IsNull { column, negated } => {
                write!(f, "{column} IS {}NULL", if *negated { "NOT " } else { "" })
            }
            Self::And(parts) | Self::Or(parts) => {
                let separator = if matches!(self, Self::And(_)) { " AND " } else { " OR " };
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s)?;
        if tokens.is_empty() {
            return Err(ConditionError::Empty);
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let condition = parser.parse_or()?;
        match parser.peek() {
            None => Ok(condition),
            Some((token, position)) => Err(ConditionError::UnexpectedToken {
                found: token.to_string(),
                position,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(Cell),
    Blob(Vec<u8>),
    Op(CompareOp),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(s) => f.write_str(s),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Blob(bytes) => write!(f, "X'{}'", hex::encode_upper(bytes)),
            Self::Op(op) => f.write_str(op.as_sql()),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ConditionError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push((Token::LParen, pos));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, pos));
                i += 1;
            }
            '=' => {
                tokens.push((Token::Op(CompareOp::Eq), pos));
                i += 1;
            }
            '!' | '<' | '>' => {
                let next = chars.get(i + 1).map(|&(_, n)| n);
                let (op, width) = match (c, next) {
                    ('!', Some('=')) | ('<', Some('>')) => (CompareOp::Ne, 2),
                    ('<', Some('=')) => (CompareOp::Le, 2),
                    ('>', Some('=')) => (CompareOp::Ge, 2),
                    ('<', _) => (CompareOp::Lt, 1),
                    ('>', _) => (CompareOp::Gt, 1),
                    _ => {
                        return Err(ConditionError::UnexpectedToken {
                            found: c.to_string(),
                            position: pos,
                        })
                    }
                };
                tokens.push((Token::Op(op), pos));
                i += width;
            }
            '\'' => {
                let mut value = String::new();
                let mut j = i + 1;
                loop {
                    match chars.get(j) {
                        None => return Err(ConditionError::UnterminatedString(pos)),
                        Some(&(_, '\'')) if chars.get(j + 1).map(|&(_, n)| n) == Some('\'') => {
                            value.push('\'');
                            j += 2;
                        }
                        Some(&(_, '\'')) => break,
                        Some(&(_, ch)) => {
                            value.push(ch);
                            j += 1;
                        }
                    }
                }
                tokens.push((Token::Str(value), pos));
                i = j + 1;
            }
            'x' | 'X' if chars.get(i + 1).map(|&(_, n)| n) == Some('\'') => {
                let mut j = i + 2;
                while chars.get(j).is_some_and(|&(_, ch)| ch != '\'') {
                    j += 1;
                }
                let Some(&(end, _)) = chars.get(j) else {
                    return Err(ConditionError::UnterminatedString(pos));
                };
                let digits = &input[chars[i + 2].0..end];
                let bytes = hex::decode(digits)
                    .map_err(|_| ConditionError::InvalidBlob(digits.to_string()))?;
                tokens.push((Token::Blob(bytes), pos));
                i = j + 1;
            }
            c if c.is_ascii_digit() || c == '-' || c == '.' => {
                let mut j = i + 1;
                while let Some(&(_, ch)) = chars.get(j) {
                    let exponent_sign = (ch == '-' || ch == '+')
                        && matches!(chars.get(j - 1), Some(&(_, 'e' | 'E')));
                    if ch.is_ascii_alphanumeric() || ch == '.' || exponent_sign {
                        j += 1;
                    } else {
                        break;
                    }
                }
                let end = chars.get(j).map_or(input.len(), |&(p, _)| p);
                let text = &input[pos..end];
                let number = if let Ok(int) = text.parse::<i64>() {
                    Cell::Integer(int)
                } else {
                    match text.parse::<f64>() {
                        Ok(real) if real.is_finite() => Cell::Real(real),
                        _ => return Err(ConditionError::InvalidNumber(text.to_string())),
                    }
                };
                tokens.push((Token::Number(number), pos));
                i = j;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut j = i + 1;
                while let Some(&(_, ch)) = chars.get(j) {
                    if ch.is_alphanumeric() || ch == '_' {
                        j += 1;
                    } else {
                        break;
                    }
                }
                let end = chars.get(j).map_or(input.len(), |&(p, _)| p);
                tokens.push((Token::Ident(input[pos..end].to_string()), pos));
                i = j;
            }
            other => {
                return Err(ConditionError::UnexpectedToken {
                    found: other.to_string(),
                    position: pos,
                })
            }
        }
    }

    Ok(tokens)
}

/// Recursive descent over the token stream. `AND` binds tighter than `OR`.
struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    /// Open parentheses around the current position.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<(&Token, usize)> {
        self.tokens.get(self.pos).map(|(t, p)| (t, *p))
    }

    fn next(&mut self) -> Result<(Token, usize), ConditionError> {
        let item = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ConditionError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(item)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let matched = matches!(
            self.peek(),
            Some((Token::Ident(word), _)) if word.eq_ignore_ascii_case(keyword)
        );
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ConditionError> {
        if self.eat_keyword(keyword) {
            return Ok(());
        }
        let (token, position) = self.next()?;
        Err(ConditionError::UnexpectedToken {
            found: token.to_string(),
            position,
        })
    }

    fn parse_or(&mut self) -> Result<Condition, ConditionError> {
        let mut condition = self.parse_and()?;
        while self.eat_keyword("OR") {
            condition = condition.or(self.parse_and()?);
        }
        Ok(condition)
    }

    fn parse_and(&mut self) -> Result<Condition, ConditionError> {
        let mut condition = self.parse_primary()?;
        while self.eat_keyword("AND") {
            condition = condition.and(self.parse_primary()?);
        }
        Ok(condition)
    }

    fn parse_primary(&mut self) -> Result<Condition, ConditionError> {
        let (token, position) = self.next()?;
        match token {
            Token::LParen => {
                if self.depth >= MAX_NESTING {
                    return Err(ConditionError::TooDeep(MAX_NESTING));
                }
                self.depth += 1;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.next()? {
                    (Token::RParen, _) => Ok(inner),
                    (other, position) => Err(ConditionError::UnexpectedToken {
                        found: other.to_string(),
                        position,
                    }),
                }
            }
            Token::Ident(column) if !is_reserved(&column) => self.parse_predicate(column),
            other => Err(ConditionError::UnexpectedToken {
                found: other.to_string(),
                position,
            }),
        }
    }

    fn parse_predicate(&mut self, column: String) -> Result<Condition, ConditionError> {
        if self.eat_keyword("IS") {
            let negated = self.eat_keyword("NOT");
            self.expect_keyword("NULL")?;
            return Ok(Condition::IsNull { column, negated });
        }

        let op = match self.next()? {
            (Token::Op(op), _) => op,
            (other, position) => {
                return Err(ConditionError::UnexpectedToken {
                    found: other.to_string(),
                    position,
                })
            }
        };

        let value = match self.next()? {
            (Token::Str(s), _) => Cell::Text(s),
            (Token::Number(n), _) => n,
            (Token::Blob(bytes), _) => Cell::Blob(bytes),
            (Token::Ident(word), _) if word.eq_ignore_ascii_case("NULL") => Cell::Null,
            (other, position) => {
                return Err(ConditionError::UnexpectedToken {
                    found: other.to_string(),
                    position,
                })
            }
        };

        Ok(Condition::Compare { column, op, value })
    }
}

fn is_reserved(word: &str) -> bool {
    ["AND", "OR", "IS", "NOT", "NULL"]
        .iter()
        .any(|k| k.eq_ignore_ascii_case(word))
}
