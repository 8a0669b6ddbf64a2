/*!
# Trace SQL Parser

This module implements a recursive descent parser for the trace query
surface. The parser converts query text into an Abstract Syntax Tree that
the execution engine evaluates against the loaded event store.

## Grammar Overview

The parser supports the following grammar (simplified):

```sql
-- Query scripts
INCLUDE MODULE dotted.name;
SELECT field_list [FROM table_name]
[WHERE condition]
[ORDER BY order_list]
[LIMIT number];
```

A script is any number of `INCLUDE MODULE` statements followed by exactly
one `SELECT`. Statements are separated by semicolons; the trailing
semicolon is optional.

## Architecture

The parser is implemented as a two-phase process:

1. **Tokenization**: converts query text into a stream of tokens with
   position information
2. **Parsing**: uses recursive descent to build the AST from tokens

### Expression Precedence

1. Parentheses (highest)
2. Unary NOT / minus
3. Multiplication, division
4. Addition, subtraction
5. Comparison operators
6. AND
7. OR (lowest)

## Error Handling

The parser provides detailed error messages with position information:
syntax errors with expected vs. actual tokens, invalid number formats,
and unclosed string literals. All errors surface as [`SqlError::ParseError`].
*/

use crate::tracesql::sql::ast::*;
use crate::tracesql::sql::error::SqlError;
use std::collections::HashMap;

/// Main parser for trace SQL query scripts.
///
/// `TraceSqlParser` handles the complete parsing pipeline from query text
/// to AST. It maintains a keyword lookup table for token classification and
/// provides a simple interface for parsing statements and scripts.
///
/// # Examples
///
/// ```rust
/// use tracesql::tracesql::sql::parser::TraceSqlParser;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let parser = TraceSqlParser::new();
///
///     let script = parser.parse_script(
///         "INCLUDE MODULE chrome.jetstream_3;
///          SELECT name, dur FROM chrome_jetstream_3_measure ORDER BY name;",
///     )?;
///     assert_eq!(script.len(), 2);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TraceSqlParser {
    /// Lookup table mapping keywords to token types for fast classification
    keywords: HashMap<String, TokenType>,
}

/// Token types recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenType {
    // Keywords
    Select,  // SELECT
    From,    // FROM
    Where,   // WHERE
    Order,   // ORDER
    By,      // BY
    Asc,     // ASC
    Desc,    // DESC
    Limit,   // LIMIT
    Include, // INCLUDE
    Module,  // MODULE
    As,      // AS
    And,     // AND
    Or,      // OR
    Not,     // NOT
    Null,    // NULL
    True,    // TRUE
    False,   // FALSE

    // Literals and identifiers
    Identifier, // Column names, table names, function names
    String,     // String literals ('hello')
    Number,     // Numeric literals (42, 3.14)

    // Punctuation
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,
    Dot,        // . (dotted module names)
    Asterisk,   // * (wildcard or multiplication)
    Semicolon,  // ; (statement terminator)

    // Arithmetic operators
    Plus,   // +
    Minus,  // -
    Divide, // /

    // Comparison operators
    Equal,              // =
    NotEqual,           // != or <>
    LessThan,           // <
    GreaterThan,        // >
    LessThanOrEqual,    // <=
    GreaterThanOrEqual, // >=

    // Special
    Eof, // End of input
}

/// A token with its type, value, and position information.
///
/// Tokens are the atomic units of query syntax, produced by the lexer and
/// consumed by the parser. Position information enables detailed error
/// reporting.
#[derive(Debug, Clone)]
pub struct Token {
    /// The type of this token (keyword, operator, literal, etc.)
    pub token_type: TokenType,
    /// The original text value of the token
    pub value: String,
    /// Character position in the original query string (for error reporting)
    pub position: usize,
}

impl TraceSqlParser {
    /// Creates a new parser with all supported keywords initialized.
    pub fn new() -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("SELECT".to_string(), TokenType::Select);
        keywords.insert("FROM".to_string(), TokenType::From);
        keywords.insert("WHERE".to_string(), TokenType::Where);
        keywords.insert("ORDER".to_string(), TokenType::Order);
        keywords.insert("BY".to_string(), TokenType::By);
        keywords.insert("ASC".to_string(), TokenType::Asc);
        keywords.insert("DESC".to_string(), TokenType::Desc);
        keywords.insert("LIMIT".to_string(), TokenType::Limit);
        keywords.insert("INCLUDE".to_string(), TokenType::Include);
        keywords.insert("MODULE".to_string(), TokenType::Module);
        keywords.insert("AS".to_string(), TokenType::As);
        keywords.insert("AND".to_string(), TokenType::And);
        keywords.insert("OR".to_string(), TokenType::Or);
        keywords.insert("NOT".to_string(), TokenType::Not);
        keywords.insert("NULL".to_string(), TokenType::Null);
        keywords.insert("TRUE".to_string(), TokenType::True);
        keywords.insert("FALSE".to_string(), TokenType::False);

        Self { keywords }
    }

    /// Parses a query script into its sequence of statements.
    ///
    /// A script is any number of `INCLUDE MODULE` statements followed by a
    /// single `SELECT`. This is the entry point the execution engine uses.
    ///
    /// # Arguments
    /// * `sql` - The query script to parse
    ///
    /// # Returns
    /// * `Ok(Vec<TraceQuery>)` - Successfully parsed statements, in order
    /// * `Err(SqlError)` - Parse error with position and message
    pub fn parse_script(&self, sql: &str) -> Result<Vec<TraceQuery>, SqlError> {
        let tokens = self.tokenize(sql)?;
        let mut state = ParserState::new(tokens);
        let mut statements = Vec::new();

        loop {
            // Skip empty statements and the trailing terminator
            while state.current_is(TokenType::Semicolon) {
                state.advance();
            }
            if state.current_is(TokenType::Eof) {
                break;
            }

            statements.push(self.parse_statement(&mut state)?);

            match state.current().token_type {
                TokenType::Semicolon | TokenType::Eof => {}
                _ => {
                    let token = state.current();
                    return Err(SqlError::parse_error(
                        format!("Expected ';' or end of input, found '{}'", token.value),
                        Some(token.position),
                    ));
                }
            }
        }

        if statements.is_empty() {
            return Err(SqlError::parse_error("Empty query script", None));
        }
        Ok(statements)
    }

    /// Parses a single statement.
    ///
    /// Convenience entry point for callers holding one statement; fails if
    /// the text contains more than one.
    pub fn parse(&self, sql: &str) -> Result<TraceQuery, SqlError> {
        let mut statements = self.parse_script(sql)?;
        if statements.len() != 1 {
            return Err(SqlError::parse_error(
                format!("Expected a single statement, found {}", statements.len()),
                None,
            ));
        }
        Ok(statements.remove(0))
    }

    fn parse_statement(&self, state: &mut ParserState) -> Result<TraceQuery, SqlError> {
        match state.current().token_type {
            TokenType::Include => self.parse_include_module(state),
            TokenType::Select => Ok(TraceQuery::Select(self.parse_select(state)?)),
            _ => {
                let token = state.current();
                Err(SqlError::parse_error(
                    format!(
                        "Expected SELECT or INCLUDE MODULE, found '{}'",
                        token.value
                    ),
                    Some(token.position),
                ))
            }
        }
    }

    /// Parses `INCLUDE MODULE dotted.name`.
    fn parse_include_module(&self, state: &mut ParserState) -> Result<TraceQuery, SqlError> {
        state.expect(TokenType::Include)?;
        state.expect(TokenType::Module)?;

        let mut name = state.expect_identifier("module name")?;
        while state.current_is(TokenType::Dot) {
            state.advance();
            name.push('.');
            name.push_str(&state.expect_identifier("module name segment")?);
        }

        Ok(TraceQuery::IncludeModule { name })
    }

    /// Parses a SELECT statement with its optional clauses.
    fn parse_select(&self, state: &mut ParserState) -> Result<SelectStatement, SqlError> {
        state.expect(TokenType::Select)?;

        let mut fields = vec![self.parse_select_field(state)?];
        while state.current_is(TokenType::Comma) {
            state.advance();
            fields.push(self.parse_select_field(state)?);
        }

        let from = if state.current_is(TokenType::From) {
            state.advance();
            Some(state.expect_identifier("table name")?)
        } else {
            None
        };

        let where_clause = if state.current_is(TokenType::Where) {
            state.advance();
            Some(self.parse_expression(state)?)
        } else {
            None
        };

        let order_by = if state.current_is(TokenType::Order) {
            state.advance();
            state.expect(TokenType::By)?;
            let mut items = vec![self.parse_order_item(state)?];
            while state.current_is(TokenType::Comma) {
                state.advance();
                items.push(self.parse_order_item(state)?);
            }
            Some(items)
        } else {
            None
        };

        let limit = if state.current_is(TokenType::Limit) {
            state.advance();
            let token = state.expect(TokenType::Number)?;
            let n = token.value.parse::<u64>().map_err(|_| {
                SqlError::parse_error(
                    format!("Invalid LIMIT value '{}'", token.value),
                    Some(token.position),
                )
            })?;
            Some(n)
        } else {
            None
        };

        Ok(SelectStatement {
            fields,
            from,
            where_clause,
            order_by,
            limit,
        })
    }

    fn parse_select_field(&self, state: &mut ParserState) -> Result<SelectField, SqlError> {
        if state.current_is(TokenType::Asterisk) {
            state.advance();
            return Ok(SelectField::Wildcard);
        }

        let expr = self.parse_expression(state)?;
        let alias = if state.current_is(TokenType::As) {
            state.advance();
            Some(state.expect_identifier("alias")?)
        } else {
            None
        };
        Ok(SelectField::Expression { expr, alias })
    }

    fn parse_order_item(&self, state: &mut ParserState) -> Result<OrderByExpr, SqlError> {
        let expr = self.parse_expression(state)?;
        let direction = match state.current().token_type {
            TokenType::Asc => {
                state.advance();
                OrderDirection::Asc
            }
            TokenType::Desc => {
                state.advance();
                OrderDirection::Desc
            }
            _ => OrderDirection::Asc,
        };
        Ok(OrderByExpr { expr, direction })
    }

    /// Expression parsing with precedence climbing: OR is the loosest
    /// binding, primary expressions the tightest.
    fn parse_expression(&self, state: &mut ParserState) -> Result<Expr, SqlError> {
        self.parse_or(state)
    }

    fn parse_or(&self, state: &mut ParserState) -> Result<Expr, SqlError> {
        let mut left = self.parse_and(state)?;
        while state.current_is(TokenType::Or) {
            state.advance();
            let right = self.parse_and(state)?;
            left = Expr::BinaryOp {
                left: Box::new(left),
                op: BinaryOperator::Or,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&self, state: &mut ParserState) -> Result<Expr, SqlError> {
        let mut left = self.parse_comparison(state)?;
        while state.current_is(TokenType::And) {
            state.advance();
            let right = self.parse_comparison(state)?;
            left = Expr::BinaryOp {
                left: Box::new(left),
                op: BinaryOperator::And,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_comparison(&self, state: &mut ParserState) -> Result<Expr, SqlError> {
        let left = self.parse_additive(state)?;
        let op = match state.current().token_type {
            TokenType::Equal => BinaryOperator::Equal,
            TokenType::NotEqual => BinaryOperator::NotEqual,
            TokenType::LessThan => BinaryOperator::LessThan,
            TokenType::LessThanOrEqual => BinaryOperator::LessThanOrEqual,
            TokenType::GreaterThan => BinaryOperator::GreaterThan,
            TokenType::GreaterThanOrEqual => BinaryOperator::GreaterThanOrEqual,
            _ => return Ok(left),
        };
        state.advance();
        let right = self.parse_additive(state)?;
        Ok(Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_additive(&self, state: &mut ParserState) -> Result<Expr, SqlError> {
        let mut left = self.parse_multiplicative(state)?;
        loop {
            let op = match state.current().token_type {
                TokenType::Plus => BinaryOperator::Add,
                TokenType::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            state.advance();
            let right = self.parse_multiplicative(state)?;
            left = Expr::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&self, state: &mut ParserState) -> Result<Expr, SqlError> {
        let mut left = self.parse_unary(state)?;
        loop {
            let op = match state.current().token_type {
                TokenType::Asterisk => BinaryOperator::Multiply,
                TokenType::Divide => BinaryOperator::Divide,
                _ => break,
            };
            state.advance();
            let right = self.parse_unary(state)?;
            left = Expr::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&self, state: &mut ParserState) -> Result<Expr, SqlError> {
        match state.current().token_type {
            TokenType::Not => {
                state.advance();
                let expr = self.parse_unary(state)?;
                Ok(Expr::UnaryOp {
                    op: UnaryOperator::Not,
                    expr: Box::new(expr),
                })
            }
            TokenType::Minus => {
                state.advance();
                let expr = self.parse_unary(state)?;
                Ok(Expr::UnaryOp {
                    op: UnaryOperator::Minus,
                    expr: Box::new(expr),
                })
            }
            _ => self.parse_primary(state),
        }
    }

    fn parse_primary(&self, state: &mut ParserState) -> Result<Expr, SqlError> {
        let token = state.current().clone();
        match token.token_type {
            TokenType::Number => {
                state.advance();
                if token.value.contains('.') {
                    let value = token.value.parse::<f64>().map_err(|_| {
                        SqlError::parse_error(
                            format!("Invalid number '{}'", token.value),
                            Some(token.position),
                        )
                    })?;
                    Ok(Expr::Literal(LiteralValue::Float(value)))
                } else {
                    let value = token.value.parse::<i64>().map_err(|_| {
                        SqlError::parse_error(
                            format!("Invalid number '{}'", token.value),
                            Some(token.position),
                        )
                    })?;
                    Ok(Expr::Literal(LiteralValue::Integer(value)))
                }
            }
            TokenType::String => {
                state.advance();
                Ok(Expr::Literal(LiteralValue::String(token.value)))
            }
            TokenType::Null => {
                state.advance();
                Ok(Expr::Literal(LiteralValue::Null))
            }
            TokenType::True => {
                state.advance();
                Ok(Expr::Literal(LiteralValue::Boolean(true)))
            }
            TokenType::False => {
                state.advance();
                Ok(Expr::Literal(LiteralValue::Boolean(false)))
            }
            TokenType::Identifier => {
                state.advance();
                if state.current_is(TokenType::LeftParen) {
                    state.advance();
                    let mut args = Vec::new();
                    if !state.current_is(TokenType::RightParen) {
                        args.push(self.parse_expression(state)?);
                        while state.current_is(TokenType::Comma) {
                            state.advance();
                            args.push(self.parse_expression(state)?);
                        }
                    }
                    state.expect(TokenType::RightParen)?;
                    Ok(Expr::Function {
                        name: token.value,
                        args,
                    })
                } else {
                    Ok(Expr::Column(token.value))
                }
            }
            TokenType::LeftParen => {
                state.advance();
                let expr = self.parse_expression(state)?;
                state.expect(TokenType::RightParen)?;
                Ok(expr)
            }
            _ => Err(SqlError::parse_error(
                format!("Unexpected token '{}' in expression", token.value),
                Some(token.position),
            )),
        }
    }

    /// Converts query text into a token stream with position information.
    fn tokenize(&self, sql: &str) -> Result<Vec<Token>, SqlError> {
        let mut tokens = Vec::new();
        let mut chars = sql.chars().peekable();
        let mut position = 0;

        while let Some(&ch) = chars.peek() {
            match ch {
                ' ' | '\t' | '\n' | '\r' => {
                    chars.next();
                    position += 1;
                }
                '(' => {
                    tokens.push(Token {
                        token_type: TokenType::LeftParen,
                        value: "(".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                ')' => {
                    tokens.push(Token {
                        token_type: TokenType::RightParen,
                        value: ")".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                ',' => {
                    tokens.push(Token {
                        token_type: TokenType::Comma,
                        value: ",".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                ';' => {
                    tokens.push(Token {
                        token_type: TokenType::Semicolon,
                        value: ";".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                '.' => {
                    tokens.push(Token {
                        token_type: TokenType::Dot,
                        value: ".".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                '*' => {
                    tokens.push(Token {
                        token_type: TokenType::Asterisk,
                        value: "*".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                '+' => {
                    tokens.push(Token {
                        token_type: TokenType::Plus,
                        value: "+".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                '/' => {
                    tokens.push(Token {
                        token_type: TokenType::Divide,
                        value: "/".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                '-' => {
                    // "--" starts a line comment, skipped to end of line
                    let start = position;
                    chars.next();
                    position += 1;
                    if let Some(&'-') = chars.peek() {
                        while let Some(&c) = chars.peek() {
                            if c == '\n' {
                                break;
                            }
                            chars.next();
                            position += 1;
                        }
                    } else {
                        tokens.push(Token {
                            token_type: TokenType::Minus,
                            value: "-".to_string(),
                            position: start,
                        });
                    }
                }
                '=' => {
                    tokens.push(Token {
                        token_type: TokenType::Equal,
                        value: "=".to_string(),
                        position,
                    });
                    chars.next();
                    position += 1;
                }
                '!' => {
                    let start = position;
                    chars.next();
                    position += 1;
                    if let Some(&'=') = chars.peek() {
                        chars.next();
                        position += 1;
                        tokens.push(Token {
                            token_type: TokenType::NotEqual,
                            value: "!=".to_string(),
                            position: start,
                        });
                    } else {
                        return Err(SqlError::parse_error(
                            "Unexpected character '!'",
                            Some(start),
                        ));
                    }
                }
                '<' => {
                    let start = position;
                    chars.next();
                    position += 1;
                    match chars.peek() {
                        Some(&'=') => {
                            chars.next();
                            position += 1;
                            tokens.push(Token {
                                token_type: TokenType::LessThanOrEqual,
                                value: "<=".to_string(),
                                position: start,
                            });
                        }
                        Some(&'>') => {
                            chars.next();
                            position += 1;
                            tokens.push(Token {
                                token_type: TokenType::NotEqual,
                                value: "<>".to_string(),
                                position: start,
                            });
                        }
                        _ => {
                            tokens.push(Token {
                                token_type: TokenType::LessThan,
                                value: "<".to_string(),
                                position: start,
                            });
                        }
                    }
                }
                '>' => {
                    let start = position;
                    chars.next();
                    position += 1;
                    if let Some(&'=') = chars.peek() {
                        chars.next();
                        position += 1;
                        tokens.push(Token {
                            token_type: TokenType::GreaterThanOrEqual,
                            value: ">=".to_string(),
                            position: start,
                        });
                    } else {
                        tokens.push(Token {
                            token_type: TokenType::GreaterThan,
                            value: ">".to_string(),
                            position: start,
                        });
                    }
                }
                '\'' => {
                    // Single-quoted string literal, '' escapes a quote
                    let start = position;
                    chars.next();
                    position += 1;
                    let mut value = String::new();
                    let mut closed = false;
                    while let Some(&c) = chars.peek() {
                        chars.next();
                        position += 1;
                        if c == '\'' {
                            if let Some(&'\'') = chars.peek() {
                                chars.next();
                                position += 1;
                                value.push('\'');
                            } else {
                                closed = true;
                                break;
                            }
                        } else {
                            value.push(c);
                        }
                    }
                    if !closed {
                        return Err(SqlError::parse_error(
                            "Unclosed string literal",
                            Some(start),
                        ));
                    }
                    tokens.push(Token {
                        token_type: TokenType::String,
                        value,
                        position: start,
                    });
                }
                '0'..='9' => {
                    let start = position;
                    let mut value = String::new();
                    let mut seen_dot = false;
                    while let Some(&c) = chars.peek() {
                        if c.is_ascii_digit() {
                            value.push(c);
                            chars.next();
                            position += 1;
                        } else if c == '.' && !seen_dot {
                            // Lookahead keeps "1." from eating a dot that
                            // belongs to punctuation
                            let mut ahead = chars.clone();
                            ahead.next();
                            match ahead.peek() {
                                Some(d) if d.is_ascii_digit() => {
                                    seen_dot = true;
                                    value.push(c);
                                    chars.next();
                                    position += 1;
                                }
                                _ => break,
                            }
                        } else {
                            break;
                        }
                    }
                    tokens.push(Token {
                        token_type: TokenType::Number,
                        value,
                        position: start,
                    });
                }
                c if c.is_alphabetic() || c == '_' => {
                    let start = position;
                    let mut value = String::new();
                    while let Some(&c) = chars.peek() {
                        if c.is_alphanumeric() || c == '_' {
                            value.push(c);
                            chars.next();
                            position += 1;
                        } else {
                            break;
                        }
                    }
                    let token_type = self
                        .keywords
                        .get(&value.to_uppercase())
                        .copied()
                        .unwrap_or(TokenType::Identifier);
                    tokens.push(Token {
                        token_type,
                        value,
                        position: start,
                    });
                }
                c => {
                    return Err(SqlError::parse_error(
                        format!("Unexpected character '{}'", c),
                        Some(position),
                    ));
                }
            }
        }

        tokens.push(Token {
            token_type: TokenType::Eof,
            value: String::new(),
            position,
        });
        Ok(tokens)
    }
}

impl Default for TraceSqlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor over the token stream shared by the recursive descent methods.
struct ParserState {
    tokens: Vec<Token>,
    current: usize,
}

impl ParserState {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    fn current(&self) -> &Token {
        // The tokenizer always terminates the stream with Eof
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn current_is(&self, token_type: TokenType) -> bool {
        self.current().token_type == token_type
    }

    fn advance(&mut self) {
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
    }

    fn expect(&mut self, token_type: TokenType) -> Result<Token, SqlError> {
        let token = self.current().clone();
        if token.token_type == token_type {
            self.advance();
            Ok(token)
        } else {
            Err(SqlError::parse_error(
                format!("Expected {:?}, found '{}'", token_type, token.value),
                Some(token.position),
            ))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, SqlError> {
        let token = self.current().clone();
        if token.token_type == TokenType::Identifier {
            self.advance();
            Ok(token.value)
        } else {
            Err(SqlError::parse_error(
                format!("Expected {}, found '{}'", what, token.value),
                Some(token.position),
            ))
        }
    }
}
