/*!
# SQL Error Handling

This module provides error handling for the trace SQL engine. All query
operations return well-structured errors with detailed context information
to help with debugging and user feedback.

## Error Categories

The engine defines the following categories of errors:

- **Parse Errors**: Syntax errors in query text with position information
- **Schema Errors**: Unknown tables or columns referenced by a query
- **Not Found Errors**: Unresolved module or function names
- **Cyclic Dependency Errors**: Module dependency cycles detected at resolution
- **Data Errors**: Invalid input values, e.g. a non-positive span duration
- **Type Mismatch Errors**: Output values that disagree with a declared column type

## Error Propagation

All errors surface to the caller synchronously as query-execution failures;
none are retried (inputs are deterministic, so a retry cannot change the
outcome), and a failing query yields no rows rather than a truncated set.

Errors implement the standard Rust error traits (`std::error::Error`,
`Display`, `Debug`) for seamless integration with error handling libraries.
*/

use std::fmt;

/// Error types for trace SQL parsing and execution operations.
///
/// Each variant includes the context relevant to the error category,
/// enabling detailed error reporting.
///
/// # Examples
///
/// ```rust
/// use tracesql::tracesql::sql::error::SqlError;
///
/// let parse_err = SqlError::parse_error("Expected FROM clause", Some(42));
/// let schema_err = SqlError::schema_error("Unknown column", Some("dur".to_string()));
/// let data_err = SqlError::data_error("Non-positive duration", Some("-1".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlError {
    /// Syntax errors during tokenization or parsing of query text.
    ///
    /// Includes the character position where the error occurred when known.
    ParseError {
        /// Human-readable error message
        message: String,
        /// Character position in the query text where the error occurred
        position: Option<usize>,
    },

    /// Unknown table or column referenced by a query or view definition.
    SchemaError {
        /// Description of the schema lookup failure
        message: String,
        /// Name of the column that caused the error, if applicable
        column: Option<String>,
    },

    /// Unresolved module or function name.
    ///
    /// Occurs when `INCLUDE MODULE` names an unregistered module or an
    /// expression calls a function no included module provides.
    NotFoundError {
        /// The name that failed to resolve
        name: String,
        /// Description of the lookup that failed
        message: String,
    },

    /// Module dependency cycle detected during resolution.
    CyclicDependencyError {
        /// The dependency chain that closed the cycle, in resolution order
        chain: Vec<String>,
    },

    /// Invalid input values encountered during evaluation.
    ///
    /// Occurs for data the engine refuses to compute over, e.g. a zero or
    /// negative span duration feeding a benchmark score.
    DataError {
        /// Description of the invalid data
        message: String,
        /// The offending value, if available
        value: Option<String>,
    },

    /// Output value that disagrees with its declared column type.
    TypeMismatchError {
        /// Expected data type
        expected: String,
        /// Actual data type encountered
        actual: String,
        /// The value that caused the mismatch, if available
        value: Option<String>,
    },
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlError::ParseError { message, position } => {
                if let Some(pos) = position {
                    write!(f, "SQL parse error at position {}: {}", pos, message)
                } else {
                    write!(f, "SQL parse error: {}", message)
                }
            }
            SqlError::SchemaError { message, column } => {
                if let Some(col) = column {
                    write!(f, "Schema error for column '{}': {}", col, message)
                } else {
                    write!(f, "Schema error: {}", message)
                }
            }
            SqlError::NotFoundError { name, message } => {
                write!(f, "Not found error for '{}': {}", name, message)
            }
            SqlError::CyclicDependencyError { chain } => {
                write!(f, "Cyclic module dependency: {}", chain.join(" -> "))
            }
            SqlError::DataError { message, value } => {
                if let Some(val) = value {
                    write!(f, "Data error for value '{}': {}", val, message)
                } else {
                    write!(f, "Data error: {}", message)
                }
            }
            SqlError::TypeMismatchError {
                expected,
                actual,
                value,
            } => {
                if let Some(val) = value {
                    write!(
                        f,
                        "Type mismatch: expected {}, got {} for value '{}'",
                        expected, actual, val
                    )
                } else {
                    write!(f, "Type mismatch: expected {}, got {}", expected, actual)
                }
            }
        }
    }
}

impl std::error::Error for SqlError {}

impl SqlError {
    /// Create a parse error with position
    pub fn parse_error(message: impl Into<String>, position: Option<usize>) -> Self {
        SqlError::ParseError {
            message: message.into(),
            position,
        }
    }

    /// Create a schema error
    pub fn schema_error(message: impl Into<String>, column: Option<String>) -> Self {
        SqlError::SchemaError {
            message: message.into(),
            column,
        }
    }

    /// Create a not-found error
    pub fn not_found_error(name: impl Into<String>, message: impl Into<String>) -> Self {
        SqlError::NotFoundError {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a cyclic-dependency error from the resolution chain
    pub fn cyclic_dependency_error(chain: Vec<String>) -> Self {
        SqlError::CyclicDependencyError { chain }
    }

    /// Create a data error
    pub fn data_error(message: impl Into<String>, value: Option<String>) -> Self {
        SqlError::DataError {
            message: message.into(),
            value,
        }
    }

    /// Create a type-mismatch error
    pub fn type_mismatch_error(
        expected: impl Into<String>,
        actual: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        SqlError::TypeMismatchError {
            expected: expected.into(),
            actual: actual.into(),
            value,
        }
    }
}

/// Result type for trace SQL operations
pub type SqlResult<T> = Result<T, SqlError>;
