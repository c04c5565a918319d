// Interpreter Error Handling

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum InterpreterError {
    // Statement-level errors
    Syntax(String), // message

    // Symbol table errors
    Redeclaration(String),          // variable name
    UndeclaredVariable(String),     // variable name
    UninitializedVariable(String),  // variable name
    RegisterExhaustion,

    // Evaluation errors
    UnrecognizedToken(String), // offending token
    DivisionByZero,
    UnknownFunction(String), // function name

    // Control flow errors
    UndeclaredLoopBound(String), // bound name

    // Input errors
    InvalidInput(String), // raw input text
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterpreterError::Syntax(msg) => {
                write!(f, "syntax error: {}", msg)
            }
            InterpreterError::Redeclaration(name) => {
                write!(f, "variable '{}' is already declared", name)
            }
            InterpreterError::UndeclaredVariable(name) => {
                write!(f, "variable '{}' is not declared", name)
            }
            InterpreterError::UninitializedVariable(name) => {
                write!(f, "variable '{}' has no value", name)
            }
            InterpreterError::RegisterExhaustion => {
                write!(f, "no free floating-point registers")
            }
            InterpreterError::UnrecognizedToken(token) => {
                write!(f, "unrecognized token '{}'", token)
            }
            InterpreterError::DivisionByZero => {
                write!(f, "division by zero")
            }
            InterpreterError::UnknownFunction(name) => {
                write!(f, "unknown function '{}'", name)
            }
            InterpreterError::UndeclaredLoopBound(name) => {
                write!(f, "loop bound '{}' is not a declared variable", name)
            }
            InterpreterError::InvalidInput(text) => {
                write!(f, "invalid input value '{}'", text)
            }
        }
    }
}

impl std::error::Error for InterpreterError {}

/// An interpreter error tagged with the statement it occurred on.
///
/// Any error aborts the run at the statement where it happened; the symbol
/// table and instruction log keep whatever state they had at that point.
#[derive(Debug, Clone, PartialEq)]
pub struct RunError {
    /// 1-based logical statement number.
    pub line: usize,
    /// Raw text of the offending statement.
    pub statement: String,
    pub error: InterpreterError,
}

impl RunError {
    pub fn new(line: usize, statement: impl Into<String>, error: InterpreterError) -> Self {
        RunError {
            line,
            statement: statement.into(),
            error,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "error at line {}: {}", self.line, self.error)
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
