//! rascal - a tracing interpreter for a minimal Pascal-like language.
//!
//! Programs execute for real (values flow, `read` blocks, `print` writes)
//! while every arithmetic step, comparison, loop label, and branch is
//! mirrored into an append-only log of floating-point pseudo-instructions
//! for later inspection. The log is an audit artifact: nothing ever reads
//! it back.
//!
//! [`Program::parse`] turns source text into classified statements, and one
//! [`Interpreter`] session runs them against pluggable input/output
//! capabilities:
//!
//! ```
//! use rascal::io::{BufferSink, ScriptedSource};
//! use rascal::{Interpreter, Program};
//!
//! let program = Program::parse("var x;\nread(x);\nprintln(x);").unwrap();
//! let out = BufferSink::new();
//! let mut session = Interpreter::new(
//!     program,
//!     Box::new(ScriptedSource::new([42.0])),
//!     Box::new(out.clone()),
//! );
//! session.run().unwrap();
//! assert_eq!(out.contents(), "42\n");
//! ```

pub mod config;
pub mod emitter;
pub mod error;
mod eval;
pub mod interpreter;
pub mod io;
pub mod program;
pub mod registers;
pub mod symbols;

#[cfg(test)]
mod program_tests;
#[cfg(test)]
mod symbols_tests;

pub use error::{InterpreterError, RunError};
pub use interpreter::Interpreter;
pub use program::Program;
