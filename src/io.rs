//! Value-source and output-sink capabilities.
//!
//! The interpreter core never touches stdin/stdout directly; it talks to
//! these two traits. The stdio implementations back the CLI driver, and the
//! scripted/capturing implementations back tests and embedding.

use crate::error::InterpreterError;
use log::debug;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Supplies one float per `read(name)`. The call blocks until a value is
/// available; a value that cannot be produced aborts the run.
pub trait ValueSource {
    fn read_value(&mut self, name: &str) -> Result<f64, InterpreterError>;
}

/// Consumes `print`/`println`/`write` output.
pub trait OutputSink {
    fn write_str(&mut self, text: &str);
    fn write_line(&mut self, text: &str);
}

/// Line-based stdin source. With prompting enabled it announces which
/// variable it is reading, the way an interactive session expects.
pub struct StdinSource {
    prompt: bool,
    buffer: String,
}

impl StdinSource {
    pub fn new(prompt: bool) -> Self {
        StdinSource {
            prompt,
            buffer: String::new(),
        }
    }
}

impl ValueSource for StdinSource {
    fn read_value(&mut self, name: &str) -> Result<f64, InterpreterError> {
        if self.prompt {
            print!("Enter value for {}: ", name);
            let _ = io::stdout().flush();
        }
        self.buffer.clear();
        let bytes_read = io::stdin()
            .lock()
            .read_line(&mut self.buffer)
            .map_err(|e| InterpreterError::InvalidInput(e.to_string()))?;
        // EOF: stdin closed or piped input exhausted. Without this check a
        // read in a loop would spin on empty lines forever.
        if bytes_read == 0 {
            debug!("stdin EOF while reading {}", name);
            return Err(InterpreterError::InvalidInput("end of input".to_string()));
        }
        let text = self.buffer.trim();
        text.parse::<f64>()
            .map_err(|_| InterpreterError::InvalidInput(text.to_string()))
    }
}

/// Stdout sink used by the CLI driver.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_str(&mut self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    fn write_line(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Value source fed from a fixed queue; used by tests and non-interactive
/// embedding. An exhausted queue behaves like unusable input.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    values: VecDeque<f64>,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        ScriptedSource {
            values: values.into_iter().collect(),
        }
    }
}

impl ValueSource for ScriptedSource {
    fn read_value(&mut self, name: &str) -> Result<f64, InterpreterError> {
        match self.values.pop_front() {
            Some(value) => {
                debug!("scripted read {} -> {}", name, value);
                Ok(value)
            }
            None => Err(InterpreterError::InvalidInput(format!(
                "no scripted value left for {}",
                name
            ))),
        }
    }
}

/// Capturing sink. Clones share one buffer, so a test can keep a handle
/// while the interpreter owns the sink.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buffer: Rc<RefCell<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl OutputSink for BufferSink {
    fn write_str(&mut self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    fn write_line(&mut self, text: &str) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(text);
        buffer.push('\n');
    }
}
