//! Symbol table over the register pool.
//!
//! Variables are created by declaration, receive a pool register that never
//! changes, and keep their entry for the whole run. Iteration order is
//! declaration order, which is what the driver's symbol-table listing shows.

use crate::error::InterpreterError;
use crate::registers::{Register, RegisterPool};
use indexmap::IndexMap;
use log::debug;
use std::fmt;

/// Declared type of a variable. The language currently only has reals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Real,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VarType::Real => write!(f, "real"),
        }
    }
}

/// One declared variable: type, current value, and its assigned register.
#[derive(Debug, Clone)]
pub struct Variable {
    pub ty: VarType,
    /// Absent until the first assignment or read.
    pub value: Option<f64>,
    pub register: Register,
}

/// The per-run symbol table.
#[derive(Debug)]
pub struct SymbolTable {
    variables: IndexMap<String, Variable>,
    pool: RegisterPool,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            variables: IndexMap::new(),
            pool: RegisterPool::new(),
        }
    }

    /// Declare a new variable, allocating its register.
    pub fn declare(&mut self, name: &str) -> Result<Register, InterpreterError> {
        if self.variables.contains_key(name) {
            return Err(InterpreterError::Redeclaration(name.to_string()));
        }
        let register = self.pool.allocate()?;
        debug!("declare {} -> {}", name, register);
        self.variables.insert(
            name.to_string(),
            Variable {
                ty: VarType::Real,
                value: None,
                register,
            },
        );
        Ok(register)
    }

    /// Store a value into a declared variable.
    pub fn assign(&mut self, name: &str, value: f64) -> Result<(), InterpreterError> {
        match self.variables.get_mut(name) {
            Some(var) => {
                var.value = Some(value);
                Ok(())
            }
            None => Err(InterpreterError::UndeclaredVariable(name.to_string())),
        }
    }

    /// Current value of a declared, initialized variable.
    pub fn get(&self, name: &str) -> Result<f64, InterpreterError> {
        self.lookup(name)?
            .value
            .ok_or_else(|| InterpreterError::UninitializedVariable(name.to_string()))
    }

    /// The register a declared variable owns.
    pub fn register_of(&self, name: &str) -> Result<Register, InterpreterError> {
        Ok(self.lookup(name)?.register)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    fn lookup(&self, name: &str) -> Result<&Variable, InterpreterError> {
        self.variables
            .get(name)
            .ok_or_else(|| InterpreterError::UndeclaredVariable(name.to_string()))
    }

    /// Snapshot iterator in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables.iter().map(|(name, var)| (name.as_str(), var))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
