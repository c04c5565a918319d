// Postfix expression and condition evaluation.
//
// Expressions arrive as whitespace-split tokens in postfix order and run
// over an explicit operand stack. When a destination variable is supplied
// the evaluation doubles as lowering: literal operands get scratch-register
// loads, each operator gets its pseudo-instruction, and the result is moved
// into the destination's register. Without a destination the math happens
// silently.

use crate::emitter::ArithOp;
use crate::error::InterpreterError;
use crate::interpreter::Interpreter;
use crate::program::Condition;
use crate::registers::{Register, SCRATCH_LHS, SCRATCH_RESULT, SCRATCH_RHS};
use log::debug;

/// Operand stack entry. A declared variable keeps its identity until an
/// operator consumes it: value and register resolution happen at the
/// operator, so an uninitialized variable only fails when actually used.
#[derive(Debug, Clone)]
enum Operand {
    Var(String),
    Num(f64),
}

fn is_binary_operator(token: &str) -> bool {
    matches!(token, "+" | "-" | "*" | "/" | "^")
}

fn is_function(token: &str) -> bool {
    matches!(token.to_lowercase().as_str(), "sin" | "cos" | "tan")
}

fn underflow(token: &str) -> InterpreterError {
    InterpreterError::Syntax(format!("operand stack underflow at '{}'", token))
}

/// Apply a unary function by name; arguments are radians.
pub(crate) fn apply_function(name: &str, value: f64) -> Result<f64, InterpreterError> {
    match name.to_lowercase().as_str() {
        "sin" => Ok(value.sin()),
        "cos" => Ok(value.cos()),
        "tan" => Ok(value.tan()),
        _ => Err(InterpreterError::UnknownFunction(name.to_string())),
    }
}

impl Interpreter {
    /// Evaluate a postfix token sequence, tracing into `dest`'s register
    /// when a destination is given. An empty sequence yields 0.
    pub(crate) fn eval_postfix(
        &mut self,
        tokens: &[String],
        dest: Option<&str>,
    ) -> Result<f64, InterpreterError> {
        let mut stack: Vec<Operand> = Vec::new();
        for token in tokens {
            if is_binary_operator(token) {
                self.apply_binary(&mut stack, token, dest)?;
            } else if is_function(token) {
                self.apply_unary(&mut stack, token, dest)?;
            } else if self.symbols.contains(token) {
                stack.push(Operand::Var(token.clone()));
            } else if let Ok(value) = token.parse::<f64>() {
                stack.push(Operand::Num(value));
            } else {
                return Err(InterpreterError::UnrecognizedToken(token.clone()));
            }
        }
        match stack.into_iter().next() {
            Some(operand) => self.operand_value(&operand),
            None => Ok(0.0),
        }
    }

    /// Evaluate a parsed condition, emitting its literal loads and compare.
    /// Conditions are always traced; the compare flag lands in the scratch
    /// result register for the executor's branch.
    pub(crate) fn eval_condition(&mut self, cond: &Condition) -> Result<bool, InterpreterError> {
        let lhs = self.operand_from_token(&cond.lhs)?;
        let rhs = self.operand_from_token(&cond.rhs)?;
        let (a, a_reg) = self.resolve(&lhs, SCRATCH_LHS, true)?;
        let (b, b_reg) = self.resolve(&rhs, SCRATCH_RHS, true)?;
        let flag = Register::scratch(SCRATCH_RESULT);
        self.emitter.compare(cond.op, flag, a_reg, b_reg);
        let holds = cond.op.apply(a, b);
        debug!("condition {} -> {}", cond, holds);
        Ok(holds)
    }

    fn apply_binary(
        &mut self,
        stack: &mut Vec<Operand>,
        token: &str,
        dest: Option<&str>,
    ) -> Result<(), InterpreterError> {
        let b = stack.pop().ok_or_else(|| underflow(token))?;
        let a = stack.pop().ok_or_else(|| underflow(token))?;
        let trace = dest.is_some();
        let (a_val, a_reg) = self.resolve(&a, SCRATCH_LHS, trace)?;
        let (b_val, b_reg) = self.resolve(&b, SCRATCH_RHS, trace)?;

        let (result, arith) = match token {
            "+" => (a_val + b_val, Some(ArithOp::Add)),
            "-" => (a_val - b_val, Some(ArithOp::Sub)),
            "*" => (a_val * b_val, Some(ArithOp::Mul)),
            "/" => {
                if b_val == 0.0 {
                    return Err(InterpreterError::DivisionByZero);
                }
                (a_val / b_val, Some(ArithOp::Div))
            }
            "^" => (a_val.powf(b_val), None),
            _ => return Err(InterpreterError::UnrecognizedToken(token.to_string())),
        };

        if let Some(dest) = dest {
            let dest_reg = self.symbols.register_of(dest)?;
            match arith {
                Some(op) => {
                    let temp = Register::scratch(SCRATCH_RESULT);
                    self.emitter.arith(op, temp, a_reg, b_reg);
                    self.emitter.mov(dest_reg, temp);
                }
                // exponentiation has no single instruction; trace it as a call
                None => {
                    self.emitter.comment("call pow");
                    self.emitter.mov_result(dest_reg);
                }
            }
        }
        stack.push(Operand::Num(result));
        Ok(())
    }

    fn apply_unary(
        &mut self,
        stack: &mut Vec<Operand>,
        token: &str,
        dest: Option<&str>,
    ) -> Result<(), InterpreterError> {
        let operand = stack.pop().ok_or_else(|| underflow(token))?;
        // call operands are not loaded in the trace; only the result moves
        let (value, _) = self.resolve(&operand, SCRATCH_LHS, false)?;
        let result = apply_function(token, value)?;
        if let Some(dest) = dest {
            let dest_reg = self.symbols.register_of(dest)?;
            self.emitter
                .comment(&format!("call {}", token.to_lowercase()));
            self.emitter.mov_result(dest_reg);
        }
        stack.push(Operand::Num(result));
        Ok(())
    }

    fn operand_from_token(&self, token: &str) -> Result<Operand, InterpreterError> {
        if self.symbols.contains(token) {
            Ok(Operand::Var(token.to_string()))
        } else {
            token
                .parse::<f64>()
                .map(Operand::Num)
                .map_err(|_| InterpreterError::UnrecognizedToken(token.to_string()))
        }
    }

    fn operand_value(&self, operand: &Operand) -> Result<f64, InterpreterError> {
        match operand {
            Operand::Var(name) => self.symbols.get(name),
            Operand::Num(value) => Ok(*value),
        }
    }

    /// Resolve an operand to (value, register). Variables use their pool
    /// register; literals and computed intermediates land in the given
    /// scratch slot, with an `li.s` load when the evaluation is traced.
    fn resolve(
        &mut self,
        operand: &Operand,
        slot: usize,
        trace: bool,
    ) -> Result<(f64, Register), InterpreterError> {
        match operand {
            Operand::Var(name) => {
                Ok((self.symbols.get(name)?, self.symbols.register_of(name)?))
            }
            Operand::Num(value) => {
                let reg = Register::scratch(slot);
                if trace {
                    self.emitter.load_imm(reg, *value);
                }
                Ok((*value, reg))
            }
        }
    }
}
