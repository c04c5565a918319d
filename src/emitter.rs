//! Pseudo-instruction log and label generator.
//!
//! Every record is a rendered text line in a RISC-V float flavor: loads
//! (`li.s`), arithmetic (`fadd.s` ...), compares (`flt.s` ...), moves
//! (`fmv.s`), branches (`beqz`, `j`), labels (`L1:`), and `#` comments. The
//! log is append-only and audit-only: nothing in the interpreter ever reads
//! it back.

use crate::program::CmpOp;
use crate::registers::Register;
use std::fmt;

/// A jump target, rendered `L{n}`. Ids are strictly increasing within one
/// run and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Binary operators that lower to a single arithmetic pseudo-instruction.
/// Exponentiation does not; it is traced as a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Mnemonic for an arithmetic operator.
fn arith_mnemonic(op: ArithOp) -> &'static str {
    match op {
        ArithOp::Add => "fadd.s",
        ArithOp::Sub => "fsub.s",
        ArithOp::Mul => "fmul.s",
        ArithOp::Div => "fdiv.s",
    }
}

/// Mnemonic for a comparison operator.
fn compare_mnemonic(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Lt => "flt.s",
        CmpOp::Gt => "fgt.s",
        CmpOp::Le => "fle.s",
        CmpOp::Ge => "fge.s",
        CmpOp::Eq => "feq.s",
        CmpOp::Ne => "fne.s",
    }
}

/// Register that carries a traced call's return value.
const CALL_RESULT: &str = "fa0";

/// Append-only pseudo-instruction log plus the run's label counter.
#[derive(Debug)]
pub struct Emitter {
    code: Vec<String>,
    labels: u32,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            code: Vec::new(),
            labels: 0,
        }
    }

    /// Issue the next label id.
    pub fn next_label(&mut self) -> Label {
        self.labels += 1;
        Label(self.labels)
    }

    /// The log so far, for external inspection.
    pub fn code(&self) -> &[String] {
        &self.code
    }

    pub fn load_imm(&mut self, dest: Register, value: f64) {
        self.code.push(format!("li.s {}, {}", dest, value));
    }

    pub fn arith(&mut self, op: ArithOp, dest: Register, a: Register, b: Register) {
        self.code
            .push(format!("{} {}, {}, {}", arith_mnemonic(op), dest, a, b));
    }

    pub fn compare(&mut self, op: CmpOp, dest: Register, a: Register, b: Register) {
        self.code
            .push(format!("{} {}, {}, {}", compare_mnemonic(op), dest, a, b));
    }

    pub fn mov(&mut self, dest: Register, src: Register) {
        self.code.push(format!("fmv.s {}, {}", dest, src));
    }

    /// Move a traced call's result into a destination register.
    pub fn mov_result(&mut self, dest: Register) {
        self.code.push(format!("fmv.s {}, {}", dest, CALL_RESULT));
    }

    pub fn branch_zero(&mut self, flag: Register, target: Label) {
        self.code.push(format!("beqz {}, {}", flag, target));
    }

    pub fn jump(&mut self, target: Label) {
        self.code.push(format!("j {}", target));
    }

    pub fn place_label(&mut self, label: Label) {
        self.code.push(format!("{}:", label));
    }

    pub fn comment(&mut self, text: &str) {
        self.code.push(format!("# {}", text));
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}
