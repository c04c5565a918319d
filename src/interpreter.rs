// Control-flow executor.
//
// One Interpreter is one run: it owns the program, the symbol table, the
// emitter, and the I/O capabilities, and nothing survives into the next run.
// Loops execute under an explicit loop-frame stack driven by the statement
// cursor, so host call-stack depth stays constant no matter how deep the
// nesting or how many iterations go by. Matching block ends are still found
// by a depth-counted forward scan, independent per loop kind.

use crate::emitter::{ArithOp, Emitter, Label};
use crate::error::{InterpreterError, RunError};
use crate::io::{OutputSink, ValueSource};
use crate::program::{CmpOp, Condition, Program, Statement, StatementKind};
use crate::registers::{Register, SCRATCH_LOOP_FLAG, SCRATCH_ONE, SCRATCH_RESULT};
use crate::symbols::SymbolTable;
use log::debug;

/// Which loop keyword pair a block scan is matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    For,
    While,
}

impl BlockKind {
    fn end_keyword(self) -> &'static str {
        match self {
            BlockKind::For => "endfor",
            BlockKind::While => "endwhile",
        }
    }
}

/// An active loop. `end` is the statement index of the matching block end.
#[derive(Debug)]
enum LoopFrame {
    For {
        header: usize,
        end: usize,
        var: String,
        /// Bound value, read once at loop entry.
        bound: f64,
        start_label: Label,
        end_label: Label,
    },
    While {
        header: usize,
        end: usize,
        cond: Condition,
        start_label: Label,
        end_label: Label,
    },
}

/// A single interpreter session.
pub struct Interpreter {
    program: Program,
    pc: usize,
    frames: Vec<LoopFrame>,
    pub(crate) symbols: SymbolTable,
    pub(crate) emitter: Emitter,
    input: Box<dyn ValueSource>,
    output: Box<dyn OutputSink>,
}

impl Interpreter {
    pub fn new(
        program: Program,
        input: Box<dyn ValueSource>,
        output: Box<dyn OutputSink>,
    ) -> Self {
        Interpreter {
            program,
            pc: 0,
            frames: Vec::new(),
            symbols: SymbolTable::new(),
            emitter: Emitter::new(),
            input,
            output,
        }
    }

    /// Execute the whole program. The first error aborts the run; the symbol
    /// table and trace keep whatever state they had at that point and stay
    /// queryable on `self`.
    pub fn run(&mut self) -> Result<(), RunError> {
        debug!("running {} statements", self.program.len());
        self.pc = 0;
        while self.pc < self.program.len() {
            let statement = self.program.statements()[self.pc].clone();
            debug!("[{}] {}", statement.number, statement.text);
            if let Err(e) = self.execute(&statement) {
                return Err(RunError::new(statement.number, statement.text, e));
            }
        }
        Ok(())
    }

    /// Final symbol-table snapshot, in declaration order.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The pseudo-instruction log.
    pub fn trace(&self) -> &[String] {
        self.emitter.code()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    fn execute(&mut self, statement: &Statement) -> Result<(), InterpreterError> {
        match &statement.kind {
            StatementKind::Declaration(names) => {
                for name in names {
                    self.symbols.declare(name)?;
                }
                self.pc += 1;
            }
            StatementKind::Read(name) => self.exec_read(name)?,
            StatementKind::Print(arg) => self.exec_print(arg, false)?,
            StatementKind::Println(arg) => self.exec_print(arg, true)?,
            StatementKind::For { var, start, bound } => {
                self.enter_for(var, *start, bound)?;
            }
            StatementKind::While(cond) => self.enter_while(cond)?,
            StatementKind::Assignment { target, tokens } => {
                self.exec_assignment(target, tokens)?;
            }
            StatementKind::Write(name) => self.exec_write(name)?,
            StatementKind::EndFor => self.close_for()?,
            StatementKind::EndWhile => self.close_while()?,
        }
        Ok(())
    }

    fn exec_read(&mut self, name: &str) -> Result<(), InterpreterError> {
        if !self.symbols.contains(name) {
            return Err(InterpreterError::UndeclaredVariable(name.to_string()));
        }
        let value = self.input.read_value(name)?;
        self.symbols.assign(name, value)?;
        self.emitter.comment(&format!("read {} -> {}", name, value));
        self.pc += 1;
        Ok(())
    }

    fn exec_print(&mut self, arg: &str, newline: bool) -> Result<(), InterpreterError> {
        let tag = if newline { "println" } else { "print" };
        let text = if self.symbols.contains(arg) {
            let value = self.symbols.get(arg)?;
            self.emitter.comment(&format!("{} {} -> {}", tag, arg, value));
            value.to_string()
        } else if arg.starts_with('"') || arg.starts_with('\'') {
            // quoted literal, printed verbatim with the quotes stripped
            arg.trim_matches(|c| c == '"' || c == '\'').to_string()
        } else {
            // anything else is a postfix expression; evaluate it untraced
            let tokens: Vec<String> = arg.split_whitespace().map(str::to_string).collect();
            self.eval_postfix(&tokens, None)?.to_string()
        };
        if newline {
            self.output.write_line(&text);
        } else {
            self.output.write_str(&text);
        }
        self.pc += 1;
        Ok(())
    }

    fn exec_write(&mut self, name: &str) -> Result<(), InterpreterError> {
        if self.symbols.contains(name) {
            let value = self.symbols.get(name)?;
            self.output.write_line(&format!("{}: {}", name, value));
            self.emitter.comment(&format!("write {} -> {}", name, value));
        } else {
            self.output.write_line(name);
        }
        self.pc += 1;
        Ok(())
    }

    fn exec_assignment(
        &mut self,
        target: &str,
        tokens: &[String],
    ) -> Result<(), InterpreterError> {
        if !self.symbols.contains(target) {
            return Err(InterpreterError::UndeclaredVariable(target.to_string()));
        }
        // A lone numeric literal assigns directly with a plain load.
        if tokens.len() == 1 {
            if let Ok(value) = tokens[0].parse::<f64>() {
                self.symbols.assign(target, value)?;
                let reg = self.symbols.register_of(target)?;
                self.emitter.load_imm(reg, value);
                self.pc += 1;
                return Ok(());
            }
        }
        let value = self.eval_postfix(tokens, Some(target))?;
        self.symbols.assign(target, value)?;
        debug!("{} := {}", target, value);
        self.pc += 1;
        Ok(())
    }

    fn enter_for(
        &mut self,
        var: &str,
        start: f64,
        bound: &str,
    ) -> Result<(), InterpreterError> {
        if !self.symbols.contains(var) {
            return Err(InterpreterError::UndeclaredVariable(var.to_string()));
        }
        if !self.symbols.contains(bound) {
            return Err(InterpreterError::UndeclaredLoopBound(bound.to_string()));
        }
        let limit = self.symbols.get(bound)?;
        self.symbols.assign(var, start)?;
        let var_reg = self.symbols.register_of(var)?;
        self.emitter.load_imm(var_reg, start);

        let start_label = self.emitter.next_label();
        let end_label = self.emitter.next_label();
        self.emitter.comment("for loop");
        self.emitter.place_label(start_label);

        let end = self.find_block_end(self.pc, BlockKind::For)?;

        let bound_reg = self.symbols.register_of(bound)?;
        let flag = Register::scratch(SCRATCH_LOOP_FLAG);
        self.emitter.compare(CmpOp::Le, flag, var_reg, bound_reg);
        self.emitter.branch_zero(flag, end_label);

        if start <= limit {
            debug!("for {}: {}..={}", var, start, limit);
            self.frames.push(LoopFrame::For {
                header: self.pc,
                end,
                var: var.to_string(),
                bound: limit,
                start_label,
                end_label,
            });
            self.pc += 1;
        } else {
            self.finish_for(start_label, end_label);
            self.pc = end + 1;
        }
        Ok(())
    }

    fn close_for(&mut self) -> Result<(), InterpreterError> {
        match self.frames.pop() {
            Some(LoopFrame::For {
                header,
                end,
                var,
                bound,
                start_label,
                end_label,
            }) if end == self.pc => {
                // one body pass done: step the loop variable by exactly 1
                let next = self.symbols.get(&var)? + 1.0;
                self.symbols.assign(&var, next)?;
                let var_reg = self.symbols.register_of(&var)?;
                let one = Register::scratch(SCRATCH_ONE);
                self.emitter.load_imm(one, 1.0);
                self.emitter.arith(ArithOp::Add, var_reg, var_reg, one);
                if next <= bound {
                    self.frames.push(LoopFrame::For {
                        header,
                        end,
                        var,
                        bound,
                        start_label,
                        end_label,
                    });
                    self.pc = header + 1;
                } else {
                    self.finish_for(start_label, end_label);
                    self.pc = end + 1;
                }
            }
            other => {
                // stray endfor, or an end belonging to an enclosing loop
                if let Some(frame) = other {
                    self.frames.push(frame);
                }
                self.pc += 1;
            }
        }
        Ok(())
    }

    fn finish_for(&mut self, start_label: Label, end_label: Label) {
        self.emitter.jump(start_label);
        self.emitter.place_label(end_label);
        self.emitter.comment("end for");
    }

    fn enter_while(&mut self, cond: &Condition) -> Result<(), InterpreterError> {
        let start_label = self.emitter.next_label();
        let end_label = self.emitter.next_label();
        self.emitter.comment("while loop");
        self.emitter.place_label(start_label);

        let end = self.find_block_end(self.pc, BlockKind::While)?;

        let holds = self.eval_condition(cond)?;
        self.emitter
            .branch_zero(Register::scratch(SCRATCH_RESULT), end_label);

        if holds {
            self.frames.push(LoopFrame::While {
                header: self.pc,
                end,
                cond: cond.clone(),
                start_label,
                end_label,
            });
            self.pc += 1;
        } else {
            self.finish_while(end_label);
            self.pc = end + 1;
        }
        Ok(())
    }

    fn close_while(&mut self) -> Result<(), InterpreterError> {
        match self.frames.pop() {
            Some(LoopFrame::While {
                header,
                end,
                cond,
                start_label,
                end_label,
            }) if end == self.pc => {
                self.emitter.jump(start_label);
                let holds = self.eval_condition(&cond)?;
                self.emitter
                    .branch_zero(Register::scratch(SCRATCH_RESULT), end_label);
                if holds {
                    self.frames.push(LoopFrame::While {
                        header,
                        end,
                        cond,
                        start_label,
                        end_label,
                    });
                    self.pc = header + 1;
                } else {
                    self.finish_while(end_label);
                    self.pc = end + 1;
                }
            }
            other => {
                if let Some(frame) = other {
                    self.frames.push(frame);
                }
                self.pc += 1;
            }
        }
        Ok(())
    }

    fn finish_while(&mut self, end_label: Label) {
        self.emitter.place_label(end_label);
        self.emitter.comment("end while");
    }

    /// Depth-counted forward scan for the statement closing the block opened
    /// at `header`. Only the given kind's header/end pair moves the counter,
    /// so an inner loop of the other kind never closes this one early.
    fn find_block_end(
        &self,
        header: usize,
        kind: BlockKind,
    ) -> Result<usize, InterpreterError> {
        let mut depth = 1usize;
        for (i, statement) in self
            .program
            .statements()
            .iter()
            .enumerate()
            .skip(header + 1)
        {
            match (kind, &statement.kind) {
                (BlockKind::For, StatementKind::For { .. })
                | (BlockKind::While, StatementKind::While(_)) => depth += 1,
                (BlockKind::For, StatementKind::EndFor)
                | (BlockKind::While, StatementKind::EndWhile) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ => {}
            }
        }
        Err(InterpreterError::Syntax(format!(
            "missing {} for this loop",
            kind.end_keyword()
        )))
    }
}
