// Statement preprocessor and parser.
//
// Splits raw source into numbered logical statements, applies the
// statement-terminator policy, and classifies every statement into a typed
// variant before anything executes. Recognition is decoupled from execution:
// a malformed statement anywhere in the program fails the parse, so no side
// effect happens for a program that is not statement-well-formed.

use crate::error::{InterpreterError, RunError};
use std::fmt;

/// Comparison operators accepted in while-conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    pub fn parse(token: &str) -> Option<CmpOp> {
        match token {
            "<" => Some(CmpOp::Lt),
            ">" => Some(CmpOp::Gt),
            "<=" => Some(CmpOp::Le),
            ">=" => Some(CmpOp::Ge),
            "==" => Some(CmpOp::Eq),
            "!=" => Some(CmpOp::Ne),
            _ => None,
        }
    }

    pub fn apply(self, a: f64, b: f64) -> bool {
        match self {
            CmpOp::Lt => a < b,
            CmpOp::Gt => a > b,
            CmpOp::Le => a <= b,
            CmpOp::Ge => a >= b,
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        };
        write!(f, "{}", text)
    }
}

/// A while-condition, shape-checked at parse time. Operands stay raw tokens
/// because variable-vs-literal resolution depends on runtime declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub lhs: String,
    pub op: CmpOp,
    pub rhs: String,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// A classified statement. Print arguments stay raw strings: whether they
/// name a variable or are a quoted literal is only known once declarations
/// have run.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Declaration(Vec<String>),
    Read(String),
    Print(String),
    Println(String),
    For {
        var: String,
        start: f64,
        bound: String,
    },
    While(Condition),
    Assignment {
        target: String,
        tokens: Vec<String>,
    },
    Write(String),
    EndFor,
    EndWhile,
}

/// One logical statement with its 1-based number and raw text.
#[derive(Debug, Clone)]
pub struct Statement {
    pub number: usize,
    pub text: String,
    pub kind: StatementKind,
}

/// An immutable, fully classified program.
#[derive(Debug, Clone)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    /// Split source into non-blank statements, numbered from 1, and classify
    /// each one. The first malformed statement fails the whole parse.
    pub fn parse(source: &str) -> Result<Program, RunError> {
        let mut statements = Vec::new();
        for (index, raw) in source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let number = index + 1;
            let kind = classify(raw).map_err(|e| RunError::new(number, raw, e))?;
            statements.push(Statement {
                number,
                text: raw.to_string(),
                kind,
            });
        }
        Ok(Program { statements })
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Classify one statement, enforcing the terminator policy. Recognition
/// priority: declaration, read, print, println, for-header, while-header,
/// assignment, write, block-end.
fn classify(line: &str) -> Result<StatementKind, InterpreterError> {
    let lower = line.to_lowercase();

    if lower == "var" || lower.starts_with("var ") {
        return parse_declaration(line);
    }
    if let Some(arg) = call_argument(line, &lower, "read") {
        require_terminator(line)?;
        return Ok(StatementKind::Read(strip_terminator(&arg).to_string()));
    }
    if let Some(arg) = call_argument(line, &lower, "print") {
        require_terminator(line)?;
        return Ok(StatementKind::Print(strip_terminator(&arg).to_string()));
    }
    if let Some(arg) = call_argument(line, &lower, "println") {
        require_terminator(line)?;
        return Ok(StatementKind::Println(strip_terminator(&arg).to_string()));
    }
    if lower.starts_with("for ") {
        forbid_terminator(line, "for header")?;
        return parse_for_header(line);
    }
    if lower == "while" || lower.starts_with("while ") {
        forbid_terminator(line, "while header")?;
        return parse_while_header(line);
    }
    if line.contains(":=") {
        require_terminator(line)?;
        return parse_assignment(line);
    }
    if let Some(arg) = call_argument(line, &lower, "write") {
        // write is the one call form the terminator policy leaves alone
        return Ok(StatementKind::Write(strip_terminator(&arg).to_string()));
    }
    if lower.starts_with("endfor") {
        forbid_terminator(line, "endfor")?;
        if lower == "endfor" {
            return Ok(StatementKind::EndFor);
        }
    }
    if lower.starts_with("endwhile") {
        forbid_terminator(line, "endwhile")?;
        if lower == "endwhile" {
            return Ok(StatementKind::EndWhile);
        }
    }

    Err(InterpreterError::Syntax(format!(
        "unrecognized statement '{}'",
        line
    )))
}

fn require_terminator(line: &str) -> Result<(), InterpreterError> {
    if line.ends_with(';') {
        Ok(())
    } else {
        Err(InterpreterError::Syntax(
            "missing ';' terminator".to_string(),
        ))
    }
}

fn forbid_terminator(line: &str, what: &str) -> Result<(), InterpreterError> {
    if line.ends_with(';') {
        Err(InterpreterError::Syntax(format!(
            "{} must not end with ';'",
            what
        )))
    } else {
        Ok(())
    }
}

fn strip_terminator(text: &str) -> &str {
    text.trim_end().trim_end_matches(';').trim_end()
}

/// Extract the parenthesized argument of `keyword ( ... )`, or None when the
/// line is not that call form. Matching is case-insensitive on the keyword;
/// the argument keeps its original case.
fn call_argument(line: &str, lower: &str, keyword: &str) -> Option<String> {
    if !lower.starts_with(keyword) {
        return None;
    }
    let rest = line[keyword.len()..].trim_start();
    if !rest.starts_with('(') {
        return None;
    }
    let close = rest.rfind(')')?;
    Some(rest[1..close].trim().to_string())
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn parse_declaration(line: &str) -> Result<StatementKind, InterpreterError> {
    require_terminator(line)?;
    let body = strip_terminator(&line[3..]);
    let names: Vec<String> = body
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(InterpreterError::Syntax(
            "declaration names no variables".to_string(),
        ));
    }
    for name in &names {
        if !is_identifier(name) {
            return Err(InterpreterError::Syntax(format!(
                "'{}' is not a valid variable name",
                name
            )));
        }
    }
    Ok(StatementKind::Declaration(names))
}

fn parse_for_header(line: &str) -> Result<StatementKind, InterpreterError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    // for VAR := START to BOUND do
    let well_formed = tokens.len() == 7
        && tokens[2] == ":="
        && tokens[4].eq_ignore_ascii_case("to")
        && tokens[6].eq_ignore_ascii_case("do");
    if !well_formed {
        return Err(InterpreterError::Syntax(
            "for header must be 'for VAR := START to BOUND do'".to_string(),
        ));
    }
    let var = tokens[1];
    let bound = tokens[5];
    if !is_identifier(var) || !is_identifier(bound) {
        return Err(InterpreterError::Syntax(
            "for header variable names must be identifiers".to_string(),
        ));
    }
    let start: f64 = tokens[3].parse().map_err(|_| {
        InterpreterError::Syntax(format!(
            "for start '{}' must be a numeric literal",
            tokens[3]
        ))
    })?;
    Ok(StatementKind::For {
        var: var.to_string(),
        start,
        bound: bound.to_string(),
    })
}

fn parse_while_header(line: &str) -> Result<StatementKind, InterpreterError> {
    let mut tokens: Vec<&str> = line.split_whitespace().skip(1).collect();
    // trailing 'do' is optional
    if tokens
        .last()
        .is_some_and(|t| t.eq_ignore_ascii_case("do"))
    {
        tokens.pop();
    }
    if tokens.len() != 3 {
        return Err(InterpreterError::Syntax(
            "while condition must be 'A OP B'".to_string(),
        ));
    }
    let op = CmpOp::parse(tokens[1]).ok_or_else(|| {
        InterpreterError::Syntax(format!("unsupported comparison operator '{}'", tokens[1]))
    })?;
    Ok(StatementKind::While(Condition {
        lhs: tokens[0].to_string(),
        op,
        rhs: tokens[2].to_string(),
    }))
}

fn parse_assignment(line: &str) -> Result<StatementKind, InterpreterError> {
    let (target, expr) = match line.split_once(":=") {
        Some(parts) => parts,
        None => {
            return Err(InterpreterError::Syntax(
                "malformed assignment".to_string(),
            ))
        }
    };
    let target = target.trim();
    if !is_identifier(target) {
        return Err(InterpreterError::Syntax(format!(
            "assignment target '{}' is not a valid variable name",
            target
        )));
    }
    let tokens: Vec<String> = strip_terminator(expr)
        .split_whitespace()
        .map(str::to_string)
        .collect();
    Ok(StatementKind::Assignment {
        target: target.to_string(),
        tokens,
    })
}
