// Pseudo-instruction trace tests: the log must mirror the registers,
// literals, comparison operators, and jump targets of what actually ran.

use rascal::io::{BufferSink, ScriptedSource};
use rascal::{Interpreter, Program};
use test_log::test;

fn run_trace(source: &str, inputs: &[f64]) -> Vec<String> {
    let program = Program::parse(source).expect("program should parse");
    let mut interpreter = Interpreter::new(
        program,
        Box::new(ScriptedSource::new(inputs.iter().copied())),
        Box::new(BufferSink::new()),
    );
    interpreter.run().expect("program should run");
    interpreter.trace().to_vec()
}

#[test]
fn literal_assignment_is_a_single_load() {
    let trace = run_trace("var x;\nx := 5;", &[]);
    assert_eq!(trace, vec!["li.s ft0, 5"]);
}

#[test]
fn postfix_assignment_loads_operates_and_moves() {
    let trace = run_trace("var x;\nx := 2 3 +;", &[]);
    assert_eq!(
        trace,
        vec![
            "li.s ft32, 2",
            "li.s ft33, 3",
            "fadd.s ft34, ft32, ft33",
            "fmv.s ft0, ft34",
        ]
    );
}

#[test]
fn read_logs_a_comment_with_the_value() {
    let trace = run_trace("var x;\nread(x);", &[3.0]);
    assert_eq!(trace, vec!["# read x -> 3"]);
}

#[test]
fn io_statements_log_their_comments() {
    let trace = run_trace("var x;\nx := 2;\nprint(x);\nprintln(x);\nwrite(x);", &[]);
    assert_eq!(
        trace,
        vec![
            "li.s ft0, 2",
            "# print x -> 2",
            "# println x -> 2",
            "# write x -> 2",
        ]
    );
}

#[test]
fn empty_for_loop_traces_header_increment_and_close() {
    let source = "\
var i, n;
n := 1;
for i := 1 to n do
endfor
";
    let trace = run_trace(source, &[]);
    assert_eq!(
        trace,
        vec![
            "li.s ft1, 1",              // n := 1
            "li.s ft0, 1",              // i := start
            "# for loop",
            "L1:",
            "fle.s ft35, ft0, ft1",     // i <= n
            "beqz ft35, L2",
            "li.s ft36, 1",             // single body pass: i += 1
            "fadd.s ft0, ft0, ft36",
            "j L1",
            "L2:",
            "# end for",
        ]
    );
}

#[test]
fn zero_iteration_for_still_closes_its_labels() {
    let source = "\
var i, n;
n := 0;
for i := 1 to n do
endfor
";
    let trace = run_trace(source, &[]);
    assert_eq!(
        trace,
        vec![
            "li.s ft1, 0",
            "li.s ft0, 1",
            "# for loop",
            "L1:",
            "fle.s ft35, ft0, ft1",
            "beqz ft35, L2",
            "j L1",
            "L2:",
            "# end for",
        ]
    );
}

#[test]
fn while_trace_has_one_compare_per_check() {
    let source = "\
var n;
n := 1;
while n <= 2 do
    n := n 1 +;
endwhile
";
    let trace = run_trace(source, &[]);
    // checks at n = 1, 2, 3: the failing third check is logged too
    let compares = trace
        .iter()
        .filter(|line| line.starts_with("fle.s"))
        .count();
    assert_eq!(compares, 3);
    let jumps = trace.iter().filter(|line| *line == "j L1").count();
    assert_eq!(jumps, 2);
    assert_eq!(
        &trace[trace.len() - 2..],
        &["L2:".to_string(), "# end while".to_string()]
    );
}

#[test]
fn while_compare_reflects_operands_and_operator() {
    let source = "\
var n;
n := 3;
while n != 0 do
    n := n 1 -;
endwhile
";
    let trace = run_trace(source, &[]);
    assert!(trace.contains(&"li.s ft33, 0".to_string()));
    assert!(trace.contains(&"fne.s ft34, ft0, ft33".to_string()));
}

#[test]
fn exponentiation_traces_as_a_call() {
    let trace = run_trace("var x, y;\nx := 2;\ny := x 3 ^;", &[]);
    assert_eq!(
        trace,
        vec![
            "li.s ft0, 2",
            "li.s ft33, 3",
            "# call pow",
            "fmv.s ft1, fa0",
        ]
    );
}

#[test]
fn trig_traces_as_a_call_without_operand_loads() {
    let trace = run_trace("var a, s;\na := 0;\ns := a sin;", &[]);
    assert_eq!(
        trace,
        vec!["li.s ft0, 0", "# call sin", "fmv.s ft1, fa0"]
    );
}

#[test]
fn untraced_print_expressions_leave_no_instructions() {
    let trace = run_trace("println(2 3 +);", &[]);
    assert!(trace.is_empty());
}
