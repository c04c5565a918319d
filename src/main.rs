use log::debug;
use rascal::config::Config;
use rascal::io::{StdinSource, StdoutSink};
use rascal::{Interpreter, Program, RunError};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

const DEMO_BASIC: &str = "\
var x, y, sum, diff, prod, quot;
read(x);
read(y);
sum := x y +;
diff := x y -;
prod := x y *;
quot := x y /;
println(\"Results:\");
print(\"sum: \");
println(sum);
print(\"difference: \");
println(diff);
print(\"product: \");
println(prod);
print(\"quotient: \");
println(quot);
";

const DEMO_TRIG: &str = "\
var angle, s, c, t;
read(angle);
s := angle sin;
c := angle cos;
t := angle tan;
println(\"Trigonometry (radians):\");
print(\"sin: \");
println(s);
print(\"cos: \");
println(c);
print(\"tan: \");
println(t);
";

const DEMO_FOR: &str = "\
var n, i, sum, fact;
read(n);
sum := 0;
fact := 1;
println(\"Running sum and factorial:\");
for i := 1 to n do
    sum := sum i +;
    fact := fact i *;
    print(\"i=\");
    print(i);
    print(\" sum=\");
    print(sum);
    print(\" fact=\");
    println(fact);
endfor
write(sum);
write(fact);
";

const DEMO_WHILE: &str = "\
var n, count, power;
read(n);
count := 1;
power := 1;
println(\"Powers of two:\");
while count <= n do
    power := power 2 *;
    print(\"2^\");
    print(count);
    print(\" = \");
    println(power);
    count := count 1 +;
endwhile
";

const DEMO_FULL: &str = "\
var a, b, c, disc, x, fx, i, n;
println(\"Quadratic analyzer\");
read(a);
read(b);
read(c);
disc := b b * 4 a * c * -;
print(\"discriminant: \");
println(disc);
n := 3;
println(\"f at x = 1..3:\");
for i := 1 to n do
    x := i;
    fx := a x * x * b x * + c +;
    print(\"f(\");
    print(x);
    print(\") = \");
    println(fx);
endfor
write(disc);
";

fn demo_source(name: &str) -> Option<&'static str> {
    match name {
        "basic" => Some(DEMO_BASIC),
        "trig" => Some(DEMO_TRIG),
        "for" => Some(DEMO_FOR),
        "while" => Some(DEMO_WHILE),
        "full" => Some(DEMO_FULL),
        _ => None,
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("rascal - tracing interpreter for a small Pascal-like language");
        println!();
        println!("Usage: {} <program.pas>", args[0]);
        println!("       {} --demo <name>", args[0]);
        println!();
        println!("Demos: basic, trig, for, while, full");
        println!();
        println!("Each run executes the program and collects a trace of float");
        println!("pseudo-instructions; the final symbol table and the trace are");
        println!("printed after execution (configurable via rascal.toml).");
        return;
    }

    let source = if args[1] == "--demo" {
        let name = match args.get(2) {
            Some(name) => name,
            None => {
                eprintln!("error: --demo needs a name (basic, trig, for, while, full)");
                process::exit(2);
            }
        };
        match demo_source(name) {
            Some(text) => {
                println!("Program:");
                println!("{}", text);
                text.to_string()
            }
            None => {
                eprintln!("error: unknown demo '{}'", name);
                eprintln!("known demos: basic, trig, for, while, full");
                process::exit(2);
            }
        }
    } else {
        match fs::read_to_string(&args[1]) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("error: cannot read program '{}': {}", args[1], e);
                process::exit(1);
            }
        }
    };

    let config = Config::load_or_default(Path::new("rascal.toml"));

    let program = match Program::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            report(&e);
            process::exit(1);
        }
    };
    debug!("parsed {} statements", program.len());

    let prompt = config.prompt && atty::is(atty::Stream::Stdin);
    let mut session = Interpreter::new(
        program,
        Box::new(StdinSource::new(prompt)),
        Box::new(StdoutSink),
    );

    let result = session.run();
    if let Err(e) = &result {
        report(e);
    }

    // the session stays queryable even after a failed run
    if config.show_symbols {
        print_symbol_table(&session);
    }
    if config.show_trace {
        print_trace(&session);
    }

    if result.is_err() {
        process::exit(1);
    }
}

fn report(e: &RunError) {
    eprintln!("{}", e);
    eprintln!("  --> {}", e.statement);
}

fn print_symbol_table(session: &Interpreter) {
    println!();
    println!("--- Symbol table ---");
    println!("{:<12} {:<8} {:<10} Value", "Name", "Type", "Register");
    for (name, var) in session.symbols().iter() {
        let value = match var.value {
            Some(v) => v.to_string(),
            None => "-".to_string(),
        };
        println!(
            "{:<12} {:<8} {:<10} {}",
            name,
            var.ty.to_string(),
            var.register.to_string(),
            value
        );
    }
}

fn print_trace(session: &Interpreter) {
    println!();
    println!("--- Generated pseudo-instructions ---");
    for line in session.trace() {
        println!("{}", line);
    }
}
