// Statement classification and terminator policy tests

#[cfg(test)]
mod tests {
    use crate::error::InterpreterError;
    use crate::program::{CmpOp, Program, StatementKind};

    fn parse_one(line: &str) -> StatementKind {
        let program = Program::parse(line).unwrap();
        program.statements()[0].kind.clone()
    }

    fn parse_err(source: &str) -> (usize, InterpreterError) {
        let err = Program::parse(source).unwrap_err();
        (err.line, err.error)
    }

    #[test]
    fn classifies_every_statement_shape() {
        assert_eq!(
            parse_one("var x, y;"),
            StatementKind::Declaration(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(parse_one("read(x);"), StatementKind::Read("x".to_string()));
        assert_eq!(
            parse_one("print(\"hi\");"),
            StatementKind::Print("\"hi\"".to_string())
        );
        assert_eq!(
            parse_one("println(x);"),
            StatementKind::Println("x".to_string())
        );
        assert_eq!(parse_one("write(x)"), StatementKind::Write("x".to_string()));
        assert_eq!(parse_one("endfor"), StatementKind::EndFor);
        assert_eq!(parse_one("endwhile"), StatementKind::EndWhile);
    }

    #[test]
    fn assignment_keeps_postfix_tokens() {
        assert_eq!(
            parse_one("sum := x y +;"),
            StatementKind::Assignment {
                target: "sum".to_string(),
                tokens: vec!["x".to_string(), "y".to_string(), "+".to_string()],
            }
        );
    }

    #[test]
    fn for_header_parses_literal_start() {
        assert_eq!(
            parse_one("for i := 1 to n do"),
            StatementKind::For {
                var: "i".to_string(),
                start: 1.0,
                bound: "n".to_string(),
            }
        );
    }

    #[test]
    fn for_header_rejects_non_literal_start() {
        let (line, err) = parse_err("for i := lo to n do");
        assert_eq!(line, 1);
        assert!(matches!(err, InterpreterError::Syntax(_)));
    }

    #[test]
    fn while_header_strips_optional_do() {
        let expected = StatementKind::While(crate::program::Condition {
            lhs: "a".to_string(),
            op: CmpOp::Le,
            rhs: "b".to_string(),
        });
        assert_eq!(parse_one("while a <= b do"), expected);
        assert_eq!(parse_one("while a <= b"), expected);
    }

    #[test]
    fn malformed_condition_is_a_parse_error() {
        let (_, err) = parse_err("while a <");
        assert!(matches!(err, InterpreterError::Syntax(_)));
        let (_, err) = parse_err("while a <> b do");
        assert!(matches!(err, InterpreterError::Syntax(_)));
    }

    #[test]
    fn missing_terminator_fails_with_the_statement_number() {
        let (line, err) = parse_err("var x;\nx := 5\nprintln(x);");
        assert_eq!(line, 2);
        assert!(matches!(err, InterpreterError::Syntax(_)));
    }

    #[test]
    fn terminator_required_for_calls_and_declarations() {
        for bad in ["var x", "read(x)", "print(x)", "println(x)"] {
            let (_, err) = parse_err(bad);
            assert!(matches!(err, InterpreterError::Syntax(_)), "{}", bad);
        }
    }

    #[test]
    fn terminator_forbidden_on_headers_and_block_ends() {
        for bad in [
            "for i := 1 to n do;",
            "while a < b do;",
            "endfor;",
            "endwhile;",
        ] {
            let (_, err) = parse_err(bad);
            assert!(matches!(err, InterpreterError::Syntax(_)), "{}", bad);
        }
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            parse_one("VAR Total;"),
            StatementKind::Declaration(vec!["Total".to_string()])
        );
        assert_eq!(parse_one("ENDFOR"), StatementKind::EndFor);
        assert!(matches!(
            parse_one("FOR i := 1 TO n DO"),
            StatementKind::For { .. }
        ));
    }

    #[test]
    fn numbering_skips_blank_lines() {
        let program = Program::parse("var x;\n\n\nx := 1;\n").unwrap();
        let numbers: Vec<usize> = program.statements().iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn declaration_accepts_comma_or_space_separators() {
        assert_eq!(
            parse_one("var a,b , c;"),
            StatementKind::Declaration(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string()
            ])
        );
    }

    #[test]
    fn unrecognized_statement_is_a_parse_error() {
        let (_, err) = parse_err("if x > 0 then");
        assert!(matches!(err, InterpreterError::Syntax(_)));
    }
}
