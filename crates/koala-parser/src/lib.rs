pub mod parser;

pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use koala_lexer::Lexer;
    use koala_syntax::ast::*;
    use koala_syntax::error::ErrorKind;

    fn parse_expr_str(input: &str) -> Expr {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expr().expect("Parsing should succeed")
    }

    fn parse_program_str(input: &str) -> Vec<Stmt> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_program().expect("Parsing should succeed")
    }

    #[test]
    fn test_literal_expressions() {
        assert!(matches!(parse_expr_str("42"), Expr::Num { value: 42, .. }));
        assert!(matches!(parse_expr_str("-7"), Expr::Num { value: -7, .. }));
        assert!(matches!(parse_expr_str("\"hello\""), Expr::Str { value, .. } if value == "hello"));
        assert!(matches!(parse_expr_str("true"), Expr::Bool { value: true, .. }));
        assert!(matches!(parse_expr_str("false"), Expr::Bool { value: false, .. }));
        assert!(matches!(parse_expr_str("take()"), Expr::Take { .. }));
    }

    #[test]
    fn test_negated_variable_is_subtraction_from_zero() {
        match parse_expr_str("-x") {
            Expr::Binary { op: BinOp::Sub, left, right, .. } => {
                assert!(matches!(*left, Expr::Num { value: 0, .. }));
                assert!(matches!(*right, Expr::Var { ref name, .. } if name == "x"));
            }
            other => panic!("Expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_precedence() {
        // 1 + 2 * 3 < 10  =>  (1 + (2 * 3)) < 10
        match parse_expr_str("1 + 2 * 3 < 10") {
            Expr::Binary { op: BinOp::Lt, left, .. } => match *left {
                Expr::Binary { op: BinOp::Add, right, .. } => {
                    assert!(matches!(*right, Expr::Binary { op: BinOp::Mul, .. }));
                }
                other => panic!("Expected addition, got {:?}", other),
            },
            other => panic!("Expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_comparisons_share_one_level() {
        // a < b && c  =>  (a < b) && c
        assert!(matches!(parse_expr_str("a < b && c"), Expr::Binary { op: BinOp::And, .. }));
    }

    #[test]
    fn test_index_call_and_array() {
        assert!(matches!(parse_expr_str("arr[0]"), Expr::Index { ref name, .. } if name == "arr"));
        match parse_expr_str("add(1, 2)") {
            Expr::Call { name, args, .. } => {
                assert_eq!(name, "add");
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected call, got {:?}", other),
        }
        match parse_expr_str("[1, 2, [3]]") {
            Expr::Array { elems, .. } => assert_eq!(elems.len(), 3),
            other => panic!("Expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_statements() {
        let prog = parse_program_str(
            r#"
            x = 1;
            a = [1, 2];
            a[0] = 5;
            a[1] + 1;
            give(x);
            take();
            f(1);
            "#,
        );
        assert!(matches!(prog[0], Stmt::Assign { .. }));
        assert!(matches!(prog[2], Stmt::AssignIndex { .. }));
        assert!(matches!(prog[3], Stmt::Expr { expr: Expr::Binary { .. }, .. }));
        assert!(matches!(prog[4], Stmt::Give { .. }));
        assert!(matches!(prog[5], Stmt::Expr { expr: Expr::Take { .. }, .. }));
        assert!(matches!(prog[6], Stmt::Expr { expr: Expr::Call { .. }, .. }));
    }

    #[test]
    fn test_control_flow() {
        let prog = parse_program_str(
            r#"
            this (x < 3) give(1); otherwise { give(2); }
            iter (i < 3) { i = i + 1; }
            iter2 (i = 0; i < 3; i = i + 1) give(i);
            func add(a, b) { return a + b; }
            "#,
        );
        assert!(matches!(&prog[0], Stmt::If { else_branch: Some(_), .. }));
        assert!(matches!(&prog[1], Stmt::While { .. }));
        assert!(matches!(&prog[2], Stmt::For { .. }));
        match &prog[3] {
            Stmt::FuncDef { name, params, .. } => {
                assert_eq!(name, "add");
                assert_eq!(params, &vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("Expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_spans() {
        let prog = parse_program_str("x = 1;\n  give(x);");
        assert_eq!(prog[1].span(), Span::new(2, 3));
    }

    #[test]
    fn test_parse_errors() {
        let tokens = Lexer::new("give(1)").tokenize().unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert!(err.msg.contains("Expected ';'"));

        let tokens = Lexer::new("{ give(1);").tokenize().unwrap();
        assert!(Parser::new(tokens).parse_program().is_err());

        let tokens = Lexer::new("x = ;").tokenize().unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert_eq!((err.line, err.col), (Some(1), Some(5)));
    }
}
