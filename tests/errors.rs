use ember::evaluator::eval_program;
use ember::lexer::Lexer;
use ember::object::{Environment, Object};
use ember::parser::Parser;

fn eval(input: &str) -> Object {
    let dir = std::env::current_dir().unwrap();
    let mut parser = Parser::new(Lexer::new(input), dir);
    let program = parser.parse_program();
    assert!(parser.errors.is_empty(), "parser errors: {:?}", parser.errors);
    let env = Environment::new();
    eval_program(&program, &env)
}

#[test]
fn type_mismatch_reports_both_operand_kinds() {
    assert_eq!(
        eval("5 + true;"),
        Object::Error("type mismatch: INTEGER + BOOLEAN".into())
    );
}

#[test]
fn unknown_operator_on_matching_kinds() {
    assert_eq!(
        eval("true + false;"),
        Object::Error("unknown operator: BOOLEAN + BOOLEAN".into())
    );
}

#[test]
fn unbound_identifier() {
    assert_eq!(
        eval("foobar;"),
        Object::Error("identifier not found: foobar".into())
    );
}

#[test]
fn len_rejects_wrong_arity() {
    assert_eq!(
        eval(r#"len("one", "two")"#),
        Object::Error("wrong number of arguments. got=2, want=1".into())
    );
}

#[test]
fn len_rejects_unsupported_types() {
    assert_eq!(
        eval("len(1)"),
        Object::Error("argument to `len` not supported, got INTEGER".into())
    );
}

#[test]
fn calling_a_non_function_is_an_error() {
    assert_eq!(eval("5(1, 2)"), Object::Error("not a function INTEGER".into()));
}

#[test]
fn unterminated_parenthesis_is_a_parse_error() {
    let dir = std::env::current_dir().unwrap();
    let mut parser = Parser::new(Lexer::new("(1 + 2"), dir);
    parser.parse_program();
    assert!(!parser.errors.is_empty());
}
