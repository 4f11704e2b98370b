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
fn arithmetic_and_precedence() {
    assert_eq!(eval("3 + 4 * 5"), Object::Integer(23));
    assert_eq!(eval("(3 + 4) * 5"), Object::Integer(35));
    assert_eq!(eval("10 % 3"), Object::Integer(1));
}

#[test]
fn recursive_function_via_closure() {
    let result = eval(
        r#"
        let fact = fn(n) {
            if (n < 2) { return 1; }
            return n * fact(n - 1);
        };
        fact(5);
        "#,
    );
    assert_eq!(result, Object::Integer(120));
}

#[test]
fn boolean_logical_operators() {
    assert_eq!(eval("true && false"), Object::Boolean(false));
    assert_eq!(eval("true || false"), Object::Boolean(true));
}

#[test]
fn comparison_operators() {
    assert_eq!(eval("5 < 10"), Object::Boolean(true));
    assert_eq!(eval("5 > 10"), Object::Boolean(false));
    assert_eq!(eval("5 == 5"), Object::Boolean(true));
    assert_eq!(eval("5 != 5"), Object::Boolean(false));
}
