use std::fs;
use std::rc::Rc;

use ember::evaluator::eval_program;
use ember::lexer::Lexer;
use ember::object::{Environment, Object};
use ember::parser::Parser;

fn eval_in(input: &str, dir: std::path::PathBuf) -> Object {
    let mut parser = Parser::new(Lexer::new(input), dir);
    let program = parser.parse_program();
    assert!(parser.errors.is_empty(), "parser errors: {:?}", parser.errors);
    let env = Environment::new();
    eval_program(&program, &env)
}

#[test]
fn import_exposes_module_bindings_as_a_hash() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("math.ember"),
        "let double = fn(x) { x * 2; };\nlet pi = 3;\n",
    )
    .unwrap();

    let source = r#"
        let math = import("./math.ember");
        math["double"](21);
    "#;

    let result = eval_in(source, dir.path().to_path_buf());
    assert_eq!(result, Object::Integer(42));
}

#[test]
fn import_of_missing_file_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let result = eval_in(r#"import("./nope.ember");"#, dir.path().to_path_buf());
    assert!(matches!(result, Object::Error(_)));
}

#[test]
fn module_values_can_be_read_with_keys_builtin() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("greet.ember"), "let name = \"world\";\n").unwrap();

    let result = eval_in(
        r#"keys(import("./greet.ember"))"#,
        dir.path().to_path_buf(),
    );
    assert_eq!(result, Object::Array(Rc::new(vec![Object::String(Rc::from("name"))])));
}
