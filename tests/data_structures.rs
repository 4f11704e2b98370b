use std::rc::Rc;

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
fn array_indexing_and_builtins() {
    assert_eq!(eval("[1, 2, 3][1]"), Object::Integer(2));
    assert_eq!(eval("first([1, 2, 3])"), Object::Integer(1));
    assert_eq!(eval("last([1, 2, 3])"), Object::Integer(3));
    assert_eq!(
        eval("push([1, 2], 3)"),
        Object::Array(Rc::new(vec![
            Object::Integer(1),
            Object::Integer(2),
            Object::Integer(3)
        ]))
    );
}

#[test]
fn hash_literal_keeps_insertion_order_for_keys_and_values() {
    let keys = eval(r#"keys({"b": 1, "a": 2})"#);
    assert_eq!(
        keys,
        Object::Array(Rc::new(vec![
            Object::String(Rc::from("b")),
            Object::String(Rc::from("a")),
        ]))
    );
}

#[test]
fn hash_rendering_quotes_string_keys() {
    assert_eq!(eval(r#"{"a": 1}"#).to_string(), "{\"a\": 1}");
}

#[test]
fn integer_and_boolean_keys_are_hashable() {
    assert_eq!(eval(r#"{1: "one", true: "yes"}[1]"#), Object::String(Rc::from("one")));
    assert_eq!(eval(r#"{1: "one", true: "yes"}[true]"#), Object::String(Rc::from("yes")));
}

#[test]
fn unhashable_key_is_an_error() {
    assert_eq!(
        eval(r#"{[1]: "nope"}"#),
        Object::Error("unusable as hash key: ARRAY".into())
    );
}

#[test]
fn split_and_join_round_trip() {
    assert_eq!(
        eval(r#"join(split("a,b,c", ","), "-")"#),
        Object::String(Rc::from("a-b-c"))
    );
}
