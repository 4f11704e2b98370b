//! The fixed table of built-in functions available to every program.
use std::rc::Rc;

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::object::{Builtin, HashPair, Object};

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("len", Builtin(len_fn));
    m.insert("first", Builtin(first_fn));
    m.insert("last", Builtin(last_fn));
    m.insert("rest", Builtin(rest_fn));
    m.insert("push", Builtin(push_fn));
    m.insert("puts", Builtin(puts_fn));
    m.insert("exit", Builtin(exit_fn));
    m.insert("join", Builtin(join_fn));
    m.insert("split", Builtin(split_fn));
    m.insert("keys", Builtin(keys_fn));
    m.insert("values", Builtin(values_fn));
    m.insert("type", Builtin(type_fn));
    m.insert("str", Builtin(str_fn));
    m.insert("reverse", Builtin(reverse_fn));
    m.insert("int", Builtin(int_fn));
    m
});

fn wrong_number_of_args(actual: usize, expected: &str) -> Object {
    Object::Error(format!(
        "wrong number of arguments. got={actual}, want={expected}"
    ))
}

fn len_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        Object::String(s) => Object::Integer(s.chars().count() as i64),
        other => Object::Error(format!(
            "argument to `len` not supported, got {}",
            other.kind()
        )),
    }
}

fn first_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(Object::Null),
        other => Object::Error(format!(
            "argument to `first` must be ARRAY, got {}",
            other.kind()
        )),
    }
}

fn last_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(Object::Null),
        other => Object::Error(format!(
            "argument to `last` must be ARRAY, got {}",
            other.kind()
        )),
    }
}

fn rest_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => {
            let rest = if elements.is_empty() {
                vec![]
            } else {
                elements[1..].to_vec()
            };
            Object::Array(Rc::new(rest))
        }
        other => Object::Error(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.kind()
        )),
    }
}

fn push_fn(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_number_of_args(args.len(), "2");
    }
    match &args[0] {
        Object::Array(elements) => {
            let mut new_elements = elements.as_ref().clone();
            new_elements.push(args[1].clone());
            Object::Array(Rc::new(new_elements))
        }
        other => Object::Error(format!(
            "first argument to `push` must be ARRAY, got {}",
            other.kind()
        )),
    }
}

fn puts_fn(args: &[Object]) -> Object {
    for arg in args {
        println!("{arg}");
    }
    Object::Null
}

fn exit_fn(args: &[Object]) -> Object {
    match args.len() {
        0 => std::process::exit(0),
        1 => match &args[0] {
            Object::Integer(code) => std::process::exit(*code as i32),
            other => Object::Error(format!(
                "argument to `exit` must be INTEGER, got {}",
                other.kind()
            )),
        },
        n => Object::Error(format!("wrong number of arguments. got={n}, want=0 or 1")),
    }
}

fn join_fn(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_number_of_args(args.len(), "2");
    }
    let Object::Array(elements) = &args[0] else {
        return Object::Error(format!(
            "first argument to `join` must be ARRAY, got {}",
            args[0].kind()
        ));
    };
    let Object::String(sep) = &args[1] else {
        return Object::Error(format!(
            "second argument to `join` must be STRING, got {}",
            args[1].kind()
        ));
    };
    let rendered: Vec<String> = elements.iter().map(ToString::to_string).collect();
    Object::String(Rc::from(rendered.join(sep).as_str()))
}

fn split_fn(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_number_of_args(args.len(), "2");
    }
    let Object::String(s) = &args[0] else {
        return Object::Error(format!(
            "first argument to `split` must be STRING, got {}",
            args[0].kind()
        ));
    };
    let Object::String(delimiter) = &args[1] else {
        return Object::Error(format!(
            "second argument to `split` must be STRING, got {}",
            args[1].kind()
        ));
    };
    let elements: Vec<Object> = s
        .split(delimiter.as_ref())
        .map(|part| Object::String(Rc::from(part)))
        .collect();
    Object::Array(Rc::new(elements))
}

fn hash_pairs_of<'a>(
    arg: &'a Object,
    fn_name: &str,
) -> Result<&'a indexmap::IndexMap<crate::object::HashKey, HashPair>, Object> {
    match arg {
        Object::Hash(pairs) => Ok(pairs),
        Object::Module(module) => Ok(&module.attrs),
        other => Err(Object::Error(format!(
            "argument to `{fn_name}` must be HASH or MODULE, got {}",
            other.kind()
        ))),
    }
}

fn keys_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    match hash_pairs_of(&args[0], "keys") {
        Ok(pairs) => Object::Array(Rc::new(pairs.values().map(|p| p.key.clone()).collect())),
        Err(err) => err,
    }
}

fn values_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    match hash_pairs_of(&args[0], "values") {
        Ok(pairs) => Object::Array(Rc::new(pairs.values().map(|p| p.value.clone()).collect())),
        Err(err) => err,
    }
}

fn type_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    Object::String(Rc::from(args[0].kind().to_string().as_str()))
}

fn str_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    Object::String(Rc::from(args[0].to_string().as_str()))
}

fn int_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    match &args[0] {
        Object::Integer(_) => args[0].clone(),
        Object::String(s) => match s.parse::<i64>() {
            Ok(value) => Object::Integer(value),
            Err(_) => Object::Error(format!("Cannot cast STRING({s}) to INTEGER")),
        },
        other => Object::Error(format!("Cannot cast {}({other}) to INTEGER", other.kind())),
    }
}

// As with `str`, fixed to construct `Object::String` directly rather than
// the undefined `object.String(...)`.
fn reverse_fn(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_number_of_args(args.len(), "1");
    }
    match &args[0] {
        Object::Array(elements) => {
            let reversed: Vec<Object> = elements.iter().rev().cloned().collect();
            Object::Array(Rc::new(reversed))
        }
        Object::String(s) => Object::String(Rc::from(s.chars().rev().collect::<String>().as_str())),
        _ => Object::Error("argument to `reverse` must be ARRAY or STRING.".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_reports_string_and_array_length() {
        assert_eq!(len_fn(&[Object::String(Rc::from("four"))]), Object::Integer(4));
        assert_eq!(
            len_fn(&[Object::Array(Rc::new(vec![Object::Integer(1), Object::Integer(2)]))]),
            Object::Integer(2)
        );
    }

    #[test]
    fn len_rejects_wrong_arity() {
        assert_eq!(
            len_fn(&[]),
            Object::Error("wrong number of arguments. got=0, want=1".into())
        );
    }

    #[test]
    fn keys_reads_the_passed_argument() {
        let mut pairs = indexmap::IndexMap::new();
        let key = Object::String(Rc::from("a"));
        pairs.insert(
            key.hash_key().unwrap(),
            HashPair {
                key: key.clone(),
                value: Object::Integer(1),
            },
        );
        let result = keys_fn(&[Object::Hash(Rc::new(pairs))]);
        assert_eq!(result, Object::Array(Rc::new(vec![key])));
    }

    #[test]
    fn str_builds_a_string_object() {
        assert_eq!(str_fn(&[Object::Integer(5)]), Object::String(Rc::from("5")));
    }

    #[test]
    fn reverse_handles_strings_and_arrays() {
        assert_eq!(
            reverse_fn(&[Object::String(Rc::from("abc"))]),
            Object::String(Rc::from("cba"))
        );
        assert_eq!(
            reverse_fn(&[Object::Array(Rc::new(vec![Object::Integer(1), Object::Integer(2)]))]),
            Object::Array(Rc::new(vec![Object::Integer(2), Object::Integer(1)]))
        );
    }

    #[test]
    fn int_parses_numeric_strings() {
        assert_eq!(int_fn(&[Object::String(Rc::from("42"))]), Object::Integer(42));
        assert!(matches!(int_fn(&[Object::String(Rc::from("nope"))]), Object::Error(_)));
    }
}
