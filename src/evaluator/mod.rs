//! Tree-walking evaluator.
pub mod builtins;

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use log::debug;

use crate::ast::{
    BlockStatement, Expression, FunctionLiteral, HashLiteral, IfExpression, ImportExpression,
    IndexExpression, InfixExpression, PrefixExpression, Program, Statement, WhileStatement,
};
use crate::lexer::Lexer;
use crate::object::environment::Env;
use crate::object::{Builtin, Environment, FunctionObj, HashPair, ModuleObj, Object, ObjectKind};
use crate::parser::Parser;

pub fn eval_program(program: &Program, env: &Env) -> Object {
    let mut result = Object::Null;

    for statement in &program.statements {
        result = eval_statement(statement, env);
        match result {
            Object::ReturnValue(value) => return *value,
            Object::Error(_) => return result,
            _ => {}
        }
    }

    result
}

fn eval_block_statement(block: &BlockStatement, env: &Env) -> Object {
    let mut result = Object::Null;

    for statement in &block.statements {
        result = eval_statement(statement, env);
        if matches!(result.kind(), ObjectKind::ReturnValue | ObjectKind::Error) {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: &Env) -> Object {
    match statement {
        Statement::Expression(stmt) => match &stmt.expression {
            Some(expr) => eval_expression(expr, env),
            None => Object::Null,
        },
        Statement::Return(stmt) => {
            let value = match &stmt.return_value {
                Some(expr) => eval_expression(expr, env),
                None => Object::Null,
            };
            if value.is_error() {
                value
            } else {
                Object::ReturnValue(Box::new(value))
            }
        }
        Statement::Let(stmt) => {
            let value = match &stmt.value {
                Some(expr) => eval_expression(expr, env),
                None => Object::Null,
            };
            if value.is_error() {
                return value;
            }
            env.borrow_mut().set(stmt.name.value.clone(), value);
            Object::Null
        }
        Statement::While(stmt) => eval_while_statement(stmt, env),
        Statement::Comment(_) => Object::Null,
    }
}

fn eval_while_statement(stmt: &WhileStatement, env: &Env) -> Object {
    loop {
        let condition = eval_expression(&stmt.condition, env);
        if condition.is_error() {
            return condition;
        }
        if !is_truthy(&condition) {
            return Object::Null;
        }
        let body = eval_block_statement(&stmt.body, env);
        if body.is_error() {
            return body;
        }
    }
}

fn eval_expression(expr: &Expression, env: &Env) -> Object {
    match expr {
        Expression::IntegerLiteral(lit) => Object::Integer(lit.value),
        Expression::StringLiteral(lit) => Object::String(Rc::from(lit.value.as_str())),
        Expression::Boolean(lit) => Object::Boolean(lit.value),
        Expression::Identifier(ident) => eval_identifier(&ident.value, env),
        Expression::ArrayLiteral(lit) => {
            let elements = eval_expressions(&lit.elements, env);
            match first_error(&elements) {
                Some(err) => err,
                None => Object::Array(Rc::new(elements)),
            }
        }
        Expression::HashLiteral(lit) => eval_hash_literal(lit, env),
        Expression::Prefix(expr) => eval_prefix_expression(expr, env),
        Expression::Infix(expr) => eval_infix_expression(expr, env),
        Expression::If(expr) => eval_if_expression(expr, env),
        Expression::FunctionLiteral(lit) => eval_function_literal(lit, env),
        Expression::Call(expr) => {
            let function = eval_expression(&expr.function, env);
            if function.is_error() {
                return function;
            }
            let args = eval_expressions(&expr.arguments, env);
            if let Some(err) = first_error(&args) {
                return err;
            }
            apply_function(&function, &args)
        }
        Expression::Index(expr) => eval_index_expression(expr, env),
        Expression::Import(expr) => eval_import_expression(expr, env),
    }
}

fn eval_expressions(exprs: &[Expression], env: &Env) -> Vec<Object> {
    let mut result = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let evaluated = eval_expression(expr, env);
        let is_error = evaluated.is_error();
        result.push(evaluated);
        if is_error {
            break;
        }
    }
    result
}

fn first_error(objects: &[Object]) -> Option<Object> {
    objects.iter().find(|o| o.is_error()).cloned()
}

fn eval_hash_literal(lit: &HashLiteral, env: &Env) -> Object {
    let mut pairs = IndexMap::new();

    for (key_expr, value_expr) in &lit.pairs {
        let key = eval_expression(key_expr, env);
        if key.is_error() {
            return key;
        }
        let Some(hash_key) = key.hash_key() else {
            return Object::Error(format!("unusable as hash key: {}", key.kind()));
        };

        let value = eval_expression(value_expr, env);
        if value.is_error() {
            return value;
        }

        pairs.insert(hash_key, HashPair { key, value });
    }

    Object::Hash(Rc::new(pairs))
}

fn eval_prefix_expression(expr: &PrefixExpression, env: &Env) -> Object {
    let right = eval_expression(&expr.right, env);
    if right.is_error() {
        return right;
    }
    match expr.operator.as_str() {
        "!" => eval_bang_operator(&right),
        "-" => eval_minus_prefix_operator(&right),
        op => Object::Error(format!("unknown operator: {op}{}", right.kind())),
    }
}

fn eval_bang_operator(right: &Object) -> Object {
    match right {
        Object::Boolean(true) => Object::Boolean(false),
        Object::Boolean(false) | Object::Null => Object::Boolean(true),
        _ => Object::Boolean(false),
    }
}

fn eval_minus_prefix_operator(right: &Object) -> Object {
    match right {
        Object::Integer(value) => Object::Integer(-value),
        other => Object::Error(format!("unknown operator: -{}", other.kind())),
    }
}

fn eval_infix_expression(expr: &InfixExpression, env: &Env) -> Object {
    let left = eval_expression(&expr.left, env);
    if left.is_error() {
        return left;
    }
    let right = eval_expression(&expr.right, env);
    if right.is_error() {
        return right;
    }

    let operator = expr.operator.as_str();

    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix(operator, l, r),
        (Object::Array(l), Object::Array(r)) => eval_array_infix(operator, l, r),
        (Object::Boolean(l), Object::Boolean(r)) if operator == "&&" => {
            Object::Boolean(*l && *r)
        }
        (Object::Boolean(l), Object::Boolean(r)) if operator == "||" => {
            Object::Boolean(*l || *r)
        }
        _ if operator == "==" => Object::Boolean(left == right),
        _ if operator == "!=" => Object::Boolean(left != right),
        _ if left.kind() != right.kind() => Object::Error(format!(
            "type mismatch: {} {operator} {}",
            left.kind(),
            right.kind()
        )),
        _ => Object::Error(format!(
            "unknown operator: {} {operator} {}",
            left.kind(),
            right.kind()
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left + right),
        "-" => Object::Integer(left - right),
        "*" => Object::Integer(left * right),
        "/" => {
            if right == 0 {
                Object::Error("division by zero".into())
            } else {
                Object::Integer(left / right)
            }
        }
        "%" => {
            if right == 0 {
                Object::Error("division by zero".into())
            } else {
                Object::Integer(left % right)
            }
        }
        "<" => Object::Boolean(left < right),
        ">" => Object::Boolean(left > right),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        op => Object::Error(format!("unknown operator: INTEGER {op} INTEGER")),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Object {
    if operator != "+" {
        return Object::Error(format!("unknown operator: STRING {operator} STRING"));
    }
    Object::String(Rc::from(format!("{left}{right}")))
}

fn eval_array_infix(operator: &str, left: &[Object], right: &[Object]) -> Object {
    if operator != "+" {
        return Object::Error(format!("unknown operator: ARRAY {operator} ARRAY"));
    }
    let mut combined = left.to_vec();
    combined.extend_from_slice(right);
    Object::Array(Rc::new(combined))
}

fn eval_if_expression(expr: &IfExpression, env: &Env) -> Object {
    let condition = eval_expression(&expr.condition, env);
    if condition.is_error() {
        return condition;
    }
    if is_truthy(&condition) {
        eval_block_statement(&expr.consequence, env)
    } else if let Some(alt) = &expr.alternative {
        eval_block_statement(alt, env)
    } else {
        Object::Null
    }
}

fn eval_identifier(name: &str, env: &Env) -> Object {
    if let Some(value) = env.borrow().get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name) {
        return Object::Builtin(builtin);
    }
    Object::Error(format!("identifier not found: {name}"))
}

fn eval_function_literal(lit: &FunctionLiteral, env: &Env) -> Object {
    Object::Function(Rc::new(FunctionObj {
        parameters: lit.parameters.clone(),
        body: lit.body.clone(),
        env: env.clone(),
    }))
}

fn apply_function(function: &Object, args: &[Object]) -> Object {
    match function {
        Object::Function(func) => {
            let extended_env = match extend_function_env(func, args) {
                Ok(env) => env,
                Err(err) => return err,
            };
            let evaluated = eval_block_statement(&func.body, &extended_env);
            unwrap_return_value(evaluated)
        }
        Object::Builtin(Builtin(f)) => f(args),
        other => Object::Error(format!("not a function {}", other.kind())),
    }
}

fn extend_function_env(func: &FunctionObj, args: &[Object]) -> Result<Env, Object> {
    let env = Environment::enclosed(func.env.clone());
    for (i, param) in func.parameters.iter().enumerate() {
        match args.get(i) {
            Some(value) => {
                env.borrow_mut().set(param.value.clone(), value.clone());
            }
            None => return Err(Object::Error(format!("{} not supplied", param.value))),
        }
    }
    Ok(env)
}

fn unwrap_return_value(obj: Object) -> Object {
    match obj {
        Object::ReturnValue(value) => *value,
        other => other,
    }
}

fn eval_index_expression(expr: &IndexExpression, env: &Env) -> Object {
    let left = eval_expression(&expr.left, env);
    if left.is_error() {
        return left;
    }
    let index = eval_expression(&expr.index, env);
    if index.is_error() {
        return index;
    }

    match (&left, &index) {
        (Object::Array(elements), Object::Integer(idx)) => {
            eval_array_index(elements, *idx)
        }
        (Object::Hash(pairs), _) => eval_hash_index(pairs, &index),
        (Object::Module(module), _) => eval_hash_index(&module.attrs, &index),
        _ => Object::Error(format!("index operator not supported: {}", left.kind())),
    }
}

fn eval_array_index(elements: &[Object], idx: i64) -> Object {
    if idx < 0 || idx as usize >= elements.len() {
        return Object::Null;
    }
    elements[idx as usize].clone()
}

fn eval_hash_index(pairs: &IndexMap<crate::object::HashKey, HashPair>, index: &Object) -> Object {
    let Some(hash_key) = index.hash_key() else {
        return Object::Error(format!("unusable as hash key: {}", index.kind()));
    };
    match pairs.get(&hash_key) {
        Some(pair) => pair.value.clone(),
        None => Object::Null,
    }
}

fn eval_import_expression(expr: &ImportExpression, _env: &Env) -> Object {
    let Expression::StringLiteral(name) = expr.name.as_ref() else {
        return Object::Error(
            "Import Error: Unable to cast ImportExpression.name to StringLiteral".into(),
        );
    };

    let requested = Path::new(&name.value);
    let module_path: PathBuf = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        Path::new(&expr.requestor).join(requested)
    };

    match eval_module(&module_path) {
        Ok(attrs) => Object::Module(Rc::new(ModuleObj {
            name: module_path.to_string_lossy().into_owned(),
            attrs,
        })),
        Err(message) => Object::Error(message),
    }
}

fn eval_module(path: &Path) -> Result<IndexMap<crate::object::HashKey, HashPair>, String> {
    debug!("importing module {}", path.display());

    let text = fs::read_to_string(path)
        .map_err(|err| format!("Import Error: could not read \"{}\": {err}", path.display()))?;

    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut parser = Parser::new(Lexer::new(&text), dir);
    let program = parser.parse_program();
    if !parser.errors.is_empty() {
        return Err(format!("Parser Error: {:?}", parser.errors));
    }

    let env = Environment::new();
    let result = eval_program(&program, &env);
    if result.is_error() {
        return Err(result.to_string());
    }

    let exported = env.borrow().exported_hash();
    Ok(exported)
}

fn is_truthy(obj: &Object) -> bool {
    !matches!(obj, Object::Null | Object::Boolean(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Object {
        let dir = std::env::current_dir().unwrap();
        let mut parser = Parser::new(Lexer::new(input), dir);
        let program = parser.parse_program();
        assert!(parser.errors.is_empty(), "{:?}", parser.errors);
        let env = Environment::new();
        eval_program(&program, &env)
    }

    #[test]
    fn evaluates_integer_arithmetic() {
        assert_eq!(eval("5 + 5 * 2 - 10 / 2"), Object::Integer(10));
    }

    #[test]
    fn truncates_integer_division_toward_zero() {
        assert_eq!(eval("-7 / 2"), Object::Integer(-3));
    }

    #[test]
    fn division_by_zero_is_an_error_not_a_panic() {
        assert_eq!(eval("1 / 0"), Object::Error("division by zero".into()));
    }

    #[test]
    fn evaluates_bang_and_minus_prefix() {
        assert_eq!(eval("!true"), Object::Boolean(false));
        assert_eq!(eval("!5"), Object::Boolean(false));
        assert_eq!(eval("!null_var"), Object::Error("identifier not found: null_var".into()));
        assert_eq!(eval("-5"), Object::Integer(-5));
    }

    #[test]
    fn closures_capture_defining_environment() {
        let result = eval(
            r#"
            let newAdder = fn(x) { fn(y) { x + y; }; };
            let addTwo = newAdder(2);
            addTwo(3);
            "#,
        );
        assert_eq!(result, Object::Integer(5));
    }

    #[test]
    fn while_loop_mutates_outer_binding() {
        let result = eval(
            r#"
            let i = 0;
            let sum = 0;
            while (i < 5) {
                let sum = sum + i;
                let i = i + 1;
            }
            sum;
            "#,
        );
        assert_eq!(result, Object::Integer(10));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(
            eval(r#""Hello" + " " + "World!""#),
            Object::String(Rc::from("Hello World!"))
        );
    }

    #[test]
    fn array_concatenation() {
        let result = eval("[1, 2] + [3]");
        assert_eq!(
            result,
            Object::Array(Rc::new(vec![
                Object::Integer(1),
                Object::Integer(2),
                Object::Integer(3)
            ]))
        );
    }

    #[test]
    fn type_mismatch_is_an_error() {
        assert_eq!(
            eval("5 + true"),
            Object::Error("type mismatch: INTEGER + BOOLEAN".into())
        );
    }

    #[test]
    fn error_short_circuits_block_evaluation() {
        let result = eval(
            r#"
            if (10 > 1) {
                if (10 > 1) {
                    return true + false;
                }
                return 1;
            }
            "#,
        );
        assert_eq!(
            result,
            Object::Error("unknown operator: BOOLEAN + BOOLEAN".into())
        );
    }

    #[test]
    fn hash_literal_indexing() {
        let result = eval(r#"let h = {"name": "monkey", 1: "one"}; h["name"];"#);
        assert_eq!(result, Object::String(Rc::from("monkey")));
    }

    #[test]
    fn array_out_of_bounds_is_null() {
        assert_eq!(eval("[1, 2, 3][10]"), Object::Null);
    }
}
