//! Runtime values produced by the evaluator.
pub mod environment;

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{BlockStatement, Identifier};
use environment::Env;

pub use environment::Environment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Integer,
    Boolean,
    Null,
    ReturnValue,
    Error,
    Function,
    String,
    Builtin,
    Array,
    Hash,
    Module,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Integer => "INTEGER",
            ObjectKind::Boolean => "BOOLEAN",
            ObjectKind::Null => "NULL",
            ObjectKind::ReturnValue => "RETURN_VALUE",
            ObjectKind::Error => "ERROR",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::String => "STRING",
            ObjectKind::Builtin => "BUILTIN",
            ObjectKind::Array => "ARRAY",
            ObjectKind::Hash => "HASH",
            ObjectKind::Module => "MODULE",
        };
        f.write_str(name)
    }
}

/// A hashed key used to index into [`Object::Hash`]. Only integers, booleans
/// and strings are hashable; `hash_key` returns `None` for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: ObjectKind,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionObj {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Env,
}

pub type BuiltinFn = fn(&[Object]) -> Object;

#[derive(Clone, Copy)]
pub struct Builtin(pub BuiltinFn);

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Builtin(..)")
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0 as *const (), other.0 as *const ())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleObj {
    pub name: String,
    pub attrs: IndexMap<HashKey, HashPair>,
}

/// A runtime value. `ReturnValue` and `Error` are internal control-flow
/// sentinels (see `evaluator::eval_block_statement`) and must never leak
/// into a position a user-visible value could occupy, e.g. as an array
/// element or hash value.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Array(Rc<Vec<Object>>),
    Hash(Rc<IndexMap<HashKey, HashPair>>),
    Function(Rc<FunctionObj>),
    Builtin(Builtin),
    Module(Rc<ModuleObj>),
    Null,
    ReturnValue(Box<Object>),
    Error(String),
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Integer(_) => ObjectKind::Integer,
            Object::Boolean(_) => ObjectKind::Boolean,
            Object::String(_) => ObjectKind::String,
            Object::Array(_) => ObjectKind::Array,
            Object::Hash(_) => ObjectKind::Hash,
            Object::Function(_) => ObjectKind::Function,
            Object::Builtin(_) => ObjectKind::Builtin,
            Object::Module(_) => ObjectKind::Module,
            Object::Null => ObjectKind::Null,
            Object::ReturnValue(_) => ObjectKind::ReturnValue,
            Object::Error(_) => ObjectKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// `None` when `self` isn't one of the hashable kinds (integer, boolean,
    /// string) and thus can't be used as a hash/index key.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(value) => Some(HashKey {
                kind: ObjectKind::Integer,
                value: *value as u64,
            }),
            Object::Boolean(value) => Some(HashKey {
                kind: ObjectKind::Boolean,
                value: u64::from(*value),
            }),
            Object::String(value) => {
                let mut hasher = DefaultHasher::new();
                value.hash(&mut hasher);
                Some(HashKey {
                    kind: ObjectKind::String,
                    value: hasher.finish(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{value}"),
            Object::Boolean(value) => write!(f, "{value}"),
            Object::String(value) => write!(f, "{value}"),
            Object::Null => write!(f, "null"),
            Object::ReturnValue(value) => write!(f, "{value}"),
            Object::Error(message) => write!(f, "ERROR: {message}"),
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Object::Function(func) => {
                let params: Vec<String> =
                    func.parameters.iter().map(ToString::to_string).collect();
                write!(f, "fn({}) {{\n{}\n}}", params.join(", "), func.body)
            }
            Object::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .values()
                    .map(|pair| {
                        let key = if matches!(pair.key, Object::String(_)) {
                            format!("\"{}\"", pair.key)
                        } else {
                            pair.key.to_string()
                        };
                        format!("{key}: {}", pair.value)
                    })
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Object::Module(module) => {
                let rendered: Vec<String> = module
                    .attrs
                    .values()
                    .map(|pair| {
                        let key = if matches!(pair.key, Object::String(_)) {
                            format!("\"{}\"", pair.key)
                        } else {
                            pair.key.to_string()
                        };
                        format!("{key}: {}", pair.value)
                    })
                    .collect();
                write!(f, "<module {}: {{{}}}>", module.name, rendered.join(", "))
            }
        }
    }
}
