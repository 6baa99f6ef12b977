//! Runtime values.
//!
//! Aggregates are `Arc`-shared so that values are `Send + Sync` and can be
//! copied into spawned threads. Lists and maps are immutable once built;
//! instances and classes carry interior mutability through `RwLock`.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::chunk::Chunk;
use crate::natives::NativeFunction;

/// A dynamically tagged value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),
    List(Arc<Vec<Value>>),
    Map(Arc<IndexMap<MapKey, Value>>),
    Function(Arc<Function>),
    BoundMethod(Arc<BoundMethod>),
    Class(Arc<Class>),
    Instance(Arc<Instance>),
    Native(NativeFunction),
}

impl Value {
    pub fn str(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    pub fn map(entries: IndexMap<MapKey, Value>) -> Self {
        Value::Map(Arc::new(entries))
    }

    /// `null`, `false` and `0` are falsey; everything else is truthy.
    pub fn is_falsey(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => *n == 0.0,
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::BoundMethod(_) => "bound method",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
            Value::Native(_) => "native function",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.same_as(b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => {
                Arc::ptr_eq(&a.receiver, &b.receiver) && a.method.same_as(&b.method)
            }
            (Value::Class(a), Value::Class(b)) => Arc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "<fn {}>", func.name),
            Value::BoundMethod(b) => write!(f, "<bound {}>", b.method.name),
            Value::Class(c) => write!(f, "<class {}>", c.name),
            Value::Instance(i) => write!(f, "<{} instance>", i.class.name),
            Value::Native(n) => write!(f, "<native {}>", n.name),
        }
    }
}

// Instances may reference themselves through their fields, so Debug never
// descends into them.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Map(entries) => f.debug_map().entries(entries.iter()).finish(),
            other => write!(f, "{}", other),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Map keys
// ═══════════════════════════════════════════════════════════════════════════

/// Hashable subset of [`Value`] usable as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Null,
    Bool(bool),
    /// Bit pattern of the number, with `-0` folded into `0`.
    Number(u64),
    Str(Arc<str>),
}

impl MapKey {
    pub fn from_value(value: &Value) -> Option<MapKey> {
        Some(match value {
            Value::Null => MapKey::Null,
            Value::Bool(b) => MapKey::Bool(*b),
            Value::Number(n) => MapKey::number(*n),
            Value::Str(s) => MapKey::Str(s.clone()),
            _ => return None,
        })
    }

    pub fn number(n: f64) -> MapKey {
        let n = if n == 0.0 { 0.0 } else { n };
        MapKey::Number(n.to_bits())
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Null => Value::Null,
            MapKey::Bool(b) => Value::Bool(*b),
            MapKey::Number(bits) => Value::Number(f64::from_bits(*bits)),
            MapKey::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(Arc::from(s))
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Objects
// ═══════════════════════════════════════════════════════════════════════════

/// A script function: an entry address inside a shared chunk.
pub struct Function {
    pub name: Arc<str>,
    pub arity: usize,
    pub entry: usize,
    pub chunk: Arc<Chunk>,
}

impl Function {
    /// Same code: same chunk and entry address.
    pub fn same_as(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.chunk, &other.chunk) && self.entry == other.entry
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("entry", &self.entry)
            .field("chunk", &self.chunk.name)
            .finish()
    }
}

/// A method paired with the instance it receives as `this`.
#[derive(Debug)]
pub struct BoundMethod {
    pub receiver: Arc<Instance>,
    pub method: Arc<Function>,
}

/// A class: a name and a method table shared by all its instances.
pub struct Class {
    pub name: Arc<str>,
    methods: RwLock<HashMap<Arc<str>, Arc<Function>>>,
}

impl Class {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            methods: RwLock::new(HashMap::new()),
        }
    }

    pub fn define_method(&self, name: Arc<str>, method: Arc<Function>) {
        self.methods.write().insert(name, method);
    }

    pub fn find_method(&self, name: &str) -> Option<Arc<Function>> {
        self.methods.read().get(name).cloned()
    }

    pub fn method_count(&self) -> usize {
        self.methods.read().len()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

/// An instance: a shared class plus its own fields.
pub struct Instance {
    pub class: Arc<Class>,
    fields: RwLock<HashMap<Arc<str>, Value>>,
}

impl Instance {
    pub fn new(class: Arc<Class>) -> Self {
        Self {
            class,
            fields: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    pub fn set_field(&self, name: Arc<str>, value: Value) {
        self.fields.write().insert(name, value);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} instance>", self.class.name)
    }
}
