//! Universal type taxonomy.
//!
//! A [`Type`] is an owned tree: pointers, references and arrays own their
//! single element, containers own their ordered template arguments.
//! Aggregates that name a class declared in the same unit carry a
//! non-owning [`TypeId`] into the registry instead of a shared node.

use crate::registry::TypeId;
use serde::{Deserialize, Serialize};

/// Standard-library container families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Vector,
    List,
    Deque,
    Map,
    UnorderedMap,
    Set,
    UnorderedSet,
    String,
    Pair,
    Optional,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 10] = [
        ContainerKind::Vector,
        ContainerKind::List,
        ContainerKind::Deque,
        ContainerKind::Map,
        ContainerKind::UnorderedMap,
        ContainerKind::Set,
        ContainerKind::UnorderedSet,
        ContainerKind::String,
        ContainerKind::Pair,
        ContainerKind::Optional,
    ];

    /// Number of template arguments a well-formed instance carries.
    pub fn arity(self) -> usize {
        match self {
            ContainerKind::String => 0,
            ContainerKind::Map | ContainerKind::UnorderedMap | ContainerKind::Pair => 2,
            _ => 1,
        }
    }

    /// Bare source name of the family (`vector`, `unordered_map`, ...).
    pub fn source_name(self) -> &'static str {
        match self {
            ContainerKind::Vector => "vector",
            ContainerKind::List => "list",
            ContainerKind::Deque => "deque",
            ContainerKind::Map => "map",
            ContainerKind::UnorderedMap => "unordered_map",
            ContainerKind::Set => "set",
            ContainerKind::UnorderedSet => "unordered_set",
            ContainerKind::String => "string",
            ContainerKind::Pair => "pair",
            ContainerKind::Optional => "optional",
        }
    }

    pub fn from_source_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.source_name() == name)
    }
}

/// Threading and synchronization primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    Thread,
    Mutex,
    RecursiveMutex,
    SharedMutex,
    ConditionVariable,
    /// Value type lives in [`Type::element_type`].
    Atomic,
    LockGuard,
    UniqueLock,
    SharedLock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "family")]
pub enum TypeKind {
    Void,
    Bool,
    Integer,
    Float,
    Pointer,
    Reference,
    Array,
    /// User-defined struct or class.
    Aggregate,
    /// Callable. Return type in `element_type`, parameters in `template_args`.
    Function,
    Container(ContainerKind),
    Sync(SyncKind),
}

impl TypeKind {
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            TypeKind::Void | TypeKind::Bool | TypeKind::Integer | TypeKind::Float
        )
    }

    /// Kinds that hold exactly one `element_type`.
    pub fn has_element(self) -> bool {
        matches!(
            self,
            TypeKind::Pointer | TypeKind::Reference | TypeKind::Array
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub kind: TypeKind,
    /// Source spelling.
    pub name: String,
    pub is_const: bool,
    pub is_mutable: bool,
    pub element_type: Option<Box<Type>>,
    pub template_args: Vec<Type>,
    /// Best effort; zero when unknown.
    pub size_bytes: u64,
    pub alignment: u64,
    /// Element count of a fixed-size array.
    pub array_len: Option<u64>,
    /// Registry slot of the class this aggregate names, when declared in the
    /// same unit.
    pub resolved: Option<TypeId>,
}

const POINTER_SIZE: u64 = 8;

impl Type {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            is_const: false,
            is_mutable: true,
            element_type: None,
            template_args: Vec::new(),
            size_bytes: 0,
            alignment: 0,
            array_len: None,
            resolved: None,
        }
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void, "void")
    }

    pub fn primitive(kind: TypeKind, name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            size_bytes,
            alignment: size_bytes,
            ..Self::new(kind, name)
        }
    }

    pub fn aggregate(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Aggregate, name)
    }

    /// A pointer to `pointee`. `spelling` is kept verbatim so smart-pointer
    /// idioms stay recognizable (`std::unique_ptr<int>`).
    pub fn pointer(pointee: Type, spelling: impl Into<String>) -> Self {
        Self {
            element_type: Some(Box::new(pointee)),
            size_bytes: POINTER_SIZE,
            alignment: POINTER_SIZE,
            ..Self::new(TypeKind::Pointer, spelling)
        }
    }

    pub fn raw_pointer(pointee: Type) -> Self {
        let name = format!("{}*", pointee.name);
        Self::pointer(pointee, name)
    }

    pub fn reference(referent: Type, is_const: bool) -> Self {
        let name = format!("{}&", referent.name);
        Self {
            is_const,
            is_mutable: !is_const,
            element_type: Some(Box::new(referent)),
            size_bytes: POINTER_SIZE,
            alignment: POINTER_SIZE,
            ..Self::new(TypeKind::Reference, name)
        }
    }

    pub fn array(element: Type, len: Option<u64>) -> Self {
        let name = match len {
            Some(n) => format!("{}[{n}]", element.name),
            None => format!("{}[]", element.name),
        };
        Self {
            size_bytes: len.map_or(0, |n| element.size_bytes.saturating_mul(n)),
            alignment: element.alignment,
            array_len: len,
            element_type: Some(Box::new(element)),
            ..Self::new(TypeKind::Array, name)
        }
    }

    pub fn container(kind: ContainerKind, name: impl Into<String>, args: Vec<Type>) -> Self {
        Self {
            template_args: args,
            ..Self::new(TypeKind::Container(kind), name)
        }
    }

    pub fn sync(kind: SyncKind, name: impl Into<String>, element: Option<Type>) -> Self {
        Self {
            element_type: element.map(Box::new),
            ..Self::new(TypeKind::Sync(kind), name)
        }
    }

    pub fn function(name: impl Into<String>, ret: Type, params: Vec<Type>) -> Self {
        Self {
            element_type: Some(Box::new(ret)),
            template_args: params,
            ..Self::new(TypeKind::Function, name)
        }
    }

    pub fn element(&self) -> Option<&Type> {
        self.element_type.as_deref()
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void
    }

    /// Check the shape invariants of this node and all of its children.
    pub fn is_well_formed(&self) -> bool {
        let own = match self.kind {
            k if k.has_element() => self.element_type.is_some() && self.template_args.is_empty(),
            TypeKind::Container(c) => {
                self.element_type.is_none() && self.template_args.len() == c.arity()
            }
            k if k.is_primitive() => self.element_type.is_none() && self.template_args.is_empty(),
            _ => true,
        };
        own && self.element().is_none_or(Type::is_well_formed)
            && self.template_args.iter().all(Type::is_well_formed)
    }

    /// Depth of the tree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        let children = self
            .element()
            .into_iter()
            .chain(self.template_args.iter())
            .map(Type::depth)
            .max()
            .unwrap_or(0);
        children + 1
    }

    /// Visit every node, parents before children.
    /// Visit this node and every node below it, parents first.
    pub fn walk(&self, f: &mut impl FnMut(&Type)) {
        f(self);
        if let Some(elem) = self.element() {
            elem.walk(f);
        }
        for arg in &self.template_args {
            arg.walk(f);
        }
    }

    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Type)) {
        f(self);
        if let Some(elem) = self.element_type.as_deref_mut() {
            elem.walk_mut(f);
        }
        for arg in &mut self.template_args {
            arg.walk_mut(f);
        }
    }
}
