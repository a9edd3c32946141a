//! The IR aggregate for one input unit.

use crate::decl::{ClassDecl, Function, Variable};
use crate::registry::{TypeId, TypeRegistry};
use crate::types::{Type, TypeKind};
use serde::{Deserialize, Serialize};

/// All declarations of one unit, in declaration order, plus the type
/// registry used for cross references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ir {
    classes: Vec<ClassDecl>,
    functions: Vec<Function>,
    globals: Vec<Variable>,
    types: TypeRegistry,
}

impl Ir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class and register an aggregate type under its name.
    pub fn add_class(&mut self, class: ClassDecl) -> TypeId {
        let id = self.register_type(&class.name, Type::aggregate(class.name.clone()));
        self.classes.push(class);
        id
    }

    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    pub fn add_global_variable(&mut self, var: Variable) {
        self.globals.push(var);
    }

    pub fn classes(&self) -> &[ClassDecl] {
        &self.classes
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn globals(&self) -> &[Variable] {
        &self.globals
    }

    /// In-place access for analysis passes. The slice cannot grow or shrink,
    /// so passes can annotate declarations but not add or drop them.
    pub fn classes_mut(&mut self) -> &mut [ClassDecl] {
        &mut self.classes
    }

    pub fn functions_mut(&mut self) -> &mut [Function] {
        &mut self.functions
    }

    pub fn find_class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn find_type(&self, name: &str) -> Option<&Type> {
        self.types.find(name)
    }

    pub fn register_type(&mut self, name: &str, ty: Type) -> TypeId {
        self.types.register(name, ty)
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Link every aggregate node in `ty` that names a registered type to its
    /// registry slot.
    pub fn resolve_type(&self, ty: &mut Type) {
        ty.walk_mut(&mut |node| {
            if node.kind == TypeKind::Aggregate {
                node.resolved = self.types.id_of(&node.name);
            }
        });
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty() && self.globals.is_empty()
    }
}
