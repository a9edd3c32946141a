//! Declarations: variables, parameters, functions and classes.

use crate::profile::{ClassConcurrency, ExceptionProfile, FunctionConcurrency, ParameterOwnership};
use crate::types::Type;
use serde::{Deserialize, Serialize};

/// A field or a global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    pub is_static: bool,
    pub is_const: bool,
    /// Opaque initializer text.
    pub initializer: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            is_const: false,
            initializer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub return_type: Option<Type>,
    pub parameters: Vec<Parameter>,
    /// Raw body text; the only input the analyzers see.
    pub body: String,
    pub is_const: bool,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_pure_virtual: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    /// Declared non-throwing, as reported by the front-end.
    pub is_noexcept: bool,

    // Filled in by the analysis passes.
    pub exception: ExceptionProfile,
    pub concurrency: FunctionConcurrency,
    pub ownership: ParameterOwnership,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_return(mut self, ty: Type) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// True when the function returns nothing (no type or `void`).
    pub fn returns_void(&self) -> bool {
        self.return_type.as_ref().is_none_or(Type::is_void)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSection {
    pub level: AccessLevel,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub is_struct: bool,
    pub fields: Vec<Variable>,
    pub methods: Vec<Function>,
    /// Names only; no dispatch table is modeled.
    pub base_classes: Vec<String>,
    pub is_template: bool,
    pub template_params: Vec<String>,
    pub access_sections: Vec<AccessSection>,

    // Filled in by the analysis passes.
    pub concurrency: ClassConcurrency,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Visibility of a member: the first access section naming it, otherwise
    /// the language default (public for structs, private for classes).
    pub fn access_of(&self, member: &str) -> AccessLevel {
        self.access_sections
            .iter()
            .find(|s| s.members.iter().any(|m| m == member))
            .map(|s| s.level)
            .unwrap_or(if self.is_struct {
                AccessLevel::Public
            } else {
                AccessLevel::Private
            })
    }

    pub fn is_public(&self, member: &str) -> bool {
        self.access_of(member) == AccessLevel::Public
    }

    /// A class with pure virtual methods and no data: an interface.
    pub fn is_abstract(&self) -> bool {
        self.fields.is_empty() && self.methods.iter().any(|m| m.is_pure_virtual)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Function> {
        self.methods.iter().filter(|m| m.is_constructor)
    }

    pub fn destructor(&self) -> Option<&Function> {
        self.methods.iter().find(|m| m.is_destructor)
    }
}
