//! Front-end boundary: source text to IR.
//!
//! A front-end produces declaration records with per-function body text.
//! [`DeclarationFrontend`] reads those records from a JSON document, the
//! format a syntax-tree extractor hands over:
//!
//! ```json
//! {
//!   "classes": [{ "name": "Point",
//!                 "fields": [{ "name": "x", "type": "int" }],
//!                 "methods": [{ "name": "getX", "return_type": "int",
//!                               "is_const": true, "body": "return x;" }],
//!                 "access": [{ "level": "public", "members": ["getX"] }] }],
//!   "functions": [],
//!   "globals": []
//! }
//! ```

use crate::error::IngestError;
use serde::Deserialize;
use std::collections::HashSet;
use transmigrate_analysis::map_type;
use transmigrate_ir::{
    AccessLevel, AccessSection, ClassDecl, Function, Ir, Parameter, Type, Variable,
};

/// Turns one input unit into an IR with mapped, resolved types.
pub trait Frontend: Send + Sync {
    /// Source language identifier.
    fn language(&self) -> &'static str;

    /// File extensions this front-end reads.
    fn extensions(&self) -> &'static [&'static str];

    fn ingest(&self, source: &str) -> Result<Ir, IngestError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct UnitRecord {
    classes: Vec<ClassRecord>,
    functions: Vec<FunctionRecord>,
    globals: Vec<VariableRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ClassRecord {
    name: String,
    is_struct: bool,
    fields: Vec<VariableRecord>,
    methods: Vec<FunctionRecord>,
    #[serde(alias = "base_classes")]
    bases: Vec<String>,
    template_params: Vec<String>,
    access: Vec<AccessRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AccessRecord {
    level: AccessLevel,
    members: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct VariableRecord {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    is_static: bool,
    is_const: bool,
    initializer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ParameterRecord {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    default_value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FunctionRecord {
    name: String,
    return_type: Option<String>,
    parameters: Vec<ParameterRecord>,
    body: String,
    is_const: bool,
    is_static: bool,
    is_virtual: bool,
    is_pure_virtual: bool,
    is_constructor: bool,
    is_destructor: bool,
    is_noexcept: bool,
}

/// Reads declaration records from JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclarationFrontend;

impl Frontend for DeclarationFrontend {
    fn language(&self) -> &'static str {
        "cpp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    fn ingest(&self, source: &str) -> Result<Ir, IngestError> {
        let de = &mut serde_json::Deserializer::from_str(source);
        let unit: UnitRecord =
            serde_path_to_error::deserialize(de).map_err(|err| IngestError::Syntax {
                path: err.path().to_string(),
                message: err.into_inner().to_string(),
            })?;
        build(unit)
    }
}

/// Build the IR. Class names are registered before any spelling is mapped
/// so a field may name a class declared further down.
fn build(unit: UnitRecord) -> Result<Ir, IngestError> {
    let mut ir = Ir::new();

    let mut seen = HashSet::new();
    for (index, class) in unit.classes.iter().enumerate() {
        if class.name.is_empty() {
            return Err(IngestError::EmptyName {
                kind: "class",
                index,
            });
        }
        if !seen.insert(class.name.as_str()) {
            return Err(IngestError::DuplicateClass(class.name.clone()));
        }
        ir.register_type(&class.name, Type::aggregate(class.name.clone()));
    }

    let classes = unit
        .classes
        .into_iter()
        .map(|record| class_decl(&ir, record))
        .collect::<Result<Vec<_>, _>>()?;
    for class in classes {
        ir.add_class(class);
    }

    for (index, record) in unit.functions.into_iter().enumerate() {
        let function = function_decl(&ir, record, "function", index, None)?;
        ir.add_function(function);
    }
    for (index, record) in unit.globals.into_iter().enumerate() {
        let var = variable(&ir, record, "global", index)?;
        ir.add_global_variable(var);
    }

    tracing::debug!(
        classes = ir.classes().len(),
        functions = ir.functions().len(),
        globals = ir.globals().len(),
        "ingested unit"
    );
    Ok(ir)
}

/// Map a spelling and link it to the registry.
fn resolved(ir: &Ir, spelling: &str) -> Type {
    let mut ty = map_type(spelling);
    ir.resolve_type(&mut ty);
    ty
}

fn class_decl(ir: &Ir, record: ClassRecord) -> Result<ClassDecl, IngestError> {
    let mut class = ClassDecl::new(record.name);
    class.is_struct = record.is_struct;
    class.base_classes = record.bases;
    class.is_template = !record.template_params.is_empty();
    class.template_params = record.template_params;
    class.access_sections = record
        .access
        .into_iter()
        .map(|a| AccessSection {
            level: a.level,
            members: a.members,
        })
        .collect();

    for (index, field) in record.fields.into_iter().enumerate() {
        class.fields.push(variable(ir, field, "field", index)?);
    }
    for (index, method) in record.methods.into_iter().enumerate() {
        let method = function_decl(ir, method, "method", index, Some(&class.name))?;
        class.methods.push(method);
    }
    Ok(class)
}

fn variable(
    ir: &Ir,
    record: VariableRecord,
    kind: &'static str,
    index: usize,
) -> Result<Variable, IngestError> {
    if record.name.is_empty() {
        return Err(IngestError::EmptyName { kind, index });
    }
    let mut var = Variable::new(record.name, resolved(ir, &record.ty));
    var.is_static = record.is_static;
    var.is_const = record.is_const;
    var.initializer = record.initializer;
    Ok(var)
}

/// `owner` is the enclosing class for methods; a method named after it is
/// a constructor, one named `~Owner` a destructor.
fn function_decl(
    ir: &Ir,
    record: FunctionRecord,
    kind: &'static str,
    index: usize,
    owner: Option<&str>,
) -> Result<Function, IngestError> {
    if record.name.is_empty() {
        return Err(IngestError::EmptyName { kind, index });
    }
    let short = owner.map(|o| o.rsplit("::").next().unwrap_or(o));
    let is_constructor = record.is_constructor || short == Some(record.name.as_str());
    let is_destructor = record.is_destructor || record.name.starts_with('~');

    let mut function = Function::new(record.name).with_body(record.body);
    function.return_type = record
        .return_type
        .filter(|_| !is_constructor && !is_destructor)
        .map(|spelling| resolved(ir, &spelling));
    function.parameters = record
        .parameters
        .into_iter()
        .map(|p| {
            let mut param = Parameter::new(p.name, resolved(ir, &p.ty));
            param.default_value = p.default_value;
            param
        })
        .collect();
    function.is_const = record.is_const;
    function.is_static = record.is_static;
    function.is_virtual = record.is_virtual || record.is_pure_virtual;
    function.is_pure_virtual = record.is_pure_virtual;
    function.is_constructor = is_constructor;
    function.is_destructor = is_destructor;
    function.is_noexcept = record.is_noexcept;
    Ok(function)
}
