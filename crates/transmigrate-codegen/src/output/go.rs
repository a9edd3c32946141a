//! Go generator.
//!
//! Classes become structs with pointer-receiver methods, abstract classes
//! become interfaces, constructors become `New<Class>` functions and
//! destructors become `Close()`. Throwing functions return `error` as their
//! last result.

use super::common::{
    body_lines, disambiguate, embedded_bases, idiom_hints, implemented_interfaces,
    ownership_notes, placeholder_warnings, thread_safety,
};
use crate::naming::{base_name, camel_case, go_ident, pascal_case};
use crate::traits::{GenerateOptions, Generated, Generator};
use std::collections::BTreeSet;
use transmigrate_analysis::exception::ExceptionStrategy;
use transmigrate_analysis::{concurrency, render_with_diagnostics, select_strategy};
use transmigrate_ir::{ClassDecl, Diagnostic, Function, Ir, Target, Type, TypeKind, Variable};

/// Static instance of the Go generator for the registry.
pub static GO_GENERATOR: GoGenerator = GoGenerator;

/// Go generator implementing the Generator trait.
pub struct GoGenerator;

impl Generator for GoGenerator {
    fn target(&self) -> Target {
        Target::Go
    }

    fn language(&self) -> &'static str {
        "go"
    }

    fn extension(&self) -> &'static str {
        "go"
    }

    fn generate(&self, ir: &Ir, options: &GenerateOptions) -> Generated {
        GoWriter::emit(ir, options)
    }
}

/// Generate Go source for an analyzed IR.
pub fn generate_go(ir: &Ir, options: &GenerateOptions) -> Generated {
    GoWriter::emit(ir, options)
}

/// Emits an analyzed IR as Go source.
pub struct GoWriter<'a> {
    ir: &'a Ir,
    options: &'a GenerateOptions,
    output: String,
    indent: usize,
    diagnostics: Vec<Diagnostic>,
    imports: BTreeSet<&'static str>,
}

impl<'a> GoWriter<'a> {
    pub fn new(ir: &'a Ir, options: &'a GenerateOptions) -> Self {
        Self {
            ir,
            options,
            output: String::new(),
            indent: 0,
            diagnostics: Vec::new(),
            imports: BTreeSet::new(),
        }
    }

    pub fn emit(ir: &Ir, options: &GenerateOptions) -> Generated {
        let mut writer = GoWriter::new(ir, options);
        writer.write_decls();
        let code = writer.assemble();
        let tests = options.generate_tests.then(|| writer.test_skeleton());
        tracing::debug!(
            unit = %options.unit_name,
            bytes = code.len(),
            diagnostics = writer.diagnostics.len(),
            "generated go"
        );
        Generated {
            code,
            tests,
            diagnostics: writer.diagnostics,
        }
    }

    /// Header, package clause and imports in front of the declarations.
    fn assemble(&self) -> String {
        let checks = if self.options.safety_checks { "on" } else { "off" };
        let mut code = format!(
            "// Translated from `{}` by transmigrate.\n// opt-level {}, safety checks {checks}. Function bodies are stubs.\n\npackage {}\n\n",
            self.options.unit_name,
            self.options.opt_level,
            go_ident(&self.options.package)
        );
        match self.imports.len() {
            0 => {}
            1 => {
                for import in &self.imports {
                    code.push_str(&format!("import \"{import}\"\n\n"));
                }
            }
            _ => {
                code.push_str("import (\n");
                for import in &self.imports {
                    code.push_str(&format!("\t\"{import}\"\n"));
                }
                code.push_str(")\n\n");
            }
        }
        code.push_str(self.output.trim_end());
        code.push('\n');
        code
    }

    fn write_decls(&mut self) {
        let ir = self.ir;
        self.diagnostics.extend(placeholder_warnings(ir, Target::Go));

        for var in ir.globals() {
            let name = go_ident(&pascal_case(&var.name));
            self.write_global(var, &name, &var.name);
        }
        if !ir.globals().is_empty() {
            self.line("");
        }

        for class in ir.classes() {
            self.write_class(class);
        }

        let names = disambiguate(
            ir.functions().iter().map(|f| {
                if f.name == "main" {
                    "main".to_string()
                } else {
                    go_ident(&pascal_case(&f.name))
                }
            }),
            |name, n| format!("{name}{n}"),
        );
        for (function, name) in ir.functions().iter().zip(names) {
            let allow_error = function.name != "main";
            let params = self.params(function, &function.name);
            let value = self.value_type(function, &function.name);
            let results = self.results(function, value, &function.name, allow_error);
            self.line(&format!("func {name}({params}){results} {{"));
            self.write_body(function);
            self.line("}");
            self.line("");
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.write_indent();
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    fn ty(&mut self, ty: &Type, scope: &str) -> String {
        let mut found = Vec::new();
        let rendered = render_with_diagnostics(ty, Target::Go, &mut found);
        self.diagnostics
            .extend(found.into_iter().map(|d| d.within(scope)));
        ty.walk(&mut |node| {
            if let TypeKind::Sync(kind) = node.kind {
                self.imports.extend(concurrency::go_package(kind));
            }
        });
        rendered
    }

    fn write_global(&mut self, var: &Variable, name: &str, scope: &str) {
        let ty = self.ty(&var.ty, scope);
        match &var.initializer {
            Some(init) if var.is_const || var.ty.is_const => {
                self.line(&format!("const {name} {ty} = {init}"));
            }
            Some(init) => self.line(&format!("var {name} {ty} = {init}")),
            None => self.line(&format!("var {name} {ty}")),
        }
    }

    fn write_interface(&mut self, class: &ClassDecl) {
        let name = go_ident(base_name(&class.name));
        self.line(&format!("type {name} interface {{"));
        self.indent += 1;
        for method in class
            .methods
            .iter()
            .filter(|m| !m.is_constructor && !m.is_destructor)
        {
            let scope = format!("{}::{}", class.name, method.name);
            if !method.is_pure_virtual {
                self.diagnostics.push(Diagnostic::note(
                    &scope,
                    "default implementation dropped; Go interfaces carry no bodies",
                ));
            }
            let params = self.params(method, &scope);
            let value = self.value_type(method, &scope);
            let results = self.results(method, value, &scope, true);
            self.line(&format!(
                "{}({params}){results}",
                go_ident(&pascal_case(&method.name))
            ));
        }
        self.indent -= 1;
        self.line("}");
        self.line("");
    }

    fn write_class(&mut self, class: &ClassDecl) {
        if class.is_abstract() {
            self.write_interface(class);
            return;
        }

        let name = go_ident(base_name(&class.name));
        let (decl_params, use_params) = type_params(class);
        let self_ty = format!("{name}{use_params}");

        if let Some(summary) = thread_safety(class) {
            self.line(&format!("// {name} is thread-safe: {summary}."));
        }
        self.line(&format!("type {name}{decl_params} struct {{"));
        self.indent += 1;
        for base in embedded_bases(self.ir, class) {
            self.line(base_name(base));
        }
        let mut field_names = Vec::new();
        for field in class.fields.iter().filter(|f| !f.is_static) {
            let scope = format!("{}::{}", class.name, field.name);
            let ty = self.ty(&field.ty, &scope);
            let field_name = member_name(class, &field.name);
            self.line(&format!("{field_name} {ty}"));
            field_names.push(field_name);
        }
        self.indent -= 1;
        self.line("}");
        self.line("");

        let interfaces = implemented_interfaces(self.ir, class);
        if use_params.is_empty() && !interfaces.is_empty() {
            for (base, _) in &interfaces {
                self.line(&format!(
                    "var _ {} = (*{name})(nil)",
                    go_ident(base_name(&base.name))
                ));
            }
            self.line("");
        }
        let overridden: Vec<&str> = interfaces
            .iter()
            .flat_map(|(_, methods)| methods.iter().copied())
            .collect();

        let ctors: Vec<&Function> = class.constructors().collect();
        let ctor_names = disambiguate(ctors.iter().map(|_| format!("New{name}")), |n, i| {
            format!("{n}{i}")
        });
        for (ctor, fn_name) in ctors.into_iter().zip(ctor_names) {
            let scope = format!("{}::{}", class.name, ctor.name);
            let params = self.params(ctor, &scope);
            let results = self.results(ctor, Some(format!("*{self_ty}")), &scope, true);
            self.line(&format!("func {fn_name}{decl_params}({params}){results} {{"));
            self.write_body(ctor);
            self.line("}");
            self.line("");
        }

        let recv = receiver_name(&name);
        let methods: Vec<&Function> = class
            .methods
            .iter()
            .filter(|m| !m.is_constructor && !m.is_destructor)
            .collect();
        let mut method_names = Vec::new();
        for method in &methods {
            let scope = format!("{}::{}", class.name, method.name);
            let mut go_name = if method.is_static {
                format!("{name}{}", pascal_case(&method.name))
            } else if overridden.contains(&method.name.as_str()) {
                pascal_case(&method.name)
            } else {
                member_name(class, &method.name)
            };
            if !method.is_static && field_names.contains(&go_name) {
                let renamed = if class.is_public(&method.name) {
                    format!("Get{}", pascal_case(&method.name))
                } else {
                    format!("get{}", pascal_case(&method.name))
                };
                self.diagnostics.push(Diagnostic::note(
                    scope,
                    format!("method renamed to {renamed}; Go fields and methods share a namespace"),
                ));
                go_name = renamed;
            }
            method_names.push(go_ident(&go_name));
        }
        let method_names = disambiguate(method_names, |n, i| format!("{n}{i}"));
        for (method, fn_name) in methods.into_iter().zip(method_names) {
            let scope = format!("{}::{}", class.name, method.name);
            let header = if method.is_static {
                format!("func {fn_name}{decl_params}(")
            } else {
                format!("func ({recv} *{self_ty}) {fn_name}(")
            };
            self.write_method(method, &header, &scope);
        }

        for (base, methods) in &interfaces {
            for method_name in methods {
                if class.methods.iter().any(|m| m.name == *method_name) {
                    continue;
                }
                self.diagnostics.push(Diagnostic::note(
                    format!("{}::{method_name}", class.name),
                    format!("pure virtual method of {} is not overridden", base.name),
                ));
                if let Some(inherited) = base.methods.iter().find(|m| m.name == *method_name) {
                    let header =
                        format!("func ({recv} *{self_ty}) {}(", pascal_case(method_name));
                    self.write_method(inherited, &header, &format!("{}::{method_name}", base.name));
                }
            }
        }

        if let Some(dtor) = class.destructor() {
            let scope = format!("{}::{}", class.name, dtor.name);
            let header = format!("func ({recv} *{self_ty}) Close(");
            self.write_method(dtor, &header, &scope);
        }

        for field in class.fields.iter().filter(|f| f.is_static) {
            let global = format!("{name}{}", pascal_case(&field.name));
            self.write_global(field, &global, &format!("{}::{}", class.name, field.name));
        }
        if class.fields.iter().any(|f| f.is_static) {
            self.line("");
        }
    }

    /// `header` is everything up to the opening parenthesis of the
    /// parameter list.
    fn write_method(&mut self, method: &Function, header: &str, scope: &str) {
        let params = self.params(method, scope);
        let value = self.value_type(method, scope);
        let results = self.results(method, value, scope, true);
        self.line(&format!("{header}{params}){results} {{"));
        self.write_body(method);
        self.line("}");
        self.line("");
    }

    fn params(&mut self, function: &Function, scope: &str) -> String {
        let mut params = Vec::with_capacity(function.parameters.len());
        for (i, param) in function.parameters.iter().enumerate() {
            let name = if param.name.is_empty() {
                format!("arg{i}")
            } else {
                go_ident(&camel_case(&param.name))
            };
            let ty = self.ty(&param.ty, scope);
            params.push(format!("{name} {ty}"));
            if param.default_value.is_some() {
                self.diagnostics.push(Diagnostic::note(
                    scope,
                    format!("default value for `{}` dropped", param.name),
                ));
            }
        }
        params.join(", ")
    }

    fn value_type(&mut self, function: &Function, scope: &str) -> Option<String> {
        function
            .return_type
            .as_ref()
            .filter(|t| !t.is_void())
            .map(|t| self.ty(t, scope))
    }

    /// Result list, with a trailing `error` when the function can fail and
    /// the call site allows it.
    fn results(
        &mut self,
        function: &Function,
        value: Option<String>,
        scope: &str,
        allow_error: bool,
    ) -> String {
        let fails = select_strategy(function, Target::Go) == ExceptionStrategy::ErrorReturn;
        if fails && !allow_error {
            self.diagnostics.push(Diagnostic::note(
                scope,
                "cannot return an error; failures panic",
            ));
        }
        match (value, fails && allow_error) {
            (None, false) => String::new(),
            (Some(value), false) => format!(" {value}"),
            (None, true) => " error".to_string(),
            (Some(value), true) => format!(" ({value}, error)"),
        }
    }

    fn write_body(&mut self, function: &Function) {
        self.indent += 1;
        if self.options.preserve_comments {
            for line in body_lines(&function.body) {
                self.line(&format!("// {line}"));
            }
        }
        for param in &function.parameters {
            if let Some(default) = &param.default_value {
                self.line(&format!("// default: {} = {default}", param.name));
            }
        }
        for note in ownership_notes(function, Target::Go) {
            self.line(&format!("// {note}"));
        }
        for hint in idiom_hints(function, Target::Go) {
            self.line(&format!("// idiom: {hint}"));
        }
        self.line("panic(\"not implemented\")");
        self.indent -= 1;
    }

    fn test_skeleton(&self) -> String {
        let mut subjects: Vec<String> = self
            .ir
            .classes()
            .iter()
            .filter(|c| !c.is_abstract())
            .map(|c| pascal_case(base_name(&c.name)))
            .collect();
        subjects.extend(
            self.ir
                .functions()
                .iter()
                .filter(|f| f.name != "main")
                .map(|f| pascal_case(&f.name)),
        );

        let mut out = format!(
            "package {}\n\nimport \"testing\"\n",
            go_ident(&self.options.package)
        );
        for subject in disambiguate(subjects, |n, i| format!("{n}{i}")) {
            out.push_str(&format!(
                "\nfunc Test{subject}(t *testing.T) {{\n\tt.Skip(\"generated skeleton\")\n}}\n"
            ));
        }
        out
    }
}

/// Exported members are `PascalCase`, the rest `camelCase`.
fn member_name(class: &ClassDecl, member: &str) -> String {
    let name = if class.is_public(member) {
        pascal_case(member)
    } else {
        camel_case(member)
    };
    go_ident(&name)
}

fn receiver_name(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_else(|| "r".to_string())
}

/// `([T any, U any], [T, U])` for template classes, empty otherwise.
fn type_params(class: &ClassDecl) -> (String, String) {
    if class.template_params.is_empty() {
        return (String::new(), String::new());
    }
    let decl: Vec<String> = class
        .template_params
        .iter()
        .map(|p| format!("{p} any"))
        .collect();
    (
        format!("[{}]", decl.join(", ")),
        format!("[{}]", class.template_params.join(", ")),
    )
}
