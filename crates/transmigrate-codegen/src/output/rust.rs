//! Rust generator.
//!
//! Classes become structs with inherent impls, abstract classes become
//! traits, destructors become `Drop`. Functions whose exception strategy is
//! [`ExceptionStrategy::ResultType`] return `Result<T, E>`.

use super::common::{
    body_lines, disambiguate, embedded_bases, idiom_hints, implemented_interfaces,
    ownership_notes, placeholder_warnings, thread_safety,
};
use crate::naming::{base_name, rust_ident, snake_case};
use crate::traits::{GenerateOptions, Generated, Generator};
use transmigrate_analysis::exception::{self, ExceptionStrategy};
use transmigrate_analysis::{render_field_type, render_with_diagnostics, select_strategy};
use transmigrate_ir::{ClassDecl, Diagnostic, Function, Ir, Target, Type, TypeKind, Variable};

/// Static instance of the Rust generator for the registry.
pub static RUST_GENERATOR: RustGenerator = RustGenerator;

/// Rust generator implementing the Generator trait.
pub struct RustGenerator;

impl Generator for RustGenerator {
    fn target(&self) -> Target {
        Target::Rust
    }

    fn language(&self) -> &'static str {
        "rust"
    }

    fn extension(&self) -> &'static str {
        "rs"
    }

    fn generate(&self, ir: &Ir, options: &GenerateOptions) -> Generated {
        RustWriter::emit(ir, options)
    }
}

/// Generate Rust source for an analyzed IR.
pub fn generate_rust(ir: &Ir, options: &GenerateOptions) -> Generated {
    RustWriter::emit(ir, options)
}

/// How a method takes `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Receiver {
    None,
    Shared,
    Exclusive,
}

impl Receiver {
    fn of(function: &Function) -> Self {
        if function.is_static {
            Receiver::None
        } else if function.is_const {
            Receiver::Shared
        } else {
            Receiver::Exclusive
        }
    }

    fn as_param(self) -> Option<&'static str> {
        match self {
            Receiver::None => None,
            Receiver::Shared => Some("&self"),
            Receiver::Exclusive => Some("&mut self"),
        }
    }
}

/// Emits an analyzed IR as Rust source.
pub struct RustWriter<'a> {
    ir: &'a Ir,
    options: &'a GenerateOptions,
    output: String,
    indent: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RustWriter<'a> {
    pub fn new(ir: &'a Ir, options: &'a GenerateOptions) -> Self {
        Self {
            ir,
            options,
            output: String::new(),
            indent: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn emit(ir: &Ir, options: &GenerateOptions) -> Generated {
        let mut writer = RustWriter::new(ir, options);
        writer.write_unit();
        tracing::debug!(
            unit = %options.unit_name,
            bytes = writer.output.len(),
            diagnostics = writer.diagnostics.len(),
            "generated rust"
        );
        Generated {
            code: writer.output,
            tests: None,
            diagnostics: writer.diagnostics,
        }
    }

    fn write_unit(&mut self) {
        let ir = self.ir;
        self.write_header();
        self.diagnostics.extend(placeholder_warnings(ir, Target::Rust));

        for var in ir.globals() {
            let name = snake_case(&var.name).to_uppercase();
            self.write_global(var, &name, &var.name);
        }
        if !ir.globals().is_empty() {
            self.line("");
        }

        for class in ir.classes() {
            self.write_class(class);
        }

        let names = disambiguate(
            ir.functions().iter().map(|f| snake_case(&f.name)),
            |name, n| format!("{name}_{n}"),
        );
        for (function, name) in ir.functions().iter().zip(names) {
            self.write_free_function(function, &name);
            self.line("");
        }

        if self.options.generate_tests {
            self.write_tests();
        }

        while self.output.ends_with("\n\n") {
            self.output.pop();
        }
    }

    fn write_header(&mut self) {
        let checks = if self.options.safety_checks { "on" } else { "off" };
        self.line(&format!(
            "//! Translated from `{}` by transmigrate.",
            self.options.unit_name
        ));
        self.line("//!");
        self.line(&format!(
            "//! opt-level {}, safety checks {checks}. Function bodies are stubs.",
            self.options.opt_level
        ));
        self.line("");
        self.line("#![allow(dead_code, unused_variables)]");
        self.line("");
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
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
        let rendered = render_with_diagnostics(ty, Target::Rust, &mut found);
        self.diagnostics
            .extend(found.into_iter().map(|d| d.within(scope)));
        rendered
    }

    fn field_ty(&mut self, ty: &Type, scope: &str) -> String {
        let mut found = Vec::new();
        let rendered = render_field_type(ty, Target::Rust, "a", &mut found);
        self.diagnostics
            .extend(found.into_iter().map(|d| d.within(scope)));
        rendered
    }

    fn write_global(&mut self, var: &Variable, name: &str, scope: &str) {
        let ty = self.ty(&var.ty, scope);
        let init = var.initializer.as_deref().unwrap_or("todo!()");
        if var.is_const || var.ty.is_const {
            self.line(&format!("pub const {name}: {ty} = {init};"));
        } else {
            self.diagnostics.push(Diagnostic::warning(
                scope,
                "mutable global becomes `static mut` and needs unsafe access",
            ));
            self.line(&format!("pub static mut {name}: {ty} = {init};"));
        }
    }

    fn write_class(&mut self, class: &ClassDecl) {
        if class.is_abstract() {
            self.write_trait(class);
            return;
        }

        let name = rust_ident(base_name(&class.name));
        let generics = self.generics(class);
        let self_ty = format!("{name}{generics}");

        if let Some(summary) = thread_safety(class) {
            self.line(&format!("/// Thread-safe: {summary}."));
        }
        self.line(&format!("pub struct {self_ty} {{"));
        self.indent += 1;
        for base in embedded_bases(self.ir, class) {
            let field = format!("base_{}", snake_case(base_name(base)));
            self.line(&format!("{field}: {base},"));
        }
        for field in class.fields.iter().filter(|f| !f.is_static) {
            let scope = format!("{}::{}", class.name, field.name);
            let ty = self.field_ty(&field.ty, &scope);
            let vis = if class.is_public(&field.name) { "pub " } else { "" };
            let ident = rust_ident(&snake_case(&field.name));
            self.line(&format!("{vis}{ident}: {ty},"));
        }
        self.indent -= 1;
        self.line("}");
        self.line("");

        let interfaces = implemented_interfaces(self.ir, class);
        let overridden: Vec<&str> = interfaces
            .iter()
            .flat_map(|(_, methods)| methods.iter().copied())
            .collect();

        let inherent: Vec<&Function> = class
            .methods
            .iter()
            .filter(|m| !m.is_destructor && !overridden.contains(&m.name.as_str()))
            .collect();
        if !inherent.is_empty() {
            let names = disambiguate(
                inherent.iter().map(|m| {
                    if m.is_constructor {
                        "new".to_string()
                    } else {
                        snake_case(&m.name)
                    }
                }),
                |name, n| format!("{name}_{n}"),
            );
            self.line(&format!("impl{generics} {self_ty} {{"));
            self.indent += 1;
            for (i, (method, fn_name)) in inherent.iter().zip(names).enumerate() {
                if i > 0 {
                    self.line("");
                }
                let vis = if class.is_public(&method.name) { "pub " } else { "" };
                self.write_method(class, method, &fn_name, vis);
            }
            self.indent -= 1;
            self.line("}");
            self.line("");
        }

        for (base, methods) in &interfaces {
            let trait_name = rust_ident(base_name(&base.name));
            self.line(&format!("impl{generics} {trait_name} for {self_ty} {{"));
            self.indent += 1;
            for (i, method_name) in methods.iter().enumerate() {
                if i > 0 {
                    self.line("");
                }
                let fn_name = snake_case(method_name);
                match class.methods.iter().find(|m| m.name == *method_name) {
                    Some(method) => self.write_method(class, method, &fn_name, ""),
                    None => {
                        self.diagnostics.push(Diagnostic::note(
                            format!("{}::{method_name}", class.name),
                            format!("pure virtual method of {} is not overridden", base.name),
                        ));
                        if let Some(inherited) = base.methods.iter().find(|m| m.name == *method_name) {
                            self.write_method(base, inherited, &fn_name, "");
                        }
                    }
                }
            }
            self.indent -= 1;
            self.line("}");
            self.line("");
        }

        if let Some(dtor) = class.destructor() {
            self.write_drop(class, dtor, &generics, &self_ty);
        }

        let prefix = snake_case(base_name(&class.name)).to_uppercase();
        let statics: Vec<&Variable> = class.fields.iter().filter(|f| f.is_static).collect();
        for field in &statics {
            let name = format!("{prefix}_{}", snake_case(&field.name).to_uppercase());
            self.write_global(field, &name, &format!("{}::{}", class.name, field.name));
        }
        if !statics.is_empty() {
            self.line("");
        }
    }

    /// `<'a, T>` when the struct needs a lifetime or template parameters.
    fn generics(&self, class: &ClassDecl) -> String {
        let mut params: Vec<String> = Vec::new();
        if class
            .fields
            .iter()
            .any(|f| !f.is_static && contains_reference(&f.ty))
        {
            params.push("'a".to_string());
        }
        params.extend(class.template_params.iter().cloned());
        if params.is_empty() {
            String::new()
        } else {
            format!("<{}>", params.join(", "))
        }
    }

    fn write_trait(&mut self, class: &ClassDecl) {
        let name = rust_ident(base_name(&class.name));
        self.line(&format!("pub trait {name} {{"));
        self.indent += 1;
        let methods: Vec<&Function> = class
            .methods
            .iter()
            .filter(|m| !m.is_constructor && !m.is_destructor)
            .collect();
        for (i, method) in methods.iter().enumerate() {
            if i > 0 && !method.is_pure_virtual {
                self.line("");
            }
            let scope = format!("{}::{}", class.name, method.name);
            let signature = self.signature(method, &snake_case(&method.name), &scope);
            if method.is_pure_virtual {
                self.line(&format!("{signature};"));
            } else {
                self.line(&format!("{signature} {{"));
                self.write_body(method);
                self.line("}");
            }
        }
        self.indent -= 1;
        self.line("}");
        self.line("");
    }

    fn write_method(&mut self, class: &ClassDecl, method: &Function, fn_name: &str, vis: &str) {
        let scope = format!("{}::{}", class.name, method.name);
        let signature = self.signature(method, fn_name, &scope);
        self.line(&format!("{vis}{signature} {{"));
        self.write_body(method);
        self.line("}");
    }

    fn write_free_function(&mut self, function: &Function, fn_name: &str) {
        let signature = self.signature(function, fn_name, &function.name);
        let vis = if function.name == "main" { "" } else { "pub " };
        self.line(&format!("{vis}{signature} {{"));
        self.write_body(function);
        self.line("}");
    }

    fn write_drop(&mut self, class: &ClassDecl, dtor: &Function, generics: &str, self_ty: &str) {
        self.line(&format!("impl{generics} Drop for {self_ty} {{"));
        self.indent += 1;
        self.line("fn drop(&mut self) {");
        self.indent += 1;
        if select_strategy(dtor, Target::Rust) != ExceptionStrategy::Ignore {
            self.diagnostics.push(Diagnostic::warning(
                format!("{}::{}", class.name, dtor.name),
                "destructor may throw; Drop cannot return errors, so failures panic",
            ));
            self.line(&format!(
                "// strategy: {:?}, errors here must panic",
                ExceptionStrategy::Panic
            ));
        }
        self.write_body_comments(dtor);
        self.indent -= 1;
        self.line("}");
        self.indent -= 1;
        self.line("}");
        self.line("");
    }

    fn signature(&mut self, function: &Function, fn_name: &str, scope: &str) -> String {
        let mut params: Vec<String> = Vec::new();
        if !function.is_constructor {
            params.extend(Receiver::of(function).as_param().map(String::from));
        }
        for (i, param) in function.parameters.iter().enumerate() {
            let name = if param.name.is_empty() {
                format!("arg{i}")
            } else {
                rust_ident(&snake_case(&param.name))
            };
            let ty = self.ty(&param.ty, scope);
            params.push(format!("{name}: {ty}"));
            if param.default_value.is_some() {
                self.diagnostics.push(Diagnostic::note(
                    scope,
                    format!("default value for `{}` dropped", param.name),
                ));
            }
        }

        let ret = if function.is_constructor {
            Some("Self".to_string())
        } else {
            function
                .return_type
                .as_ref()
                .filter(|t| !t.is_void())
                .map(|t| self.ty(t, scope))
        };
        let ret = match select_strategy(function, Target::Rust) {
            ExceptionStrategy::ResultType => {
                let error = exception::error_type_for(&function.exception, Target::Rust);
                Some(format!("Result<{}, {error}>", ret.as_deref().unwrap_or("()")))
            }
            _ => ret,
        };

        let mut signature = format!("fn {fn_name}({})", params.join(", "));
        if let Some(ret) = ret {
            signature.push_str(" -> ");
            signature.push_str(&ret);
        }
        signature
    }

    fn write_body(&mut self, function: &Function) {
        self.indent += 1;
        self.write_body_comments(function);
        self.line("todo!()");
        self.indent -= 1;
    }

    fn write_body_comments(&mut self, function: &Function) {
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
        for note in ownership_notes(function, Target::Rust) {
            self.line(&format!("// {note}"));
        }
        for hint in idiom_hints(function, Target::Rust) {
            self.line(&format!("// idiom: {hint}"));
        }
    }

    fn write_tests(&mut self) {
        let mut subjects: Vec<String> = self
            .ir
            .classes()
            .iter()
            .filter(|c| !c.is_abstract())
            .map(|c| snake_case(base_name(&c.name)))
            .collect();
        subjects.extend(
            self.ir
                .functions()
                .iter()
                .filter(|f| f.name != "main")
                .map(|f| snake_case(&f.name)),
        );
        let subjects = disambiguate(subjects, |name, n| format!("{name}_{n}"));

        self.line("#[cfg(test)]");
        self.line("mod tests {");
        self.indent += 1;
        self.line("use super::*;");
        for subject in subjects {
            self.line("");
            self.line("#[test]");
            self.line("#[ignore = \"generated skeleton\"]");
            self.line(&format!("fn test_{subject}() {{"));
            self.indent += 1;
            self.line("todo!()");
            self.indent -= 1;
            self.line("}");
        }
        self.indent -= 1;
        self.line("}");
    }
}

/// Whether a field type needs a named lifetime on its struct.
fn contains_reference(ty: &Type) -> bool {
    ty.kind == TypeKind::Reference
        || ty.element().is_some_and(contains_reference)
        || ty.template_args.iter().any(contains_reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use transmigrate_analysis::{analyze, map_type};
    use transmigrate_ir::{AccessLevel, AccessSection, Parameter};

    fn point() -> ClassDecl {
        let mut class = ClassDecl::new("Point");
        class.fields.push(Variable::new("x", map_type("int")));
        class.fields.push(Variable::new("y", map_type("int")));

        let mut ctor = Function::new("Point")
            .with_param(Parameter::new("x", map_type("int")))
            .with_param(Parameter::new("y", map_type("int")));
        ctor.is_constructor = true;
        class.methods.push(ctor);

        let mut get_x = Function::new("getX")
            .with_return(map_type("int"))
            .with_body("return x;");
        get_x.is_const = true;
        class.methods.push(get_x);

        class.methods.push(
            Function::new("translate")
                .with_param(Parameter::new("dx", map_type("int")))
                .with_body("x += dx;"),
        );
        class.access_sections.push(AccessSection {
            level: AccessLevel::Public,
            members: vec!["Point".into(), "getX".into(), "translate".into()],
        });
        class
    }

    fn generate(ir: &mut Ir) -> Generated {
        analyze(ir);
        generate_rust(ir, &GenerateOptions::default())
    }

    #[test]
    fn test_struct_and_impl() {
        let mut ir = Ir::new();
        ir.add_class(point());
        let out = generate(&mut ir);
        let code = &out.code;

        assert!(code.contains("pub struct Point {\n    x: i32,\n    y: i32,\n}"), "{code}");
        assert!(code.contains("impl Point {"));
        assert!(code.contains("    pub fn new(x: i32, y: i32) -> Self {"));
        assert!(code.contains("    pub fn get_x(&self) -> i32 {\n        // return x;"));
        assert!(code.contains("    pub fn translate(&mut self, dx: i32) {"));
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    }

    #[test]
    fn test_result_return_for_throwing_method() {
        let mut ir = Ir::new();
        ir.add_function(
            Function::new("parse")
                .with_param(Parameter::new("text", map_type("const std::string&")))
                .with_return(map_type("int"))
                .with_body("if (text.empty()) throw ParseError(\"empty\");"),
        );
        ir.add_function(
            Function::new("load")
                .with_body("try { read(); } catch (const std::ios_base::failure& e) { }"),
        );
        let code = generate(&mut ir).code;
        assert!(code.contains("pub fn parse(text: &String) -> Result<i32, String> {"), "{code}");
        assert!(code.contains("pub fn load() -> Result<(), Box<dyn std::error::Error>> {"));
        assert!(code.contains("// idiom: handles ios_base::failure: I/O error"));
    }

    #[test]
    fn test_abstract_class_becomes_trait() {
        let mut ir = Ir::new();
        let mut shape = ClassDecl::new("Shape");
        let mut area = Function::new("area").with_return(map_type("double"));
        area.is_virtual = true;
        area.is_pure_virtual = true;
        area.is_const = true;
        shape.methods.push(area);
        ir.add_class(shape);

        let mut circle = ClassDecl::new("Circle");
        circle.base_classes.push("Shape".into());
        circle.fields.push(Variable::new("r", map_type("double")));
        let mut area = Function::new("area")
            .with_return(map_type("double"))
            .with_body("return 3.14 * r * r;");
        area.is_virtual = true;
        area.is_const = true;
        circle.methods.push(area);
        ir.add_class(circle);

        let code = generate(&mut ir).code;
        assert!(code.contains("pub trait Shape {\n    fn area(&self) -> f64;\n}"), "{code}");
        assert!(code.contains("impl Shape for Circle {\n    fn area(&self) -> f64 {"));
        assert!(!code.contains("impl Circle {"));
    }

    #[test]
    fn test_reference_field_adds_lifetime() {
        let mut ir = Ir::new();
        let mut view = ClassDecl::new("View");
        view.is_struct = true;
        view.fields
            .push(Variable::new("data", map_type("const std::vector<int>&")));
        ir.add_class(view);
        let code = generate(&mut ir).code;
        assert!(code.contains("pub struct View<'a> {\n    pub data: &'a Vec<i32>,\n}"), "{code}");
    }

    #[test]
    fn test_throwing_destructor_panics() {
        let mut ir = Ir::new();
        let mut file = ClassDecl::new("File");
        file.fields.push(Variable::new("fd", map_type("int")));
        let mut dtor = Function::new("~File").with_body("if (close(fd) < 0) throw IoError();");
        dtor.is_destructor = true;
        file.methods.push(dtor);
        ir.add_class(file);

        let out = generate(&mut ir);
        assert!(out.code.contains("impl Drop for File {\n    fn drop(&mut self) {"));
        assert!(out.code.contains("errors here must panic"));
        assert!(
            out.diagnostics
                .iter()
                .any(|d| d.subject == "File::~File" && d.message.contains("panic"))
        );
    }

    #[test]
    fn test_overloads_and_globals() {
        let mut ir = Ir::new();
        let mut limit = Variable::new("maxItems", map_type("int"));
        limit.is_const = true;
        limit.initializer = Some("64".into());
        ir.add_global_variable(limit);
        ir.add_global_variable(Variable::new("counter", map_type("long")));
        ir.add_function(Function::new("area").with_param(Parameter::new("r", map_type("double"))));
        ir.add_function(
            Function::new("area")
                .with_param(Parameter::new("w", map_type("double")))
                .with_param(Parameter::new("h", map_type("double"))),
        );

        let out = generate(&mut ir);
        assert!(out.code.contains("pub const MAX_ITEMS: i32 = 64;"));
        assert!(out.code.contains("pub static mut COUNTER: i64 = todo!();"));
        assert!(out.code.contains("pub fn area(r: f64) {"));
        assert!(out.code.contains("pub fn area_2(w: f64, h: f64) {"));
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn test_skeleton_tests_and_no_comments() {
        let mut ir = Ir::new();
        ir.add_class(point());
        ir.add_function(Function::new("main").with_body("return 0;"));
        analyze(&mut ir);
        let options = GenerateOptions {
            generate_tests: true,
            preserve_comments: false,
            ..GenerateOptions::default()
        };
        let out = generate_rust(&ir, &options);
        assert!(out.code.contains("fn main() {\n    todo!()\n}"));
        assert!(out.code.contains("#[cfg(test)]\nmod tests {"));
        assert!(out.code.contains("    fn test_point() {"));
        assert!(!out.code.contains("test_main"));
        assert!(!out.code.contains("// return x;"));
        assert!(out.tests.is_none());
    }

    #[test]
    fn test_operator_overload_gets_placeholder() {
        let mut ir = Ir::new();
        let mut vec2 = ClassDecl::new("Vec2");
        vec2.is_struct = true;
        vec2.methods.push(
            Function::new("operator+=")
                .with_param(Parameter::new("other", map_type("const Vec2&"))),
        );
        ir.add_class(vec2);
        let out = generate(&mut ir);
        assert!(
            out.code.contains("fn operator_add_assign(&mut self, other: &Vec2) {"),
            "{}",
            out.code
        );
        assert!(out.diagnostics.iter().any(|d| d.subject == "Vec2::operator+="
            && d.message == "`operator+=` has no rust spelling; emitted as `operator_add_assign`"));
    }

    #[test]
    fn test_header() {
        let out = generate_rust(&Ir::new(), &GenerateOptions::default());
        insta::assert_snapshot!(
            out.code.lines().next().unwrap_or_default(),
            @"//! Translated from `input` by transmigrate."
        );
    }
}
