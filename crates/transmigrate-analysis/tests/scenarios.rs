//! End-to-end analyzer scenarios over a small IR.

use pretty_assertions::assert_eq;
use transmigrate_analysis::concurrency::render_primitive;
use transmigrate_analysis::exception::ExceptionStrategy;
use transmigrate_analysis::{analyze, map_type, render_for_target, select_strategy};
use transmigrate_ir::{
    ClassDecl, ContainerKind, Function, Ir, MutexKind, SyncKind, Target, TypeKind, Variable,
};

fn ir_with(function: Function) -> Ir {
    let mut ir = Ir::new();
    ir.add_function(function);
    analyze(&mut ir);
    ir
}

#[test]
fn runtime_error_handler_selects_result_type() {
    let ir = ir_with(
        Function::new("f")
            .with_body("try { g(); } catch (const std::runtime_error& e) { h(); }"),
    );
    let f = &ir.functions()[0];
    assert_eq!(f.exception.try_catch_blocks.len(), 1);
    let clause = &f.exception.try_catch_blocks[0].catch_clauses[0];
    assert_eq!(clause.exception_type, "runtime_error");
    assert_eq!(clause.exception_var, "e");
    assert!(f.exception.may_throw);
    assert_eq!(select_strategy(f, Target::Rust), ExceptionStrategy::ResultType);
}

#[test]
fn shared_mutex_field_makes_class_thread_safe() {
    let mut ir = Ir::new();
    let mut class = ClassDecl::new("Registry");
    class
        .fields
        .push(Variable::new("guard", map_type("std::shared_mutex")));
    ir.add_class(class);
    analyze(&mut ir);

    let registry = &ir.classes()[0];
    assert!(registry.concurrency.thread_safe);
    assert_eq!(registry.concurrency.mutexes.len(), 1);
    assert_eq!(registry.concurrency.mutexes[0].kind, MutexKind::SharedMutex);

    let field = &registry.fields[0].ty;
    assert_eq!(render_for_target(field, Target::Rust), "std::sync::RwLock<()>");
    assert_eq!(render_for_target(field, Target::Go), "sync.RWMutex");
    assert_eq!(
        render_primitive(SyncKind::SharedMutex, None, Target::Go),
        "sync.RWMutex"
    );
}

#[test]
fn atomic_counter_collects_fetch_add() {
    let ir = ir_with(Function::new("tick").with_body("std::atomic<int> counter; counter.fetch_add(1);"));
    let atomics = &ir.functions()[0].concurrency.atomic_operations;
    assert_eq!(atomics.len(), 1);
    assert_eq!(atomics[0].atomic_var_name, "counter");
    assert_eq!(atomics[0].operations, vec!["fetch_add".to_string()]);
}

#[test]
fn nested_template_round_trip() {
    let ty = map_type("map<string, vector<pair<int,int>>>");
    assert_eq!(ty.kind, TypeKind::Container(ContainerKind::Map));
    assert_eq!(ty.depth(), 4);
    let pair = &ty.template_args[1].template_args[0];
    assert_eq!(pair.template_args.len(), 2);
    assert_eq!(
        render_for_target(&ty, Target::Rust),
        "std::collections::BTreeMap<String, Vec<(i32, i32)>>"
    );
}

#[test]
fn strategy_depends_only_on_profile_shape_and_target() {
    let throwing = ir_with(Function::new("a").with_body("throw Oops();"));
    let other = ir_with(Function::new("b").with_body("log(); throw std::logic_error(\"x\");"));
    for target in Target::ALL {
        assert_eq!(
            select_strategy(&throwing.functions()[0], target),
            select_strategy(&other.functions()[0], target)
        );
    }
    let quiet = ir_with(Function::new("c").with_body("return 1;"));
    assert_eq!(
        select_strategy(&quiet.functions()[0], Target::Go),
        ExceptionStrategy::Ignore
    );
}
