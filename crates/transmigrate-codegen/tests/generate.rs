//! End-to-end generation through the registry.

use transmigrate_analysis::{analyze, map_type};
use transmigrate_codegen::{GenerateOptions, Generated, generator_for_target, generators};
use transmigrate_ir::{
    AccessLevel, AccessSection, ClassDecl, Function, Ir, Parameter, Severity, Target, Variable,
};

/// A worker pool: a mutex-guarded queue, an atomic counter and a method that
/// spawns a thread.
fn pool() -> Ir {
    let mut ir = Ir::new();
    let mut pool = ClassDecl::new("WorkerPool");
    pool.fields
        .push(Variable::new("queue", map_type("std::deque<std::function<void()>>")));
    pool.fields.push(Variable::new("lock", map_type("std::mutex")));
    pool.fields
        .push(Variable::new("done", map_type("std::atomic<unsigned long>")));

    let mut ctor = Function::new("WorkerPool")
        .with_param(Parameter::new("threads", map_type("std::size_t")));
    ctor.is_constructor = true;
    pool.methods.push(ctor);

    pool.methods.push(
        Function::new("submit")
            .with_param(Parameter::new("job", map_type("std::function<void()>")))
            .with_body(
                "std::lock_guard<std::mutex> guard(lock);\n\
                 if (queue.size() > 1024) throw std::overflow_error(\"full\");\n\
                 queue.push_back(job);",
            ),
    );
    pool.methods.push(
        Function::new("start").with_body("std::thread t(&WorkerPool::run, this); t.detach();"),
    );
    pool.access_sections.push(AccessSection {
        level: AccessLevel::Public,
        members: vec!["WorkerPool".into(), "submit".into(), "start".into()],
    });
    ir.add_class(pool);
    analyze(&mut ir);
    ir
}

fn generate(ir: &Ir, target: Target) -> Generated {
    generator_for_target(target)
        .unwrap()
        .generate(ir, &GenerateOptions::default())
}

#[test]
fn test_builtin_generators_registered() {
    let languages: Vec<_> = generators().iter().map(|g| g.language()).collect();
    assert!(languages.contains(&"rust"));
    assert!(languages.contains(&"go"));
}

#[test]
fn test_worker_pool_rust() {
    let ir = pool();
    assert!(ir.classes()[0].concurrency.thread_safe);

    let out = generate(&ir, Target::Rust);
    let code = &out.code;
    assert!(code.contains(
        "/// Thread-safe: guarded by `lock` (mutex); atomic `done`.\npub struct WorkerPool {"
    ), "{code}");
    assert!(code.contains("    queue: std::collections::VecDeque<Box<dyn Fn()>>,"));
    assert!(code.contains("    lock: std::sync::Mutex<()>,"));
    assert!(code.contains("    done: std::sync::atomic::AtomicU64,"));
    assert!(code.contains("    pub fn new(threads: usize) -> Self {"));
    assert!(code.contains(
        "    pub fn submit(&mut self, job: Box<dyn Fn()>) -> Result<(), Box<dyn std::error::Error>> {"
    ));
    assert!(code.contains("        // idiom: let guard = lock.lock().unwrap();"));
    assert!(code.contains("        // idiom: raises overflow_error: Overflow error"));
    assert!(code.contains("    pub fn start(&mut self) {"));
}

#[test]
fn test_worker_pool_go() {
    let ir = pool();
    let out = generate(&ir, Target::Go);
    let code = &out.code;
    assert!(code.contains("import (\n\t\"sync\"\n\t\"sync/atomic\"\n)"), "{code}");
    assert!(code.contains("type WorkerPool struct {\n\tqueue []func()\n\tlock sync.Mutex\n\tdone atomic.Uint64\n}"));
    assert!(code.contains("func NewWorkerPool(threads uint) *WorkerPool {"));
    assert!(code.contains("func (w *WorkerPool) Submit(job func()) error {"));
    assert!(code.contains("\t// idiom: lock.Lock(); defer lock.Unlock()"));
    assert!(code.contains("func (w *WorkerPool) Start() {"));
    assert!(code.contains(
        "// WorkerPool is thread-safe: guarded by `lock` (mutex); atomic `done`.\ntype WorkerPool struct {"
    ));
}

#[test]
fn test_unmapped_constructs_reported_not_fatal() {
    let mut ir = Ir::new();
    let mut registry = ClassDecl::new("Registry");
    registry.is_struct = true;
    registry
        .fields
        .push(Variable::new("guard", map_type("std::recursive_mutex")));
    registry
        .fields
        .push(Variable::new("raw", map_type("char*")));
    ir.add_class(registry);
    analyze(&mut ir);

    let rust = generate(&ir, Target::Rust);
    assert!(rust.code.contains("pub raw: *mut i8,"), "{}", rust.code);
    assert!(
        rust.diagnostics
            .iter()
            .any(|d| d.subject.starts_with("Registry::raw") && d.severity == Severity::Warning)
    );

    let go = generate(&ir, Target::Go);
    assert!(go.code.contains("type Registry struct {"));
    assert!(
        go.diagnostics
            .iter()
            .any(|d| d.subject.starts_with("Registry::guard") && d.severity == Severity::Warning)
    );
}

#[test]
fn test_generation_is_deterministic() {
    let ir = pool();
    for target in Target::ALL {
        assert_eq!(generate(&ir, target), generate(&ir, target));
    }
}
