//! Threading, locking, atomic and condition-variable idioms.
//!
//! Detection is lexical: names are matched textually and scopes are not
//! resolved, so two same-named variables in nested blocks are treated as
//! one. Each scan is a pure function of the body text.

use crate::mapper::{lookup_primitive, map_type, render_for_target};
use crate::scan::{balanced_group, split_top_level};
use regex::Regex;
use std::sync::LazyLock;
use transmigrate_ir::{
    AtomicInfo, ClassConcurrency, ClassDecl, ConditionVariableInfo, FunctionConcurrency,
    LockInfo, LockKind, MutexInfo, MutexKind, SyncKind, Target, ThreadInfo, Type, TypeKind,
};

static THREAD_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bstd::thread\s+(\w+)\s*([({])").expect("valid thread regex")
});

static THREAD_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:auto|std::thread)\s+(\w+)\s*=\s*std::thread\s*([({])")
        .expect("valid thread assignment regex")
});

static DETACH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\w+)\s*(?:\.|->)\s*detach\s*\(\s*\)").expect("valid detach regex")
});

static LOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:std::)?(lock_guard|scoped_lock|unique_lock|shared_lock)\s*(?:<[^>]*>)?\s+(\w+)\s*[({]\s*(?:this\s*->\s*)?(\w+)",
    )
    .expect("valid lock regex")
});

static ATOMIC_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bstd::atomic\s*<([^>]+)>\s+(\w+)").expect("valid atomic regex")
});

static ATOMIC_OP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\w+)\s*(?:\.|->)\s*(load|store|fetch_add|fetch_sub|exchange|compare_exchange_weak|compare_exchange_strong)\s*\(",
    )
    .expect("valid atomic operation regex")
});

static CONDVAR_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bstd::condition_variable(?:_any)?\s+(\w+)").expect("valid condvar regex")
});

static CONDVAR_OP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\w+)\s*(?:\.|->)\s*(wait_for|wait_until|wait|notify_one|notify_all)\s*\(")
        .expect("valid condvar operation regex")
});

/// Scan one function body.
pub fn analyze_body(body: &str) -> FunctionConcurrency {
    let threads_created = detect_threads(body);
    let lock_scopes = detect_locks(body);
    let atomic_operations = detect_atomics(body);
    let condition_variables = detect_condition_variables(body);
    let uses_threading = !threads_created.is_empty()
        || !lock_scopes.is_empty()
        || !atomic_operations.is_empty()
        || !condition_variables.is_empty();
    FunctionConcurrency {
        threads_created,
        lock_scopes,
        atomic_operations,
        condition_variables,
        uses_threading,
    }
}

fn detect_threads(body: &str) -> Vec<ThreadInfo> {
    let mut found: Vec<(usize, ThreadInfo)> = Vec::new();
    for regex in [&*THREAD_DECL, &*THREAD_ASSIGN] {
        for caps in regex.captures_iter(body) {
            let (Some(whole), Some(var), Some(open)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let Some((inner, _)) = balanced_group(body, open.start()) else {
                continue;
            };
            let mut parts = split_top_level(inner).into_iter();
            // `std::thread t{}` default-constructs; nothing is started.
            let Some(function_name) = parts.next() else {
                continue;
            };
            found.push((
                whole.start(),
                ThreadInfo {
                    thread_var_name: var.as_str().to_string(),
                    function_name,
                    arguments: parts.collect(),
                    detached: false,
                    joinable: true,
                },
            ));
        }
    }
    found.sort_by_key(|(offset, _)| *offset);

    for caps in DETACH.captures_iter(body) {
        let (Some(whole), Some(var)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some((_, thread)) = found
            .iter_mut()
            .rev()
            .find(|(offset, t)| *offset < whole.start() && t.thread_var_name == var.as_str())
        {
            thread.detached = true;
            thread.joinable = false;
        }
    }

    found.into_iter().map(|(_, t)| t).collect()
}

fn detect_locks(body: &str) -> Vec<LockInfo> {
    LOCK.captures_iter(body)
        .map(|caps| {
            let kind = match &caps[1] {
                "unique_lock" => LockKind::UniqueLock,
                "shared_lock" => LockKind::SharedLock,
                _ => LockKind::LockGuard,
            };
            LockInfo {
                kind,
                lock_var_name: caps[2].to_string(),
                mutex_name: caps[3].to_string(),
            }
        })
        .collect()
}

fn detect_atomics(body: &str) -> Vec<AtomicInfo> {
    let mut atomics: Vec<AtomicInfo> = ATOMIC_DECL
        .captures_iter(body)
        .map(|caps| AtomicInfo {
            atomic_var_name: caps[2].to_string(),
            value_type: Some(map_type(&caps[1])),
            operations: Vec::new(),
        })
        .collect();

    for caps in ATOMIC_OP.captures_iter(body) {
        let name = &caps[1];
        let op = caps[2].to_string();
        match atomics.iter_mut().find(|a| a.atomic_var_name == name) {
            Some(atomic) => atomic.operations.push(op),
            // Not declared in this body: a member.
            None => atomics.push(AtomicInfo {
                atomic_var_name: name.to_string(),
                value_type: None,
                operations: vec![op],
            }),
        }
    }
    atomics
}

fn detect_condition_variables(body: &str) -> Vec<ConditionVariableInfo> {
    let mut cvs: Vec<ConditionVariableInfo> = CONDVAR_DECL
        .captures_iter(body)
        .map(|caps| ConditionVariableInfo {
            cv_var_name: caps[1].to_string(),
            wait_conditions: Vec::new(),
        })
        .collect();

    for caps in CONDVAR_OP.captures_iter(body) {
        let name = &caps[1];
        let op = caps[2].to_string();
        match cvs.iter_mut().find(|cv| cv.cv_var_name == name) {
            Some(cv) => cv.wait_conditions.push(op),
            None => cvs.push(ConditionVariableInfo {
                cv_var_name: name.to_string(),
                wait_conditions: vec![op],
            }),
        }
    }
    cvs
}

/// Class-level profile from already mapped field types.
pub fn analyze_class(class: &ClassDecl) -> ClassConcurrency {
    let mut profile = ClassConcurrency::default();
    for field in &class.fields {
        let kind = match field.ty.kind {
            TypeKind::Sync(SyncKind::Mutex) => Some(MutexKind::Mutex),
            TypeKind::Sync(SyncKind::RecursiveMutex) => Some(MutexKind::RecursiveMutex),
            TypeKind::Sync(SyncKind::SharedMutex) => Some(MutexKind::SharedMutex),
            TypeKind::Sync(SyncKind::Atomic) => {
                profile.atomic_fields.push(AtomicInfo {
                    atomic_var_name: field.name.clone(),
                    value_type: field.ty.element().cloned(),
                    operations: Vec::new(),
                });
                None
            }
            _ => None,
        };
        if let Some(kind) = kind {
            profile.mutexes.push(MutexInfo {
                kind,
                mutex_var_name: field.name.clone(),
            });
        }
    }
    profile.thread_safe = !profile.mutexes.is_empty() || !profile.atomic_fields.is_empty();
    profile
}

/// Target type for a synchronization primitive. `value` is the atomic's
/// value type.
pub fn render_primitive(kind: SyncKind, value: Option<&Type>, target: Target) -> String {
    match (target, kind) {
        (Target::Rust, SyncKind::Thread) => "std::thread::JoinHandle<()>".into(),
        (Target::Rust, SyncKind::Mutex) => "std::sync::Mutex<()>".into(),
        (Target::Rust, SyncKind::RecursiveMutex) => "parking_lot::ReentrantMutex<()>".into(),
        (Target::Rust, SyncKind::SharedMutex) => "std::sync::RwLock<()>".into(),
        (Target::Rust, SyncKind::ConditionVariable) => "std::sync::Condvar".into(),
        (Target::Rust, SyncKind::Atomic) => format!("std::sync::atomic::{}", rust_atomic(value)),
        (Target::Rust, SyncKind::LockGuard | SyncKind::UniqueLock) => {
            "std::sync::MutexGuard<'_, ()>".into()
        }
        (Target::Rust, SyncKind::SharedLock) => "std::sync::RwLockReadGuard<'_, ()>".into(),

        (Target::Go, SyncKind::Thread) => "chan struct{}".into(),
        (Target::Go, SyncKind::Mutex | SyncKind::RecursiveMutex) => "sync.Mutex".into(),
        (Target::Go, SyncKind::SharedMutex) => "sync.RWMutex".into(),
        (Target::Go, SyncKind::ConditionVariable) => "*sync.Cond".into(),
        (Target::Go, SyncKind::Atomic) => go_atomic(value),
        (Target::Go, SyncKind::LockGuard | SyncKind::UniqueLock | SyncKind::SharedLock) => {
            "func()".into()
        }
    }
}

/// Go package the rendering of `kind` comes from.
pub fn go_package(kind: SyncKind) -> Option<&'static str> {
    match kind {
        SyncKind::Atomic => Some("sync/atomic"),
        SyncKind::Mutex
        | SyncKind::RecursiveMutex
        | SyncKind::SharedMutex
        | SyncKind::ConditionVariable => Some("sync"),
        SyncKind::Thread | SyncKind::LockGuard | SyncKind::UniqueLock | SyncKind::SharedLock => {
            None
        }
    }
}

/// Why `kind` has no faithful rendering in `target`, if it has none.
pub fn unmapped_reason(kind: SyncKind, target: Target) -> Option<&'static str> {
    match (target, kind) {
        (Target::Go, SyncKind::RecursiveMutex) => {
            Some("go has no recursive mutex; re-entrant locking will deadlock")
        }
        (Target::Go, SyncKind::LockGuard | SyncKind::UniqueLock | SyncKind::SharedLock) => {
            Some("scoped lock guards have no go type; use Lock() with defer Unlock()")
        }
        (Target::Rust, SyncKind::RecursiveMutex) => {
            Some("recursive mutex maps to parking_lot::ReentrantMutex (extra dependency)")
        }
        _ => None,
    }
}

fn rust_atomic(value: Option<&Type>) -> String {
    let Some(value) = value else {
        return "AtomicUsize".into();
    };
    match value.kind {
        TypeKind::Bool => "AtomicBool".into(),
        TypeKind::Pointer => {
            let pointee = value
                .element()
                .map(|t| render_for_target(t, Target::Rust))
                .unwrap_or_else(|| "()".into());
            format!("AtomicPtr<{pointee}>")
        }
        TypeKind::Integer => match lookup_primitive(&value.name).map(|p| p.rust) {
            Some(name @ ("i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64")) => {
                format!("Atomic{}", name.to_ascii_uppercase())
            }
            Some("isize") => "AtomicIsize".into(),
            _ => "AtomicUsize".into(),
        },
        _ => "AtomicUsize".into(),
    }
}

fn go_atomic(value: Option<&Type>) -> String {
    let Some(value) = value else {
        return "atomic.Uintptr".into();
    };
    match value.kind {
        TypeKind::Bool => "atomic.Bool".into(),
        TypeKind::Pointer => {
            let pointee = value
                .element()
                .map(|t| render_for_target(t, Target::Go))
                .unwrap_or_else(|| "any".into());
            format!("atomic.Pointer[{pointee}]")
        }
        TypeKind::Integer => match lookup_primitive(&value.name).map(|p| p.go) {
            Some("int32") => "atomic.Int32".into(),
            Some("int64") => "atomic.Int64".into(),
            Some("uint32") => "atomic.Uint32".into(),
            Some("uint64") => "atomic.Uint64".into(),
            _ => "atomic.Uintptr".into(),
        },
        _ => "atomic.Uintptr".into(),
    }
}

/// One-line target idiom for starting a thread.
pub fn thread_hint(thread: &ThreadInfo, target: Target) -> String {
    let args = thread.arguments.join(", ");
    let call = format!("{}({args})", thread.function_name);
    match target {
        Target::Rust if thread.detached => format!("std::thread::spawn(move || {call});"),
        Target::Rust => format!(
            "let {} = std::thread::spawn(move || {call});",
            thread.thread_var_name
        ),
        Target::Go if thread.detached => format!("go {call}"),
        Target::Go => format!(
            "{0} := make(chan struct{{}}); go func() {{ defer close({0}); {call} }}()",
            thread.thread_var_name
        ),
    }
}

/// One-line target idiom for a scoped lock.
pub fn lock_hint(lock: &LockInfo, target: Target) -> String {
    let (var, mutex) = (&lock.lock_var_name, &lock.mutex_name);
    match (target, lock.kind) {
        (Target::Rust, LockKind::SharedLock) => format!("let {var} = {mutex}.read().unwrap();"),
        (Target::Rust, LockKind::LockGuard | LockKind::UniqueLock) => {
            format!("let {var} = {mutex}.lock().unwrap();")
        }
        (Target::Go, LockKind::SharedLock) => format!("{mutex}.RLock(); defer {mutex}.RUnlock()"),
        (Target::Go, LockKind::LockGuard | LockKind::UniqueLock) => {
            format!("{mutex}.Lock(); defer {mutex}.Unlock()")
        }
    }
}

/// One-line target idiom for a condition-variable operation.
pub fn condvar_hint(cv: &str, op: &str, target: Target) -> String {
    match (target, op) {
        (Target::Rust, "wait") => format!("guard = {cv}.wait(guard).unwrap();"),
        (Target::Rust, "wait_for" | "wait_until") => {
            format!("let (guard, _timeout) = {cv}.wait_timeout(guard, timeout).unwrap();")
        }
        (Target::Rust, op) => format!("{cv}.{op}();"),
        (Target::Go, "wait") => format!("{cv}.Wait()"),
        (Target::Go, "notify_one") => format!("{cv}.Signal()"),
        (Target::Go, "notify_all") => format!("{cv}.Broadcast()"),
        // sync.Cond has no timed wait.
        (Target::Go, _) => format!("{cv}.Wait()"),
    }
}

/// One-line target idiom for an atomic operation.
pub fn atomic_hint(var: &str, op: &str, target: Target) -> String {
    match target {
        Target::Rust => match op {
            "load" => format!("{var}.load(Ordering::SeqCst)"),
            "exchange" => format!("{var}.swap(value, Ordering::SeqCst)"),
            "compare_exchange_weak" | "compare_exchange_strong" => {
                format!("{var}.compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)")
            }
            op => format!("{var}.{op}(value, Ordering::SeqCst)"),
        },
        Target::Go => match op {
            "load" => format!("{var}.Load()"),
            "store" => format!("{var}.Store(value)"),
            "fetch_add" => format!("{var}.Add(value)"),
            "fetch_sub" => format!("{var}.Add(-value)"),
            "exchange" => format!("{var}.Swap(value)"),
            _ => format!("{var}.CompareAndSwap(old, new)"),
        },
    }
}
