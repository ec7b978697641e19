//! Hooks that record which code paths were executed in the current thread.
use std::cell::RefCell;

thread_local!(static EXECUTED_PATHS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) });

pub(crate) fn record(path: &'static str) {
    EXECUTED_PATHS.with(|paths| paths.borrow_mut().push(path));
}

/// Returns `true` if the code path with given name was executed
/// since the last call of [clear].
pub fn was_executed(path: &str) -> bool {
    EXECUTED_PATHS.with(|paths| paths.borrow().iter().any(|&p| p == path))
}

/// Count of executions of the code path.
pub fn executions(path: &str) -> usize {
    EXECUTED_PATHS.with(|paths| paths.borrow().iter().filter(|&&p| p == path).count())
}

pub fn clear() {
    EXECUTED_PATHS.with(|paths| paths.borrow_mut().clear());
}
