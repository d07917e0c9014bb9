use std::fmt;

/// A stack of deferred actions that run last-registered-first.
///
/// Pending actions run when the stack is explicitly [`run`](CleanupStack::run) or when it is
/// dropped, which includes early returns and unwinding out of the owning scope.
#[derive(Default)]
pub struct CleanupStack<'a> {
    deferred: Vec<Box<dyn FnOnce() + 'a>>,
}

impl<'a> CleanupStack<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `action` to run before everything registered earlier.
    pub fn defer<F: FnOnce() + 'a>(&mut self, action: F) {
        self.deferred.push(Box::new(action));
    }

    /// Returns the number of pending actions.
    pub fn len(&self) -> usize {
        self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deferred.is_empty()
    }

    /// Runs all pending actions now.
    pub fn run(mut self) {
        self.unwind();
    }

    fn unwind(&mut self) {
        while let Some(action) = self.deferred.pop() {
            action();
        }
    }
}

impl Drop for CleanupStack<'_> {
    fn drop(&mut self) {
        self.unwind();
    }
}

impl fmt::Debug for CleanupStack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupStack")
            .field("pending", &self.deferred.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn runs_in_reverse_registration_order() {
        let log = RefCell::new(Vec::new());
        {
            let mut stack = CleanupStack::new();
            stack.defer(|| log.borrow_mut().push(1));
            stack.defer(|| log.borrow_mut().push(2));
            stack.defer(|| log.borrow_mut().push(3));
            assert_eq!(stack.len(), 3);
            assert!(log.borrow().is_empty());
        }
        assert_eq!(*log.borrow(), [3, 2, 1]);
    }

    #[test]
    fn explicit_run_does_not_repeat_on_drop() {
        let count = RefCell::new(0);
        let mut stack = CleanupStack::new();
        stack.defer(|| *count.borrow_mut() += 1);
        stack.run();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn empty_stack() {
        let stack = CleanupStack::new();
        assert!(stack.is_empty());
        assert_eq!(format!("{stack:?}"), "CleanupStack { pending: 0 }");
    }
}
