use std::cell::Cell;

/// Symbol under which [evmjit_abort] is registered in every compiled module.
pub const ABORT_SYMBOL: &str = "evmjit_abort";

/// Point of return of one invocation.
///
/// Generated code only ever sees it as an opaque pointer that it hands back to
/// [evmjit_abort]. The host reads the recorded status once the entry routine returns.
#[derive(Debug, Default)]
pub struct Continuation {
    raised: Cell<Option<i32>>,
}

impl Continuation {
    pub fn new() -> Self {
        Self {
            raised: Cell::new(None),
        }
    }

    /// Status passed to the abort primitive, if it was called.
    pub fn raised(&self) -> Option<i32> {
        self.raised.get()
    }

    /// Re-arms the continuation for a new invocation.
    pub fn reset(&self) {
        self.raised.set(None);
    }

    pub(crate) fn raise(&self, code: i32) {
        // Only the first abort counts; the routine returns right after it.
        if self.raised.get().is_none() {
            self.raised.set(Some(code));
        }
    }
}

/// Abort primitive called by generated code before it unwinds with `code`.
///
/// # Safety
///
/// `continuation` must be null or point to the [Continuation] stored in the record of the
/// running invocation.
pub unsafe extern "C" fn evmjit_abort(continuation: *const Continuation, code: i32) {
    log::debug!("Generated code aborted with status {}", code);
    if let Some(continuation) = continuation.as_ref() {
        continuation.raise(code);
    }
}

#[cfg(test)]
mod test {
    use super::{evmjit_abort, Continuation};

    #[test]
    fn first_abort_is_kept() {
        let continuation = Continuation::new();
        assert_eq!(continuation.raised(), None);
        unsafe {
            evmjit_abort(&continuation, 102);
            evmjit_abort(&continuation, 104);
            evmjit_abort(std::ptr::null(), 101);
        }
        assert_eq!(continuation.raised(), Some(102));
        continuation.reset();
        assert_eq!(continuation.raised(), None);
        unsafe { evmjit_abort(&continuation, 101) };
        assert_eq!(continuation.raised(), Some(101));
    }
}
