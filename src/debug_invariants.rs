//! Invariant checking for kernel data structures.
//!
//! A broken invariant (for the graph: the closure law or the permutation
//! property) is a kernel bug, never a caller error. Checks therefore run in
//! debug builds, or in release builds with the `check-invariants` or
//! `strict-invariants` features, and compile away otherwise.

use crate::mesh_error::MtgError;

/// True when invariant checks are compiled in.
pub const INVARIANT_CHECKS_ENABLED: bool = cfg!(any(
    debug_assertions,
    feature = "strict-invariants",
    feature = "check-invariants"
));

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation encountered.
    fn validate_invariants(&self) -> Result<(), MtgError>;

    /// Panic on the first violation when invariant checks are enabled.
    fn debug_assert_invariants(&self) {
        if INVARIANT_CHECKS_ENABLED {
            if let Err(e) = self.validate_invariants() {
                panic!("[invariants] {e}");
            }
        }
    }
}

/// Run a fallible check and panic on error when invariant checking is
/// enabled. The context tokens name the operation that just ran.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        {
            if let Err(e) = $expr {
                panic!(concat!("[invariants] after ", $($ctx)*, ": {}"), e);
            }
        }
    };
}
