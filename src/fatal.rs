//! Centralized reporting for invariant violations that indicate a bug in the matching core
//! itself rather than a rejectable input. These never surface as a `Result` — they are logged
//! at `error!` and then abort the process, since continuing past a broken invariant (a negative
//! aggregate, an orphaned index entry) risks silently corrupting every order after it.

use tracing::error;

/// Log `message` at `error!` and panic. Call at the point an invariant is found broken, not
/// deep inside a helper, so the log carries the context that made the violation detectable.
pub fn invariant_violation(message: &str) -> ! {
    error!(message, "invariant violation, aborting");
    panic!("invariant violation: {message}");
}
