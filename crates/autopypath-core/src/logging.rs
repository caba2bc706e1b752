//! Scoped log verbosity for a single resolution run.

use tracing::Level;
use tracing::subscriber::DefaultGuard;

/// Keeps a temporary subscriber installed for the current thread.
///
/// Dropping the guard restores whatever dispatcher was active before, on
/// every exit path including early returns and unwinding.
#[must_use = "the log level is restored as soon as the guard is dropped"]
pub struct LogLevelGuard {
    default: Option<DefaultGuard>,
}

impl LogLevelGuard {
    /// Install a compact stderr subscriber capped at `level`, or do nothing
    /// when `level` is `None`.
    pub fn scoped(level: Option<Level>) -> Self {
        let default = level.map(|level| {
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact()
                .finish();
            tracing::subscriber::set_default(subscriber)
        });
        Self { default }
    }

    pub fn is_active(&self) -> bool {
        self.default.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_installs_nothing() {
        let guard = LogLevelGuard::scoped(None);
        assert!(!guard.is_active());
    }

    #[test]
    fn level_is_enabled_while_guard_alive() {
        let guard = LogLevelGuard::scoped(Some(Level::TRACE));
        assert!(guard.is_active());
        assert!(tracing::enabled!(Level::TRACE));
        tracing::debug!("visible while the guard is alive");
    }
}
