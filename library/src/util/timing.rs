use std::borrow::Cow;
use std::time::Instant;

use log::{self, Level};

/// Logs how long a scope took when dropped.
pub struct ScopedTimer {
    label: Option<Cow<'static, str>>,
    level: Level,
    start: Instant,
}

impl ScopedTimer {
    pub fn with_level(label: impl Into<Cow<'static, str>>, level: Level) -> Self {
        Self {
            label: Some(label.into()),
            level,
            start: Instant::now(),
        }
    }

    pub fn info(label: impl Into<Cow<'static, str>>) -> Self {
        Self::with_level(label, Level::Info)
    }

    pub fn debug(label: impl Into<Cow<'static, str>>) -> Self {
        Self::with_level(label, Level::Debug)
    }

    /// Like [`ScopedTimer::debug`], but only builds the label when debug logging is on.
    pub fn debug_lazy<F>(label_gen: F) -> Self
    where
        F: FnOnce() -> String,
    {
        let label = log::log_enabled!(Level::Debug).then(|| Cow::Owned(label_gen()));
        Self {
            label,
            level: Level::Debug,
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(label) = &self.label {
            log::log!(self.level, "{} took {} ms", label, self.elapsed_ms());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_label_is_skipped_without_debug_logging() {
        let mut built = false;
        let timer = ScopedTimer::debug_lazy(|| {
            built = true;
            "render".to_string()
        });
        assert_eq!(built, log::log_enabled!(Level::Debug));
        drop(timer);
    }
}
