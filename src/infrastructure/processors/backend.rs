use crate::core::interfaces::MinifyBackend;
use crate::utils::{Logger, MinifyError, Result};
use once_cell::sync::OnceCell;

/// Environment switch that keeps every advanced backend unloaded
pub const BASIC_ONLY_ENV: &str = "CODESHRINK_BASIC_ONLY";

/// Lazily loaded backend, initialized at most once.
///
/// Concurrent first calls block on the same initialization and all observe
/// the single loaded instance. A failed load leaves the handle empty so the
/// next call tries again.
pub struct BackendHandle<B> {
    cell: OnceCell<B>,
}

impl<B: MinifyBackend> BackendHandle<B> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn ensure_loaded(&self) -> Result<&B> {
        self.cell.get_or_try_init(|| {
            let backend = B::load()?;
            Logger::backend_loaded(B::name());
            Ok(backend)
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<B: MinifyBackend> Default for BackendHandle<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fails with a load error when `CODESHRINK_BASIC_ONLY` is set to a truthy value
pub fn ensure_enabled(backend: &'static str) -> Result<()> {
    match std::env::var(BASIC_ONLY_ENV) {
        Ok(value) if matches!(value.trim(), "1" | "true" | "yes") => Err(MinifyError::backend_load(
            backend,
            format!("disabled by {}", BASIC_ONLY_ENV),
        )),
        _ => Ok(()),
    }
}
