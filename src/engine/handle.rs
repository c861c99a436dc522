use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{EngineError, EngineLoader, Transliterator};

/// Process-wide holder for the initialized engine.
///
/// `ensure_ready` is safe to call on every request. Concurrent cold-start callers
/// share a single initialization attempt; a failed attempt leaves the cell empty so
/// the next call starts over.
pub struct EngineHandle {
    loader: Arc<dyn EngineLoader>,
    cell: OnceCell<Arc<dyn Transliterator>>,
}

impl EngineHandle {
    pub fn new(loader: Arc<dyn EngineLoader>) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
        }
    }

    pub async fn ensure_ready(&self) -> Result<Arc<dyn Transliterator>, EngineError> {
        let engine = self
            .cell
            .get_or_try_init(|| async {
                tracing::info!("Initializing transliteration engine");
                match self.loader.load().await {
                    Ok(engine) => {
                        tracing::info!("Transliteration engine ready");
                        Ok(engine)
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Transliteration engine initialization failed");
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(engine))
    }

    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }
}
