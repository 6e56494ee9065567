use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::cache::TemplateCache;

/// Tracker de la generación de ejecución vigente.
///
/// Distingue "primera ejecución" (nada que expirar: nada se compiló bajo una
/// generación vieja) de "arrancó una ejecución nueva" (todo lo compilado bajo
/// la anterior debe revalidarse), sin timestamps por entrada. El centinela es
/// `Uuid::nil()`.
pub struct ExecutionTracker {
    cache: Arc<TemplateCache>,
    last_seen: Mutex<Uuid>,
}

impl ExecutionTracker {
    pub fn new(cache: Arc<TemplateCache>) -> Self {
        Self { cache,
               last_seen: Mutex::new(Uuid::nil()) }
    }

    /// Observa el id de la ejecución que arranca.
    ///
    /// Si el último visto no es el centinela y difiere del actual, expira los
    /// tokens de toda la cache exactamente una vez para esa transición.
    /// Siempre guarda `current` después, incluida la primera llamada.
    ///
    /// Contrato del driver: llamar (y completar) antes de que cualquier stage
    /// de la generación nueva emita `get_or_compile`.
    pub fn observe(&self, current: Uuid) {
        let mut last = self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        if *last != Uuid::nil() && *last != current {
            tracing::info!(previous = %*last, current = %current,
                           "new execution generation, expiring cached change tokens");
            self.cache.expire_all();
        }
        *last = current;
    }

    pub fn last_seen(&self) -> Uuid {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CompilationParameters, CompiledArtifact, TemplateProgram};
    use crate::errors::EngineError;
    use serde_json::Value;

    struct NoopProgram;

    impl TemplateProgram for NoopProgram {
        fn render(&self, _model: &Value) -> Result<String, EngineError> {
            Ok(String::new())
        }
    }

    fn compiled(cache: &TemplateCache, model: &str) -> Arc<CompiledArtifact> {
        cache.get_or_compile(&CompilationParameters::new("Base", ["N"], model),
                             || Ok(CompiledArtifact::new(Arc::new(NoopProgram))))
             .unwrap()
    }

    #[test]
    fn first_observation_never_expires() {
        let cache = Arc::new(TemplateCache::new());
        let artifact = compiled(&cache, "M");

        let tracker = ExecutionTracker::new(Arc::clone(&cache));
        tracker.observe(Uuid::new_v4());
        assert!(artifact.is_current());
    }

    #[test]
    fn same_generation_is_a_noop() {
        let cache = Arc::new(TemplateCache::new());
        let tracker = ExecutionTracker::new(Arc::clone(&cache));

        let gen_a = Uuid::new_v4();
        tracker.observe(gen_a);
        let artifact = compiled(&cache, "M");
        tracker.observe(gen_a);

        assert!(artifact.is_current());
        assert_eq!(tracker.last_seen(), gen_a);
    }

    #[test]
    fn generation_change_expires_exactly_once() {
        let cache = Arc::new(TemplateCache::new());
        let tracker = ExecutionTracker::new(Arc::clone(&cache));

        tracker.observe(Uuid::new_v4());
        let old = compiled(&cache, "M");

        let gen_b = Uuid::new_v4();
        tracker.observe(gen_b);
        assert!(!old.is_current());

        // Lo compilado bajo la generación nueva no se ve afectado por
        // re-observar el mismo id.
        let fresh = compiled(&cache, "M2");
        tracker.observe(gen_b);
        assert!(fresh.is_current());
    }
}
