//! Core Engine implementation
//!
//! Dirige la ejecución: una generación (execution id) por corrida completa,
//! observación del id en el tracker antes de que ningún stage pueda pedir
//! compilaciones, y ejecución de los pipelines en su orden de inserción.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info_span;
use uuid::Uuid;

use crate::cache::TemplateCache;
use crate::errors::EngineError;
use crate::metadata::MetadataStack;
use crate::model::Documents;
use crate::pipeline::{Pipeline, PipelineSet};

use super::{EngineBuilder, ExecutionTracker};

/// Motor de ejecución del pipeline de transformación de contenido.
///
/// Posee el `MetadataStack` a nivel engine (creado una vez, clonado al
/// construir el contexto de cada stage), el conjunto de pipelines, y la
/// cache de plantillas compartida que sobrevive entre ejecuciones.
pub struct Engine {
    metadata: MetadataStack,
    pipelines: PipelineSet,
    cache: Arc<TemplateCache>,
    tracker: ExecutionTracker,
}

/// Resultado de una corrida completa.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    pub execution_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outputs: Vec<PipelineOutput>,
}

/// Documentos finales de un pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub pipeline: String,
    pub documents: Documents,
}

impl Engine {
    #[inline]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn new() -> Self {
        let cache = Arc::new(TemplateCache::new());
        Self { metadata: MetadataStack::new(),
               pipelines: PipelineSet::new(),
               tracker: ExecutionTracker::new(Arc::clone(&cache)),
               cache }
    }

    pub(crate) fn with_parts(metadata: MetadataStack, pipelines: PipelineSet) -> Self {
        let cache = Arc::new(TemplateCache::new());
        Self { metadata,
               pipelines,
               tracker: ExecutionTracker::new(Arc::clone(&cache)),
               cache }
    }

    /// Metadata a nivel engine, editable durante la fase de configuración.
    pub fn metadata(&self) -> &MetadataStack {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataStack {
        &mut self.metadata
    }

    pub fn pipelines(&self) -> &PipelineSet {
        &self.pipelines
    }

    pub fn pipelines_mut(&mut self) -> &mut PipelineSet {
        &mut self.pipelines
    }

    pub fn add_pipeline(&mut self, pipeline: Pipeline) {
        self.pipelines.add(pipeline);
    }

    /// Cache de plantillas compartida con el subsistema de rendering.
    pub fn cache(&self) -> Arc<TemplateCache> {
        Arc::clone(&self.cache)
    }

    pub fn tracker(&self) -> &ExecutionTracker {
        &self.tracker
    }

    /// Corrida completa con un execution id nuevo.
    pub fn run(&mut self) -> Result<ExecutionSummary, EngineError> {
        self.run_with_id(Uuid::new_v4())
    }

    /// Corrida completa con un execution id provisto por el driver (el caso
    /// watch/rebuild, donde el id viene de afuera).
    ///
    /// El tracker observa el id —y aplica la expiración que corresponda—
    /// antes de que arranque ningún pipeline; recién entonces los stages
    /// pueden emitir `get_or_compile` bajo la generación nueva.
    pub fn run_with_id(&mut self, execution_id: Uuid) -> Result<ExecutionSummary, EngineError> {
        let span = info_span!("execution", id = %execution_id);
        let _enter = span.enter();
        let started_at = Utc::now();

        self.tracker.observe(execution_id);

        // El stack del engine queda bloqueado durante la corrida; cada stage
        // trabaja sobre su propio clon.
        self.metadata.lock();
        let result = self.run_pipelines();
        self.metadata.unlock();
        let outputs = result?;

        let finished_at = Utc::now();
        tracing::info!(pipelines = outputs.len(),
                       cached_templates = self.cache.compiled_len(),
                       "execution finished");
        Ok(ExecutionSummary { execution_id,
                              started_at,
                              finished_at,
                              outputs })
    }

    fn run_pipelines(&self) -> Result<Vec<PipelineOutput>, EngineError> {
        let mut outputs = Vec::with_capacity(self.pipelines.len());
        for pipeline in self.pipelines.iter() {
            let span = info_span!("pipeline", name = pipeline.name());
            let _enter = span.enter();

            let documents = pipeline.execute(&self.metadata, Arc::new(Vec::new()))?;
            outputs.push(PipelineOutput { pipeline: pipeline.name().to_string(),
                                          documents });
        }
        Ok(outputs)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
