use std::sync::Arc;

use tracing::debug_span;

use crate::errors::EngineError;
use crate::metadata::MetadataStack;
use crate::model::{Documents, PrepareScope, StageContext};

use super::Module;

/// Secuencia ordenada de módulos con nombre.
///
/// No paraleliza entre módulos: cada módulo depende causalmente de la salida
/// del anterior. El paralelismo dentro de un módulo (sobre su secuencia de
/// documentos) es asunto del módulo, no del pipeline.
pub struct Pipeline {
    name: String,
    modules: Vec<Box<dyn Module>>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, modules: Vec<Box<dyn Module>>) -> Self {
        Self { name: name.into(),
               modules }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Ejecuta los módulos estrictamente en orden.
    ///
    /// Por cada módulo se construye un `StageContext` nuevo a partir de la
    /// metadata fuente y los documentos del módulo anterior; `prepare` corre
    /// bajo `PrepareScope` (re-lock garantizado incluso si falla) y `execute`
    /// recibe la metadata ya bloqueada. El primer error aborta los módulos
    /// restantes (stop-on-failure).
    ///
    /// Con la lista de módulos vacía devuelve una secuencia vacía sin
    /// invocar nada.
    pub fn execute(&self, metadata_source: &MetadataStack, input: Documents) -> Result<Documents, EngineError> {
        if self.modules.is_empty() {
            return Ok(Arc::new(Vec::new()));
        }

        let mut current = input;
        for module in &self.modules {
            let span = debug_span!("module", pipeline = %self.name, module = module.name());
            let _enter = span.enter();

            let base = StageContext::new(metadata_source, Arc::clone(&current));
            let mut ctx = base.clone_for_prepare(None);
            let persisted = {
                let mut scope = PrepareScope::enter(&mut ctx);
                module.prepare(scope.context())?
            };
            ctx.set_persisted(persisted);

            let output = module.execute(&current, &mut ctx)?;
            tracing::debug!(module = module.name(),
                            input_docs = current.len(),
                            output_docs = output.len(),
                            "module finished");
            current = Arc::new(output);
        }
        Ok(current)
    }
}
