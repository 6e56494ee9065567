use crate::errors::EngineError;
use crate::model::{Document, PersistedObject, StageContext};

/// Trait que define un módulo (stage) del pipeline.
///
/// El driver invoca `prepare` dentro de la ventana de preparación, con la
/// metadata del contexto desbloqueada; el objeto devuelto queda disponible en
/// `execute` vía `StageContext::persisted_as`. En `execute` la metadata ya
/// está re-bloqueada: un `set` ahí es un bug del módulo y falla con
/// `LockedMutation`.
pub trait Module: Send + Sync {
    /// Identificador estable del módulo dentro del pipeline.
    fn name(&self) -> &str;

    /// Sub-fase de preparación. Puede mutar metadata y/o devolver un objeto
    /// persistido para `execute`. Por defecto no hace nada.
    fn prepare(&self, _ctx: &mut StageContext) -> Result<Option<PersistedObject>, EngineError> {
        Ok(None)
    }

    /// Cuerpo del stage: consume la secuencia de documentos del módulo
    /// anterior y produce la del siguiente.
    fn execute(&self, documents: &[Document], ctx: &mut StageContext) -> Result<Vec<Document>, EngineError>;
}
