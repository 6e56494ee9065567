//! Contexto de ejecución entregado a cada módulo de un pipeline.
//!
//! Ciclo de vida:
//! - El constructor público clona el `MetadataStack` fuente y lo bloquea de
//!   inmediato: es la única forma de obtener un contexto de inicio de stage.
//! - `clone_for_prepare` (interno al crate) produce la variante mutable que
//!   el driver usa durante la ventana de preparación del módulo; volver a
//!   bloquear antes del cuerpo del stage es responsabilidad del driver, y
//!   `PrepareScope` lo garantiza en todos los caminos de salida.
//! - El contexto se descarta cuando el stage devuelve sus documentos.

use std::any::Any;
use std::sync::Arc;

use crate::metadata::MetadataStack;

use super::{Document, Documents};

/// Objeto opaco persistido por un módulo entre `prepare` y `execute`.
pub type PersistedObject = Arc<dyn Any + Send + Sync>;

pub struct StageContext {
    metadata: MetadataStack,
    documents: Documents,
    persisted: Option<PersistedObject>,
}

impl StageContext {
    /// Contexto de inicio de stage: metadata clonada y bloqueada, documentos
    /// compartidos por referencia, sin objeto persistido.
    pub fn new(metadata_source: &MetadataStack, documents: Documents) -> Self {
        let mut metadata = metadata_source.clone();
        metadata.lock();
        Self { metadata,
               documents,
               persisted: None }
    }

    /// Clon interno para la ventana de preparación: metadata re-clonada (el
    /// clon arranca desbloqueado), misma secuencia de documentos, objeto
    /// persistido dado. No re-bloquea: eso decide quien llama.
    pub(crate) fn clone_for_prepare(&self, persisted: Option<PersistedObject>) -> Self {
        Self { metadata: self.metadata.clone(),
               documents: Arc::clone(&self.documents),
               persisted }
    }

    pub fn metadata(&self) -> &MetadataStack {
        &self.metadata
    }

    /// Acceso mutante a la metadata. Con el stack bloqueado, cualquier `set`
    /// falla con `LockedMutation`; el contexto no lo puede impedir antes.
    pub fn metadata_mut(&mut self) -> &mut MetadataStack {
        &mut self.metadata
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn shared_documents(&self) -> Documents {
        Arc::clone(&self.documents)
    }

    pub fn persisted(&self) -> Option<&PersistedObject> {
        self.persisted.as_ref()
    }

    /// Downcast tipado del objeto persistido.
    pub fn persisted_as<T: 'static>(&self) -> Option<&T> {
        self.persisted.as_ref().and_then(|p| p.downcast_ref::<T>())
    }

    pub(crate) fn set_persisted(&mut self, persisted: Option<PersistedObject>) {
        self.persisted = persisted;
    }

    pub(crate) fn lock(&mut self) {
        self.metadata.lock();
    }

    pub(crate) fn unlock(&mut self) {
        self.metadata.unlock();
    }
}

/// Ventana de preparación con re-lock garantizado.
///
/// Desbloquea la metadata al entrar y la re-bloquea en `Drop`, cubriendo
/// retorno normal, retornos tempranos y errores del módulo.
pub struct PrepareScope<'a> {
    ctx: &'a mut StageContext,
}

impl<'a> PrepareScope<'a> {
    pub(crate) fn enter(ctx: &'a mut StageContext) -> Self {
        ctx.unlock();
        Self { ctx }
    }

    pub(crate) fn context(&mut self) -> &mut StageContext {
        self.ctx
    }
}

impl Drop for PrepareScope<'_> {
    fn drop(&mut self) {
        self.ctx.lock();
    }
}
