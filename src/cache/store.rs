//! Mapa concurrente con get-or-compile single-flight por clave.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use crate::errors::EngineError;

use super::{CompilationParameters, CompiledArtifact};

/// Slot por clave: la celda queda vacía mientras la compilación está en
/// vuelo o tras un intento fallido.
#[derive(Default)]
struct Slot {
    cell: OnceCell<Arc<CompiledArtifact>>,
}

/// Cache concurrente de plantillas compiladas.
///
/// Garantías:
/// - Por clave, a lo sumo un `compile` en vuelo; los que llegan tarde esperan
///   y reciben el mismo `Arc` del artefacto.
/// - Claves distintas nunca se bloquean entre sí: el lock del shard del mapa
///   sólo cubre la operación de mapa, jamás la compilación.
/// - Un `compile` fallido no deja entrada: el slot queda libre (no
///   envenenado) y un caller posterior reintenta su propia compilación.
#[derive(Default)]
pub struct TemplateCache {
    slots: DashMap<CompilationParameters, Arc<Slot>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devuelve el artefacto para `params`, compilándolo si hace falta.
    ///
    /// El cierre `compile` se invoca fuera de cualquier lock del mapa. Su
    /// error se propaga sólo al caller cuyo intento falló; los que esperaban
    /// reintentan de forma independiente.
    pub fn get_or_compile<F>(&self, params: &CompilationParameters, compile: F) -> Result<Arc<CompiledArtifact>, EngineError>
        where F: FnOnce() -> Result<CompiledArtifact, EngineError>
    {
        let slot = match self.slots.get(params) {
            Some(entry) => Arc::clone(entry.value()),
            None => Arc::clone(self.slots.entry(params.clone()).or_default().value()),
        };

        let mut compiled_now = false;
        let artifact = slot.cell.get_or_try_init(|| {
                                    compiled_now = true;
                                    tracing::debug!(fingerprint = %params.fingerprint(), "compiling template");
                                    compile().map(Arc::new)
                                })?;
        if !compiled_now {
            tracing::trace!(fingerprint = %params.fingerprint(), "template cache hit");
        }
        Ok(Arc::clone(artifact))
    }

    /// Consulta sin compilar. `None` si la clave no existe o su compilación
    /// aún está en vuelo.
    pub fn get(&self, params: &CompilationParameters) -> Option<Arc<CompiledArtifact>> {
        self.slots.get(params).and_then(|entry| entry.value().cell.get().cloned())
    }

    /// Señala los change tokens de todas las entradas compiladas.
    ///
    /// No elimina entradas: un `get_or_compile` posterior sigue devolviendo
    /// el artefacto viejo y es el caller quien debe verificar `is_current`
    /// antes de confiar en él. Los slots con compilación en vuelo se saltan:
    /// ese artefacto nace ya bajo la generación nueva.
    pub fn expire_all(&self) {
        let mut expired = 0usize;
        for entry in self.slots.iter() {
            if let Some(artifact) = entry.value().cell.get() {
                artifact.expire_tokens();
                expired += 1;
            }
        }
        tracing::debug!(expired, "expired change tokens of cached artifacts");
    }

    /// Cantidad de entradas con artefacto ya compilado.
    pub fn compiled_len(&self) -> usize {
        self.slots.iter().filter(|entry| entry.value().cell.get().is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
