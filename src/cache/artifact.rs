//! Artefacto compilado y sus change tokens.
//!
//! Un `CompiledArtifact` es inmutable tras su creación salvo por la
//! expiración de sus tokens. Expirar un token no destruye nada: marca el
//! artefacto como "revalidar antes de confiar"; decidir recompilar es
//! política de quien consume la cache, no de la cache.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::errors::EngineError;

/// Handle opaco de invalidación. Señalado una vez, queda expirado.
#[derive(Debug, Default)]
pub struct ChangeToken {
    expired: AtomicBool,
}

impl ChangeToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Señala el token. Idempotente.
    pub fn expire(&self) {
        self.expired.store(true, Ordering::Release);
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }
}

/// Representación invocable de una plantilla compilada. La provee el
/// subsistema de rendering; el core la trata como opaca.
pub trait TemplateProgram: Send + Sync {
    fn render(&self, model: &Value) -> Result<String, EngineError>;
}

/// Valor de la cache: programa compilado + tokens de invalidación.
pub struct CompiledArtifact {
    program: Arc<dyn TemplateProgram>,
    tokens: Vec<Arc<ChangeToken>>,
}

impl std::fmt::Debug for CompiledArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledArtifact")
            .field("tokens", &self.tokens.len())
            .finish_non_exhaustive()
    }
}

impl CompiledArtifact {
    /// Artefacto con un token propio recién creado.
    pub fn new(program: Arc<dyn TemplateProgram>) -> Self {
        Self::with_tokens(program, vec![Arc::new(ChangeToken::new())])
    }

    /// Artefacto que observa tokens provistos por el compilador externo
    /// (p.ej. tokens de archivos fuente).
    pub fn with_tokens(program: Arc<dyn TemplateProgram>, tokens: Vec<Arc<ChangeToken>>) -> Self {
        Self { program, tokens }
    }

    pub fn program(&self) -> &Arc<dyn TemplateProgram> {
        &self.program
    }

    pub fn render(&self, model: &Value) -> Result<String, EngineError> {
        self.program.render(model)
    }

    pub fn tokens(&self) -> &[Arc<ChangeToken>] {
        &self.tokens
    }

    /// `true` mientras ningún token haya sido señalado.
    pub fn is_current(&self) -> bool {
        self.tokens.iter().all(|t| !t.is_expired())
    }

    /// Señala todos los tokens del artefacto.
    pub fn expire_tokens(&self) {
        for token in &self.tokens {
            token.expire();
        }
    }
}
