//! Documento opaco intercambiado entre stages.
//!
//! El core no interpreta el contenido: un `Document` es un handle con
//! semántica de valor, inmutable por convención. Las secuencias de documentos
//! (`Documents`) se comparten por `Arc` entre contextos; nunca se copian en
//! profundidad al construir el contexto de un stage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::hashing;

/// Secuencia ordenada de documentos, compartida por referencia.
pub type Documents = Arc<Vec<Document>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: Uuid,
    /// Origen declarativo (ruta, URL...); informativo, no entra al hash.
    pub source: Option<String>,
    /// Contenido JSON genérico; el motor no interpreta su semántica.
    pub payload: Value,
}

impl Document {
    pub fn new(payload: Value) -> Self {
        Self { id: Uuid::new_v4(),
               source: None,
               payload }
    }

    pub fn with_source(source: impl Into<String>, payload: Value) -> Self {
        Self { id: Uuid::new_v4(),
               source: Some(source.into()),
               payload }
    }

    /// Identidad estable del contenido (hex blake3 del payload).
    pub fn content_hash(&self) -> String {
        hashing::hash_str(&self.payload.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_hash_ignores_source_and_id() {
        let a = Document::with_source("a.md", json!({"body": "hola"}));
        let b = Document::with_source("b.md", json!({"body": "hola"}));
        assert_ne!(a.id, b.id);
        assert_eq!(a.content_hash(), b.content_hash());
    }
}
