use serde::{Deserialize, Serialize};

use crate::constants::ENGINE_VERSION;
use crate::hashing;

/// Clave estructural de la cache de compilación.
///
/// Igualdad y hash son estructurales sobre los tres componentes. Los
/// namespaces se ordenan y deduplican al construir, de modo que entradas
/// equivalentes con distinto orden de namespaces no fragmentan la cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompilationParameters {
    base_type: String,
    namespaces: Vec<String>,
    model_type: String,
}

impl CompilationParameters {
    pub fn new<I, S>(base_type: impl Into<String>, namespaces: I, model_type: impl Into<String>) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        let mut namespaces: Vec<String> = namespaces.into_iter().map(Into::into).collect();
        namespaces.sort();
        namespaces.dedup();
        Self { base_type: base_type.into(),
               namespaces,
               model_type: model_type.into() }
    }

    pub fn base_type(&self) -> &str {
        &self.base_type
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    /// Identidad estable de los parámetros (hex blake3). Incluye
    /// `ENGINE_VERSION`: un cambio de versión del motor produce identidades
    /// nuevas para los mismos parámetros.
    pub fn fingerprint(&self) -> String {
        let mut parts: Vec<&str> = vec![ENGINE_VERSION, &self.base_type];
        parts.extend(self.namespaces.iter().map(String::as_str));
        parts.push(&self.model_type);
        hashing::hash_parts(parts)
    }
}
