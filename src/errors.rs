//! Errores específicos del core.
//!
//! El core no degrada: una violación de lock o una compilación fallida se
//! propagan de inmediato al driver. La política de reporte (formato, exit
//! codes) es responsabilidad del engine que nos invoca.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum EngineError {
    /// Escritura sobre un `MetadataStack` bloqueado. El stack queda intacto.
    #[error("metadata stack is locked (attempted write of key `{key}`)")]
    LockedMutation { key: String },

    /// Un accesor tipado no pudo convertir el valor almacenado.
    #[error("metadata key `{key}` cannot be converted to {expected}")]
    TypeConversion { key: String, expected: String },

    /// El compilador externo de plantillas falló. Nunca se cachea.
    #[error("template compilation failed: {0}")]
    Compilation(String),

    /// Fallo propio de un módulo; aborta los módulos restantes del pipeline.
    #[error("module `{module}` failed: {message}")]
    StageExecution { module: String, message: String },

    #[error("internal: {0}")]
    Internal(String),
}
