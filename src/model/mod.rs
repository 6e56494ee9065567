//! Modelos del core: documentos opacos y contexto por stage.

mod context;
mod document;

pub use context::{PersistedObject, PrepareScope, StageContext};
pub use document::{Document, Documents};
