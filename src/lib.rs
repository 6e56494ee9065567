//! docflow-core: núcleo de ejecución de un pipeline de transformación de
//! contenido.
//!
//! Dos subsistemas acoplados:
//! - el modelo de contexto inmutable por stage (`MetadataStack` en capas con
//!   lock, `StageContext` clonado y bloqueado por stage), y
//! - la cache de plantillas compiladas (`TemplateCache`) con single-flight
//!   por clave y expiración de change tokens por generación de ejecución
//!   (`ExecutionTracker`).

pub mod cache;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod metadata;
pub mod model;
pub mod pipeline;

pub use cache::{ChangeToken, CompilationParameters, CompiledArtifact, TemplateCache, TemplateProgram};
pub use engine::{Engine, EngineBuilder, ExecutionSummary, ExecutionTracker, PipelineOutput};
pub use errors::EngineError;
pub use metadata::MetadataStack;
pub use model::{Document, Documents, PersistedObject, StageContext};
pub use pipeline::{Module, Pipeline, PipelineSet};
