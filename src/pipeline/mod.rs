//! Pipelines y módulos.
//!
//! Un pipeline es una secuencia estricta de módulos: el módulo *i+1* recibe
//! exactamente los documentos que devolvió el módulo *i*. Este módulo define:
//! - `Module`: interfaz neutral de un stage (prepare + execute).
//! - `Pipeline`: ejecución ordenada con stop-on-failure.
//! - `PipelineSet`: colección ordenada de pipelines con nombre.

mod definition;
mod run;
mod set;

pub use definition::Module;
pub use run::Pipeline;
pub use set::PipelineSet;
