//! Cache de artefactos compilados, compartida a nivel de proceso.
//!
//! Las plantillas se compilan una sola vez por clave: la cache garantiza
//! single-flight por clave (un solo `compile` en vuelo, los demás esperan el
//! resultado) y que claves distintas nunca se bloquean entre sí. Las entradas
//! sobreviven a ejecuciones completas del engine; al cambiar de generación de
//! ejecución sólo se expiran sus change tokens, nunca se eliminan entradas.

mod artifact;
mod params;
mod store;

pub use artifact::{ChangeToken, CompiledArtifact, TemplateProgram};
pub use params::CompilationParameters;
pub use store::TemplateCache;
