//! Engine: orquestación de pipelines y generaciones de ejecución.
//!
//! Provee el engine que dirige los pipelines, su builder de configuración y
//! el tracker de generación que expira los change tokens de la cache cuando
//! arranca una ejecución nueva.

mod builder;
mod core;
mod generation;

pub use builder::EngineBuilder;
pub use core::{Engine, ExecutionSummary, PipelineOutput};
pub use generation::ExecutionTracker;
