//! Builder para `Engine`.
//!
//! Separa la fase de configuración (seeds de metadata, pipelines) de la fase
//! de ejecución: el builder acumula y `build` consume, dejando un engine
//! listo para `run`.

use serde_json::Value;

use crate::metadata::MetadataStack;
use crate::pipeline::{Module, Pipeline, PipelineSet};

use super::Engine;

#[derive(Default)]
pub struct EngineBuilder {
    seeds: Vec<(String, Value)>,
    pipelines: PipelineSet,
}

impl EngineBuilder {
    /// Siembra una clave de metadata a nivel engine.
    pub fn seed(mut self, key: impl Into<String>, value: Value) -> Self {
        self.seeds.push((key.into(), value));
        self
    }

    /// Agrega un pipeline a partir de una lista de módulos.
    pub fn pipeline(mut self, name: impl Into<String>, modules: Vec<Box<dyn Module>>) -> Self {
        self.pipelines.add_modules(name, modules);
        self
    }

    /// Agrega un pipeline ya construido.
    pub fn add_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipelines.add(pipeline);
        self
    }

    pub fn build(self) -> Engine {
        let mut metadata = MetadataStack::new();
        for (key, value) in self.seeds {
            // Un stack recién creado nunca está bloqueado.
            metadata.set(key, value).expect("builder stack is never locked");
        }
        Engine::with_parts(metadata, self.pipelines)
    }
}
