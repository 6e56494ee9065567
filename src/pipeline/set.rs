use super::{Module, Pipeline};

/// Colección ordenada de pipelines con nombre.
///
/// El orden de inserción es el orden de ejecución que impone el engine; entre
/// pipelines no hay más garantía de orden que la que el driver decida.
#[derive(Default)]
pub struct PipelineSet {
    pipelines: Vec<Pipeline>,
}

impl PipelineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un pipeline ya construido.
    pub fn add(&mut self, pipeline: Pipeline) {
        self.pipelines.push(pipeline);
    }

    /// Variante que envuelve una lista de módulos en un pipeline nuevo.
    pub fn add_modules(&mut self, name: impl Into<String>, modules: Vec<Box<dyn Module>>) {
        self.pipelines.push(Pipeline::new(name, modules));
    }

    pub fn get(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.iter().find(|p| p.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipeline> {
        self.pipelines.iter()
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}
