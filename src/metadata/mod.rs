//! Metadata en capas compartida entre stages.
//!
//! El `MetadataStack` es el contexto de metadatos del engine: un mapeo
//! clave→valor en capas donde las capas inferiores, ya congeladas, se
//! comparten por referencia entre clones y sólo la capa superior es mutable.
//! Un flag de lock convierte cualquier mutación durante la ejecución de un
//! stage en un error inmediato en vez de una fuga silenciosa entre stages.

mod stack;

pub use stack::MetadataStack;
