use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::EngineError;

type Layer = IndexMap<String, Value>;

/// Mapeo clave→valor en capas, con lock contra mutación.
///
/// Invariantes:
/// - Las capas por debajo de la superior son inmutables una vez creadas y se
///   comparten por `Arc` entre clones; nunca se copian en profundidad.
/// - Con `locked == true` ninguna operación mutante procede; el stack queda
///   observablemente idéntico tras un intento fallido.
/// - En lookup, la capa empujada más recientemente gana (shadowing).
#[derive(Debug, Default)]
pub struct MetadataStack {
    layers: Vec<Arc<Layer>>,
    top: Layer,
    locked: bool,
}

impl MetadataStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bloquea el stack. Idempotente; sin efectos más allá del flag.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Desbloquea el stack. Idempotente.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Escribe una clave en la capa superior.
    ///
    /// Falla con `LockedMutation` si el stack está bloqueado; en ese caso no
    /// se modifica nada.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<(), EngineError> {
        let key = key.into();
        if self.locked {
            return Err(EngineError::LockedMutation { key });
        }
        self.top.insert(key, value);
        Ok(())
    }

    /// Lookup con shadowing: capa superior primero, luego las inferiores de
    /// la más reciente a la más antigua.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(v) = self.top.get(key) {
            return Some(v);
        }
        self.layers.iter().rev().find_map(|layer| layer.get(key))
    }

    /// Accesor tipado: deserializa el valor almacenado al tipo pedido.
    ///
    /// `Ok(None)` si la clave no existe; `TypeConversion` si existe pero no
    /// convierte.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, EngineError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|_| {
                               EngineError::TypeConversion { key: key.to_string(),
                                                             expected: std::any::type_name::<T>().to_string() }
                           }),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Claves visibles (vista aplanada, sin duplicados por shadowing).
    pub fn keys(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for key in self.top.keys().map(String::as_str) {
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        for layer in self.layers.iter().rev() {
            for key in layer.keys().map(String::as_str) {
                if !seen.contains(&key) {
                    seen.push(key);
                }
            }
        }
        seen
    }

    /// Cantidad de claves visibles.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.layers.iter().all(|l| l.is_empty())
    }
}

/// Clone barato por capas: la capa superior actual se congela como una capa
/// compartida más y el clon arranca con una capa superior vacía, mutable y
/// desbloqueada. Mutar el clon jamás es observable desde el original.
impl Clone for MetadataStack {
    fn clone(&self) -> Self {
        let mut layers = self.layers.clone();
        if !self.top.is_empty() {
            layers.push(Arc::new(self.top.clone()));
        }
        Self { layers,
               top: Layer::new(),
               locked: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_get_roundtrip() {
        let mut stack = MetadataStack::new();
        stack.set("title", json!("x")).unwrap();
        assert_eq!(stack.get("title"), Some(&json!("x")));
        assert!(stack.get("missing").is_none());
    }

    #[test]
    fn clone_shadows_but_never_mutates_original() {
        let mut original = MetadataStack::new();
        original.set("title", json!("x")).unwrap();

        let mut clone = original.clone();
        clone.set("title", json!("y")).unwrap();
        clone.set("extra", json!(1)).unwrap();

        // El clon ve su propia escritura (shadowing), el original no cambia.
        assert_eq!(clone.get("title"), Some(&json!("y")));
        assert_eq!(original.get("title"), Some(&json!("x")));
        assert!(original.get("extra").is_none());
    }

    #[test]
    fn locked_set_fails_and_leaves_state_intact() {
        let mut stack = MetadataStack::new();
        stack.set("title", json!("x")).unwrap();
        stack.lock();

        let err = stack.set("title", json!("y")).unwrap_err();
        assert_eq!(err, EngineError::LockedMutation { key: "title".into() });
        assert_eq!(stack.get("title"), Some(&json!("x")));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn lock_and_unlock_are_idempotent() {
        let mut stack = MetadataStack::new();
        stack.lock();
        stack.lock();
        assert!(stack.is_locked());
        stack.unlock();
        stack.unlock();
        assert!(!stack.is_locked());
        stack.set("k", json!(true)).unwrap();
    }

    #[test]
    fn clone_starts_unlocked() {
        let mut stack = MetadataStack::new();
        stack.lock();
        let mut clone = stack.clone();
        assert!(!clone.is_locked());
        clone.set("k", json!(1)).unwrap();
    }

    #[test]
    fn typed_accessor_converts_or_fails() {
        let mut stack = MetadataStack::new();
        stack.set("count", json!(3)).unwrap();
        stack.set("title", json!("x")).unwrap();

        assert_eq!(stack.get_as::<u32>("count").unwrap(), Some(3));
        assert_eq!(stack.get_as::<String>("missing").unwrap(), None);
        assert!(matches!(stack.get_as::<u32>("title"),
                         Err(EngineError::TypeConversion { .. })));
    }

    #[test]
    fn keys_flatten_layers_without_duplicates() {
        let mut stack = MetadataStack::new();
        stack.set("a", json!(1)).unwrap();
        let mut clone = stack.clone();
        clone.set("a", json!(2)).unwrap();
        clone.set("b", json!(3)).unwrap();

        let keys = clone.keys();
        assert_eq!(keys.iter().filter(|k| **k == "a").count(), 1);
        assert_eq!(clone.len(), 2);
    }
}
