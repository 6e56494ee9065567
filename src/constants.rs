//! Constantes del motor core.
//!
//! Valores estáticos que participan en la identidad de los artefactos
//! compilados. `ENGINE_VERSION` entra en el fingerprint de los parámetros de
//! compilación: un cambio de versión del motor produce identidades nuevas
//! aunque la plantilla y los parámetros no cambien.

/// Versión lógica del motor. Mantener estable mientras no haya cambios
/// incompatibles en el formato de los artefactos compilados.
pub const ENGINE_VERSION: &str = "1.0";
