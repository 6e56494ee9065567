//! Hash helpers – blake3 como identidad estable de parámetros y documentos.

use blake3::Hasher;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex().to_string()
}

/// Hashea una secuencia ordenada de partes. Cada parte va prefijada por su
/// longitud para que `["ab","c"]` y `["a","bc"]` no colisionen.
pub fn hash_parts<I, S>(parts: I) -> String
    where I: IntoIterator<Item = S>,
          S: AsRef<str>
{
    let mut hasher = Hasher::new();
    for part in parts {
        let bytes = part.as_ref().as_bytes();
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    hasher.finalize().to_hex().to_string()
}
