//! Caché en memoria de planillas ya parseadas.
//!
//! La clave es la identidad del contenido (SHA-256 de los bytes subidos más el
//! formato), de modo que volver a subir exactamente el mismo archivo no
//! vuelve a parsearlo. El resultado se comparte como `Arc` sin clonar la tabla.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::LoadError;
use crate::excel::loader::{load_table, SourceFormat};
use crate::models::MemberTable;

#[derive(Debug, Default)]
pub struct TableCache {
    entries: Mutex<HashMap<String, Arc<MemberTable>>>,
}

impl TableCache {
    pub fn new() -> Self {
        TableCache::default()
    }

    pub fn content_key(bytes: &[u8], format: SourceFormat) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format.tag().as_bytes());
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    /// Devuelve la tabla ya parseada para estos bytes o la carga y la guarda.
    /// El lock sólo se mantiene para consultar e insertar; el parseo ocurre
    /// fuera de él. Si dos cargas del mismo contenido compiten, gana la primera
    /// inserción y ambas reciben la misma tabla.
    pub fn get_or_load(&self, bytes: &[u8], format: SourceFormat) -> Result<Arc<MemberTable>, LoadError> {
        let key = Self::content_key(bytes, format);

        {
            let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(existing) = guard.get(&key) {
                debug!(clave = %key, "planilla servida desde caché");
                return Ok(Arc::clone(existing));
            }
        }

        let table = Arc::new(load_table(bytes, format)?);
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = guard.entry(key).or_insert(table);
        Ok(Arc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static TABLE_CACHE: OnceLock<TableCache> = OnceLock::new();

/// Caché global del proceso.
pub fn global_cache() -> &'static TableCache {
    TABLE_CACHE.get_or_init(TableCache::new)
}

/// `load_table` memoizado en la caché global.
pub fn load_table_cached(bytes: &[u8], format: SourceFormat) -> Result<Arc<MemberTable>, LoadError> {
    global_cache().get_or_load(bytes, format)
}
