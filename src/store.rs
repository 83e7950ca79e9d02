use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::face::FaceId;
use crate::pixel_buffer::PixelBuffer;
use crate::util::time::timestamp_secs;

/// Errors that can occur while loading or saving textures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize texture: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode texture image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid texture record: {0}")]
    InvalidRecord(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Byte-valued key-value storage the editor saves into
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: &[u8]) -> PersistenceResult<()>;

    /// All keys starting with `prefix`, sorted
    fn list_prefix(&self, prefix: &str) -> PersistenceResult<Vec<String>>;
}

/// In-process store, shareable between threads
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> PersistenceResult<()> {
        self.entries.write().insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn list_prefix(&self, prefix: &str) -> PersistenceResult<Vec<String>> {
        Ok(self
            .entries
            .read()
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

/// Stores each key as one file under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `/` separates key segments; everything else outside `[A-Za-z0-9-_.]` is escaped
    fn file_name(key: &str) -> String {
        let mut name = String::with_capacity(key.len() + 5);
        for ch in key.chars() {
            match ch {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => name.push(ch),
                '/' => name.push('~'),
                other => name.push_str(&format!("%{:06x}", other as u32)),
            }
        }
        name.push_str(".json");
        name
    }

    fn key_from_file_name(name: &str) -> Option<String> {
        let stem = name.strip_suffix(".json")?;
        let mut key = String::with_capacity(stem.len());
        let mut chars = stem.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '~' => key.push('/'),
                '%' => {
                    let code: String = chars.by_ref().take(6).collect();
                    key.push(char::from_u32(u32::from_str_radix(&code, 16).ok()?)?);
                }
                other => key.push(other),
            }
        }
        Some(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>> {
        match fs::read(self.dir.join(Self::file_name(key))) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> PersistenceResult<()> {
        // Create store directory if it doesn't exist
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(Self::file_name(key)), value)?;
        Ok(())
    }

    fn list_prefix(&self, prefix: &str) -> PersistenceResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| Self::key_from_file_name(&entry.file_name().to_string_lossy()))
            .filter(|key| key.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// A saved face texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRecord {
    pub face: FaceId,
    pub width: usize,
    pub height: usize,
    /// Row-major RGBA bytes
    pub pixels: Vec<u8>,
    /// Seconds since the Unix epoch when the record was written
    pub saved_at: u64,
}

impl TextureRecord {
    pub fn new(face: FaceId, buffer: &PixelBuffer) -> Self {
        Self {
            face,
            width: buffer.width(),
            height: buffer.height(),
            pixels: buffer.as_bytes().to_vec(),
            saved_at: timestamp_secs(),
        }
    }

    pub fn to_buffer(&self) -> PersistenceResult<PixelBuffer> {
        PixelBuffer::from_rgba(self.width, self.height, self.pixels.clone())
            .map_err(|e| PersistenceError::InvalidRecord(e.to_string()))
    }
}

/// Storage key of one face of a custom texture
pub fn texture_key(texture: Uuid, face: FaceId) -> String {
    format!("texture/{}/{}", texture, face)
}

/// Writes a face texture record
pub fn save_texture(
    store: &dyn KeyValueStore,
    texture: Uuid,
    face: FaceId,
    buffer: &PixelBuffer,
) -> PersistenceResult<()> {
    let json = serde_json::to_vec(&TextureRecord::new(face, buffer))?;
    store.set(&texture_key(texture, face), &json)
}

/// Reads a face texture record, if one was saved
pub fn load_texture(
    store: &dyn KeyValueStore,
    texture: Uuid,
    face: FaceId,
) -> PersistenceResult<Option<TextureRecord>> {
    let Some(bytes) = store.get(&texture_key(texture, face))? else {
        return Ok(None);
    };
    let record: TextureRecord = serde_json::from_slice(&bytes)?;
    if record.face != face {
        return Err(PersistenceError::InvalidRecord(format!(
            "record for {} stored under {}",
            record.face, face
        )));
    }
    Ok(Some(record))
}

/// Faces of `texture` that have a saved record
pub fn saved_faces(store: &dyn KeyValueStore, texture: Uuid) -> PersistenceResult<Vec<FaceId>> {
    let prefix = format!("texture/{}/", texture);
    Ok(store
        .list_prefix(&prefix)?
        .iter()
        .filter_map(|key| FaceId::from_name(&key[prefix.len()..]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_round_trip_keys() {
        let key = "texture/abc-123/north";
        let name = FileStore::file_name(key);
        assert_eq!(name, "texture~abc-123~north.json");
        assert_eq!(FileStore::key_from_file_name(&name).as_deref(), Some(key));

        let odd = "a b:c";
        assert_eq!(
            FileStore::key_from_file_name(&FileStore::file_name(odd)).as_deref(),
            Some(odd)
        );
    }

    #[test]
    fn test_memory_prefix_listing() {
        let store = MemoryStore::new();
        store.set("texture/a/north", b"1").unwrap();
        store.set("texture/a/up", b"2").unwrap();
        store.set("texture/b/up", b"3").unwrap();
        store.set("other", b"4").unwrap();
        assert_eq!(
            store.list_prefix("texture/a/").unwrap(),
            vec!["texture/a/north".to_owned(), "texture/a/up".to_owned()]
        );
        assert_eq!(store.len(), 4);
    }
}
