//! Generic per-object attribute storage: owner → block tag → JSON value.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;

use crate::combat::ObjectId;
use crate::error::StorageError;

pub trait AttributeStorage {
    fn read_block(&self, owner: ObjectId, tag: &str) -> Result<Option<Value>, StorageError>;

    fn write_block(&mut self, owner: ObjectId, tag: &str, block: Value)
        -> Result<(), StorageError>;

    /// Returns whether a block was present.
    fn remove_block(&mut self, owner: ObjectId, tag: &str) -> Result<bool, StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAttributeStorage {
    blocks: HashMap<ObjectId, BTreeMap<String, Value>>,
}

impl MemoryAttributeStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttributeStorage for MemoryAttributeStorage {
    fn read_block(&self, owner: ObjectId, tag: &str) -> Result<Option<Value>, StorageError> {
        Ok(self
            .blocks
            .get(&owner)
            .and_then(|attrs| attrs.get(tag))
            .cloned())
    }

    fn write_block(
        &mut self,
        owner: ObjectId,
        tag: &str,
        block: Value,
    ) -> Result<(), StorageError> {
        self.blocks
            .entry(owner)
            .or_default()
            .insert(tag.to_string(), block);
        Ok(())
    }

    fn remove_block(&mut self, owner: ObjectId, tag: &str) -> Result<bool, StorageError> {
        let Some(attrs) = self.blocks.get_mut(&owner) else {
            return Ok(false);
        };
        let removed = attrs.remove(tag).is_some();
        if attrs.is_empty() {
            self.blocks.remove(&owner);
        }
        Ok(removed)
    }
}

/// On-disk layout: `{ "<owner id>": { "<tag>": <block>, ... }, ... }`.
type FileLayout = BTreeMap<String, BTreeMap<String, Value>>;

/// Attribute storage persisted as a single JSON document.
///
/// Every operation reads the file; writes rewrite it whole. A missing file is empty storage.
#[derive(Debug, Clone)]
pub struct JsonFileAttributeStorage {
    path: PathBuf,
}

impl JsonFileAttributeStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<FileLayout, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(FileLayout::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(FileLayout::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, layout: &FileLayout) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_string_pretty(layout)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl AttributeStorage for JsonFileAttributeStorage {
    fn read_block(&self, owner: ObjectId, tag: &str) -> Result<Option<Value>, StorageError> {
        let mut layout = self.load()?;
        Ok(layout
            .get_mut(&owner.to_string())
            .and_then(|attrs| attrs.remove(tag)))
    }

    fn write_block(
        &mut self,
        owner: ObjectId,
        tag: &str,
        block: Value,
    ) -> Result<(), StorageError> {
        let mut layout = self.load()?;
        layout
            .entry(owner.to_string())
            .or_default()
            .insert(tag.to_string(), block);
        self.save(&layout)
    }

    fn remove_block(&mut self, owner: ObjectId, tag: &str) -> Result<bool, StorageError> {
        let mut layout = self.load()?;
        let key = owner.to_string();
        let Some(attrs) = layout.get_mut(&key) else {
            return Ok(false);
        };
        if attrs.remove(tag).is_none() {
            return Ok(false);
        }
        if attrs.is_empty() {
            layout.remove(&key);
        }
        self.save(&layout)?;
        Ok(true)
    }
}
