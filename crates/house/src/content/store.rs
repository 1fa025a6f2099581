use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{HouseError, HouseResult};

use super::atomic_io::write_text_atomic;

pub const HOUSE_FILE_SUFFIX: &str = ".house.json";
pub const SAVE_FILE_SUFFIX: &str = ".game.json";

const ILLEGAL_FILE_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Read/write access to named text files. Names passed here are physical
/// names, i.e. a logical file name plus one of the suffixes above.
pub trait FileStore {
    fn exists(&self, name: &str) -> bool;
    fn read_all(&self, name: &str) -> HouseResult<String>;
    fn write_all(&mut self, name: &str, text: &str) -> HouseResult<()>;
}

pub fn house_file_path(file_name: &str) -> String {
    format!("{file_name}{HOUSE_FILE_SUFFIX}")
}

pub fn save_file_path(file_name: &str) -> String {
    format!("{file_name}{SAVE_FILE_SUFFIX}")
}

/// A logical file name must be non-blank and free of path separators,
/// whitespace, and characters that are not portable in file names.
pub fn validate_file_name(field: &str, value: &str) -> HouseResult<()> {
    if value.trim().is_empty() {
        return Err(HouseError::invalid_value(
            field,
            value,
            "file name must not be empty",
        ));
    }
    if let Some(bad) = value
        .chars()
        .find(|ch| ch.is_whitespace() || ILLEGAL_FILE_NAME_CHARS.contains(ch))
    {
        let shown = if bad.is_whitespace() {
            "whitespace".to_string()
        } else {
            format!("'{bad}'")
        };
        return Err(HouseError::invalid_value(
            field,
            value,
            format!("file name must not contain {shown}"),
        ));
    }
    Ok(())
}

/// Reads and loads a logical file through `store`, mapping absence to `FileNotFound`.
pub(crate) fn read_logical(
    store: &dyn FileStore,
    logical_name: &str,
    physical_name: &str,
) -> HouseResult<String> {
    if !store.exists(physical_name) {
        return Err(HouseError::FileNotFound {
            name: logical_name.to_string(),
        });
    }
    store.read_all(physical_name)
}

/// Files under a directory; writes go through a temp file and rename.
/// Saved games can be kept apart from houses with [`FsFileStore::with_save_dir`].
#[derive(Debug, Clone)]
pub struct FsFileStore {
    dir: PathBuf,
    save_dir: Option<PathBuf>,
}

impl FsFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            save_dir: None,
        }
    }

    pub fn with_save_dir(mut self, save_dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(save_dir.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_dir(&self) -> &Path {
        self.save_dir.as_deref().unwrap_or(&self.dir)
    }

    fn path_of(&self, name: &str) -> PathBuf {
        if name.ends_with(SAVE_FILE_SUFFIX) {
            self.save_dir().join(name)
        } else {
            self.dir.join(name)
        }
    }
}

impl FileStore for FsFileStore {
    fn exists(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    fn read_all(&self, name: &str) -> HouseResult<String> {
        fs::read_to_string(self.path_of(name)).map_err(|source| io_error(name, source))
    }

    fn write_all(&mut self, name: &str, text: &str) -> HouseResult<()> {
        write_text_atomic(&self.path_of(name), text).map_err(|source| io_error(name, source))
    }
}

/// In-memory store, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFileStore {
    files: BTreeMap<String, String>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, text: &str) -> Self {
        self.files.insert(name.to_string(), text.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.files.keys().map(String::as_str)
    }
}

impl FileStore for MemoryFileStore {
    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn read_all(&self, name: &str) -> HouseResult<String> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| io_error(name, io::Error::from(io::ErrorKind::NotFound)))
    }

    fn write_all(&mut self, name: &str, text: &str) -> HouseResult<()> {
        self.files.insert(name.to_string(), text.to_string());
        Ok(())
    }
}

fn io_error(name: &str, source: io::Error) -> HouseError {
    HouseError::Io {
        name: name.to_string(),
        source,
    }
}
