use std::{io::ErrorKind, path::Path};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;

/// Rejects keys that would escape the data directory.
pub fn validate_key(key: &str) -> Result<&str, StorageError> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\'])
        || key.chars().any(char::is_control);

    if bad {
        Err(StorageError::InvalidKey(key.to_string()))
    } else {
        Ok(key)
    }
}

/// Reads a JSON document, returning `None` when the file does not exist.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let content = match async_fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    Ok(Some(serde_json::from_str(&content)?))
}

pub(crate) async fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(value)?;
    async_fs::write(path, json).await?;
    Ok(())
}
