use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    error::StorageError,
    management::storage::{read_json, validate_key, write_json},
    types::User,
};

/// Lookup of users by identity id.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, identity: &str) -> Result<Option<User>, StorageError>;

    async fn put_user(&self, user: &User) -> Result<(), StorageError>;
}

/// Stores each user as `<root>/users/<identity>.json`.
pub struct FileUserStore {
    root: PathBuf,
}

impl FileUserStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn user_path(&self, identity: &str) -> Result<PathBuf, StorageError> {
        let mut path = self.root.clone();
        path.push("users");
        path.push(format!("{}.json", validate_key(identity)?));
        Ok(path)
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn get_user(&self, identity: &str) -> Result<Option<User>, StorageError> {
        read_json(&self.user_path(identity)?).await
    }

    async fn put_user(&self, user: &User) -> Result<(), StorageError> {
        write_json(&self.user_path(&user.identity_id)?, user).await
    }
}
