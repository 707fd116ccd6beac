use std::{io::ErrorKind, path::PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

/// Key holding today's completions, named as the browser build of this app named it.
pub const COMPLETED_TASKS_KEY: &str = "completedTasks";
/// Key holding completion history, a map from `YYYY-MM-DD` to task id sequences.
pub const COMPLETED_BY_DATE_KEY: &str = "completedTasksByDate";

/// Interface for abstracting the key/value persistence behind the store.
/// Values are JSON documents; the store never touches the filesystem directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalStore: Sync + Send {
    /// Reads the value stored under `key`. A key that was never written is `None`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing a key that doesn't exist is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// The main realization of [LocalStore]. Each key is a file inside the application state
/// directory. Files are locked around access since a `watch` session and one-shot
/// commands may touch them at the same time.
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    pub fn new(state_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&state_dir)?;

        Ok(Self { state_dir })
    }

    async fn write_value(file: &mut File, value: &str) -> Result<()> {
        file.set_len(0).await?;
        file.write_all(value.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl LocalStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.state_dir.join(key);
        debug!("Reading {path:?}");
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;
        let mut value = String::new();
        let result = file.read_to_string(&mut value).await;
        file.unlock_async().await?;
        result?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.state_dir.join(key);
        debug!("Writing {path:?}");
        let mut file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&path)
            .await?;
        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::write_value(&mut file, value).await;
        file.unlock_async().await?;
        result
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.state_dir.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
