use std::{io::ErrorKind, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write token file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove token file {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Caches the single current bearer token, in memory and in a text file.
///
/// The store does no locking of its own. Share it as
/// `Arc<tokio::sync::Mutex<TokenStore>>` when more than one task uploads.
pub struct TokenStore {
    path: PathBuf,
    token: Option<String>,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore {
            path: path.into(),
            token: None,
        }
    }

    /// Returns the current token, reading the file on first use.
    ///
    /// A missing or blank file means there is no token.
    pub async fn get(&mut self) -> Result<Option<String>, TokenStoreError> {
        if let Some(token) = &self.token {
            return Ok(Some(token.clone()));
        }

        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(TokenStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let token = content.trim();
        if token.is_empty() {
            return Ok(None);
        }

        self.token = Some(token.to_string());
        Ok(self.token.clone())
    }

    /// Overwrites the token file and makes `token` current.
    pub async fn save(&mut self, token: &str) -> Result<(), TokenStoreError> {
        let write_err = |source: std::io::Error| TokenStoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }

        async_fs::write(&self.path, token)
            .await
            .map_err(write_err)?;
        self.token = Some(token.to_string());
        Ok(())
    }

    /// Forgets the token and deletes the file. Clearing an empty store is fine.
    pub async fn clear(&mut self) -> Result<(), TokenStoreError> {
        self.token = None;
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(TokenStoreError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
