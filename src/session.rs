//! The authentication token of the signed-in user.
//!
//! A `SessionStore` is shared by every collaborator of the process. It is handed to the API
//! client, which stores the token after a successful login or registration and clears it on
//! logout. Nothing else writes to it.

use crate::{utils, Result};
use anyhow::Context;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// An opaque bearer token. Its `Debug` output is redacted so it does not end up in logs.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(***)")
    }
}

/// The on-disk format of the session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    token: Token,
}

/// Holds the session token, optionally backed by a file. Cloning yields a handle to the same
/// session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
    token: Arc<RwLock<Option<Token>>>,
}

impl SessionStore {
    /// A session that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Loads the session saved at `path`. A missing file means nobody is signed in.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let token = if path.is_file() {
            let file: SessionFile = utils::deserialize(&path)
                .await
                .context("Unable to load the saved session")?;
            debug!("Loaded session from {}", path.display());
            Some(file.token)
        } else {
            trace!("No session file at {}", path.display());
            None
        };
        Ok(Self {
            path: Some(path),
            token: Arc::new(RwLock::new(token)),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn token(&self) -> Option<Token> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Stores `token`, and saves it if the store is backed by a file. The stored token only
    /// changes once the file is written.
    pub async fn set(&self, token: Token) -> Result<()> {
        if let Some(path) = &self.path {
            let data = serde_json::to_string_pretty(&SessionFile {
                token: token.clone(),
            })
            .context("Unable to serialize the session")?;
            utils::write_private(path, data).await?;
            debug!("Saved session to {}", path.display());
        }
        *self.token.write() = Some(token);
        Ok(())
    }

    /// Forgets the token, and deletes the session file if there is one.
    pub async fn clear(&self) -> Result<()> {
        *self.token.write() = None;
        if let Some(path) = &self.path {
            utils::remove_file(path).await?;
            debug!("Removed session file {}", path.display());
        }
        Ok(())
    }
}
