//! JSON file [`PetStore`] adapter.
//!
//! Keeps every user's record in one document laid out like the remote
//! database tree:
//!
//! ```text
//! { "users": { "<uid>": { "petData": { "health": 80, ... } } } }
//! ```
//!
//! Reads parse the file afresh so edits made while the host runs are seen
//! on the next poll.  Writes go to a sibling temp file that is renamed over
//! the original, so a crash never leaves a half-written document.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{Ack, Lookup, PetStore, StoreError, UserId};
use crate::pet::record::PetRecord;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    users: BTreeMap<String, UserNode>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserNode {
    #[serde(rename = "petData", default, skip_serializing_if = "Option::is_none")]
    pet_data: Option<PetRecord>,
}

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Document, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => {
                warn!("FileStore: read {} failed: {}", self.path.display(), e);
                return Err(StoreError::IoError);
            }
        };
        if text.trim().is_empty() {
            return Ok(Document::default());
        }
        serde_json::from_str(&text).map_err(|e| {
            warn!("FileStore: {} is not a pet document: {}", self.path.display(), e);
            StoreError::Corrupt
        })
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(doc).map_err(|_| StoreError::Corrupt)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("FileStore: write {} failed: {}", self.path.display(), e);
                StoreError::IoError
            })
    }
}

impl PetStore for FileStore {
    fn read(&self, user: &UserId) -> Result<Lookup, StoreError> {
        let mut doc = self.load()?;
        Ok(match doc.users.remove(user.as_str()).and_then(|n| n.pet_data) {
            Some(record) => Lookup::Found(record),
            None => Lookup::NotFound,
        })
    }

    fn patch(&mut self, user: &UserId, patch: &PetRecord) -> Result<Ack, StoreError> {
        let mut doc = self.load()?;
        doc.users
            .entry(user.as_str().to_string())
            .or_default()
            .pet_data
            .get_or_insert_with(PetRecord::default)
            .merge(patch);
        self.save(&doc)?;

        let fields = patch.field_count();
        debug!("FileStore: {} <- {} field(s)", user.pet_path(), fields);
        Ok(Ack { fields })
    }
}
