use super::backend::StorageBackend;
use super::{keys, CommentsByVideo, ConflictPolicy, DataStore, EdgeLists};
use crate::error::{ReelzError, Result};
use crate::model::{SessionUser, User, Video};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub struct LocalStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    policy: ConflictPolicy,
    mirror_user_videos: bool,
    /// Revision observed at the last read of each key.
    seen: RefCell<HashMap<String, u64>>,
}

impl<B: StorageBackend> LocalStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            policy: ConflictPolicy::default(),
            mirror_user_videos: true,
            seen: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_user_video_mirror(mut self, enabled: bool) -> Self {
        self.mirror_user_videos = enabled;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn revision(&self, key: &str) -> Result<u64> {
        let raw = self.backend.get_item(&keys::revision(key))?;
        Ok(match raw {
            None => 0,
            Some(text) => text.trim().parse().unwrap_or_else(|_| {
                warn!(key, value = %text, "unreadable revision stamp, treating as 0");
                0
            }),
        })
    }

    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        let rev = self.revision(key)?;
        self.seen.borrow_mut().insert(key.to_string(), rev);
        debug!(key, rev, "reading collection");
        self.backend.get_item(key)
    }

    fn read_value(&self, key: &str) -> Result<Option<Value>> {
        let Some(raw) = self.read_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "stored JSON is malformed, treating as empty");
                Ok(None)
            }
        }
    }

    fn parse_elements<T: DeserializeOwned>(key: &str, items: Vec<Value>) -> Vec<T> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!(key, index = i, error = %err, "skipping malformed entry");
                    None
                }
            })
            .collect()
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.read_value(key)? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(Self::parse_elements(key, items)),
            Some(_) => {
                warn!(key, "expected a JSON array, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn read_list_map<T: DeserializeOwned>(&self, key: &str) -> Result<BTreeMap<String, Vec<T>>> {
        let object = match self.read_value(key)? {
            None => return Ok(BTreeMap::new()),
            Some(Value::Object(object)) => object,
            Some(_) => {
                warn!(key, "expected a JSON object, treating as empty");
                return Ok(BTreeMap::new());
            }
        };

        let mut map = BTreeMap::new();
        for (id, entry) in object {
            match entry {
                Value::Array(items) => {
                    map.insert(id, Self::parse_elements(key, items));
                }
                _ => warn!(key, id = %id, "expected a JSON array entry, skipping"),
            }
        }
        Ok(map)
    }

    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_value(key)? {
            None => Ok(None),
            Some(value) => match serde_json::from_value(value) {
                Ok(record) => Ok(Some(record)),
                Err(err) => {
                    warn!(key, error = %err, "stored record has the wrong shape, ignoring");
                    Ok(None)
                }
            },
        }
    }

    fn check_revision(&self, key: &str, stored: u64) -> Result<()> {
        let seen = self.seen.borrow().get(key).copied();
        if let Some(seen) = seen {
            if seen != stored {
                match self.policy {
                    ConflictPolicy::Overwrite => {
                        warn!(key, seen, stored, "key changed since it was read, overwriting");
                    }
                    ConflictPolicy::Reject => {
                        return Err(ReelzError::Conflict {
                            key: key.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn bump_revision(&self, key: &str, stored: u64) -> Result<()> {
        let next = stored + 1;
        self.backend
            .set_item(&keys::revision(key), &next.to_string())?;
        self.seen.borrow_mut().insert(key.to_string(), next);
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let stored = self.revision(key)?;
        self.check_revision(key, stored)?;

        let text = serde_json::to_string(value).map_err(ReelzError::Serialization)?;
        self.backend.set_item(key, &text)?;
        debug!(key, bytes = text.len(), "wrote collection");

        self.bump_revision(key, stored)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let stored = self.revision(key)?;
        self.check_revision(key, stored)?;
        self.backend.remove_item(key)?;
        self.bump_revision(key, stored)
    }
}

impl<B: StorageBackend> DataStore for LocalStore<B> {
    fn load_users(&self) -> Result<Vec<User>> {
        self.read_list(keys::REGISTERED_USERS)
    }

    fn save_users(&mut self, users: &[User]) -> Result<()> {
        self.write_json(keys::REGISTERED_USERS, users)
    }

    fn load_videos(&self) -> Result<Vec<Video>> {
        self.read_list(keys::ALL_VIDEOS)
    }

    fn save_videos(&mut self, videos: &[Video]) -> Result<()> {
        self.write_json(keys::ALL_VIDEOS, videos)
    }

    fn mirror_user_video(&mut self, video: &Video) -> Result<()> {
        if !self.mirror_user_videos {
            return Ok(());
        }
        let key = keys::user_videos(&video.user_id);
        let mut videos: Vec<Video> = self.read_list(&key)?;
        videos.insert(0, video.clone());
        self.write_json(&key, &videos)
    }

    fn load_comments(&self) -> Result<CommentsByVideo> {
        self.read_list_map(keys::VIDEO_COMMENTS)
    }

    fn save_comments(&mut self, comments: &CommentsByVideo) -> Result<()> {
        self.write_json(keys::VIDEO_COMMENTS, comments)
    }

    fn load_likes(&self) -> Result<EdgeLists> {
        self.read_list_map(keys::USER_LIKES)
    }

    fn save_likes(&mut self, likes: &EdgeLists) -> Result<()> {
        self.write_json(keys::USER_LIKES, likes)
    }

    fn load_follows(&self) -> Result<EdgeLists> {
        self.read_list_map(keys::FOLLOW_DATA)
    }

    fn save_follows(&mut self, follows: &EdgeLists) -> Result<()> {
        self.write_json(keys::FOLLOW_DATA, follows)
    }

    fn load_session(&self) -> Result<Option<SessionUser>> {
        self.read_record(keys::CURRENT_USER)
    }

    fn save_session(&mut self, user: &SessionUser) -> Result<()> {
        self.write_json(keys::CURRENT_USER, user)
    }

    fn clear_session(&mut self) -> Result<()> {
        self.remove(keys::CURRENT_USER)
    }
}
