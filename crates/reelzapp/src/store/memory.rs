use super::local_store::LocalStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = LocalStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        LocalStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{User, Video, VideoDuration};
    use crate::session::Session;
    use crate::store::DataStore;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Adds a user with email `<nickname>@example.com` and password `secret1`.
        pub fn with_user(mut self, name: &str, nickname: &str) -> Self {
            let user = User::new(
                name.to_string(),
                nickname.to_string(),
                format!("{}@example.com", nickname),
                "secret1".to_string(),
            );
            let mut users = self.store.load_users().unwrap();
            users.push(user);
            self.store.save_users(&users).unwrap();
            self
        }

        /// Adds a video owned by `nickname`, newest first.
        pub fn with_video(mut self, nickname: &str, title: &str) -> Self {
            let owner = self.user(nickname);
            let video = Video::new(
                title.to_string(),
                format!("About {}", title),
                VideoDuration::from_secs(60),
                owner.owner_snapshot(),
            );
            let mut videos = self.store.load_videos().unwrap();
            videos.insert(0, video);
            self.store.save_videos(&videos).unwrap();
            self
        }

        pub fn user(&self, nickname: &str) -> User {
            self.store
                .load_users()
                .unwrap()
                .into_iter()
                .find(|u| u.nickname == nickname)
                .unwrap()
        }

        pub fn video(&self, title: &str) -> Video {
            self.store
                .load_videos()
                .unwrap()
                .into_iter()
                .find(|v| v.title == title)
                .unwrap()
        }

        /// Logs `nickname` in and returns the session.
        pub fn login(&mut self, nickname: &str) -> Session {
            let user = self.user(nickname);
            Session::establish(&mut self.store, &user).unwrap()
        }
    }
}
