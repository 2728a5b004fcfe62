//! Follow graph: the ordered set of user ids the current user follows.
//! One `toggle` serves both the follow and unfollow intents.

use crate::config;
use crate::core::db::{Record, StoreAdapter};

impl Record for Vec<String> {
    const KEY: &'static str = config::FOLLOWING_KEY;
    const VERSION: u32 = 1;
}

pub struct FollowGraph {
    store: StoreAdapter,
    following: Vec<String>,
}

impl FollowGraph {
    pub fn open(store: StoreAdapter) -> anyhow::Result<Self> {
        let following = store.load::<Vec<String>>()?.unwrap_or_default();
        Ok(FollowGraph { store, following })
    }

    pub fn following(&self) -> &[String] {
        &self.following
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.following.iter().any(|id| id == user_id)
    }

    /// Remove the id if present, append it otherwise. Returns the new
    /// membership. Calling twice restores the original state.
    pub fn toggle(&mut self, user_id: &str) -> anyhow::Result<bool> {
        if let Some(pos) = self.following.iter().position(|id| id == user_id) {
            self.following.remove(pos);
        } else {
            self.following.push(user_id.to_string());
        }
        self.store.save(&self.following)?;
        Ok(self.is_following(user_id))
    }
}
