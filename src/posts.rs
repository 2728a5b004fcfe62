//! Feed store. The post sequence is the chronology: newest-first is
//! enforced purely by prepending at creation, never by sorting on the
//! `timestamp` display string.

use crate::config;
use crate::core::db::{Record, StoreAdapter};
use crate::core::helpers::millis_id;
use crate::models::models::{Post, User};

impl Record for Vec<Post> {
    const KEY: &'static str = config::POSTS_KEY;
    const VERSION: u32 = 1;
}

pub struct FeedStore {
    store: StoreAdapter,
    posts: Vec<Post>,
}

impl FeedStore {
    pub fn open(store: StoreAdapter) -> anyhow::Result<Self> {
        let posts = store.load::<Vec<Post>>()?.unwrap_or_default();
        Ok(FeedStore { store, posts })
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Prepend a new post and persist the whole list. Returns `None`
    /// without touching anything when the trimmed content is empty and no
    /// image was attached.
    pub fn create_post(
        &mut self,
        author: &User,
        content: &str,
        image: Option<String>,
        ai_generated: bool,
    ) -> anyhow::Result<Option<Post>> {
        let image = image.filter(|url| !url.is_empty());
        if content.trim().is_empty() && image.is_none() {
            return Ok(None);
        }

        let post = Post {
            id: millis_id(),
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            user_handle: author.handle.clone(),
            user_avatar: author.avatar.clone(),
            content: content.to_string(),
            timestamp: "Just now".to_string(),
            likes: 0,
            comments: 0,
            reblues: 0,
            image,
            is_ai_generated: ai_generated.then_some(true),
        };

        self.posts.insert(0, post.clone());
        self.store.save(&self.posts)?;
        Ok(Some(post))
    }

    /// Lazy, restartable author filter preserving feed order.
    pub fn posts_by<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts.iter().filter(move |post| post.user_id == user_id)
    }
}

/// Presentation-local like state, seeded from a post's persisted count.
/// Toggles are never written back to the feed store, so re-rendering from
/// storage resets every counter to its creation-time value.
#[derive(Clone, Copy, Debug)]
pub struct LikeState {
    liked: bool,
    count: u32,
}

impl LikeState {
    pub fn for_post(post: &Post) -> Self {
        LikeState {
            liked: false,
            count: post.likes,
        }
    }

    pub fn toggle(&mut self) {
        if self.liked {
            self.count -= 1;
        } else {
            self.count += 1;
        }
        self.liked = !self.liked;
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
