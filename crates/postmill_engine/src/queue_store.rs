//! One-shot queued posts.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use postmill_core::{NewQueuedPost, QueueStatus, QueuedPost};
use postmill_error::{InvalidRequestError, NotFoundError, PostmillResult};
use rand::Rng;
use tracing::{debug, info};

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `post_<millis>_<9 base36 chars>`
fn generate_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("post_{}_{}", now.timestamp_millis(), suffix)
}

/// In-memory store of one-shot posts.
///
/// Status only moves from `scheduled` to the terminal `published`; a claimed
/// post is never handed out again.
#[derive(Debug, Default)]
pub struct QueueStore {
    posts: Mutex<Vec<QueuedPost>>,
}

impl QueueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All posts ordered by scheduled time.
    pub fn list(&self) -> Vec<QueuedPost> {
        let mut posts = self.posts.lock().clone();
        posts.sort_by_key(|p| *p.scheduled_time());
        posts
    }

    /// Look up a post.
    pub fn get(&self, id: &str) -> Option<QueuedPost> {
        self.posts.lock().iter().find(|p| p.id() == id).cloned()
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.posts.lock().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.lock().is_empty()
    }

    /// Queue a new post in the `scheduled` state.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] when the post has no platforms.
    pub fn create(&self, input: NewQueuedPost, now: DateTime<Utc>) -> PostmillResult<QueuedPost> {
        input.validate()?;
        let post = QueuedPost::new(generate_id(now), input, now);
        info!(id = %post.id(), scheduled_time = %post.scheduled_time(), "Post queued");
        self.posts.lock().push(post.clone());
        Ok(post)
    }

    /// Set a post's status.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown id and
    /// [`InvalidRequestError`] when moving a terminal post back to
    /// `scheduled`.
    pub fn update_status(
        &self,
        id: &str,
        status: QueueStatus,
        now: DateTime<Utc>,
    ) -> PostmillResult<QueuedPost> {
        let mut posts = self.posts.lock();
        let post = posts
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| NotFoundError::new("post", id))?;
        if post.status().is_terminal() && !status.is_terminal() {
            return Err(InvalidRequestError::new(format!(
                "Post '{}' is already {} and cannot return to scheduled",
                id,
                post.status()
            ))
            .into());
        }
        post.set_status(status, now);
        Ok(post.clone())
    }

    /// Delete a post regardless of status.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown id.
    pub fn delete(&self, id: &str) -> PostmillResult<QueuedPost> {
        let mut posts = self.posts.lock();
        let index = posts
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| NotFoundError::new("post", id))?;
        let removed = posts.remove(index);
        info!(id, "Post deleted");
        Ok(removed)
    }

    /// Claim every due post, marking it terminal under the store lock.
    ///
    /// Concurrent callers never receive the same post.
    pub fn claim_due(&self, now: DateTime<Utc>, window: Duration) -> Vec<QueuedPost> {
        let mut posts = self.posts.lock();
        let mut claimed: Vec<QueuedPost> = posts
            .iter_mut()
            .filter(|p| p.is_due(now, window))
            .map(|p| {
                p.set_status(QueueStatus::Published, now);
                p.clone()
            })
            .collect();
        drop(posts);

        claimed.sort_by_key(|p| *p.scheduled_time());
        debug!(count = claimed.len(), "Claimed due posts");
        claimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postmill_core::{NewQueuedPostBuilder, Platform};

    fn input(at: DateTime<Utc>) -> NewQueuedPost {
        NewQueuedPostBuilder::default()
            .content(Some("hello".to_string()))
            .platforms(vec![Platform::Facebook])
            .scheduled_time(at)
            .build()
            .unwrap()
    }

    #[test]
    fn test_id_format() {
        let id = generate_id(Utc::now());
        let parts: Vec<_> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "post");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_list_is_sorted() {
        let store = QueueStore::new();
        let now = Utc::now();
        store.create(input(now + Duration::hours(2)), now).unwrap();
        store.create(input(now + Duration::hours(1)), now).unwrap();
        let times: Vec<_> = store.list().iter().map(|p| *p.scheduled_time()).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_claim_is_at_most_once() {
        let store = QueueStore::new();
        let now = Utc::now();
        let post = store.create(input(now), now).unwrap();

        let first = store.claim_due(now, Duration::minutes(5));
        let second = store.claim_due(now, Duration::minutes(5));
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(*store.get(post.id()).unwrap().status(), QueueStatus::Published);
    }

    #[test]
    fn test_terminal_cannot_return_to_scheduled() {
        let store = QueueStore::new();
        let now = Utc::now();
        let post = store.create(input(now), now).unwrap();
        store
            .update_status(post.id(), QueueStatus::Published, now)
            .unwrap();
        assert!(
            store
                .update_status(post.id(), QueueStatus::Scheduled, now)
                .is_err()
        );
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let store = QueueStore::new();
        assert!(store.delete("post_missing").is_err());
    }
}
