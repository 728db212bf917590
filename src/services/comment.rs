use crate::{
    config::Config,
    error::{ClientError, Result},
    models::comment::{
        Comment, CommentList, CommentResponse, CreateCommentRequest, UpdateCommentRequest,
    },
    services::api::ApiClient,
    utils::validation::validate_comment_content,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct TreeState {
    comments: Vec<Comment>,
    total: usize,
    /// Sequence number of the last applied load. Responses carrying an older
    /// sequence are discarded so a slow reconcile cannot clobber newer data.
    applied_seq: u64,
}

/// Client-side view of one post's comment tree. Keeps the tree navigable and
/// editable while bot-authored replies trickle in server-side; the only
/// channel by which those become visible is a delayed reconciling re-fetch
/// after each successful create.
///
/// Mutations apply local state from the server-confirmed response only, so a
/// failed request leaves the tree untouched.
pub struct CommentSync {
    api: Arc<ApiClient>,
    post_id: i64,
    max_content_length: usize,
    max_nesting_level: usize,
    reconcile_delay: Duration,
    state: Arc<RwLock<TreeState>>,
    load_seq: Arc<AtomicU64>,
    pending_reconcile: Mutex<Option<JoinHandle<()>>>,
}

impl CommentSync {
    pub fn new(api: Arc<ApiClient>, config: &Config, post_id: i64) -> Self {
        Self {
            api,
            post_id,
            max_content_length: config.max_comment_length,
            max_nesting_level: config.max_nesting_level,
            reconcile_delay: Duration::from_millis(config.reconcile_delay_ms),
            state: Arc::new(RwLock::new(TreeState::default())),
            load_seq: Arc::new(AtomicU64::new(0)),
            pending_reconcile: Mutex::new(None),
        }
    }

    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    /// Fetches the full comment tree and replaces local state wholesale.
    /// Returns the total comment count.
    pub async fn load(&self) -> Result<usize> {
        fetch_into(&self.api, self.post_id, &self.state, &self.load_seq).await
    }

    /// Creates a comment (top-level when `parent_id` is absent, a reply
    /// otherwise), inserts the canonical server comment into the tree, and
    /// schedules a reconciling re-load to absorb bot-authored side effects.
    pub async fn create(&self, content: &str, parent_id: Option<i64>) -> Result<Comment> {
        let content = content.trim();
        validate_comment_content(content, self.max_content_length)?;

        if let Some(pid) = parent_id {
            let state = self.state.read().await;
            let depth = depth_of(&state.comments, pid)
                .ok_or_else(|| ClientError::not_found("Parent comment"))?;
            if depth >= self.max_nesting_level {
                return Err(ClientError::validation(
                    "Replies are limited to three levels of nesting",
                ));
            }
        }

        let request = CreateCommentRequest {
            content: content.to_string(),
            parent_id,
        };
        let response: CommentResponse = self
            .api
            .post(&format!("/posts/{}/comments", self.post_id), &request)
            .await?;
        let comment = response.comment;

        {
            let mut state = self.state.write().await;
            match parent_id {
                // Newest top-level comment goes first.
                None => state.comments.insert(0, comment.clone()),
                Some(pid) => {
                    if !insert_reply(&mut state.comments, pid, comment.clone()) {
                        // Parent vanished between the depth check and the
                        // response; the reconcile re-load will settle it.
                        warn!("Parent comment {} gone, deferring to reconcile", pid);
                    }
                }
            }
            state.total += 1;
        }

        self.schedule_reconcile();
        Ok(comment)
    }

    /// Replaces only the `content` of the matching node, wherever it sits in
    /// the tree, preserving its id, author and replies.
    pub async fn edit(&self, comment_id: i64, content: &str) -> Result<()> {
        let content = content.trim();
        validate_comment_content(content, self.max_content_length)?;

        let request = UpdateCommentRequest {
            content: content.to_string(),
        };
        let response: CommentResponse = self
            .api
            .put(&format!("/comments/{}", comment_id), &request)
            .await?;

        let mut state = self.state.write().await;
        if !update_content(&mut state.comments, comment_id, &response.comment.content) {
            warn!("Edited comment {} not present in local tree", comment_id);
        }
        Ok(())
    }

    /// Removes the matching node and its entire subtree. `total` decreases
    /// by the number of nodes removed.
    pub async fn delete(&self, comment_id: i64) -> Result<()> {
        self.api.delete(&format!("/comments/{}", comment_id)).await?;

        let mut state = self.state.write().await;
        let removed = remove_comment(&mut state.comments, comment_id);
        if removed == 0 {
            warn!("Deleted comment {} not present in local tree", comment_id);
        }
        state.total = state.total.saturating_sub(removed);
        Ok(())
    }

    /// Whether a reply action should be offered for a comment at the given
    /// depth (root = 0).
    pub fn can_reply_at(&self, depth: usize) -> bool {
        depth < self.max_nesting_level
    }

    /// Snapshot of the current tree.
    pub async fn comments(&self) -> Vec<Comment> {
        self.state.read().await.comments.clone()
    }

    pub async fn total(&self) -> usize {
        self.state.read().await.total
    }

    /// Schedules the single pending reconcile re-load, replacing (and
    /// aborting) any previously scheduled one.
    fn schedule_reconcile(&self) {
        let api = self.api.clone();
        let state = self.state.clone();
        let load_seq = self.load_seq.clone();
        let post_id = self.post_id;
        let delay = self.reconcile_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Reconciling comment tree for post {}", post_id);
            if let Err(e) = fetch_into(&api, post_id, &state, &load_seq).await {
                // Bot comments surface on the next load; not fatal.
                debug!("Reconcile fetch failed: {}", e);
            }
        });

        let mut pending = self.pending_reconcile.lock().unwrap();
        if let Some(old) = pending.replace(handle) {
            old.abort();
        }
    }

    /// Aborts a pending reconcile, if any.
    pub fn cancel_reconcile(&self) {
        if let Some(handle) = self.pending_reconcile.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for CommentSync {
    fn drop(&mut self) {
        self.cancel_reconcile();
    }
}

/// Shared fetch path for explicit loads and reconcile timers. The sequence
/// number is taken when the request is issued; a response that lost the race
/// to a newer one is dropped.
async fn fetch_into(
    api: &ApiClient,
    post_id: i64,
    state: &RwLock<TreeState>,
    load_seq: &AtomicU64,
) -> Result<usize> {
    let seq = load_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let list: CommentList = api.get(&format!("/posts/{}/comments", post_id)).await?;

    let mut state = state.write().await;
    if seq > state.applied_seq {
        state.comments = list.comments;
        state.total = list.total;
        state.applied_seq = seq;
    } else {
        debug!("Dropping stale comment load (seq {})", seq);
    }
    Ok(state.total)
}

// Tree helpers. The tree is small (UI-scale), so lookups are plain recursive
// walks rather than anything indexed.

pub fn find_comment(comments: &[Comment], id: i64) -> Option<&Comment> {
    for comment in comments {
        if comment.id == id {
            return Some(comment);
        }
        if let Some(found) = find_comment(&comment.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Nesting depth of the given comment: 0 for top-level, 1 for a reply, etc.
pub fn depth_of(comments: &[Comment], id: i64) -> Option<usize> {
    for comment in comments {
        if comment.id == id {
            return Some(0);
        }
        if let Some(depth) = depth_of(&comment.replies, id) {
            return Some(depth + 1);
        }
    }
    None
}

/// Appends `comment` to the replies of the comment with `parent_id`.
/// Returns false when no such parent exists.
pub fn insert_reply(comments: &mut [Comment], parent_id: i64, comment: Comment) -> bool {
    for candidate in comments {
        if candidate.id == parent_id {
            candidate.replies.push(comment);
            return true;
        }
        if insert_reply(&mut candidate.replies, parent_id, comment.clone()) {
            return true;
        }
    }
    false
}

/// Replaces the content of the matching node. Returns false when absent.
pub fn update_content(comments: &mut [Comment], id: i64, content: &str) -> bool {
    for comment in comments {
        if comment.id == id {
            comment.content = content.to_string();
            return true;
        }
        if update_content(&mut comment.replies, id, content) {
            return true;
        }
    }
    false
}

/// Removes the matching node together with its subtree from wherever it sits.
/// Returns the number of nodes removed (0 when absent).
pub fn remove_comment(comments: &mut Vec<Comment>, id: i64) -> usize {
    if let Some(index) = comments.iter().position(|c| c.id == id) {
        let removed = comments.remove(index);
        return subtree_size(&removed);
    }
    for comment in comments {
        let removed = remove_comment(&mut comment.replies, id);
        if removed > 0 {
            return removed;
        }
    }
    0
}

fn subtree_size(comment: &Comment) -> usize {
    1 + comment.replies.iter().map(subtree_size).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::CommentAuthor;
    use chrono::Utc;

    fn comment(id: i64, parent_id: Option<i64>, replies: Vec<Comment>) -> Comment {
        Comment {
            id,
            post_id: 1,
            parent_id,
            content: format!("comment {}", id),
            author: Some(CommentAuthor {
                id: 7,
                nickname: "tester".to_string(),
                avatar: 1,
            }),
            bot_name: None,
            is_bot: false,
            created_at: Utc::now(),
            replies,
        }
    }

    fn sample_tree() -> Vec<Comment> {
        // 1
        // └─ 2
        //    └─ 3
        // 4
        vec![
            comment(
                1,
                None,
                vec![comment(2, Some(1), vec![comment(3, Some(2), vec![])])],
            ),
            comment(4, None, vec![]),
        ]
    }

    #[test]
    fn test_find_at_any_level() {
        let tree = sample_tree();
        assert_eq!(find_comment(&tree, 1).map(|c| c.id), Some(1));
        assert_eq!(find_comment(&tree, 3).map(|c| c.id), Some(3));
        assert!(find_comment(&tree, 99).is_none());
    }

    #[test]
    fn test_depth() {
        let tree = sample_tree();
        assert_eq!(depth_of(&tree, 1), Some(0));
        assert_eq!(depth_of(&tree, 2), Some(1));
        assert_eq!(depth_of(&tree, 3), Some(2));
        assert_eq!(depth_of(&tree, 99), None);
    }

    #[test]
    fn test_insert_reply_under_nested_parent() {
        let mut tree = sample_tree();
        assert!(insert_reply(&mut tree, 2, comment(5, Some(2), vec![])));

        let parent = find_comment(&tree, 2).unwrap();
        assert_eq!(parent.replies.len(), 2);
        assert_eq!(parent.replies[1].id, 5);
        // Every reply points back at its container.
        assert!(parent.replies.iter().all(|r| r.parent_id == Some(2)));
    }

    #[test]
    fn test_insert_reply_missing_parent() {
        let mut tree = sample_tree();
        assert!(!insert_reply(&mut tree, 99, comment(5, Some(99), vec![])));
    }

    #[test]
    fn test_update_content_preserves_structure() {
        let mut tree = sample_tree();
        assert!(update_content(&mut tree, 2, "new text"));

        let edited = find_comment(&tree, 2).unwrap();
        assert_eq!(edited.content, "new text");
        assert_eq!(edited.id, 2);
        assert_eq!(edited.replies.len(), 1);
        assert!(edited.author.is_some());
    }

    #[test]
    fn test_remove_leaf() {
        let mut tree = sample_tree();
        assert_eq!(remove_comment(&mut tree, 3), 1);
        assert!(find_comment(&tree, 3).is_none());
        assert!(find_comment(&tree, 2).is_some());
    }

    #[test]
    fn test_remove_takes_subtree() {
        let mut tree = sample_tree();
        // Removing 1 takes 2 and 3 with it.
        assert_eq!(remove_comment(&mut tree, 1), 3);
        assert!(find_comment(&tree, 1).is_none());
        assert!(find_comment(&tree, 2).is_none());
        assert!(find_comment(&tree, 3).is_none());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, 4);
    }

    #[test]
    fn test_remove_missing() {
        let mut tree = sample_tree();
        assert_eq!(remove_comment(&mut tree, 99), 0);
        assert_eq!(tree.len(), 2);
    }
}
