use crate::{
    config::Config,
    error::Result,
    models::post::Post,
    services::{
        api::ApiClient,
        auth::{AuthService, FileSessionStore, SessionStore},
        comment::CommentSync,
        invitation::InvitationService,
        post::{LikeState, PostService},
    },
};
use std::sync::Arc;

/// 客户端的共享状态
/// 把配置、传输层和各个服务绑在一起
#[derive(Clone)]
pub struct Shamstagram {
    /// 客户端配置
    pub config: Config,

    /// HTTP 传输层
    pub api: Arc<ApiClient>,

    /// 认证与会话服务
    pub auth: AuthService,

    /// 帖子服务
    pub posts: PostService,

    /// 邀请服务
    pub invitations: InvitationService,
}

impl Shamstagram {
    /// Builds a client with the file-backed session store at the configured
    /// path.
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::with_store(config, store)
    }

    /// Builds a client with a custom session store (tests use the in-memory
    /// one).
    pub fn with_store(config: Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&config)?);
        let auth = AuthService::new(api.clone(), store);
        let posts = PostService::new(api.clone(), config.max_post_length);
        let invitations = InvitationService::new(api.clone());

        Ok(Self {
            config,
            api,
            auth,
            posts,
            invitations,
        })
    }

    /// Comment tree synchronizer for one post. One instance per visible
    /// post; dropping it cancels any pending reconcile timer.
    pub fn comment_sync(&self, post_id: i64) -> CommentSync {
        CommentSync::new(self.api.clone(), &self.config, post_id)
    }

    /// Like state for a post not yet fetched.
    pub fn like_state(&self, post_id: i64) -> LikeState {
        LikeState::new(self.api.clone(), post_id)
    }

    /// Like state seeded from an already-fetched post.
    pub fn like_state_for(&self, post: &Post) -> LikeState {
        LikeState::from_post(self.api.clone(), post)
    }
}
