pub mod api;
pub mod auth;
pub mod comment;
pub mod invitation;
pub mod post;

// 重新导出常用类型
pub use api::{ApiClient, SessionEvent};
pub use auth::{AuthService, FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use comment::CommentSync;
pub use invitation::InvitationService;
pub use post::{LikeState, PostService};
