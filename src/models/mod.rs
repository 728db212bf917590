pub mod bot;
pub mod comment;
pub mod invitation;
pub mod post;
pub mod user;

// 重新导出常用类型
pub use bot::{BotPersona, BOT_PERSONAS};
pub use comment::{Comment, CommentAuthor, CommentList, CreateCommentRequest, UpdateCommentRequest};
pub use invitation::{
    CreateInvitationRequest, CreatedInvitation, Invitation, InvitationStats,
    VerifyInvitationResponse,
};
pub use post::{CreatePostRequest, LikeStatus, Post, PostAuthor};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User, UserStats};
