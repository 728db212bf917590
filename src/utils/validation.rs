use crate::error::{ClientError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub fn validate_email(email: &str) -> bool {
    validator::validate_email(email)
}

pub fn validate_email_format(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(ClientError::validation("Email is required"));
    }

    if !validator::validate_email(email) {
        return Err(ClientError::validation("Invalid email address"));
    }

    if email.len() > 254 {
        return Err(ClientError::validation("Email address is too long"));
    }

    Ok(())
}

/// Email validation plus business rules: an invitation-gated platform has no
/// use for throwaway addresses.
pub fn validate_email_enhanced(email: &str) -> Result<()> {
    validate_email_format(email)?;

    if is_disposable_email_domain(email) {
        return Err(ClientError::validation(
            "Disposable email addresses are not supported",
        ));
    }

    Ok(())
}

fn is_disposable_email_domain(email: &str) -> bool {
    static DISPOSABLE_DOMAINS: OnceLock<Regex> = OnceLock::new();

    let pattern = DISPOSABLE_DOMAINS.get_or_init(|| {
        Regex::new(r"@(10minutemail|tempmail|guerrillamail|mailinator|yopmail)\.").unwrap()
    });

    pattern.is_match(&email.to_lowercase())
}

pub fn validate_nickname(nickname: &str) -> Result<()> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(ClientError::validation("Nickname is required"));
    }

    let length = nickname.chars().count();
    if length < 2 {
        return Err(ClientError::validation(
            "Nickname must be at least 2 characters",
        ));
    }
    if length > 20 {
        return Err(ClientError::validation(
            "Nickname must be at most 20 characters",
        ));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < 8 {
        return Err(ClientError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(())
}

pub fn validate_avatar(avatar: u8) -> Result<()> {
    if !(1..=5).contains(&avatar) {
        return Err(ClientError::validation("Avatar index must be 1 through 5"));
    }
    Ok(())
}

/// Comment content check applied before any request is issued: non-empty
/// after trimming and within the configured length cap. Length counts
/// characters, not bytes, since content is user-visible Korean text.
pub fn validate_comment_content(content: &str, max_length: usize) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ClientError::validation("Comment content is required"));
    }
    if content.chars().count() > max_length {
        return Err(ClientError::Validation(format!(
            "Comment is too long (max {} characters)",
            max_length
        )));
    }
    Ok(())
}

pub fn validate_post_text(text: &str, max_length: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ClientError::validation("Post text is required"));
    }
    if text.chars().count() > max_length {
        return Err(ClientError::Validation(format!(
            "Post is too long (max {} characters)",
            max_length
        )));
    }
    Ok(())
}
