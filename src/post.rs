//! Social media post input type
//!
//! A post is the immutable, request-scoped input to both chatbot operations.
//! It is owned by the caller; this crate never stores or mutates it.

use serde::{Deserialize, Serialize};

/// A social media post to classify or reply to
///
/// Posts always carry a title. The body is optional because some platforms
/// allow title-only submissions (e.g. link posts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMediaPost {
    /// Post title
    pub title: String,

    /// Post body, absent for title-only posts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SocialMediaPost {
    /// Creates a title-only post
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
        }
    }

    /// Creates a post with a title and body
    pub fn with_content(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
        }
    }

    /// Returns true if the post carries a non-empty body
    ///
    /// Whitespace-only bodies count as content; only an absent or empty
    /// string is treated as missing.
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Returns the post body, or an empty string when absent
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_only_post() {
        let post = SocialMediaPost::new("Job search tips?");
        assert_eq!(post.title, "Job search tips?");
        assert!(post.content.is_none());
        assert!(!post.has_content());
        assert_eq!(post.content_or_empty(), "");
    }

    #[test]
    fn test_post_with_content() {
        let post = SocialMediaPost::with_content("Job search tips?", "Any advice on job boards?");
        assert!(post.has_content());
        assert_eq!(post.content_or_empty(), "Any advice on job boards?");
    }

    #[test]
    fn test_empty_content_counts_as_missing() {
        let post = SocialMediaPost::with_content("title", "");
        assert!(!post.has_content());
    }

    #[test]
    fn test_whitespace_content_counts_as_present() {
        let post = SocialMediaPost::with_content("title", "   ");
        assert!(post.has_content());
    }

    #[test]
    fn test_serde_round_trip() {
        let post = SocialMediaPost::with_content("title", "body");
        let json = serde_json::to_string(&post).unwrap();
        let parsed: SocialMediaPost = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, post);
    }

    #[test]
    fn test_serde_omits_absent_content() {
        let post = SocialMediaPost::new("title");
        let json = serde_json::to_string(&post).unwrap();
        assert!(!json.contains("content"));
    }
}
