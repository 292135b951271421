use serde::Deserialize;

/// Body for POST /api/post.
#[derive(Debug, Deserialize)]
pub struct CreatePost {
    #[serde(default)]
    pub text: String,
}
