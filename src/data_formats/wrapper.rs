use serde::{Deserialize, Serialize};

use super::response::{
    CategoryResponse, CommentResponse, PostResponse, ProfileResponse,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostWrapper<T> {
    pub post: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentWrapper<T> {
    pub comment: T,
}

/// One page of a feed plus the metadata a client needs to render a pager.
#[derive(Debug, Deserialize, Serialize)]
pub struct MultiplePostsWrapper {
    pub posts: Vec<PostResponse>,
    #[serde(rename = "postsCount")]
    pub posts_count: i64,
    pub page: u32,
    #[serde(rename = "pageCount")]
    pub page_count: u32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostDetailWrapper {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CategoryFeedWrapper {
    pub category: CategoryResponse,
    #[serde(flatten)]
    pub feed: MultiplePostsWrapper,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileFeedWrapper {
    pub profile: ProfileResponse,
    #[serde(flatten)]
    pub feed: MultiplePostsWrapper,
}

impl<T> UserWrapper<T> {
    pub fn wrap_with_user_data(request: T) -> UserWrapper<T> {
        UserWrapper { user: request }
    }
}
