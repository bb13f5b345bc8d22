use serde::{Deserialize, Serialize};

use crate::models::{Category, Comment, Post, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub username: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ProfileResponse {
    pub username: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CategoryRef {
    pub title: String,
    pub slug: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CategoryResponse {
    pub title: String,
    pub description: String,
    pub slug: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub author: String,
    pub category: Option<CategoryRef>,
    pub location: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "commentCount")]
    pub comment_count: i64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl UserResponse {
    pub fn new(
        User {
            username,
            email,
            first_name,
            last_name,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            email,
            token,
            username,
            first_name,
            last_name,
        }
    }
}

impl ProfileResponse {
    pub fn new(
        User {
            username,
            first_name,
            last_name,
            ..
        }: User,
    ) -> Self {
        ProfileResponse {
            username,
            first_name,
            last_name,
        }
    }
}

impl CategoryResponse {
    pub fn new(
        Category {
            title,
            description,
            slug,
            ..
        }: Category,
    ) -> Self {
        CategoryResponse {
            title,
            description,
            slug,
        }
    }
}

impl PostResponse {
    pub fn new(
        Post {
            id,
            title,
            text,
            pub_date,
            image,
            is_published,
            created_at,
            author_username,
            category_title,
            category_slug,
            location_name,
            comment_count,
            ..
        }: Post,
    ) -> Self {
        PostResponse {
            id,
            title,
            text,
            pub_date: pub_date.to_rfc3339(),
            author: author_username,
            category: category_title.zip(category_slug).map(|(title, slug)| {
                CategoryRef { title, slug }
            }),
            location: location_name,
            image,
            is_published,
            comment_count,
            created_at: created_at.to_string(),
        }
    }
}

impl CommentResponse {
    pub fn new(
        Comment {
            id,
            text,
            created_at,
            author_username,
            ..
        }: Comment,
    ) -> Self {
        CommentResponse {
            id,
            text,
            author: author_username,
            created_at: created_at.to_string(),
        }
    }
}
