use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguishes a field that was absent (`None`) from one sent as an
/// explicit null (`Some(None)`), so nullable columns can be cleared.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ----------------- User Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ChangePasswordRequest {
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// ----------------- Post Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CreatePostRequest {
    pub title: String,
    pub text: String,
    // Future dates are allowed and keep the post off public feeds until then.
    #[serde(rename = "pubDate")]
    pub pub_date: DateTime<Utc>,
    #[serde(default, rename = "categoryId")]
    pub category_id: Option<i64>,
    #[serde(default, rename = "locationId")]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<DateTime<Utc>>,
    // Nullable columns: absent means "leave as is", null means "clear".
    #[serde(rename = "categoryId", deserialize_with = "double_option")]
    pub category_id: Option<Option<i64>>,
    #[serde(rename = "locationId", deserialize_with = "double_option")]
    pub location_id: Option<Option<i64>>,
    #[serde(deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
}

// ----------------- Comment Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CommentRequest {
    pub text: String,
}
