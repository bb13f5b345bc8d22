use chrono::{DateTime, NaiveDateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// A post row joined with everything the feeds and the detail page show:
/// author username, category/location labels and the comment count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub author_username: String,
    pub category_title: Option<String>,
    pub category_slug: Option<String>,
    pub category_is_published: Option<bool>,
    pub location_name: Option<String>,
    pub comment_count: i64,
}

impl Post {
    /// Public visibility: published, not future-dated, and the category
    /// (when one is set) is published too. Authors bypass this check for
    /// their own posts.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_published
            && self.pub_date <= now
            && (self.category_id.is_none() || self.category_is_published.unwrap_or(false))
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub author_username: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(is_published: bool, pub_date: DateTime<Utc>, category: Option<(i64, bool)>) -> Post {
        Post {
            id: 1,
            title: "title".to_string(),
            text: "text".to_string(),
            pub_date,
            author_id: 1,
            category_id: category.map(|(id, _)| id),
            location_id: None,
            image: None,
            is_published,
            created_at: Utc::now().naive_utc(),
            author_username: "author".to_string(),
            category_title: None,
            category_slug: None,
            category_is_published: category.map(|(_, published)| published),
            location_name: None,
            comment_count: 0,
        }
    }

    #[test]
    fn published_past_post_in_published_category_is_visible() {
        let now = Utc::now();
        assert!(post(true, now - Duration::days(1), Some((1, true))).is_visible(now));
    }

    #[test]
    fn future_dated_post_is_hidden() {
        let now = Utc::now();
        assert!(!post(true, now + Duration::days(1), Some((1, true))).is_visible(now));
    }

    #[test]
    fn unpublished_post_is_hidden() {
        let now = Utc::now();
        assert!(!post(false, now - Duration::days(1), Some((1, true))).is_visible(now));
    }

    #[test]
    fn post_in_unpublished_category_is_hidden() {
        let now = Utc::now();
        assert!(!post(true, now - Duration::days(1), Some((1, false))).is_visible(now));
    }

    #[test]
    fn post_without_category_is_visible() {
        let now = Utc::now();
        assert!(post(true, now - Duration::days(1), None).is_visible(now));
    }

    #[test]
    fn post_dated_exactly_now_is_visible() {
        let now = Utc::now();
        assert!(post(true, now, None).is_visible(now));
    }
}
