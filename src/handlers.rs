use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    Extension, Json,
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    authentication::{
        authorize_owner, get_jwt_token, hash_password_argon2, verify_password_argon2, MaybeUser,
    },
    data_formats::{
        CategoryFeedWrapper, CategoryResponse, ChangePasswordRequest, CommentRequest,
        CommentResponse, CommentWrapper, CreatePostRequest, LoginRequest, MultiplePostsWrapper,
        PostDetailWrapper, PostResponse, PostWrapper, ProfileFeedWrapper, ProfileResponse,
        RegisterRequest, UpdatePostRequest, UpdateProfileRequest, UserResponse, UserWrapper,
    },
    db_helpers::{
        add_comment_to_post_in_db, count_category_feed_in_db, count_home_feed_in_db,
        count_profile_feed_in_db, create_post_in_db, delete_comment_in_db, delete_post_in_db,
        get_category_by_id_in_db, get_category_by_slug_in_db, get_comment_for_post_in_db,
        get_location_by_id_in_db, get_post_by_id_in_db, get_user_by_email, get_user_by_id,
        get_user_by_username, insert_user, list_category_feed_in_db, list_comments_for_post_in_db,
        list_home_feed_in_db, list_profile_feed_in_db, update_comment_in_db,
        update_password_in_db, update_post_in_db, update_profile_in_db,
    },
    errors::{map_unique_violation, RequestError},
    pagination::{paginate, PageQuery},
};

type JsonResult<T> = Result<Json<T>, RequestError>;

fn require_non_blank(value: &str, message: &'static str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        Err(RequestError::Validation(message))
    } else {
        Ok(())
    }
}

/// Category and location references come from the client; reject dangling
/// ids up front instead of surfacing a foreign-key failure.
async fn check_post_references(
    pool: &SqlitePool,
    category_id: Option<i64>,
    location_id: Option<i64>,
) -> Result<(), RequestError> {
    if let Some(id) = category_id {
        get_category_by_id_in_db(pool, id)
            .await?
            .ok_or(RequestError::Validation("Category does not exist"))?;
    }
    if let Some(id) = location_id {
        get_location_by_id_in_db(pool, id)
            .await?
            .ok_or(RequestError::Validation("Location does not exist"))?;
    }
    Ok(())
}

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> RequestError {
    tracing::debug!("no route for {}", uri);
    RequestError::NotFound
}

// ----------------- User Handlers -----------------
pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user: mut request }): Json<UserWrapper<RegisterRequest>>,
) -> JsonResult<UserWrapper<UserResponse>> {
    require_non_blank(&request.username, "Username must not be empty")?;
    require_non_blank(&request.email, "Email must not be empty")?;
    require_non_blank(&request.password, "Password must not be empty")?;

    request.password = hash_password_argon2(request.password)
        .await
        .map_err(|_| RequestError::ServerError)?;

    let user = insert_user(&pool, &request)
        .await
        .map_err(|e| map_unique_violation(e, "Username or email already exists"))?;

    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<LoginRequest>>,
) -> JsonResult<UserWrapper<UserResponse>> {
    let user = get_user_by_email(&pool, &request.email)
        .await?
        .ok_or(RequestError::Validation("Email not found"))?;

    let is_password_correct = verify_password_argon2(request.password, &user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !is_password_correct {
        return Err(RequestError::Validation("Incorrect password"));
    }

    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn update_profile(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Json(UserWrapper { user: request }): Json<UserWrapper<UpdateProfileRequest>>,
) -> JsonResult<UserWrapper<UserResponse>> {
    let auth = user.require()?;
    if let Some(username) = &request.username {
        require_non_blank(username, "Username must not be empty")?;
    }
    if let Some(email) = &request.email {
        require_non_blank(email, "Email must not be empty")?;
    }

    let user = update_profile_in_db(&pool, auth.id, request)
        .await
        .map_err(|e| map_unique_violation(e, "Username or email already exists"))?;

    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, auth.token,
    ))))
}

pub async fn change_password(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Json(UserWrapper { user: request }): Json<UserWrapper<ChangePasswordRequest>>,
) -> Result<StatusCode, RequestError> {
    let auth = user.require()?;
    require_non_blank(&request.new_password, "Password must not be empty")?;

    let user = get_user_by_id(&pool, auth.id)
        .await?
        .ok_or(RequestError::NotFound)?;

    let old_password_correct = verify_password_argon2(request.old_password, &user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !old_password_correct {
        return Err(RequestError::Validation("Incorrect password"));
    }

    let hash = hash_password_argon2(request.new_password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    update_password_in_db(&pool, auth.id, &hash).await?;

    Ok(StatusCode::OK)
}

// ----------------- Feed Handlers -----------------
pub async fn home_feed(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> JsonResult<MultiplePostsWrapper> {
    let now = Utc::now();
    let total = count_home_feed_in_db(&pool, now).await?;
    let slice = paginate(total, page);
    let posts = list_home_feed_in_db(&pool, now, slice.limit, slice.offset).await?;

    Ok(Json(MultiplePostsWrapper {
        posts: posts.into_iter().map(PostResponse::new).collect(),
        posts_count: total,
        page: slice.page,
        page_count: slice.page_count,
    }))
}

pub async fn category_feed(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> JsonResult<CategoryFeedWrapper> {
    let category = get_category_by_slug_in_db(&pool, &slug)
        .await?
        .ok_or(RequestError::NotFound)?;
    // An unpublished category hides its whole listing.
    if !category.is_published {
        return Err(RequestError::NotFound);
    }

    let now = Utc::now();
    let total = count_category_feed_in_db(&pool, category.id, now).await?;
    let slice = paginate(total, page);
    let posts = list_category_feed_in_db(&pool, category.id, now, slice.limit, slice.offset).await?;

    Ok(Json(CategoryFeedWrapper {
        category: CategoryResponse::new(category),
        feed: MultiplePostsWrapper {
            posts: posts.into_iter().map(PostResponse::new).collect(),
            posts_count: total,
            page: slice.page,
            page_count: slice.page_count,
        },
    }))
}

pub async fn profile_feed(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Path(username): Path<String>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> JsonResult<ProfileFeedWrapper> {
    let profile = get_user_by_username(&pool, &username)
        .await?
        .ok_or(RequestError::NotFound)?;

    // Owners see their full feed, unpublished and future posts included;
    // everyone else gets the public visibility filter.
    let public_now = if user.get_id() == Some(profile.id) {
        None
    } else {
        Some(Utc::now())
    };

    let total = count_profile_feed_in_db(&pool, profile.id, public_now).await?;
    let slice = paginate(total, page);
    let posts =
        list_profile_feed_in_db(&pool, profile.id, public_now, slice.limit, slice.offset).await?;

    Ok(Json(ProfileFeedWrapper {
        profile: ProfileResponse::new(profile),
        feed: MultiplePostsWrapper {
            posts: posts.into_iter().map(PostResponse::new).collect(),
            posts_count: total,
            page: slice.page,
            page_count: slice.page_count,
        },
    }))
}

// ----------------- Post Handlers -----------------
pub async fn post_detail(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Path(post_id): Path<i64>,
) -> JsonResult<PostDetailWrapper> {
    let post = get_post_by_id_in_db(&pool, post_id)
        .await?
        .ok_or(RequestError::NotFound)?;

    let is_author = user.get_id() == Some(post.author_id);
    if !is_author && !post.is_visible(Utc::now()) {
        // Invisible posts are indistinguishable from missing ones.
        return Err(RequestError::NotFound);
    }

    let comments = list_comments_for_post_in_db(&pool, post_id).await?;
    Ok(Json(PostDetailWrapper {
        post: PostResponse::new(post),
        comments: comments.into_iter().map(CommentResponse::new).collect(),
    }))
}

pub async fn create_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Json(PostWrapper { post: request }): Json<PostWrapper<CreatePostRequest>>,
) -> JsonResult<PostWrapper<PostResponse>> {
    let auth = user.require()?;
    require_non_blank(&request.title, "Title must not be empty")?;
    require_non_blank(&request.text, "Text must not be empty")?;
    check_post_references(&pool, request.category_id, request.location_id).await?;

    let post = create_post_in_db(&pool, auth.id, request).await?;
    Ok(Json(PostWrapper {
        post: PostResponse::new(post),
    }))
}

pub async fn update_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Path(post_id): Path<i64>,
    Json(PostWrapper { post: request }): Json<PostWrapper<UpdatePostRequest>>,
) -> JsonResult<PostWrapper<PostResponse>> {
    let auth = user.require()?;
    let post = get_post_by_id_in_db(&pool, post_id)
        .await?
        .ok_or(RequestError::NotFound)?;
    authorize_owner(&auth, post.author_id)?;

    if let Some(title) = &request.title {
        require_non_blank(title, "Title must not be empty")?;
    }
    if let Some(text) = &request.text {
        require_non_blank(text, "Text must not be empty")?;
    }
    // Only newly supplied references need validating; nulls clear the field.
    check_post_references(
        &pool,
        request.category_id.flatten(),
        request.location_id.flatten(),
    )
    .await?;

    let post = update_post_in_db(&pool, post_id, request).await?;
    Ok(Json(PostWrapper {
        post: PostResponse::new(post),
    }))
}

pub async fn delete_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    let auth = user.require()?;
    let post = get_post_by_id_in_db(&pool, post_id)
        .await?
        .ok_or(RequestError::NotFound)?;
    authorize_owner(&auth, post.author_id)?;

    delete_post_in_db(&pool, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Comment Handlers -----------------
pub async fn add_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Path(post_id): Path<i64>,
    Json(CommentWrapper { comment: request }): Json<CommentWrapper<CommentRequest>>,
) -> JsonResult<CommentWrapper<CommentResponse>> {
    let auth = user.require()?;
    require_non_blank(&request.text, "Comment must not be empty")?;

    // The post must exist; author and post references are set server-side.
    get_post_by_id_in_db(&pool, post_id)
        .await?
        .ok_or(RequestError::NotFound)?;

    let comment = add_comment_to_post_in_db(&pool, auth.id, post_id, &request.text).await?;
    Ok(Json(CommentWrapper {
        comment: CommentResponse::new(comment),
    }))
}

pub async fn update_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(CommentWrapper { comment: request }): Json<CommentWrapper<CommentRequest>>,
) -> JsonResult<CommentWrapper<CommentResponse>> {
    let auth = user.require()?;
    require_non_blank(&request.text, "Comment must not be empty")?;

    let comment = get_comment_for_post_in_db(&pool, post_id, comment_id)
        .await?
        .ok_or(RequestError::NotFound)?;
    authorize_owner(&auth, comment.author_id)?;

    let comment = update_comment_in_db(&pool, comment_id, &request.text).await?;
    Ok(Json(CommentWrapper {
        comment: CommentResponse::new(comment),
    }))
}

pub async fn delete_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: MaybeUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<StatusCode, RequestError> {
    let auth = user.require()?;
    let comment = get_comment_for_post_in_db(&pool, post_id, comment_id)
        .await?
        .ok_or(RequestError::NotFound)?;
    authorize_owner(&auth, comment.author_id)?;

    delete_comment_in_db(&pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
