mod common;

use axum::http::StatusCode;
use blog_api::{
    config::Config,
    dto::{GroupFeedResponse, PaginatedResponse, PostView, ProfileResponse},
};
use common::{TestApp, body_json, test_config};

#[tokio::test]
async fn test_index_shows_created_post() {
    let app = TestApp::new();
    let author = app.author("Test-User");
    let group = app.group("test-group", "test-slug");
    let post = app.state.store.create_post(
        author.id,
        "Тестовый текст".into(),
        Some(group.id),
        Some("posts/small.gif".into()),
    );

    let page: PaginatedResponse<PostView> = body_json(app.get("/", None).await).await;

    assert_eq!(page.data.len(), 1);
    let first = &page.data[0];
    assert_eq!(first.id, post.id);
    assert_eq!(first.text, "Тестовый текст");
    assert_eq!(first.author.username, "Test-User");
    assert_eq!(first.group.as_ref().unwrap().slug, "test-slug");
    assert_eq!(first.image.as_deref(), Some("posts/small.gif"));
}

#[tokio::test]
async fn test_paginator_first_and_last_page() {
    let app = TestApp::with_config(Config {
        quantity_posts: 10,
        ..test_config()
    });
    let author = app.author("Test");
    let group = app.group("test-group", "test-slug");
    for i in 0..13 {
        app.state
            .store
            .create_post(author.id, format!("post {}", i), Some(group.id), None);
    }

    for url in ["/", "/group/test-slug", "/profile/Test"] {
        let response = app.get(url, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", url);
    }

    let first: PaginatedResponse<PostView> = body_json(app.get("/?page=1", None).await).await;
    assert_eq!(first.data.len(), 10);
    assert_eq!(first.data[0].text, "post 12");
    assert_eq!(first.data[9].text, "post 3");
    assert_eq!(first.total, 13);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next);

    let last: PaginatedResponse<PostView> = body_json(app.get("/?page=2", None).await).await;
    assert_eq!(last.data.len(), 3);
    assert_eq!(last.data[2].text, "post 0");
    assert!(!last.has_next);
    assert!(last.has_previous);

    let group: GroupFeedResponse = body_json(app.get("/group/test-slug?page=2", None).await).await;
    assert_eq!(group.posts.data.len(), 3);

    let profile: ProfileResponse = body_json(app.get("/profile/Test", None).await).await;
    assert_eq!(profile.posts.data.len(), 10);
    assert_eq!(profile.posts_count, 13);
}

#[tokio::test]
async fn test_out_of_range_pages_clamp() {
    let app = TestApp::with_config(Config {
        quantity_posts: 2,
        ..test_config()
    });
    let author = app.author("Test");
    for i in 0..5 {
        app.state
            .store
            .create_post(author.id, format!("post {}", i), None, None);
    }

    let beyond: ProfileResponse = body_json(app.get("/profile/Test?page=42", None).await).await;
    assert_eq!(beyond.posts.page, 3);
    assert_eq!(beyond.posts.data.len(), 1);

    let below: ProfileResponse = body_json(app.get("/profile/Test?page=0", None).await).await;
    assert_eq!(below.posts.page, 1);

    let garbage: ProfileResponse = body_json(app.get("/profile/Test?page=abc", None).await).await;
    assert_eq!(garbage.posts.page, 1);
    assert_eq!(garbage.posts.data[0].text, "post 4");
}

#[tokio::test]
async fn test_repeated_page_selector_uses_last_value() {
    let app = TestApp::with_config(Config {
        quantity_posts: 2,
        ..test_config()
    });
    let author = app.author("Test");
    for i in 0..5 {
        app.state
            .store
            .create_post(author.id, format!("post {}", i), None, None);
    }

    let index: PaginatedResponse<PostView> = body_json(app.get("/?page=1&page=2", None).await).await;
    assert_eq!(index.page, 2);
    assert_eq!(index.data[0].text, "post 2");

    let profile: ProfileResponse =
        body_json(app.get("/profile/Test?page=1&page=99", None).await).await;
    assert_eq!(profile.posts.page, 3);
}

#[tokio::test]
async fn test_group_feed_only_has_group_posts() {
    let app = TestApp::new();
    let author = app.author("Test");
    let group = app.group("test-group", "test-slug");
    let other = app.group("other-group", "other-slug");
    app.state
        .store
        .create_post(author.id, "in group".into(), Some(group.id), None);
    app.state
        .store
        .create_post(author.id, "elsewhere".into(), Some(other.id), None);
    app.state
        .store
        .create_post(author.id, "no group".into(), None, None);

    let feed: GroupFeedResponse = body_json(app.get("/group/test-slug", None).await).await;

    assert_eq!(feed.group.slug, "test-slug");
    assert_eq!(feed.posts.data.len(), 1);
    assert_eq!(feed.posts.data[0].text, "in group");
}

#[tokio::test]
async fn test_profile_following_status() {
    let app = TestApp::new();
    let author = app.author("Test");
    let reader = app.author("reader");
    app.state.store.create_post(author.id, "hello".into(), None, None);

    let anonymous: ProfileResponse = body_json(app.get("/profile/Test", None).await).await;
    assert_eq!(anonymous.author.username, "Test");
    assert!(!anonymous.following);

    let before: ProfileResponse =
        body_json(app.get("/profile/Test", Some(&app.token(&reader))).await).await;
    assert!(!before.following);

    blog_api::follow::follow(&app.state.store, reader.id, author.id);

    let after: ProfileResponse =
        body_json(app.get("/profile/Test", Some(&app.token(&reader))).await).await;
    assert!(after.following);
    assert_eq!(after.followers_count, 1);

    let anonymous: ProfileResponse = body_json(app.get("/profile/Test", None).await).await;
    assert!(!anonymous.following);
}

#[tokio::test]
async fn test_unknown_group_or_author_is_not_found() {
    let app = TestApp::new();

    assert_eq!(app.get("/group/missing", None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/profile/nobody", None).await.status(), StatusCode::NOT_FOUND);
}
