use serde_json::json;
use shamstagram_client::services::MemorySessionStore;
use shamstagram_client::{ClientError, Config, Shamstagram};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> Shamstagram {
    let config = Config {
        api_base_url: server.uri(),
        ..Config::default()
    };
    Shamstagram::with_store(config, Arc::new(MemorySessionStore::default())).unwrap()
}

fn post_json(id: i64, like_count: i64) -> serde_json::Value {
    json!({
        "id": id,
        "author": { "id": 7, "nickname": "포토왕", "avatar": 2 },
        "original_text": "오늘 산책했다",
        "ai_text": "오늘 나는 인류 역사상 가장 위대한 산책을 완수했다",
        "like_count": like_count,
        "is_liked": false,
        "is_owner": true,
        "comment_count": 0,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
    })
}

#[tokio::test]
async fn double_toggle_round_trips_to_initial_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/5/likes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_liked": false,
            "like_count": 7,
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/posts/5/like"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_liked": true,
            "like_count": 8,
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let likes = client.like_state(5);
    let initial = likes.load().await.unwrap();

    let first = likes.toggle().await.unwrap();
    assert!(first.is_liked);
    assert_eq!(first.like_count, 8);

    Mock::given(method("POST"))
        .and(path("/posts/5/like"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_liked": false,
            "like_count": 7,
        })))
        .mount(&server)
        .await;

    let second = likes.toggle().await.unwrap();
    assert_eq!(second, initial);
    assert_eq!(likes.status().await, initial);
}

#[tokio::test]
async fn failed_toggle_restores_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/5/likes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_liked": false,
            "like_count": 7,
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/posts/5/like"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "좋아요 처리에 실패했습니다" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let likes = client.like_state(5);
    let initial = likes.load().await.unwrap();

    let err = likes.toggle().await.unwrap_err();
    assert_eq!(err.user_message(), "좋아요 처리에 실패했습니다");
    // The optimistic flip was compensated.
    assert_eq!(likes.status().await, initial);
}

#[tokio::test]
async fn like_state_seeds_from_fetched_post() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_json(5, 42)))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let post = client.posts.get_post(5).await.unwrap();
    let likes = client.like_state_for(&post);

    let status = likes.status().await;
    assert!(!status.is_liked);
    assert_eq!(status.like_count, 42);
}

#[tokio::test]
async fn list_posts_passes_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([post_json(1, 0)])))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let posts = client.posts.list_posts(Some(2), Some(10)).await.unwrap();
    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn create_post_rejects_overlong_text_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .posts
        .create_post(&"가".repeat(501))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn create_invitation_returns_shareable_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invitations"))
        .and(body_partial_json(json!({ "email": "friend@example.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "invitation": {
                "id": 1,
                "email": "friend@example.com",
                "token": "inv-token-abc",
                "is_used": false,
                "created_at": "2024-01-01T00:00:00Z",
                "used_at": null,
                "used_by": null,
            },
            "invitation_url": "https://shamstagram.example/invite/inv-token-abc",
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let created = client.invitations.create("friend@example.com").await.unwrap();

    assert_eq!(created.invitation.token, "inv-token-abc");
    assert!(created.invitation_url.contains("inv-token-abc"));
    assert!(!created.invitation.is_used);
}

#[tokio::test]
async fn invalid_invitation_email_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invitations"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.invitations.create("not-an-email").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn missing_post_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "게시물을 찾을 수 없습니다" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.posts.get_post(999).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(err.user_message(), "게시물을 찾을 수 없습니다");
}
