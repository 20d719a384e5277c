use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use prompthub_client::models::{LikeResponse, Meta, PlatformType, Prompt, PromptInput, PromptPage};
use prompthub_client::{
    ApiClient, ApiError, Choice, FilterPatch, FilterState, ListRequest, PageCursor, PromptBackend,
    SortKey,
};
use serde_json::json;

#[derive(Default)]
struct FakeApi {
    prompts: Vec<Prompt>,
    next_id: i64,
    last_query: Option<HashMap<String, String>>,
}

type Shared = Arc<Mutex<FakeApi>>;

fn to_prompt(id: i64, input: PromptInput) -> Prompt {
    Prompt {
        id,
        title: input.title,
        description: input.description,
        content: input.content,
        platform: input.platform,
        platform_type: input.platform_type,
        category: input.category,
        author: "익명 사용자".into(),
        author_id: 999,
        likes: 0,
        views: 0,
        tags: input.tags,
        created_at: "2024-06-01T12:00:00.000000".into(),
        thumbnail: None,
    }
}

async fn list_prompts(
    State(api): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<PromptPage> {
    let mut api = api.lock().unwrap();
    let page = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let page_size = query.get("page_size").and_then(|p| p.parse().ok()).unwrap_or(12);
    api.last_query = Some(query);
    Json(PromptPage {
        total: api.prompts.len() as u64,
        page,
        page_size,
        items: api.prompts.clone(),
    })
}

async fn get_prompt(
    State(api): State<Shared>,
    Path(id): Path<i64>,
) -> Result<axum::response::Response, StatusCode> {
    use axum::response::IntoResponse;
    if id == 666 {
        return Ok("definitely not json".into_response());
    }
    let mut api = api.lock().unwrap();
    let prompt = api
        .prompts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    prompt.views += 1;
    Ok(Json(prompt.clone()).into_response())
}

async fn create_prompt(State(api): State<Shared>, Json(input): Json<PromptInput>) -> Json<Prompt> {
    let mut api = api.lock().unwrap();
    api.next_id += 1;
    let prompt = to_prompt(api.next_id, input);
    api.prompts.push(prompt.clone());
    Json(prompt)
}

async fn update_prompt(
    State(api): State<Shared>,
    Path(id): Path<i64>,
    Json(input): Json<PromptInput>,
) -> Result<Json<Prompt>, StatusCode> {
    let mut api = api.lock().unwrap();
    let prompt = api
        .prompts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let updated = Prompt {
        likes: prompt.likes,
        views: prompt.views,
        ..to_prompt(id, input)
    };
    *prompt = updated.clone();
    Ok(Json(updated))
}

async fn delete_prompt(
    State(api): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut api = api.lock().unwrap();
    let before = api.prompts.len();
    api.prompts.retain(|p| p.id != id);
    if api.prompts.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "deleted" })))
}

async fn like_prompt(
    State(api): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<LikeResponse>, StatusCode> {
    let mut api = api.lock().unwrap();
    let prompt = api
        .prompts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    prompt.likes += 1;
    Ok(Json(LikeResponse { likes: prompt.likes }))
}

async fn get_meta(State(api): State<Shared>) -> Json<Meta> {
    let mut meta = Meta::fallback();
    meta.total_prompts = api.lock().unwrap().prompts.len() as u64;
    Json(meta)
}

/// Serves the fake API on an ephemeral port from a dedicated runtime thread,
/// keeping the blocking client out of any async context.
fn spawn_server() -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(FakeApi::default()));
    let app = Router::new()
        .route("/api/prompts", get(list_prompts).post(create_prompt))
        .route(
            "/api/prompts/:id",
            get(get_prompt).put(update_prompt).delete(delete_prompt),
        )
        .route("/api/prompts/:id/like", post(like_prompt))
        .route("/api/meta", get(get_meta))
        .with_state(shared.clone());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.set_nonblocking(true).expect("nonblocking");
    let addr = listener.local_addr().expect("local addr");
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve");
        });
    });
    (format!("http://{addr}"), shared)
}

fn sample_input() -> PromptInput {
    PromptInput {
        title: "Cover letter".into(),
        description: "Tailored cover letters".into(),
        content: "Write a cover letter for [job]".into(),
        platform: "Claude".into(),
        platform_type: PlatformType::Text,
        category: "업무".into(),
        tags: vec!["career".into(), "writing".into()],
    }
}

#[test]
fn list_sends_built_query() {
    let (base_url, shared) = spawn_server();
    let client = ApiClient::new(base_url).expect("client");

    let filters = FilterState::default().merged(
        FilterPatch::default()
            .sort(SortKey::Likes)
            .platform_type(Choice::Only(PlatformType::Image))
            .category("캐릭터")
            .search("pixel art"),
    );
    let page = client
        .list_prompts(&ListRequest::build(&filters, PageCursor::new(2, 12)))
        .expect("list");
    assert_eq!(page.page, 2);
    assert_eq!(page.total, 0);

    let query = shared.lock().unwrap().last_query.clone().expect("query recorded");
    let mut expected = HashMap::new();
    expected.insert("page".to_string(), "2".to_string());
    expected.insert("page_size".to_string(), "12".to_string());
    expected.insert("sort".to_string(), "likes".to_string());
    expected.insert("platform_type".to_string(), "image".to_string());
    expected.insert("category".to_string(), "캐릭터".to_string());
    expected.insert("search".to_string(), "pixel art".to_string());
    assert_eq!(query, expected);
}

#[test]
fn crud_and_like_round_trip() {
    let (base_url, _shared) = spawn_server();
    let client = ApiClient::new(base_url).expect("client");

    let created = client.create_prompt(&sample_input()).expect("create");
    assert_eq!(created.title, "Cover letter");
    assert_eq!(created.tags, vec!["career".to_string(), "writing".to_string()]);

    let fetched = client.get_prompt(created.id).expect("get");
    assert_eq!(fetched.views, 1);

    let mut input = PromptInput::from(&fetched);
    input.title = "Cover letter v2".into();
    let updated = client.update_prompt(created.id, &input).expect("update");
    assert_eq!(updated.title, "Cover letter v2");

    assert_eq!(client.like_prompt(created.id).expect("like").likes, 1);
    assert_eq!(client.get_meta().expect("meta").total_prompts, 1);

    client.delete_prompt(created.id).expect("delete");
    assert!(client.get_prompt(created.id).is_err());
}

#[test]
fn failures_collapse_into_request_failed() {
    let (base_url, _shared) = spawn_server();
    let client = ApiClient::new(base_url).expect("client");

    let not_found = client.like_prompt(404).unwrap_err();
    assert!(matches!(not_found, ApiError::RequestFailed { .. }));

    let undecodable = client.get_prompt(666).unwrap_err();
    assert!(matches!(undecodable, ApiError::RequestFailed { .. }));

    let port = {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        probe.local_addr().expect("addr").port()
    };
    let offline = ApiClient::new(format!("127.0.0.1:{port}")).expect("client");
    let err = offline.get_meta().unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed { ref path, .. } if path == "/api/meta"));
}
