//! Router tests against the in-memory backend

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bookshelf_server::{api, config::StorageBackend, repository::Repository, AppConfig, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn app() -> Router {
    let mut config = AppConfig::default();
    config.database.backend = StorageBackend::Memory;
    api::router(AppState::new(config, Repository::in_memory()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => request.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

fn book(title: &str, genre: &str, isbn: &str) -> Value {
    json!({
        "title": title,
        "author": "Some Author",
        "genre": genre,
        "isbn": isbn,
        "copies": 5
    })
}

async fn create(app: &Router, payload: Value) -> Result<Value, Box<dyn std::error::Error>> {
    let (status, body) = send(app, Method::POST, "/api/books", Some(payload)).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    Ok(body["data"].clone())
}

#[tokio::test]
async fn test_create_then_filter_case_insensitively() -> TestResult {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/books", Some(json!({
        "title": "A",
        "author": "B",
        "genre": "FICTION",
        "isbn": "111",
        "copies": 1
    })))
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Book created successfully");
    assert_eq!(body["data"]["genre"], "FICTION");
    assert_eq!(body["data"]["available"], true);
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());

    create(&app, book("Other", "SCIENCE", "222")).await?;

    let (status, body) = send(&app, Method::GET, "/api/books?filter=fiction", None).await?;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().ok_or("data is not an array")?;
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "A");
    assert_eq!(body["meta"], json!({ "total": 1, "page": 1, "limit": 10 }));
    Ok(())
}

#[tokio::test]
async fn test_every_genre_filter_returns_only_that_genre() -> TestResult {
    let app = app();
    let genres = ["FICTION", "NON_FICTION", "SCIENCE", "HISTORY", "BIOGRAPHY", "FANTASY"];
    for (i, genre) in genres.iter().enumerate() {
        create(&app, book(&format!("Book {}", i), genre, &format!("isbn-{}", i))).await?;
        create(&app, book(&format!("Book {}b", i), genre, &format!("isbn-{}b", i))).await?;
    }

    for genre in genres {
        let (status, body) = send(&app, Method::GET, &format!("/api/books?filter={}", genre), None).await?;
        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().ok_or("data is not an array")?;
        assert_eq!(data.len(), 2);
        assert!(data.iter().all(|b| b["genre"] == genre));
        assert_eq!(body["meta"]["total"], 2);
    }
    Ok(())
}

#[tokio::test]
async fn test_invalid_filter_lists_valid_genres() -> TestResult {
    let (status, body) = send(&app(), Method::GET, "/api/books?filter=XYZ", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid genre filter");
    assert_eq!(
        body["error"]["validGenres"],
        json!(["FICTION", "NON_FICTION", "SCIENCE", "HISTORY", "BIOGRAPHY", "FANTASY"])
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_pagination_echoes_received_values() -> TestResult {
    let app = app();
    for (query, limit, page) in [
        ("limit=0", "0", "1"),
        ("limit=-1", "-1", "1"),
        ("page=0", "10", "0"),
        ("limit=abc", "abc", "1"),
        ("page=two", "10", "two"),
    ] {
        let (status, body) = send(&app, Method::GET, &format!("/api/books?{}", query), None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
        assert_eq!(body["message"], "Limit and page must be positive numbers");
        assert_eq!(body["error"]["received"], json!({ "limit": limit, "page": page }));
        assert_eq!(body["error"]["expected"], "Positive integers");
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_sort_field_is_rejected() -> TestResult {
    let (status, body) = send(&app(), Method::GET, "/api/books?sortBy=secret", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["received"], "secret");
    assert!(body["error"]["validSortFields"]
        .as_array()
        .ok_or("not an array")?
        .contains(&json!("createdAt")));
    Ok(())
}

#[tokio::test]
async fn test_pagination_pages_through_sorted_results() -> TestResult {
    let app = app();
    for i in 0..7 {
        create(&app, book(&format!("Title {}", i), "HISTORY", &format!("h-{}", i))).await?;
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/books?sortBy=title&sort=asc&limit=3&page={}", page),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"], json!({ "total": 7, "page": page, "limit": 3 }));
        let data = body["data"].as_array().ok_or("data is not an array")?;
        assert!(data.len() <= 3);
        seen.extend(data.iter().map(|b| b["title"].as_str().unwrap_or_default().to_string()));
    }

    let expected: Vec<String> = (0..7).map(|i| format!("Title {}", i)).collect();
    assert_eq!(seen, expected);

    let (_, body) = send(&app, Method::GET, "/api/books?sortBy=title&limit=3&page=1", None).await?;
    assert_eq!(body["data"][0]["title"], "Title 6");

    let (_, body) = send(&app, Method::GET, "/api/books?limit=3&page=4", None).await?;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["total"], 7);
    Ok(())
}

#[tokio::test]
async fn test_create_then_read_round_trip() -> TestResult {
    let app = app();
    let created = create(&app, book("Dune", "FICTION", "9780441013593")).await?;
    let id = created["id"].as_str().ok_or("missing id")?;

    let (status, body) = send(&app, Method::GET, &format!("/api/books/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book retrieved successfully");
    assert_eq!(body["data"], created);
    Ok(())
}

#[tokio::test]
async fn test_create_validation_errors_are_per_field() -> TestResult {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/books",
        Some(json!({ "title": "No genre", "genre": "POETRY", "copies": -3 })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    let errors = &body["error"]["errors"];
    assert_eq!(errors["genre"]["kind"], "enum");
    assert_eq!(errors["copies"]["kind"], "range");
    assert_eq!(errors["author"]["kind"], "required");
    assert_eq!(errors["isbn"]["kind"], "required");
    assert!(errors["title"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_wrong_field_type_is_a_field_error() -> TestResult {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": "T", "author": "A", "genre": "FICTION", "isbn": "1", "copies": "many" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["error"]["name"], "ValidationError");
    let copies = &body["error"]["errors"]["copies"];
    assert_eq!(copies["kind"], "type");
    assert_eq!(copies["path"], "copies");
    assert_eq!(copies["value"], "many");

    let created = create(&app, book("Typed", "FICTION", "typed-1")).await?;
    let uri = format!("/api/books/{}", created["id"].as_str().unwrap_or_default());
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "title": 42 }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["errors"]["title"]["kind"], "type");
    assert_eq!(body["error"]["errors"]["title"]["value"], 42);

    let (_, body) = send(&app, Method::GET, &uri, None).await?;
    assert_eq!(body["data"]["title"], "Typed");
    Ok(())
}

#[tokio::test]
async fn test_non_object_body_is_malformed() -> TestResult {
    let (status, body) = send(&app(), Method::POST, "/api/books", Some(json!(["not", "a", "book"]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Malformed request");
    Ok(())
}

#[tokio::test]
async fn test_update_with_null_description_clears_it() -> TestResult {
    let app = app();
    let mut payload = book("Described", "HISTORY", "hist-desc");
    payload["description"] = json!("A long blurb");
    let created = create(&app, payload).await?;
    assert_eq!(created["description"], "A long blurb");
    let uri = format!("/api/books/{}", created["id"].as_str().unwrap_or_default());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "copies": 2 }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "A long blurb");

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "description": null }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["description"].is_null());
    assert_eq!(body["data"]["copies"], 2);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_isbn_conflicts() -> TestResult {
    let app = app();
    create(&app, book("First", "FICTION", "dup")).await?;
    let (status, body) = send(&app, Method::POST, "/api/books", Some(book("Second", "FICTION", "dup"))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn test_update_is_partial() -> TestResult {
    let app = app();
    let created = create(&app, book("Before", "BIOGRAPHY", "bio-1")).await?;
    let id = created["id"].as_str().ok_or("missing id")?;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", id),
        Some(json!({ "copies": 42 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");

    let updated = &body["data"];
    assert_eq!(updated["copies"], 42);
    for field in ["id", "title", "author", "genre", "isbn", "available", "createdAt"] {
        assert_eq!(updated[field], created[field], "{} changed", field);
    }
    Ok(())
}

#[tokio::test]
async fn test_update_revalidates_merged_record() -> TestResult {
    let app = app();
    let created = create(&app, book("Book", "FANTASY", "f-1")).await?;
    let id = created["id"].as_str().ok_or("missing id")?;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", id),
        Some(json!({ "genre": "fantasy", "copies": -1 })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");

    let (_, body) = send(&app, Method::GET, &format!("/api/books/{}", id), None).await?;
    assert_eq!(body["data"], created);
    Ok(())
}

#[tokio::test]
async fn test_delete_then_read_is_not_found() -> TestResult {
    let app = app();
    let created = create(&app, book("Gone", "SCIENCE", "s-1")).await?;
    let id = created["id"].as_str().ok_or("missing id")?;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/books/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Book deleted successfully", "data": null })
    );

    let (status, body) = send(&app, Method::GET, &format!("/api/books/{}", id), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Book not found" }));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/books/{}", id), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_malformed_id_is_rejected_on_every_route() -> TestResult {
    let app = app();
    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, Some(json!({ "copies": 1 }))),
        (Method::DELETE, None),
    ] {
        let (status, body) = send(&app, method, "/api/books/not-an-id", body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "message": "Invalid book ID" }));
    }
    Ok(())
}

#[tokio::test]
async fn test_update_of_missing_book_is_not_found() -> TestResult {
    let (status, body) = send(
        &app(),
        Method::PUT,
        "/api/books/6f1c2f7e-0a43-4c1a-9a57-1d6f0e1f2b3c",
        Some(json!({ "title": "x" })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");
    Ok(())
}

#[tokio::test]
async fn test_borrow_flow_and_summary() -> TestResult {
    let app = app();
    let created = create(&app, book("Cosmos", "SCIENCE", "c-1")).await?;
    let id = created["id"].as_str().ok_or("missing id")?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/borrow",
        Some(json!({ "book": id, "quantity": 2, "dueDate": "2030-01-01T00:00:00Z" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book borrowed successfully");
    assert_eq!(body["data"]["book"], id);
    assert_eq!(body["data"]["quantity"], 2);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/borrow",
        Some(json!({ "book": id, "quantity": 4, "dueDate": "2030-01-01T00:00:00Z" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Not enough copies available");
    assert_eq!(body["error"], json!({ "requested": 4, "available": 3 }));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/borrow",
        Some(json!({ "book": id, "quantity": 3, "dueDate": "2030-02-01T00:00:00Z" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, &format!("/api/books/{}", id), None).await?;
    assert_eq!(body["data"]["copies"], 0);
    assert_eq!(body["data"]["available"], false);

    let (status, body) = send(&app, Method::GET, "/api/borrow", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([{ "book": { "title": "Cosmos", "isbn": "c-1" }, "totalQuantity": 5 }])
    );
    Ok(())
}

#[tokio::test]
async fn test_borrow_validation() -> TestResult {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/borrow", Some(json!({ "quantity": 0 }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["error"]["errors"]["quantity"]["kind"], "range");
    assert_eq!(body["error"]["errors"]["book"]["kind"], "required");
    assert_eq!(body["error"]["errors"]["dueDate"]["kind"], "required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/borrow",
        Some(json!({
            "book": "6f1c2f7e-0a43-4c1a-9a57-1d6f0e1f2b3c",
            "quantity": 1,
            "dueDate": "2030-01-01T00:00:00Z"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");
    Ok(())
}

#[tokio::test]
async fn test_welcome_and_health() -> TestResult {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"Welcome to Library management server");

    let (status, body) = send(&app, Method::GET, "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "memory");
    Ok(())
}
