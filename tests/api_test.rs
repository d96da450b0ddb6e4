use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_api::{build_app, Book, BookFilters, BookRepo, InMemoryBookRepo};

fn test_book() -> Book {
    Book {
        isbn: "1".to_string(),
        amazon_url: "https://test.com/".to_string(),
        author: "TestAuth".to_string(),
        language: "TestLang".to_string(),
        pages: 1,
        publisher: "TestPub".to_string(),
        title: "TestTitle".to_string(),
        year: 2000,
    }
}

fn seeded() -> (Router, InMemoryBookRepo) {
    let repo = InMemoryBookRepo::with_books([test_book()]);
    (build_app(repo.clone()), repo)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn lists_the_seeded_book() {
    let (app, _) = seeded();

    let (status, body) = send(app, Method::GET, "/books", None).await;

    assert_eq!(StatusCode::OK, status);
    let books = body["books"].as_array().unwrap();
    assert_eq!(1, books.len());
    assert_eq!("1", books[0]["isbn"]);
}

#[tokio::test]
async fn list_accepts_arbitrary_query_parameters() {
    let (app, _) = seeded();

    let (status, body) = send(app, Method::GET, "/books?author=Nobody&page=3", None).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(1, body["books"].as_array().unwrap().len());
}

#[tokio::test]
async fn gets_one_book_by_isbn() {
    let (app, _) = seeded();

    let (status, body) = send(app, Method::GET, "/books/1", None).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!({ "book": test_book() }), body);
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let (app, _) = seeded();

    let first = send(app.clone(), Method::GET, "/books/1", None).await;
    let second = send(app, Method::GET, "/books/1", None).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn get_unknown_isbn_is_404() {
    let (app, _) = seeded();

    let (status, body) = send(app, Method::GET, "/books/1111111", None).await;

    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(
        json!({
            "error": {
                "message": "There is no book with an isbn '1111111'",
                "status": 404
            }
        }),
        body
    );
}

#[tokio::test]
async fn creates_a_valid_book() {
    let (app, repo) = seeded();
    let new_book = json!({
        "isbn": "11",
        "amazon_url": "https://11.com",
        "author": "11Auth",
        "language": "11Lang",
        "pages": 11,
        "publisher": "11pub",
        "title": "11Title",
        "year": 2011
    });

    let (status, body) = send(app, Method::POST, "/books", Some(new_book.clone())).await;

    assert_eq!(StatusCode::CREATED, status);
    assert_eq!(new_book, body["book"]);
    assert!(repo.get_book("11").await.unwrap().is_some());
}

#[tokio::test]
async fn incomplete_book_is_rejected_without_being_stored() {
    let (app, repo) = seeded();
    let incomplete = json!({
        "isbn": "11",
        "amazon_url": "https://11.com",
        "author": "11Auth",
        "language": "11Lang",
        "pages": 11,
        "publisher": "11pub"
    });

    let (status, body) = send(app, Method::POST, "/books", Some(incomplete)).await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(
        json!({
            "error": {
                "message": [
                    "instance requires property \"title\"",
                    "instance requires property \"year\""
                ],
                "status": 400
            }
        }),
        body
    );
    assert_eq!(None, repo.get_book("11").await.unwrap());
}

#[tokio::test]
async fn malformed_json_is_rejected_with_400() {
    let (app, _) = seeded();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header("content-type", "application/json")
        .body(Body::from("{\"isbn\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, response.status());

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(400, body["error"]["status"]);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn body_without_json_content_type_is_415() {
    let (app, repo) = seeded();
    let body = json!({ "isbn": "11" }).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(StatusCode::UNSUPPORTED_MEDIA_TYPE, response.status());

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(415, body["error"]["status"]);
    assert_eq!(None, repo.get_book("11").await.unwrap());
}

#[tokio::test]
async fn whole_number_floats_are_stored_as_integers() {
    let (app, _) = seeded();
    let new_book = json!({
        "isbn": "11",
        "amazon_url": "https://11.com",
        "author": "11Auth",
        "language": "11Lang",
        "pages": 11.0,
        "publisher": "11pub",
        "title": "11Title",
        "year": 2.011e3
    });

    let (status, body) = send(app, Method::POST, "/books", Some(new_book)).await;

    assert_eq!(StatusCode::CREATED, status);
    assert_eq!(11, body["book"]["pages"]);
    assert_eq!(2011, body["book"]["year"]);
}

#[tokio::test]
async fn duplicate_isbn_is_an_internal_error() {
    let (app, _) = seeded();
    let duplicate = serde_json::to_value(test_book()).unwrap();

    let (status, body) = send(app, Method::POST, "/books", Some(duplicate)).await;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
    assert_eq!(500, body["error"]["status"]);
}

#[tokio::test]
async fn updates_a_book_by_isbn() {
    let (app, _) = seeded();
    let replacement = json!({
        "amazon_url": "https://test.com/",
        "author": "TestAuth",
        "language": "TestLang",
        "pages": 1,
        "publisher": "TestPub",
        "title": "testBook",
        "year": 2000
    });

    let (status, body) = send(app.clone(), Method::PUT, "/books/1", Some(replacement)).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!("1", body["book"]["isbn"]);
    assert_eq!("testBook", body["book"]["title"]);

    let (_, body) = send(app, Method::GET, "/books/1", None).await;
    assert_eq!("testBook", body["book"]["title"]);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let (app, _) = seeded();

    let (status, body) = send(app, Method::PUT, "/books/1", Some(json!({ "pages": 250 }))).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(250, body["book"]["pages"]);
    assert_eq!("TestTitle", body["book"]["title"]);
}

#[tokio::test]
async fn update_of_unknown_isbn_is_404() {
    let (app, _) = seeded();
    let replacement = json!({
        "invalid_input": "111111",
        "amazon_url": "https://test.com/",
        "author": "TestAuth",
        "language": "TestLang",
        "pages": 1,
        "publisher": "TestPub",
        "title": "testBook",
        "year": 2000
    });

    let (status, _) = send(app, Method::PUT, "/books/1111111", Some(replacement)).await;

    assert_eq!(StatusCode::NOT_FOUND, status);
}

#[tokio::test]
async fn ill_typed_update_is_rejected_without_being_applied() {
    let (app, repo) = seeded();

    let (status, body) = send(
        app,
        Method::PUT,
        "/books/1",
        Some(json!({ "title": null, "year": "2001" })),
    )
    .await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(
        json!([
            "instance.title is not of a type(s) string",
            "instance.year is not of a type(s) integer"
        ]),
        body["error"]["message"]
    );
    assert_eq!(Some(test_book()), repo.get_book("1").await.unwrap());
}

#[tokio::test]
async fn deletes_a_book_by_isbn() {
    let (app, repo) = seeded();

    let (status, body) = send(app.clone(), Method::DELETE, "/books/1", None).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(json!({ "message": "Book deleted" }), body);

    let (status, _) = send(app, Method::GET, "/books/1", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert!(repo
        .list_books(BookFilters::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn delete_of_unknown_isbn_is_404() {
    let (app, _) = seeded();

    let (status, body) = send(app, Method::DELETE, "/books/99", None).await;

    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(404, body["error"]["status"]);
}

#[tokio::test]
async fn unknown_routes_use_the_error_shape() {
    let (app, _) = seeded();

    let (status, body) = send(app, Method::GET, "/authors", None).await;

    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(json!({ "error": { "message": "Not Found", "status": 404 } }), body);
}

#[tokio::test]
async fn unsupported_methods_use_the_error_shape() {
    let (app, repo) = seeded();

    let (status, body) = send(
        app.clone(),
        Method::PATCH,
        "/books/1",
        Some(json!({ "title": "Patched" })),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(json!({ "error": { "message": "Not Found", "status": 404 } }), body);
    assert_eq!(Some(test_book()), repo.get_book("1").await.unwrap());

    let (status, body) = send(app, Method::DELETE, "/books", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(404, body["error"]["status"]);
}

#[tokio::test]
async fn undecodable_isbn_uses_the_error_shape() {
    let (app, _) = seeded();

    let (status, body) = send(app, Method::GET, "/books/%FF", None).await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(400, body["error"]["status"]);
    assert!(body["error"]["message"].is_string());
}
