use crate::bookshelf;
use crate::bookshelf::BookStore;
use crate::bookshelf::BookshelfConfig;
use crate::engine::Engine;
use crate::engine::Request;
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;
use std::time::Instant;

fn fast_engine() -> Engine {
    bookshelf::engine(BookshelfConfig::default().with_count_interval(Duration::from_millis(1)))
        .unwrap()
}

// =============================================================================
// Queries and mutations
// =============================================================================

/// The canonical query returns exactly the seeded books.
#[tokio::test]
async fn books_query() {
    let response = fast_engine().execute(Request::new("{ books { title author } }")).await;
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        concat!(
            r#"{"data":{"books":[{"title":"The Great Gatsby","author":"F. Scott Fitzgerald"},"#,
            r#"{"title":"Gatsby 2","author":"F. Scott Fitzgerald"}]}}"#,
        ),
    );
}

/// `addBook` returns the new book and later queries see it.
#[tokio::test]
async fn add_book() {
    let store = BookStore::seeded();
    let engine = bookshelf::engine_with_store(BookshelfConfig::default(), store.clone()).unwrap();

    let response = engine
        .execute(Request::new(
            "mutation { addBook(title: \"New Book\", author: \"me\") { title author } }",
        ))
        .await;
    assert_eq!(response.to_json(), json!({
        "data": { "addBook": { "title": "New Book", "author": "me" } },
    }));
    assert_eq!(store.len(), 3);

    let response = engine.execute(Request::new("{ books { title } }")).await;
    assert_eq!(response.to_json(), json!({
        "data": { "books": [
            { "title": "The Great Gatsby" },
            { "title": "Gatsby 2" },
            { "title": "New Book" },
        ] },
    }));
}

/// Seed books come from the config.
#[tokio::test]
async fn custom_seed() {
    let engine = bookshelf::engine(BookshelfConfig::default().with_seed_books(vec![])).unwrap();
    let response = engine.execute(Request::new("{ books { title } }")).await;
    assert_eq!(response.to_json(), json!({ "data": { "books": [] } }));
}

/// Missing required arguments are caught before execution.
#[tokio::test]
async fn add_book_requires_arguments() {
    let response = fast_engine()
        .execute(Request::new("mutation { addBook(title: \"x\") { title } }"))
        .await;
    assert_eq!(response.data, Some(serde_json::Value::Null));
    assert_eq!(response.errors.len(), 1);
}

// =============================================================================
// Subscriptions
// =============================================================================

/// `count` yields `0..target` in order.
#[tokio::test]
async fn count_in_order() {
    let counts: Vec<_> = fast_engine()
        .subscribe(Request::new("subscription { count(target: 5) }"))
        .map(|response| response.data.unwrap()["count"].clone())
        .collect()
        .await;
    assert_eq!(counts, vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
}

/// Events are spaced by the configured interval.
#[tokio::test]
async fn count_respects_interval() {
    let engine = bookshelf::engine(
        BookshelfConfig::default().with_count_interval(Duration::from_millis(30)),
    )
    .unwrap();
    let started = Instant::now();
    let responses: Vec<_> = engine
        .subscribe(Request::new("subscription { count(target: 3) }"))
        .collect()
        .await;
    assert_eq!(responses.len(), 3);
    assert!(started.elapsed() >= Duration::from_millis(60));
}

/// Cancelling after a few events ends the stream early.
#[tokio::test]
async fn cancel_count() {
    let mut stream = fast_engine().subscribe(Request::new("subscription { count(target: 100) }"));
    for expected in 0..3 {
        let response = stream.next().await.unwrap();
        assert_eq!(response.data, Some(json!({ "count": expected })));
    }
    stream.cancel();
    assert!(stream.next().await.is_none());
}

/// `count` has no default target, so omitting it fails validation.
#[tokio::test]
async fn count_requires_target() {
    let responses: Vec<_> = fast_engine()
        .subscribe(Request::new("subscription { count }"))
        .collect()
        .await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].data, Some(serde_json::Value::Null));
    assert_eq!(responses[0].errors.len(), 1);
    assert!(responses[0].errors[0].message.contains("`target`"), "{:?}", responses[0].errors);
}
