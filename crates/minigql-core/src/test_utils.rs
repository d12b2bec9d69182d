//! A small bookshelf-flavoured schema shared by the unit tests.

use crate::ast;
use crate::resolver::ContextData;
use crate::resolver::EventStream;
use crate::resolver::ResolverParams;
use crate::schema::Schema;
use crate::schema::SchemaBuilder;
use futures::StreamExt;
use serde_json::Value;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;
use std::time::Duration;

pub(crate) const TEST_SDL: &str = r#"
scalar Date

enum Genre { FICTION NONFICTION }

type Book {
  title: String!
  author: String!
  genre: Genre
  pages: Int
  published: Date
}

type Query {
  books(limit: Int = 10, genre: Genre): [Book!]!
  book(title: String!): Book
  greeting(name: String = "world"): String!
  fail: String
  failNonNull: String!
  echo(value: ID): ID
  numbers(values: [Int]): [Int]
  slow(ms: Int! = 10): Int!
  wrongType: Int
  forever: String
}

type Mutation {
  addBook(title: String!, author: String!): Book!
  delayedAppend(entry: String!, ms: Int! = 0): [String!]!
}

type Subscription {
  count(target: Int! = 3): Int!
  bookEvents: Book
}
"#;

/// Shared state handed to resolvers as context data.
#[derive(Clone, Default)]
pub(crate) struct TestStore {
    pub books: Arc<RwLock<Vec<Value>>>,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl TestStore {
    pub fn seeded() -> Self {
        let store = Self::default();
        store.books.write().unwrap().extend([
            json!({
                "title": "The Great Gatsby",
                "author": "F. Scott Fitzgerald",
                "genre": "FICTION",
                "pages": 180,
                "published": "1925-04-10",
            }),
            json!({
                "title": "Gatsby 2",
                "author": "F. Scott Fitzgerald",
                "genre": "FICTION",
                "pages": null,
            }),
        ]);
        store
    }

    pub fn context(&self) -> ContextData {
        ContextData::new(self.clone())
    }
}

fn store(params: &ResolverParams) -> anyhow::Result<TestStore> {
    params.context.require::<TestStore>().cloned()
}

pub(crate) fn test_schema() -> Arc<Schema> {
    let schema = SchemaBuilder::new()
        .load_str(TEST_SDL)
        .unwrap()
        .resolver("Query", "books", |params| {
            let store = store(&params);
            async move {
                let limit = params.int_arg("limit")? as usize;
                let genre = params.arg("genre").cloned().unwrap_or(Value::Null);
                let books = store?.books.read().unwrap().clone();
                anyhow::Ok(Value::Array(
                    books
                        .into_iter()
                        .filter(|b| genre.is_null() || b["genre"] == genre)
                        .take(limit)
                        .collect(),
                ))
            }
        })
        .resolver("Query", "book", |params| {
            let store = store(&params);
            async move {
                let title = params.str_arg("title")?;
                let books = store?.books.read().unwrap().clone();
                anyhow::Ok(
                    books
                        .into_iter()
                        .find(|b| b["title"] == title)
                        .unwrap_or(Value::Null),
                )
            }
        })
        .resolver("Query", "greeting", |params| async move {
            anyhow::Ok(json!(format!("hello, {}", params.str_arg("name")?)))
        })
        .resolver("Query", "fail", |_| async {
            Err::<Value, _>(anyhow::anyhow!("boom"))
        })
        .resolver("Query", "failNonNull", |_| async {
            Err::<Value, _>(anyhow::anyhow!("non-null boom"))
        })
        .resolver("Query", "echo", |params| async move {
            anyhow::Ok(params.arg("value").cloned().unwrap_or(Value::Null))
        })
        .resolver("Query", "numbers", |params| async move {
            anyhow::Ok(params.arg("values").cloned().unwrap_or(json!([1, 2, 3])))
        })
        .resolver("Query", "slow", |params| async move {
            let ms = params.int_arg("ms")?;
            tokio::time::sleep(Duration::from_millis(ms as u64)).await;
            anyhow::Ok(json!(ms))
        })
        .resolver("Query", "wrongType", |_| async { anyhow::Ok(json!("abc")) })
        .resolver("Query", "forever", |_| async {
            futures::future::pending::<()>().await;
            anyhow::Ok(Value::Null)
        })
        .resolver("Mutation", "addBook", |params| {
            let store = store(&params);
            async move {
                let book = json!({
                    "title": params.str_arg("title")?,
                    "author": params.str_arg("author")?,
                });
                store?.books.write().unwrap().push(book.clone());
                anyhow::Ok(book)
            }
        })
        .resolver("Mutation", "delayedAppend", |params| {
            let store = store(&params);
            async move {
                let store = store?;
                let entry = params.str_arg("entry")?.to_string();
                store.log.lock().unwrap().push(format!("start {entry}"));
                tokio::time::sleep(Duration::from_millis(params.int_arg("ms")? as u64)).await;
                let log = {
                    let mut log = store.log.lock().unwrap();
                    log.push(format!("end {entry}"));
                    log.clone()
                };
                anyhow::Ok(json!(log))
            }
        })
        .subscription_resolver("Subscription", "count", |params| {
            let target = params.int_arg("target")?;
            let events: EventStream = futures::stream::iter(0..target)
                .map(|n| anyhow::Ok(json!(n)))
                .boxed();
            Ok(events)
        })
        .subscription_resolver("Subscription", "bookEvents", |_params| {
            let events: EventStream = futures::stream::iter([
                Ok(json!({ "title": "First", "author": "A" })),
                Err(anyhow::anyhow!("feed hiccup")),
                Ok(json!({ "title": "Second", "author": "B" })),
            ])
            .boxed();
            Ok(events)
        })
        .build()
        .unwrap();
    Arc::new(schema)
}

pub(crate) fn parse(source: &str) -> ast::Document {
    minigql_parser::parse_executable_document(source).unwrap()
}
