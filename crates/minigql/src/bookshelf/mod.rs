//! The bookshelf service: a list of books that can be queried, appended to,
//! and a counter subscription.

mod book_store;
mod bookshelf_config;

pub use book_store::Book;
pub use book_store::BookStore;
pub use bookshelf_config::BookshelfConfig;

use crate::engine::Engine;
use crate::resolver::ContextData;
use crate::resolver::EventStream;
use crate::resolver::ResolverParams;
use crate::schema::Schema;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub const BOOKSHELF_SDL: &str = r#"
type Book {
  title: String!
  author: String!
}

type Query {
  books: [Book!]!
}

type Mutation {
  addBook(title: String!, author: String!): Book!
}

type Subscription {
  count(target: Int!): Int!
}
"#;

/// The bookshelf schema with its resolvers bound. Resolvers expect a
/// [`BookStore`] as context data.
pub fn schema(config: &BookshelfConfig) -> Result<Schema, SchemaBuildError> {
    let interval = config.count_interval;
    SchemaBuilder::new()
        .load_str(BOOKSHELF_SDL)?
        .resolver("Query", "books", |params| {
            let books = store(&params).and_then(|store| store.to_json());
            async move { books }
        })
        .resolver("Mutation", "addBook", |params| {
            let added = store(&params).and_then(|store| {
                let book = Book::new(params.str_arg("title")?, params.str_arg("author")?);
                store.add(book.clone());
                Ok(serde_json::to_value(book)?)
            });
            async move { added }
        })
        .subscription_resolver("Subscription", "count", move |params| {
            Ok(count(params.int_arg("target")?, interval))
        })
        .build()
}

/// An [`Engine`] serving the bookshelf schema over a store seeded from
/// `config`.
pub fn engine(config: BookshelfConfig) -> Result<Engine, SchemaBuildError> {
    let store = BookStore::new(config.seed_books.clone());
    engine_with_store(config, store)
}

/// Like [`engine`], over a caller-owned store.
pub fn engine_with_store(config: BookshelfConfig, store: BookStore) -> Result<Engine, SchemaBuildError> {
    let schema = schema(&config)?;
    Ok(Engine::new(Arc::new(schema)).with_context_data(ContextData::new(store)))
}

fn store(params: &ResolverParams) -> anyhow::Result<&BookStore> {
    params.context.require::<BookStore>()
}

/// `0, 1, ..., target - 1`, pausing `interval` between events.
fn count(target: i64, interval: Duration) -> EventStream {
    futures::stream::unfold(0, move |n| async move {
        if n >= target {
            return None;
        }
        if n > 0 {
            tokio::time::sleep(interval).await;
        }
        Some((anyhow::Ok(json!(n)), n + 1))
    })
    .boxed()
}

#[cfg(test)]
mod tests;
