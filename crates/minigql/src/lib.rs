//! A small GraphQL engine.
//!
//! Build a [`Schema`](schema::Schema) from SDL and resolver bindings, then
//! hand [`Request`](engine::Request)s to an [`Engine`](engine::Engine):
//!
//! ```
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! use minigql::bookshelf::BookshelfConfig;
//! use minigql::engine::Request;
//!
//! let engine = minigql::bookshelf::engine(BookshelfConfig::default())?;
//! let response = engine.execute(Request::new("{ books { title } }")).await;
//! assert_eq!(response.data.unwrap()["books"][0]["title"], "The Great Gatsby");
//! # anyhow::Ok(())
//! # }).unwrap();
//! ```

pub use minigql_core::*;

/// The lexer and parser for executable documents.
pub mod parser {
    pub use minigql_parser::*;
}

pub mod bookshelf;
