use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use tracing::debug;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Book {
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

/// The in-memory list of books. Clones share the same list.
#[derive(Clone, Debug, Default)]
pub struct BookStore {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BookStore {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: Arc::new(RwLock::new(books)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_books())
    }

    pub fn add(&self, book: Book) {
        debug!(title = %book.title, author = %book.author, "adding book");
        self.books
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(book);
    }

    pub fn books(&self) -> Vec<Book> {
        self.books
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.books.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn to_json(&self) -> anyhow::Result<Value> {
        let books = self.books.read().unwrap_or_else(PoisonError::into_inner);
        Ok(serde_json::to_value(&*books)?)
    }
}

pub(crate) fn seed_books() -> Vec<Book> {
    vec![
        Book::new("The Great Gatsby", "F. Scott Fitzgerald"),
        Book::new("Gatsby 2", "F. Scott Fitzgerald"),
    ]
}
