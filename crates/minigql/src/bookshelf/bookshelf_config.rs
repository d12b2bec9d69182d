use crate::bookshelf::Book;
use crate::bookshelf::book_store::seed_books;
use std::time::Duration;

const DEFAULT_COUNT_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct BookshelfConfig {
    /// Pause between `count` subscription events.
    pub count_interval: Duration,

    /// Initial contents of the store built by
    /// [`bookshelf::engine`](crate::bookshelf::engine).
    pub seed_books: Vec<Book>,
}

impl BookshelfConfig {
    pub fn with_count_interval(mut self, count_interval: Duration) -> Self {
        self.count_interval = count_interval;
        self
    }

    pub fn with_seed_books(mut self, seed_books: Vec<Book>) -> Self {
        self.seed_books = seed_books;
        self
    }
}

impl Default for BookshelfConfig {
    fn default() -> Self {
        Self {
            count_interval: DEFAULT_COUNT_INTERVAL,
            seed_books: seed_books(),
        }
    }
}
