use crate::bookshelf::Book;
use crate::bookshelf::BookStore;

/// The seeded store holds the two Fitzgerald titles.
#[test]
fn seeded_store() {
    let store = BookStore::seeded();
    assert_eq!(store.books(), vec![
        Book::new("The Great Gatsby", "F. Scott Fitzgerald"),
        Book::new("Gatsby 2", "F. Scott Fitzgerald"),
    ]);
}

/// Clones share one list.
#[test]
fn clones_share_books() {
    let store = BookStore::default();
    assert!(store.is_empty());

    let handle = store.clone();
    handle.add(Book::new("Tender Is the Night", "F. Scott Fitzgerald"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.books()[0].title, "Tender Is the Night");
}

/// Concurrent writers never lose a book.
#[test]
fn concurrent_adds() {
    let store = BookStore::default();
    std::thread::scope(|scope| {
        for n in 0..8 {
            let store = store.clone();
            scope.spawn(move || store.add(Book::new(format!("Book {n}"), "anon")));
        }
    });
    assert_eq!(store.len(), 8);
}
