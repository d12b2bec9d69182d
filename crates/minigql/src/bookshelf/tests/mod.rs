mod book_store_tests;
mod bookshelf_tests;
