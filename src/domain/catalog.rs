use super::{Book, BookId};

/// カタログ - 既知の書籍の固定リスト
///
/// プロセスの生存期間中は変化しない。書籍の追加・削除は行わない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRegistry {
    books: Vec<Book>,
}

impl CatalogRegistry {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// アプリに同梱されている6冊の参照データ
    pub fn reference() -> Self {
        Self::new(vec![
            Book::new("1", "To Kill a Mockingbird", "Harper Lee", "Fiction"),
            Book::new("2", "1984", "George Orwell", "Fiction"),
            Book::new("3", "The Great Gatsby", "F. Scott Fitzgerald", "Fiction"),
            Book::new("4", "Pride and Prejudice", "Jane Austen", "Romance"),
            Book::new("5", "The Catcher in the Rye", "J.D. Salinger", "Fiction"),
            Book::new(
                "6",
                "Harry Potter and the Sorcerer's Stone",
                "J.K. Rowling",
                "Fantasy",
            ),
        ])
    }

    /// 登録順にすべての書籍を返す
    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    pub fn find(&self, book_id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| &book.id == book_id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::reference()
    }
}
