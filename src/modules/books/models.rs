use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Books published before this year are rejected by the `year` rules below.
pub const MIN_YEAR: i64 = 2020;

/// Stored book row, also the public representation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub pages: i64,
    pub seller_id: i64,
}

/// Request model for creating a book. When `seller_id` is given it must be
/// the authenticated seller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(range(min = 2020))]
    pub year: i64,
    #[validate(range(min = 1))]
    pub pages: i64,
    #[serde(default)]
    pub seller_id: Option<i64>,
}

/// Request model for a full book update. `id` and `seller_id` in the body
/// are ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(range(min = 2020))]
    pub year: i64,
    #[validate(range(min = 1))]
    pub pages: i64,
}

/// Response wrapper for the book listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(year: i64) -> CreateBook {
        CreateBook {
            title: "Clean Architecture".to_string(),
            author: "Robert Martin".to_string(),
            year,
            pages: 300,
            seller_id: None,
        }
    }

    #[test]
    fn year_boundary() {
        assert!(book(MIN_YEAR).validate().is_ok());
        assert!(book(MIN_YEAR - 1).validate().is_err());
        assert!(book(1986).validate().is_err());
    }

    #[test]
    fn pages_must_be_positive() {
        let mut empty = book(2024);
        empty.pages = 0;
        assert!(empty.validate().is_err());
    }

    #[test]
    fn update_ignores_identity_fields() {
        let update: UpdateBook = serde_json::from_value(serde_json::json!({
            "title": "New Title",
            "author": "New Author",
            "year": 2024,
            "pages": 150,
            "id": 99,
            "seller_id": 7
        }))
        .unwrap();
        assert!(update.validate().is_ok());
        assert_eq!(update.title, "New Title");
    }
}
