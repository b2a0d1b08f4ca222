use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::modules::books::models::Book;

/// Stored seller row. `password` holds the bcrypt hash and never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct Seller {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Request model for registering a seller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSeller {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Request model for updating a seller. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSeller {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Public view of a seller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SellerResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Seller> for SellerResponse {
    fn from(seller: Seller) -> Self {
        Self {
            id: seller.id,
            first_name: seller.first_name,
            last_name: seller.last_name,
            email: seller.email,
        }
    }
}

/// A book as listed inside a seller's detail view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookInSeller {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub pages: i64,
}

impl From<Book> for BookInSeller {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            year: book.year,
            pages: book.pages,
        }
    }
}

/// Seller together with the books they sell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerDetailResponse {
    #[serde(flatten)]
    pub seller: SellerResponse,
    pub books: Vec<BookInSeller>,
}
