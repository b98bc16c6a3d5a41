pub mod article;
pub mod bookmark;

pub use article::{excerpt_of, ArticleRecord};
pub use bookmark::{BookmarkRecord, NewBookmark, WireBookmark};
