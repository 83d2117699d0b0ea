//! Blog posts — markdown files with YAML front matter
//!
//! Each file in the posts directory becomes a [`Post`]. The
//! [`PostRepository`] keeps them sorted newest first for listings and
//! previous/next navigation.

pub mod error;
pub mod file_ops;
pub mod frontmatter;
pub mod markdown;
pub mod post;
pub mod repository;

pub use error::PostError;
pub use markdown::MarkdownRenderer;
pub use post::Post;
pub use repository::{paginate, Page, PostIndex, PostRepository};
