//! HTML rendering shared by the server and the static export

pub mod layout;
pub mod links;
pub mod pages;

pub use layout::{NavItem, PageContext};
pub use links::{LinkMode, Links};
