//! Turning a [`Page`](crate::page::Page) into bytes for a viewer.

pub mod html;
pub mod text;

pub use html::HtmlRenderer;
