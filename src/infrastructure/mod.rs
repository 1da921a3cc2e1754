pub mod compiler;
pub mod http_session;
pub mod token_source;

pub use compiler::compile_document;
pub use http_session::{Exchange, FetchedPage, HttpSession, Pacing};
pub use token_source::{HtmlTokenSource, TokenSelector, TokenSource};
