pub mod config;
pub mod dispatch;
pub mod exception;
pub mod framer;
pub mod param;
pub mod request;
pub mod response;
pub mod server;
pub mod util;

pub use config::Config;
pub use dispatch::{Dispatcher, FileSource, LocalFiles};
pub use exception::Exception;
pub use param::HttpRequestMethod;
pub use request::Request;
pub use response::Response;
pub use util::HtmlBuilder;
