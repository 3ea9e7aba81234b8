//! # Switchyard HTTP
//!
//! The request and response abstractions the dispatcher works against.
//!
//! A wire adapter converts its server's native request into a [`Request`],
//! hands it to the dispatcher, and writes the returned [`Response`] back out.
//! Neither type parses or emits HTTP wire bytes.
//!
//! ## Examples
//!
//! ```
//! use switchyard_http::{Request, Response};
//! use http::{Method, StatusCode};
//!
//! let request = Request::builder()
//!     .method(Method::GET)
//!     .uri("/users/42?expand=roles")
//!     .build()
//!     .unwrap();
//! assert_eq!(request.path(), "/users/42");
//! assert_eq!(request.query("expand"), Some("roles"));
//!
//! let response = Response::ok().with_body("hello");
//! assert_eq!(response.status, StatusCode::OK);
//! ```

pub mod request;
pub mod response;
pub mod response_type;
pub mod xml;

pub use request::{Request, RequestBuilder};
pub use response::{Body, BoxError, Response, StreamBody};
pub use response_type::ResponseType;
pub use switchyard_exception::{Error, Result};
