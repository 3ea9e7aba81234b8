//! Encoding handler return values into responses.

mod resolvers;

pub use resolvers::{
	HtmlResolver, JsonResolver, PassthroughResolver, RawFallbackResolver, StreamResolver,
	XmlResolver,
};

use std::sync::Arc;
use switchyard_conf::ResolverSettings;
use switchyard_exception::{Error, Result};
use switchyard_http::{Request, Response};
use switchyard_types::{ReturnValue, RouteMetadata};
use tracing::{debug, error};

/// One strategy in the response chain
pub trait ResponseResolver: Send + Sync {
	/// Short name used in logs and settings
	fn name(&self) -> &'static str;

	fn supports(&self, value: &ReturnValue, request: &Request, metadata: &RouteMetadata) -> bool;

	fn resolve(
		&self,
		value: ReturnValue,
		request: &Request,
		metadata: &RouteMetadata,
	) -> Result<Response>;
}

/// Ordered, immutable list of response resolvers.
///
/// The first resolver that supports the value encodes it. When none does the
/// chain fails with a server error; configuring [`RawFallbackResolver`] last
/// rules that out.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use switchyard_dispatch::responses::ResponseResolverChain;
/// use switchyard_http::Request;
/// use switchyard_types::RouteMetadata;
///
/// let chain = ResponseResolverChain::standard();
/// let request = Request::builder().build().unwrap();
///
/// let response = chain
///     .resolve(json!({"ok": true}).into(), &request, &RouteMetadata::default())
///     .unwrap();
/// assert_eq!(response.content_type(), Some("application/json"));
/// assert_eq!(response.body_bytes().unwrap().as_ref(), br#"{"ok":true}"#);
/// ```
#[derive(Clone, Default)]
pub struct ResponseResolverChain {
	resolvers: Arc<[Arc<dyn ResponseResolver>]>,
}

impl ResponseResolverChain {
	pub fn builder() -> ResponseResolverChainBuilder {
		ResponseResolverChainBuilder::default()
	}

	/// The recommended order: passthrough, json, xml, html, stream, raw
	pub fn standard() -> Self {
		Self::builder()
			.push(PassthroughResolver)
			.push(JsonResolver)
			.push(XmlResolver)
			.push(HtmlResolver)
			.push(StreamResolver)
			.push(RawFallbackResolver)
			.build()
	}

	/// Build a chain from built-in resolver names, in the given order
	pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
		let mut builder = Self::builder();
		for name in names {
			builder = match name.as_ref() {
				"passthrough" => builder.push(PassthroughResolver),
				"json" => builder.push(JsonResolver),
				"xml" => builder.push(XmlResolver),
				"html" => builder.push(HtmlResolver),
				"stream" => builder.push(StreamResolver),
				"raw" => builder.push(RawFallbackResolver),
				other => {
					return Err(Error::Configuration(format!(
						"unknown response resolver `{}` (expected one of: {})",
						other,
						ResolverSettings::KNOWN_RESPONSES.join(", ")
					)));
				}
			};
		}
		Ok(builder.build())
	}

	pub fn len(&self) -> usize {
		self.resolvers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.resolvers.is_empty()
	}

	pub fn names(&self) -> Vec<&'static str> {
		self.resolvers.iter().map(|resolver| resolver.name()).collect()
	}

	/// Encode `value` with the first resolver that supports it
	pub fn resolve(
		&self,
		value: ReturnValue,
		request: &Request,
		metadata: &RouteMetadata,
	) -> Result<Response> {
		match self
			.resolvers
			.iter()
			.find(|resolver| resolver.supports(&value, request, metadata))
		{
			Some(resolver) => {
				debug!(
					resolver = resolver.name(),
					response_type = %metadata.response_type,
					"resolving response"
				);
				resolver.resolve(value, request, metadata)
			}
			None => {
				error!(
					response_type = %metadata.response_type,
					value = ?value,
					"no response resolver supports return value"
				);
				Err(Error::Server(
					"Unable to resolve response from controller return value".to_string(),
				))
			}
		}
	}
}

impl std::fmt::Debug for ResponseResolverChain {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.names()).finish()
	}
}

/// Collects resolvers before freezing them into a chain
#[derive(Default)]
pub struct ResponseResolverChainBuilder {
	resolvers: Vec<Arc<dyn ResponseResolver>>,
}

impl ResponseResolverChainBuilder {
	pub fn push<R: ResponseResolver + 'static>(self, resolver: R) -> Self {
		self.push_arc(Arc::new(resolver))
	}

	pub fn push_arc(mut self, resolver: Arc<dyn ResponseResolver>) -> Self {
		self.resolvers.push(resolver);
		self
	}

	pub fn build(self) -> ResponseResolverChain {
		ResponseResolverChain {
			resolvers: self.resolvers.into(),
		}
	}
}
