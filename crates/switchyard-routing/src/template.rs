//! Path templates with `{name}` placeholders.

use indexmap::IndexMap;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use switchyard_exception::{Error, Result};

/// Captured path parameters, in placeholder declaration order
pub type PathParams = IndexMap<String, String>;

/// Strip a trailing slash, except from the root path.
///
/// # Examples
///
/// ```
/// use switchyard_routing::normalize_path;
///
/// assert_eq!(normalize_path("/users/"), "/users");
/// assert_eq!(normalize_path("/"), "/");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
	if path.is_empty() {
		return Cow::Borrowed("/");
	}
	let trimmed = path.trim_end_matches('/');
	if trimmed.is_empty() {
		Cow::Borrowed("/")
	} else if trimmed.len() == path.len() {
		Cow::Borrowed(path)
	} else {
		Cow::Owned(trimmed.to_string())
	}
}

/// A compiled route path.
///
/// Each `{name}` placeholder matches one or more characters other than `/`.
/// Literal text is matched exactly.
///
/// # Examples
///
/// ```
/// use switchyard_routing::PathTemplate;
///
/// let template = PathTemplate::parse("/posts/{post}/comments/{comment}").unwrap();
/// assert!(!template.is_static());
/// assert_eq!(template.param_names(), ["post", "comment"]);
///
/// let params = template.captures("/posts/7/comments/abc").unwrap();
/// assert_eq!(params["post"], "7");
/// assert_eq!(params["comment"], "abc");
/// assert!(template.captures("/posts/7/comments/").is_none());
/// ```
#[derive(Clone)]
pub struct PathTemplate {
	raw: String,
	param_names: Vec<String>,
	pattern: Option<Regex>,
}

impl PathTemplate {
	/// Parse a template, rejecting malformed placeholders
	pub fn parse(path: &str) -> Result<Self> {
		if !path.contains('{') {
			if path.contains('}') {
				return Err(invalid(path, "unmatched `}`"));
			}
			return Ok(Self {
				raw: path.to_string(),
				param_names: Vec::new(),
				pattern: None,
			});
		}

		let mut pattern = String::from("^");
		let mut param_names: Vec<String> = Vec::new();
		let mut rest = path;
		while let Some(open) = rest.find(['{', '}']) {
			if rest[open..].starts_with('}') {
				return Err(invalid(path, "unmatched `}`"));
			}
			pattern.push_str(&regex::escape(&rest[..open]));
			let after = &rest[open + 1..];
			let close = after
				.find('}')
				.ok_or_else(|| invalid(path, "unclosed `{`"))?;
			let name = &after[..close];
			if name.contains('{') {
				return Err(invalid(path, "nested `{`"));
			}
			if !is_valid_name(name) {
				return Err(invalid(path, &format!("invalid placeholder name `{}`", name)));
			}
			if param_names.iter().any(|existing| existing == name) {
				return Err(invalid(path, &format!("duplicate placeholder `{}`", name)));
			}
			pattern.push_str(&format!("(?P<{}>[^/]+)", name));
			param_names.push(name.to_string());
			rest = &after[close + 1..];
		}
		pattern.push_str(&regex::escape(rest));
		pattern.push('$');

		let regex = Regex::new(&pattern)
			.map_err(|e| Error::Configuration(format!("cannot compile `{}`: {}", path, e)))?;
		Ok(Self {
			raw: path.to_string(),
			param_names,
			pattern: Some(regex),
		})
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Whether the template has no placeholders
	pub fn is_static(&self) -> bool {
		self.pattern.is_none()
	}

	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Match `path` against the template, returning the captured parameters
	pub fn captures(&self, path: &str) -> Option<PathParams> {
		let Some(pattern) = &self.pattern else {
			return (self.raw == path).then(PathParams::new);
		};
		let captures = pattern.captures(path)?;
		Some(
			self.param_names
				.iter()
				.filter_map(|name| {
					captures
						.name(name)
						.map(|value| (name.clone(), value.as_str().to_string()))
				})
				.collect(),
		)
	}

	pub fn is_match(&self, path: &str) -> bool {
		match &self.pattern {
			Some(pattern) => pattern.is_match(path),
			None => self.raw == path,
		}
	}
}

fn is_valid_name(name: &str) -> bool {
	let mut chars = name.chars();
	chars
		.next()
		.is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn invalid(path: &str, reason: &str) -> Error {
	Error::Configuration(format!("invalid path template `{}`: {}", path, reason))
}

impl fmt::Debug for PathTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("PathTemplate").field(&self.raw).finish()
	}
}

impl fmt::Display for PathTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}
