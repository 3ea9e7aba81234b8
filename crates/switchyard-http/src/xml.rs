//! Mapping of JSON-shaped values onto a simple XML document.
//!
//! The document always has a synthetic `<root>` element. Object keys become
//! element names, with numeric keys and array positions rewritten to
//! `item{N}`, and characters that cannot appear in an element name become
//! `_`. Leaves become escaped text: `true` renders as `1`, while
//! `false` and `null` render as empty elements.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;
use switchyard_exception::{Error, Result};

const ROOT: &str = "root";

/// Encode `value` as an XML document.
///
/// A top-level string is assumed to already be XML and is returned verbatim.
///
/// # Examples
///
/// ```
/// use switchyard_http::xml::to_document;
/// use serde_json::json;
///
/// let xml = to_document(&json!({"home": "Olá Mundo", "tags": ["a", "b"]})).unwrap();
/// assert_eq!(
///     xml,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?><root><home>Olá Mundo</home>\
///      <tags><item0>a</item0><item1>b</item1></tags></root>"
/// );
/// ```
pub fn to_document(value: &Value) -> Result<String> {
	if let Value::String(document) = value {
		return Ok(document.clone());
	}

	let mut writer = Writer::new(Vec::new());
	write(
		&mut writer,
		Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
	)?;
	write(&mut writer, Event::Start(BytesStart::new(ROOT)))?;
	match value {
		Value::Object(_) | Value::Array(_) => write_children(&mut writer, value)?,
		// Scalars are treated as a one-element list
		scalar => write_element(&mut writer, "item0", scalar)?,
	}
	write(&mut writer, Event::End(BytesEnd::new(ROOT)))?;

	String::from_utf8(writer.into_inner())
		.map_err(|e| Error::Serialization(format!("xml output is not UTF-8: {}", e)))
}

fn write_children(writer: &mut Writer<Vec<u8>>, value: &Value) -> Result<()> {
	match value {
		Value::Object(map) => {
			for (key, child) in map {
				write_element(writer, &element_name(key), child)?;
			}
		}
		Value::Array(items) => {
			for (index, child) in items.iter().enumerate() {
				write_element(writer, &format!("item{}", index), child)?;
			}
		}
		_ => {}
	}
	Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
	match value {
		Value::Object(_) | Value::Array(_) => {
			write(writer, Event::Start(BytesStart::new(name)))?;
			write_children(writer, value)?;
			write(writer, Event::End(BytesEnd::new(name)))
		}
		leaf => {
			let text = leaf_text(leaf);
			if text.is_empty() {
				return write(writer, Event::Empty(BytesStart::new(name)));
			}
			write(writer, Event::Start(BytesStart::new(name)))?;
			write(writer, Event::Text(BytesText::new(&text)))?;
			write(writer, Event::End(BytesEnd::new(name)))
		}
	}
}

fn leaf_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Number(n) => n.to_string(),
		Value::Bool(true) => "1".to_string(),
		Value::Bool(false) | Value::Null => String::new(),
		Value::Object(_) | Value::Array(_) => String::new(),
	}
}

/// Numeric keys become `item{N}`. Characters not allowed in an element
/// name are replaced with `_`, and a name that cannot start an element is
/// prefixed with `_`.
fn element_name(key: &str) -> String {
	if key.parse::<f64>().is_ok() && key.chars().any(|c| c.is_ascii_digit()) {
		return format!("item{}", key);
	}
	let mut name: String = key
		.chars()
		.map(|c| {
			if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
				c
			} else {
				'_'
			}
		})
		.collect();
	if !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
		name.insert(0, '_');
	}
	name
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
	writer
		.write_event(event)
		.map_err(|e| Error::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	const DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

	#[rstest]
	fn test_nested_object() {
		// Arrange
		let value = json!({"user": {"name": "ada", "id": 7}});

		// Act
		let xml = to_document(&value).unwrap();

		// Assert
		assert_eq!(
			xml,
			format!("{DECL}<root><user><name>ada</name><id>7</id></user></root>")
		);
	}

	#[rstest]
	fn test_numeric_keys_become_items() {
		let xml = to_document(&json!({"10": "ten"})).unwrap();

		assert_eq!(xml, format!("{DECL}<root><item10>ten</item10></root>"));
	}

	#[rstest]
	fn test_text_is_escaped() {
		let xml = to_document(&json!({"note": "a < b & c"})).unwrap();

		assert!(xml.contains("<note>a &lt; b &amp; c</note>"));
	}

	#[rstest]
	#[case(json!({"flag": true}), "<flag>1</flag>")]
	#[case(json!({"flag": false}), "<flag/>")]
	#[case(json!({"flag": null}), "<flag/>")]
	fn test_leaf_conversion(#[case] value: Value, #[case] expected: &str) {
		let xml = to_document(&value).unwrap();

		assert!(xml.contains(expected), "{xml}");
	}

	#[rstest]
	fn test_string_passes_through() {
		let xml = to_document(&json!("<feed/>")).unwrap();

		assert_eq!(xml, "<feed/>");
	}

	#[rstest]
	fn test_top_level_scalar_wrapped() {
		let xml = to_document(&json!(42)).unwrap();

		assert_eq!(xml, format!("{DECL}<root><item0>42</item0></root>"));
	}

	#[rstest]
	#[case("first name", "first_name")]
	#[case("a<b>", "a_b_")]
	#[case("-lead", "_-lead")]
	#[case("1st", "_1st")]
	#[case("", "_")]
	fn test_invalid_element_names_are_sanitized(#[case] key: &str, #[case] expected: &str) {
		// Arrange
		let mut value = serde_json::Map::new();
		value.insert(key.to_string(), json!(1));

		// Act
		let xml = to_document(&Value::Object(value)).unwrap();

		// Assert
		assert_eq!(xml, format!("{DECL}<root><{expected}>1</{expected}></root>"));
	}
}
