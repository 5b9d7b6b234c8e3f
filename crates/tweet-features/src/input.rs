//! Turning loader output into the `Vec<String>` corpus the pipeline takes.

use serde_json::Value;

use crate::error::{Error, Result};

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a JSON array of strings. Null or non-string elements fail with
/// [`Error::Input`] carrying their position.
pub fn texts_from_json(json: &str) -> Result<Vec<String>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(text) => Ok(text),
            other => Err(Error::Input {
                index,
                reason: format!("expected a string, found {}", kind(&other)),
            }),
        })
        .collect()
}

/// One text per line; invalid UTF-8 is replaced with U+FFFD.
#[must_use]
pub fn texts_from_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_owned)
        .collect()
}

/// One text per line; a line that is not valid UTF-8 fails with [`Error::Input`].
pub fn texts_from_utf8_lines(bytes: &[u8]) -> Result<Vec<String>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .map(|(index, line)| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            std::str::from_utf8(line)
                .map(str::to_owned)
                .map_err(|err| Error::Input {
                    index,
                    reason: err.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texts_from_json() {
        let texts = texts_from_json(r#"["a tweet", "", "RT @x hi"]"#).unwrap();
        assert_eq!(texts, ["a tweet", "", "RT @x hi"]);
    }

    #[test]
    fn test_null_and_non_string_elements_are_input_errors() {
        let err = texts_from_json(r#"["ok", null]"#).unwrap_err();
        assert!(matches!(err, Error::Input { index: 1, .. }));
        assert!(err.to_string().contains("null"));

        let err = texts_from_json(r#"[3, "ok"]"#).unwrap_err();
        assert!(matches!(err, Error::Input { index: 0, .. }));
    }

    #[test]
    fn test_non_array_json_is_rejected() {
        assert!(matches!(texts_from_json(r#"{"a": 1}"#), Err(Error::Json(_))));
    }

    #[test]
    fn test_texts_from_lines_is_lossy() {
        let texts = texts_from_lines(b"first\r\nsec\xffond\n");
        assert_eq!(texts, ["first", "sec\u{fffd}ond"]);
    }

    #[test]
    fn test_texts_from_utf8_lines() {
        assert_eq!(texts_from_utf8_lines(b"a\r\n\nb\n").unwrap(), ["a", "", "b"]);
        assert!(texts_from_utf8_lines(b"").unwrap().is_empty());
        let err = texts_from_utf8_lines(b"fine\nbad\xff").unwrap_err();
        assert!(matches!(err, Error::Input { index: 1, .. }));
    }
}
