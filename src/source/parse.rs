//! JSON envelope decoding.
//!
//! The content API wraps its articles like this:
//!
//! ```text
//! { "response": { "results": [ { "webTitle": .., "sectionName": .., "webUrl": .. }, .. ] } }
//! ```
//!
//! Decoding is all-or-nothing: one missing or mistyped field anywhere fails
//! the whole response, and the error carries the JSON path of the first
//! problem found.  A partial list is never returned.

use serde_json::Value;

use super::NewsItem;
use crate::error::ParseError;

/// Decode a response body into articles, in server order.
///
/// `None` stands for "no body at all" and is treated like an empty string.
pub fn parse_news(body: Option<&str>) -> Result<Vec<NewsItem>, ParseError> {
    let text = match body {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ParseError::Empty),
    };

    let root: Value = serde_json::from_str(text).map_err(|e| malformed("$", e.to_string()))?;

    let response = object_field(&root, "response", "response")?;
    let results = response
        .get("results")
        .ok_or_else(|| malformed("response.results", "missing field"))?
        .as_array()
        .ok_or_else(|| malformed("response.results", "expected an array"))?;

    results
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_item(entry, &format!("response.results[{i}]")))
        .collect()
}

fn parse_item(entry: &Value, path: &str) -> Result<NewsItem, ParseError> {
    if !entry.is_object() {
        return Err(malformed(path, "expected an object"));
    }

    Ok(NewsItem::new(
        string_field(entry, "webTitle", path)?,
        string_field(entry, "sectionName", path)?,
        string_field(entry, "webUrl", path)?,
    ))
}

fn object_field<'a>(parent: &'a Value, key: &str, path: &str) -> Result<&'a Value, ParseError> {
    let value = parent.get(key).ok_or_else(|| malformed(path, "missing field"))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(malformed(path, "expected an object"))
    }
}

fn string_field(parent: &Value, key: &str, path: &str) -> Result<String, ParseError> {
    let path = format!("{path}.{key}");
    match parent.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(malformed(&path, "expected a string")),
        None => Err(malformed(&path, "missing field")),
    }
}

fn malformed(path: &str, reason: impl Into<String>) -> ParseError {
    ParseError::Malformed {
        path: path.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(results: &str) -> String {
        format!(r#"{{"response":{{"status":"ok","results":{results}}}}}"#)
    }

    fn malformed_path(err: ParseError) -> String {
        match err {
            ParseError::Malformed { path, .. } => path,
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn single_article_is_decoded() {
        let body = r#"{"response":{"results":[{"webTitle":"A","sectionName":"World","webUrl":"http://a"}]}}"#;
        let items = parse_news(Some(body)).unwrap();
        assert_eq!(items, vec![NewsItem::new("A", "World", "http://a")]);
    }

    #[test]
    fn preserves_server_order_and_duplicates() {
        let body = envelope(
            r#"[
                {"webTitle":"Third","sectionName":"World","webUrl":"http://3"},
                {"webTitle":"First","sectionName":"Sport","webUrl":"http://1"},
                {"webTitle":"Second","sectionName":"Film","webUrl":"http://2"},
                {"webTitle":"First","sectionName":"Sport","webUrl":"http://1"}
            ]"#,
        );

        let items = parse_news(Some(&body)).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Third", "First", "Second", "First"]);
    }

    #[test]
    fn ignores_extra_fields() {
        let body = envelope(
            r#"[{"id":"x","webTitle":"T","sectionName":"S","webUrl":"http://t","pillarName":"News"}]"#,
        );
        assert_eq!(parse_news(Some(&body)).unwrap().len(), 1);
    }

    #[test]
    fn empty_and_absent_bodies_are_empty_errors() {
        assert_eq!(parse_news(None), Err(ParseError::Empty));
        assert_eq!(parse_news(Some("")), Err(ParseError::Empty));
        assert_eq!(parse_news(Some("  \n")), Err(ParseError::Empty));
    }

    #[test]
    fn empty_results_is_success() {
        assert_eq!(parse_news(Some(&envelope("[]"))), Ok(vec![]));
    }

    #[test]
    fn not_json_is_malformed_at_root() {
        let err = parse_news(Some("<html>502 Bad Gateway</html>")).unwrap_err();
        assert_eq!(malformed_path(err), "$");
    }

    #[test]
    fn missing_response_is_malformed() {
        let err = parse_news(Some(r#"{"message":"API rate limit exceeded"}"#)).unwrap_err();
        assert_eq!(malformed_path(err), "response");
    }

    #[test]
    fn missing_results_is_malformed() {
        let err = parse_news(Some(r#"{"response":{"status":"ok"}}"#)).unwrap_err();
        assert_eq!(malformed_path(err), "response.results");
    }

    #[test]
    fn results_of_wrong_type_is_malformed() {
        let err = parse_news(Some(&envelope(r#"{"webTitle":"A"}"#))).unwrap_err();
        assert_eq!(malformed_path(err), "response.results");
    }

    #[test]
    fn one_bad_element_fails_the_whole_response() {
        let body = envelope(
            r#"[
                {"webTitle":"Good","sectionName":"World","webUrl":"http://good"},
                {"webTitle":"Bad","sectionName":"World"}
            ]"#,
        );

        let err = parse_news(Some(&body)).unwrap_err();
        assert_eq!(malformed_path(err), "response.results[1].webUrl");
    }

    #[test]
    fn mistyped_field_is_malformed() {
        let body = envelope(r#"[{"webTitle":42,"sectionName":"World","webUrl":"http://a"}]"#);
        let err = parse_news(Some(&body)).unwrap_err();
        assert_eq!(malformed_path(err), "response.results[0].webTitle");
    }

    #[test]
    fn null_field_is_malformed() {
        let body = envelope(r#"[{"webTitle":"A","sectionName":null,"webUrl":"http://a"}]"#);
        let err = parse_news(Some(&body)).unwrap_err();
        assert_eq!(malformed_path(err), "response.results[0].sectionName");
    }

    #[test]
    fn non_object_element_is_malformed() {
        let err = parse_news(Some(&envelope(r#"["just a string"]"#))).unwrap_err();
        assert_eq!(malformed_path(err), "response.results[0]");
    }
}
