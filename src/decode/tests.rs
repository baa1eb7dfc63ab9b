//! Tests for decode module

use super::*;
use crate::error::Error;
use serde_json::json;

#[test]
fn test_decode_page_with_cursor() {
    let body = json!({
        "hitCount": 3,
        "nextCursorMark": "AoIIP4AAACgyOTU5NjY5Mw==",
        "resultList": {
            "result": [
                {"id": "1", "title": "First"},
                {"id": "2", "title": "Second"},
                {"id": "3", "title": "Third"}
            ]
        }
    })
    .to_string();

    let page = decode_page(&body).unwrap();
    assert_eq!(page.len(), 3);
    assert!(!page.is_last());
    assert_eq!(
        page.next_cursor.as_ref().map(|c| c.as_str()),
        Some("AoIIP4AAACgyOTU5NjY5Mw==")
    );
    assert_eq!(page.records[1]["title"], "Second");
}

#[test]
fn test_decode_page_preserves_order() {
    let body = json!({
        "resultList": {"result": [{"id": "c"}, {"id": "a"}, {"id": "b"}]}
    })
    .to_string();

    let page = decode_page(&body).unwrap();
    let ids: Vec<_> = page
        .records
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn test_decode_page_without_cursor_is_last() {
    let body = json!({"resultList": {"result": [{"id": "1"}]}}).to_string();
    let page = decode_page(&body).unwrap();
    assert!(page.is_last());
}

#[test]
fn test_decode_page_empty_cursor_is_last() {
    let body = json!({"nextCursorMark": "", "resultList": {"result": []}}).to_string();
    let page = decode_page(&body).unwrap();
    assert!(page.is_last());
    assert!(page.is_empty());
}

#[test]
fn test_decode_page_null_cursor_is_last() {
    let body = json!({"nextCursorMark": null, "resultList": {"result": []}}).to_string();
    assert!(decode_page(&body).unwrap().is_last());
}

#[test]
fn test_decode_missing_result_list() {
    let body = json!({"hitCount": 0}).to_string();
    let err = decode_page(&body).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[test]
fn test_decode_non_object_records() {
    let body = json!({"resultList": {"result": [1, 2]}}).to_string();
    assert!(matches!(
        decode_page(&body),
        Err(Error::MalformedResponse { .. })
    ));
}

#[test]
fn test_decode_invalid_json() {
    assert!(matches!(
        decode_page("<html>Service unavailable</html>"),
        Err(Error::MalformedResponse { .. })
    ));
}
