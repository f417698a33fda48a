// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rewritrs::domain::models::rewrite_result::RewriteResult;
use uuid::Uuid;

fn result() -> RewriteResult {
    RewriteResult::new(
        Uuid::new_v4(),
        1,
        "T2".to_string(),
        "<p>new</p>".to_string(),
        "new".to_string(),
    )
}

#[test]
fn test_new_result_is_not_edited() {
    let result = result();
    assert!(!result.is_edited);
    assert!(result.edited_content_html.is_none());
    assert_eq!(result.display_html(), "<p>new</p>");
}

#[test]
fn test_edit_keeps_generated_html() {
    let mut result = result();
    result.apply_edit("<p>mine</p>".to_string());

    assert!(result.is_edited);
    assert_eq!(result.content_html, "<p>new</p>");
    assert_eq!(result.display_html(), "<p>mine</p>");
    assert!(result.updated_at >= result.created_at);
}
