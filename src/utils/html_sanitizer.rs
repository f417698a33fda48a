// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Attributes;
use scraper::{Html, Node};

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));
static IFRAME_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe\s*>").expect("valid regex"));
// Unclosed or self-closing leftovers
static DANGLING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)</?(?:script|style|iframe)\b[^>]*>").expect("valid regex"));

/// 清理抓取到的原文 HTML
///
/// 移除 `<script>`、`<style>`、`<iframe>` 元素以及所有 `on*` 事件属性。
/// 属性在解析后的节点树上过滤，输出为重新序列化的片段
pub fn sanitize_html(html: &str) -> String {
    let cleaned = SCRIPT_BLOCK.replace_all(html, "");
    let cleaned = STYLE_BLOCK.replace_all(&cleaned, "");
    let cleaned = IFRAME_BLOCK.replace_all(&cleaned, "");
    let cleaned = DANGLING_TAG.replace_all(&cleaned, "");

    let mut fragment = Html::parse_fragment(&cleaned);
    for node in fragment.tree.values_mut() {
        if let Node::Element(element) = node {
            let kept: Attributes = element
                .attrs
                .drain(..)
                .filter(|(name, _)| !is_event_handler(&name.local))
                .collect();
            element.attrs = kept;
        }
    }
    fragment.root_element().inner_html()
}

fn is_event_handler(name: &str) -> bool {
    name.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

/// 提取 HTML 片段中的纯文本
///
/// 每个文本节点去除首尾空白后按行拼接，空节点被丢弃
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
