// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub const TITLE_PLACEHOLDER: &str = "{{title}}";
pub const CONTENT_PLACEHOLDER: &str = "{{content}}";

/// 用原文渲染提示词模板
///
/// 只替换模板中第一次出现的 `{{title}}` 和 `{{content}}`，
/// 替换值中即使含有占位符文本也不会被再次替换。HTML 不做转义，
/// 找不到的占位符保持原样。
pub fn compile_prompt(template: &str, title: &str, content: &str) -> String {
    let mut slots: Vec<(usize, &str, &str)> = [
        (TITLE_PLACEHOLDER, title),
        (CONTENT_PLACEHOLDER, content),
    ]
    .into_iter()
    .filter_map(|(placeholder, value)| {
        template
            .find(placeholder)
            .map(|pos| (pos, placeholder, value))
    })
    .collect();
    slots.sort_by_key(|(pos, _, _)| *pos);

    let mut prompt = String::with_capacity(template.len() + title.len() + content.len());
    let mut cursor = 0;
    for (pos, placeholder, value) in slots {
        prompt.push_str(&template[cursor..pos]);
        prompt.push_str(value);
        cursor = pos + placeholder.len();
    }
    prompt.push_str(&template[cursor..]);
    prompt
}
