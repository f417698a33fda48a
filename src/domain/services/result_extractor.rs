// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// 兜底结果标题后缀
pub const FALLBACK_TITLE_MARKER: &str = " (改写版)";

/// 兜底结果正文
pub const FALLBACK_CONTENT: &str =
    "<p>改写失败：模型返回的内容无法解析为文章，请重新生成。</p>";

static TITLE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""title"\s*:\s*"([^"]+)""#).expect("valid regex"));
static CONTENT_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""content"\s*:\s*""#).expect("valid regex"));

/// 从模型输出中恢复出的文章
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsedRecord {
    pub title: String,
    pub content: String,
}

/// 单个解析策略的失败原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("buffer is empty")]
    Empty,
    #[error("no object boundaries found")]
    NoObject,
    #[error("invalid object: {0}")]
    Invalid(String),
    #[error("field `{0}` is missing or empty")]
    MissingField(&'static str),
}

/// 提取策略，按容忍度从低到高排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Strict,
    Bounded,
    NewlineRepair,
    Permissive,
    RegexSalvage,
    Fallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Strict => "strict",
            Strategy::Bounded => "bounded",
            Strategy::NewlineRepair => "newline_repair",
            Strategy::Permissive => "permissive",
            Strategy::RegexSalvage => "regex_salvage",
            Strategy::Fallback => "fallback",
        }
    }
}

type StrategyFn = fn(&str) -> Result<ParsedRecord, ParseError>;

/// 流结束时使用的完整级联
const CASCADE: [(Strategy, StrategyFn); 5] = [
    (Strategy::Strict, strict_parse),
    (Strategy::Bounded, bounded_parse),
    (Strategy::NewlineRepair, newline_repair_parse),
    (Strategy::Permissive, permissive_parse),
    (Strategy::RegexSalvage, regex_salvage),
];

/// 流式过程中用于预览的廉价策略
const PREVIEW_CASCADE: [(Strategy, StrategyFn); 2] = [
    (Strategy::Strict, strict_parse),
    (Strategy::Bounded, bounded_parse),
];

/// 一次提取的结果及命中的策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: ParsedRecord,
    pub strategy: Strategy,
}

/// 增量结果提取器
///
/// 模型被要求只输出一个 `{"title", "content"}` 对象，但实际输出可能夹带说明文字、
/// 在字符串里出现未转义的换行，或者被截断。提取器按顺序尝试一组纯函数策略，
/// 第一个同时给出非空标题和非空正文的策略胜出；全部失败时生成一条可见的兜底结果。
#[derive(Debug, Clone)]
pub struct ResultExtractor {
    original_title: String,
}

impl ResultExtractor {
    /// # 参数
    /// * `original_title` - 原文标题，用于生成兜底结果
    pub fn new(original_title: impl Into<String>) -> Self {
        Self {
            original_title: original_title.into(),
        }
    }

    /// 对尚未结束的缓冲区做一次乐观解析，只用于展示预览
    ///
    /// 失败时静默返回 None，不影响任务状态
    pub fn preview(&self, buffer: &str) -> Option<String> {
        let buffer = strip_code_fence(buffer);
        PREVIEW_CASCADE
            .iter()
            .find_map(|(_, strategy)| strategy(buffer).ok())
            .map(|record| record.content)
    }

    /// 依次应用全部策略，返回第一个成功的结果
    pub fn try_extract(buffer: &str) -> Result<Extraction, ParseError> {
        let buffer = strip_code_fence(buffer);
        if buffer.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut last_error = ParseError::Empty;
        for (strategy, parse) in CASCADE.iter() {
            match parse(buffer) {
                Ok(record) => {
                    return Ok(Extraction {
                        record,
                        strategy: *strategy,
                    })
                }
                Err(e) => last_error = e,
            }
        }
        Err(last_error)
    }

    /// 流结束时的权威提取，永不失败
    pub fn finish(&self, buffer: &str) -> Extraction {
        Self::try_extract(buffer).unwrap_or_else(|_| Extraction {
            record: self.fallback(),
            strategy: Strategy::Fallback,
        })
    }

    /// 兜底结果：原标题加改写版标记，正文为失败说明
    pub fn fallback(&self) -> ParsedRecord {
        ParsedRecord {
            title: format!("{}{}", self.original_title, FALLBACK_TITLE_MARKER),
            content: FALLBACK_CONTENT.to_string(),
        }
    }
}

/// 去掉首尾空白和 Markdown 代码围栏
fn strip_code_fence(buffer: &str) -> &str {
    let trimmed = buffer.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string (e.g. "json") on the opening fence line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn validate(record: ParsedRecord) -> Result<ParsedRecord, ParseError> {
    if record.title.trim().is_empty() {
        return Err(ParseError::MissingField("title"));
    }
    if record.content.trim().is_empty() {
        return Err(ParseError::MissingField("content"));
    }
    Ok(record)
}

/// 第一个 `{` 到最后一个 `}` 之间的子串
fn bounded_slice(buffer: &str) -> Option<&str> {
    let start = buffer.find('{')?;
    let end = buffer.rfind('}')?;
    (end > start).then(|| &buffer[start..=end])
}

/// 策略一：整个缓冲区按严格 JSON 解析
pub fn strict_parse(buffer: &str) -> Result<ParsedRecord, ParseError> {
    let record = serde_json::from_str::<ParsedRecord>(buffer)
        .map_err(|e| ParseError::Invalid(e.to_string()))?;
    validate(record)
}

/// 策略二：截取首尾花括号之间的部分再严格解析，丢弃前后的说明文字
pub fn bounded_parse(buffer: &str) -> Result<ParsedRecord, ParseError> {
    let slice = bounded_slice(buffer).ok_or(ParseError::NoObject)?;
    strict_parse(slice)
}

/// 策略三：修复正文字符串中的原始换行后严格解析
pub fn newline_repair_parse(buffer: &str) -> Result<ParsedRecord, ParseError> {
    let slice = bounded_slice(buffer).ok_or(ParseError::NoObject)?;
    strict_parse(&repair_content_newlines(slice))
}

/// 从含有 `"content"` 键的行开始，到含有 `"}` 的行为止，
/// 行与行之间用转义的 `\n` 连接，其余行保持原样
fn repair_content_newlines(slice: &str) -> String {
    let lines: Vec<&str> = slice
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    let mut repaired = String::with_capacity(slice.len() + 16);
    let mut in_content = false;
    let mut content_seen = false;

    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            repaired.push_str(if in_content { "\\n" } else { "\n" });
        }

        if in_content {
            repaired.push_str(&line.replace('\t', "\\t"));
            if closes_content(line, lines.get(idx + 1).copied()) {
                in_content = false;
            }
        } else {
            repaired.push_str(line);
            if !content_seen {
                if let Some(pos) = line.find("\"content\"") {
                    content_seen = true;
                    let after_key = &line[pos + "\"content\"".len()..];
                    in_content = !after_key.contains("\"}") && !closes_value(after_key);
                }
            }
        }
    }

    repaired
}

/// 含 `"}` 的行结束正文；格式化输出中 `"` 与 `}` 分处两行时，
/// 以 `"` 结尾且下一行以 `}` 开头的行同样视为结束
fn closes_content(line: &str, next: Option<&str>) -> bool {
    if line.contains("\"}") {
        return true;
    }
    closes_value(line) && next.is_some_and(|n| n.trim_start().starts_with('}'))
}

fn closes_value(fragment: &str) -> bool {
    let trimmed = fragment.trim_end().trim_end_matches(',');
    // the opening quote of the value alone does not close it
    let body = trimmed.trim_start().trim_start_matches(':').trim_start();
    body.len() > 1 && body.ends_with('"') && !body.ends_with("\\\"")
}

/// 策略四：按更宽松的对象字面量语法求值
///
/// YAML 流式映射是 JSON 的超集，可以接受未加引号的键、单引号字符串等写法
pub fn permissive_parse(buffer: &str) -> Result<ParsedRecord, ParseError> {
    let slice = bounded_slice(buffer).ok_or(ParseError::NoObject)?;
    let record = serde_yaml::from_str::<ParsedRecord>(slice)
        .map_err(|e| ParseError::Invalid(e.to_string()))?;
    validate(record)
}

/// 策略五：正则分别抢救标题和正文
///
/// 正文取 `"content"` 值的起点到缓冲区中最后一个 `"}` 为止；
/// 正文本身包含 `"}` 时会被提前截断（已知限制）。没有 `"}` 时视为截断输出，取到末尾。
pub fn regex_salvage(buffer: &str) -> Result<ParsedRecord, ParseError> {
    let title = TITLE_FIELD
        .captures(buffer)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape(m.as_str()))
        .ok_or(ParseError::MissingField("title"))?;

    let start = CONTENT_FIELD
        .find(buffer)
        .map(|m| m.end())
        .ok_or(ParseError::MissingField("content"))?;
    let tail = &buffer[start..];
    let raw = match tail.rfind("\"}") {
        Some(end) => &tail[..end],
        None => tail.trim_end().trim_end_matches('}').trim_end_matches('"'),
    };

    validate(ParsedRecord {
        title,
        content: unescape(raw),
    })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('/') => out.push('/'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
