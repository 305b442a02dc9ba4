use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一份抓取到的外部文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSource {
    pub url: String,
    pub title: String,
    /// 归一化后的纯文本内容
    pub content: String,
    pub fetched_at: DateTime<Utc>,
    pub latency_ms: u64,
    pub word_count: usize,
    pub image_count: usize,
    pub link_count: usize,
}

impl ResearchSource {
    /// 将内容切分为句子，用于洞察抽取
    pub fn sentences(&self) -> Vec<&str> {
        split_sentences(&self.content)
    }
}

/// 按句末标点切分文本，丢弃过短的片段
///
/// 句点后必须跟空白或文本结尾才视为句末，`$4.5B` 这样的数字不会被切开。
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let boundary = match c {
            '\n' => true,
            '.' | '!' | '?' => chars.peek().is_none_or(|(_, next)| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            let end = idx + c.len_utf8();
            sentences.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| s.split_whitespace().count() >= 4)
        .collect()
}
