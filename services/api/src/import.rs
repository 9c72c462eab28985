//! Chapter import parsing
//!
//! Splits raw text on native-numeral chapter headings (第N章 / 第N回 /
//! 第N节). When no heading is recognized the whole text becomes one
//! chapter titled "正文".

use regex::Regex;
use std::sync::OnceLock;

/// Imported chapters beyond this index are marked paid
pub const FREE_CHAPTER_COUNT: usize = 3;

/// One chapter produced by the splitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChapter {
    pub title: String,
    pub content: String,
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        // heading marker, optional separator, then the rest of the line as title
        Regex::new(r"第[零一二三四五六七八九十百千0-9]+[章回节][ \t　：:]*[^\n]*")
            .expect("Failed to compile chapter heading regex")
    })
}

/// Zero-padded chapter id for a 1-based sequence number
pub fn chapter_id(seq: usize) -> String {
    format!("CH{:03}", seq)
}

/// Split raw text into chapters
///
/// Each chapter's content spans from the end of its heading line to the
/// start of the next heading (or end of text), trimmed. Zero recognized
/// headings yield exactly one chapter holding the entire text.
pub fn parse_chapters(content: &str) -> Vec<ParsedChapter> {
    let matches: Vec<_> = heading_regex().find_iter(content).collect();

    if matches.is_empty() {
        return vec![ParsedChapter {
            title: "正文".to_string(),
            content: content.trim().to_string(),
        }];
    }

    let mut chapters = Vec::with_capacity(matches.len());
    for (i, heading) in matches.iter().enumerate() {
        let start = heading.end();
        let end = matches
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(content.len());

        chapters.push(ParsedChapter {
            title: heading.as_str().trim().to_string(),
            content: content[start..end].trim().to_string(),
        });
    }

    chapters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_headings_yields_single_main_text_chapter() {
        let text = "这是一段没有任何章节标记的文字。\n第二行继续。";
        let chapters = parse_chapters(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "正文");
        assert_eq!(chapters[0].content, text);
    }

    #[test]
    fn test_two_headings_yield_two_chapters() {
        let text = "第一章 开始\n故事从这里开始。\n第二章 继续\n故事还在继续。";
        let chapters = parse_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "第一章 开始");
        assert_eq!(chapters[0].content, "故事从这里开始。");
        assert_eq!(chapters[1].title, "第二章 继续");
        assert_eq!(chapters[1].content, "故事还在继续。");
    }

    #[test]
    fn test_spans_cover_text_without_overlap() {
        let text = "楔子文字\n第一章 上路\n甲\n第十二回 风波\n乙\n第3节 收尾\n丙";
        let chapters = parse_chapters(text);

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].content, "甲");
        assert_eq!(chapters[1].content, "乙");
        assert_eq!(chapters[2].content, "丙");
    }

    #[test]
    fn test_heading_without_title_text() {
        let text = "第一章\n正文内容。";
        let chapters = parse_chapters(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "第一章");
        assert_eq!(chapters[0].content, "正文内容。");
    }

    #[test]
    fn test_colon_separator_in_heading() {
        let text = "第一章：初见\n内容甲\n第二章:重逢\n内容乙";
        let chapters = parse_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "第一章：初见");
        assert_eq!(chapters[1].title, "第二章:重逢");
    }

    #[test]
    fn test_chapter_id_zero_padding() {
        assert_eq!(chapter_id(1), "CH001");
        assert_eq!(chapter_id(12), "CH012");
        assert_eq!(chapter_id(123), "CH123");
    }
}
