//! Digest rendering with byte-budget shrinking.
//!
//! WeCom rejects markdown messages above a byte limit, so the builder
//! renders, measures, and shrinks (fewer items first, then shorter titles)
//! until the message fits. The same inputs always produce the same bytes.

use crate::snapshot::{Item, Snapshot};
use crate::timefmt::beijing_time;

/// WeCom's documented limit for markdown message content.
pub const DEFAULT_BYTE_LIMIT: usize = 3800;

const TITLE_LIMIT_START: usize = 46;
const TITLE_LIMIT_FLOOR: usize = 20;
const TITLE_LIMIT_STEP: usize = 4;
const FALLBACK_SHOWN: usize = 3;

/// Formatting parameters for one digest build.
#[derive(Clone, Debug)]
pub struct DigestOptions {
    pub keyword: String,
    pub top_n: usize,
    pub byte_limit: usize,
    pub site_url: Option<String>,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            keyword: "AI新闻雷达".to_string(),
            top_n: 12,
            byte_limit: DEFAULT_BYTE_LIMIT,
            site_url: None,
        }
    }
}

/// A rendered digest: the markdown body and how many items made it in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digest {
    pub content: String,
    pub shown: usize,
}

/// Collapse newlines, trim, and cap `text` at `limit` characters,
/// ellipsizing when it is over. Character count, not bytes: the titles are
/// mostly CJK and a byte cap would cut them to a third.
pub fn shorten(text: &str, limit: usize) -> String {
    let s = text.replace('\n', " ").trim().to_string();
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= limit {
        return s;
    }
    if limit <= 1 {
        return "…".to_string();
    }
    let mut out: String = chars[..limit - 1].iter().collect();
    out.push('…');
    out
}

/// Build the digest body for `snapshot`.
///
/// Shrinks the item count down to one (when there are items at all), then
/// the title limit down to its floor. If the message still exceeds the byte
/// budget after that, the oversized content is returned as a best-effort
/// result; the caller may log it but should still deliver.
pub fn build_digest(snapshot: &Snapshot, opts: &DigestOptions) -> Digest {
    let items = snapshot.ai_items();
    let total = items.len();

    let mut shown = opts.top_n.min(total);
    if shown == 0 {
        shown = total.min(FALLBACK_SHOWN);
    }
    let mut title_limit = TITLE_LIMIT_START;

    let header = header_lines(snapshot, &opts.keyword, total, opts.site_url.as_deref());
    let min_items = if total > 0 { 1 } else { 0 };

    loop {
        let mut lines = header.clone();
        lines.extend(item_lines(&items, shown, title_limit));
        if total > shown {
            lines.push(String::new());
            lines.push(format!("> 其余 {} 条请查看页面或仓库数据", total - shown));
        }
        let content = lines.join("\n").trim().to_string();

        if content.len() <= opts.byte_limit {
            return Digest { content, shown };
        }

        if shown > min_items {
            shown -= 1;
            continue;
        }

        if title_limit > TITLE_LIMIT_FLOOR {
            title_limit -= TITLE_LIMIT_STEP;
            continue;
        }

        return Digest { content, shown };
    }
}

fn header_lines(
    snapshot: &Snapshot,
    keyword: &str,
    total: usize,
    site_url: Option<&str>,
) -> Vec<String> {
    let generated_at = beijing_time(snapshot.generated_at());

    let mut lines = Vec::new();
    if !keyword.is_empty() {
        // The robot's inbound filter drops messages without this token,
        // so it has to be the first line.
        lines.push(keyword.to_string());
    }
    lines.push("## AI 新闻日报（近24小时）".to_string());
    lines.push(format!("> 生成时间：{generated_at}（北京时间）"));
    lines.push(format!("> AI 相关条数：{total}"));
    if let Some(url) = site_url.map(str::trim).filter(|s| !s.is_empty()) {
        lines.push(format!("> 查看详情：[{url}]({url})"));
    }
    lines.push(String::new());
    lines
}

fn item_lines(items: &[Item], shown: usize, title_limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for (idx, item) in items.iter().take(shown).enumerate() {
        let n = idx + 1;

        let raw_title = item
            .title_bilingual
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| item.title.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Untitled");
        let title = shorten(raw_title, title_limit);

        match non_blank(item.url.as_deref()) {
            Some(url) => lines.push(format!("{n}. [{title}]({url})")),
            None => lines.push(format!("{n}. {title}")),
        }

        let site = non_blank(item.site_name.as_deref()).unwrap_or("-");
        let source = non_blank(item.source.as_deref()).unwrap_or("-");
        let published = beijing_time(item.published_at.as_deref());
        lines.push(format!("> {site}/{source} · {published}"));
    }
    lines
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use serde_json::json;

    fn demo_snapshot(count: usize) -> Snapshot {
        let items: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "title": format!("标题{i}"),
                    "url": format!("https://example.com/{i}"),
                    "site_name": "NewsNow",
                    "source": "demo",
                    "published_at": "2026-02-23T01:00:00Z",
                })
            })
            .collect();
        Snapshot::from_value(json!({
            "generated_at": "2026-02-23T02:00:00Z",
            "items_ai": items,
        }))
    }

    #[test]
    fn shorten_collapses_newlines_and_trims() {
        assert_eq!(shorten("  a\nb  ", 10), "a b");
    }

    #[test]
    fn shorten_counts_characters_not_bytes() {
        // Five CJK chars are 15 UTF-8 bytes but still within a limit of 5.
        assert_eq!(shorten("新闻标题五", 5), "新闻标题五");
        assert_eq!(shorten("新闻标题五个", 5), "新闻标题…");
    }

    #[test]
    fn shorten_degenerate_limit_yields_bare_ellipsis() {
        assert_eq!(shorten("abc", 1), "…");
        assert_eq!(shorten("", 0), "");
    }

    #[test]
    fn contains_keyword_header_and_truncation_remark() {
        let digest = build_digest(
            &demo_snapshot(5),
            &DigestOptions {
                top_n: 3,
                byte_limit: 10_000,
                ..DigestOptions::default()
            },
        );
        assert_eq!(digest.shown, 3);
        assert!(digest.content.starts_with("AI新闻雷达"));
        assert!(digest.content.contains("AI 新闻日报（近24小时）"));
        assert!(digest.content.contains("AI 相关条数：5"));
        assert!(digest.content.contains("其余 2 条请查看页面或仓库数据"));
        assert!(digest.content.contains("[标题0](https://example.com/0)"));
        assert!(digest.content.contains("> NewsNow/demo · 02-23 09:00"));
    }

    #[test]
    fn empty_keyword_is_omitted() {
        let digest = build_digest(
            &demo_snapshot(1),
            &DigestOptions {
                keyword: String::new(),
                ..DigestOptions::default()
            },
        );
        assert!(digest.content.starts_with("## AI 新闻日报"));
    }

    #[test]
    fn site_url_adds_details_line() {
        let digest = build_digest(
            &demo_snapshot(1),
            &DigestOptions {
                site_url: Some("https://news.example".to_string()),
                ..DigestOptions::default()
            },
        );
        assert!(digest
            .content
            .contains("> 查看详情：[https://news.example](https://news.example)"));
    }

    #[test]
    fn shrinks_to_fit_byte_limit() {
        let long_title = "超长标题".repeat(50);
        let items: Vec<_> = (1..=2)
            .map(|i| {
                json!({
                    "title_bilingual": long_title.clone(),
                    "url": format!("https://example.com/{i}"),
                    "site_name": "Site",
                    "source": "src",
                    "published_at": "2026-02-23T01:00:00Z",
                })
            })
            .collect();
        let snap = Snapshot::from_value(json!({
            "generated_at": "2026-02-23T02:00:00Z",
            "items_ai": items,
        }));

        let digest = build_digest(
            &snap,
            &DigestOptions {
                top_n: 2,
                byte_limit: 600,
                ..DigestOptions::default()
            },
        );
        assert!(digest.content.len() <= 600);
        assert!(digest.shown >= 1);
    }

    #[test]
    fn builds_are_byte_identical() {
        let snap = demo_snapshot(5);
        let opts = DigestOptions {
            top_n: 3,
            byte_limit: 500,
            ..DigestOptions::default()
        };
        assert_eq!(build_digest(&snap, &opts), build_digest(&snap, &opts));
    }

    #[test]
    fn zero_top_n_still_shows_up_to_three() {
        let digest = build_digest(
            &demo_snapshot(5),
            &DigestOptions {
                top_n: 0,
                byte_limit: 10_000,
                ..DigestOptions::default()
            },
        );
        assert_eq!(digest.shown, 3);
    }

    #[test]
    fn empty_snapshot_renders_header_only() {
        let snap = Snapshot::from_value(json!({"generated_at": "2026-02-23T02:00:00Z"}));
        let digest = build_digest(&snap, &DigestOptions::default());
        assert_eq!(digest.shown, 0);
        assert!(digest.content.contains("AI 相关条数：0"));
        assert!(!digest.content.contains("1. "));
        assert!(!digest.content.contains("其余"));
        // Trailing separator is trimmed away.
        assert!(!digest.content.ends_with('\n'));
    }

    #[test]
    fn items_without_urls_render_plain_titles() {
        let snap = Snapshot::from_value(json!({
            "items_ai": [{"title": "No link here"}],
        }));
        let digest = build_digest(&snap, &DigestOptions::default());
        assert!(digest.content.contains("1. No link here"));
        assert!(digest.content.contains("> -/- · --:--"));
    }
}
