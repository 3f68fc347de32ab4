//! メニューテキストパーサー
//!
//! 構造のないメニュー文書を1行ずつ走査し、価格付きの行を項目にする。
//!
//! - 全て大文字の短い行（価格なし）はセクション見出し
//! - 通貨付き価格、または行末の小数2桁の数字を含む行は項目
//! - それ以外の行は直前の項目の説明として連結
//!
//! 同じ名前（大文字小文字無視）の項目は1つにまとめ、価格が未設定なら後の行で補完する。

use crate::text::{parse_price, title_case};
use crate::types::{MenuLineItem, MenuParseResult};
use regex::Regex;
use std::collections::HashSet;

/// 見出しが出る前の項目のカテゴリ
pub const DEFAULT_SECTION: &str = "General";

/// 見出しとみなす最大文字数
const MAX_HEADER_LEN: usize = 48;

/// プレビューに含める項目数
const PREVIEW_ITEMS: usize = 3;

lazy_static::lazy_static! {
    static ref CURRENCY_RE: Regex = Regex::new(
        r"[$€£]\s?(?:\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:[.,]\d{1,2})?)"
    )
    .unwrap();
    static ref DECIMAL_RE: Regex = Regex::new(r"\b\d{1,3}\.\d{2}\b").unwrap();
}

/// 行から取り出した価格トークン
struct PriceMatch {
    start: usize,
    end: usize,
    value: Option<f64>,
}

/// セクション見出し行か
fn is_section_header(line: &str) -> bool {
    line.chars().count() <= MAX_HEADER_LEN
        && line.chars().any(|c| c.is_alphabetic())
        && line == line.to_uppercase()
        && !CURRENCY_RE.is_match(line)
        && !DECIMAL_RE.is_match(line)
}

/// 行の価格を探す
///
/// 通貨付きは最初の一致、小数2桁は行末にある最後の一致を使う。
/// 行末の小数が同じ行に2回以上出てくる場合は価格としない。
fn find_price(line: &str) -> Option<PriceMatch> {
    if let Some(m) = CURRENCY_RE.find(line) {
        return Some(PriceMatch {
            start: m.start(),
            end: m.end(),
            value: parse_price(m.as_str()),
        });
    }

    let last = DECIMAL_RE.find_iter(line).last()?;
    if !line[last.end()..].trim().is_empty() {
        return None;
    }
    if DECIMAL_RE
        .find_iter(line)
        .filter(|m| m.as_str() == last.as_str())
        .count()
        > 1
    {
        return None;
    }

    Some(PriceMatch {
        start: last.start(),
        end: last.end(),
        value: parse_price(last.as_str()),
    })
}

/// 価格を取り除いた残りから項目名を作る
fn item_name(line: &str, price: &PriceMatch) -> String {
    let remainder = format!("{} {}", &line[..price.start], &line[price.end..]);
    let trimmed = remainder
        .trim()
        .trim_end_matches(|c: char| c == '-' || c == '.' || c == '–' || c == '—' || c.is_whitespace())
        .trim();
    title_case(trimmed)
}

fn item_id(source: &str, index: usize) -> String {
    format!("menu_import_{}_{}", source, index)
}

/// 大文字小文字を無視して同じ名前の項目を探す
fn position_by_name(items: &[MenuLineItem], name: &str) -> Option<usize> {
    let key = name.to_lowercase();
    items.iter().position(|i| i.name.to_lowercase() == key)
}

/// 抽出バックエンドなど外部から得た項目をテキスト解析と同じ規則で整える
///
/// 名前をタイトルケースにして1文字以下のものを除き、同名の項目は最初の1件に
/// まとめる（価格・説明が空なら後の項目で補完）。IDは残った順に振り直す。
pub fn normalize_menu_items<I>(items: I, source: &str) -> Vec<MenuLineItem>
where
    I: IntoIterator<Item = MenuLineItem>,
{
    let mut merged: Vec<MenuLineItem> = Vec::new();

    for mut item in items {
        item.name = title_case(&item.name);
        if item.name.chars().count() < 2 {
            continue;
        }

        if let Some(existing) = position_by_name(&merged, &item.name) {
            let target = &mut merged[existing];
            if target.price.is_none() {
                target.price = item.price;
            }
            if target.description.is_empty() {
                target.description = item.description;
            }
            continue;
        }

        item.id = item_id(source, merged.len());
        item.source = source.to_string();
        merged.push(item);
    }

    merged
}

/// メニューテキストを項目に分解する
///
/// # Arguments
/// * `text` - メニュー文書のテキスト
/// * `source` - 元のファイル名（IDと `source` に使う）
///
/// # Returns
/// 項目・セクション数・先頭3件のプレビュー。入力だけで結果が決まる。
///
/// # Examples
/// ```
/// use menu_import_common::parse_menu_text;
///
/// let result = parse_menu_text("MAINS\nGrilled Salmon 24.00", "dinner.txt");
/// assert_eq!(result.items[0].name, "Grilled Salmon");
/// assert_eq!(result.items[0].category, "Mains");
/// ```
pub fn parse_menu_text(text: &str, source: &str) -> MenuParseResult {
    let mut items: Vec<MenuLineItem> = Vec::new();
    let mut current_section = DEFAULT_SECTION.to_string();
    let mut current_item: Option<usize> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if is_section_header(line) {
            current_section = title_case(line);
            current_item = None;
            continue;
        }

        if let Some(price) = find_price(line) {
            let name = item_name(line, &price);
            if name.chars().count() < 2 {
                continue;
            }

            if let Some(existing) = position_by_name(&items, &name) {
                if items[existing].price.is_none() {
                    items[existing].price = price.value;
                }
                current_item = Some(existing);
                continue;
            }

            items.push(MenuLineItem {
                id: item_id(source, items.len()),
                name,
                price: price.value,
                description: String::new(),
                category: current_section.clone(),
                source: source.to_string(),
            });
            current_item = Some(items.len() - 1);
            continue;
        }

        if let Some(idx) = current_item {
            let description = &mut items[idx].description;
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(line);
        }
    }

    items.retain(|item| item.name.chars().count() > 1);

    let section_count = items
        .iter()
        .map(|item| item.category.as_str())
        .collect::<HashSet<_>>()
        .len();

    let preview = items
        .iter()
        .take(PREVIEW_ITEMS)
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    MenuParseResult {
        items,
        section_count,
        preview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "APPETIZERS
Soup of the Day 8.00
Fresh seasonal soup
Caesar Salad $10.50
MAINS
Grilled Salmon 24.00
";

    #[test]
    fn test_parse_sample_menu() {
        let result = parse_menu_text(SAMPLE, "dinner.txt");
        assert_eq!(result.items.len(), 3);

        let soup = &result.items[0];
        assert_eq!(soup.name, "Soup Of The Day");
        assert_eq!(soup.price, Some(8.0));
        assert_eq!(soup.category, "Appetizers");
        assert_eq!(soup.description, "Fresh seasonal soup");
        assert_eq!(soup.id, "menu_import_dinner.txt_0");
        assert_eq!(soup.source, "dinner.txt");

        let salad = &result.items[1];
        assert_eq!(salad.name, "Caesar Salad");
        assert_eq!(salad.price, Some(10.5));
        assert_eq!(salad.category, "Appetizers");
        assert_eq!(salad.description, "");

        let salmon = &result.items[2];
        assert_eq!(salmon.name, "Grilled Salmon");
        assert_eq!(salmon.price, Some(24.0));
        assert_eq!(salmon.category, "Mains");

        assert_eq!(result.section_count, 2);
        assert_eq!(result.preview, "Soup Of The Day, Caesar Salad, Grilled Salmon");
    }

    #[test]
    fn test_items_before_header_are_general() {
        let result = parse_menu_text("Bread Basket 4.00\nDESSERTS\nTiramisu 9.00", "m.txt");
        assert_eq!(result.items[0].category, DEFAULT_SECTION);
        assert_eq!(result.items[1].category, "Desserts");
        assert_eq!(result.section_count, 2);
    }

    #[test]
    fn test_duplicate_names_merged() {
        let result = parse_menu_text("Caesar Salad 10.50\nCAESAR salad $12.00", "m.txt");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].price, Some(10.5));
    }

    #[test]
    fn test_duplicate_collects_following_description() {
        let result = parse_menu_text("Oysters 18.00\nOYSTERS 20.00\nhalf dozen", "m.txt");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].price, Some(18.0));
        assert_eq!(result.items[0].description, "half dozen");
    }

    #[test]
    fn test_currency_first_match_wins() {
        let result = parse_menu_text("Pizza small $9 large $14", "m.txt");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].price, Some(9.0));
    }

    #[test]
    fn test_decimal_last_match_wins() {
        let result = parse_menu_text("Wine glass 9.00 bottle 36.00", "m.txt");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].price, Some(36.0));
        assert_eq!(result.items[0].name, "Wine Glass 9.00 Bottle");
    }

    #[test]
    fn test_decimal_must_end_line() {
        let result = parse_menu_text("Opened in 19.99 percent of cases today", "m.txt");
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_trailing_dots_and_dashes_trimmed() {
        let result = parse_menu_text("Steak Frites ........ 28.00\nMussels -- €16,50", "m.txt");
        assert_eq!(result.items[0].name, "Steak Frites");
        assert_eq!(result.items[1].name, "Mussels");
        assert_eq!(result.items[1].price, Some(16.5));
    }

    #[test]
    fn test_header_with_price_is_item() {
        let result = parse_menu_text("LOBSTER ROLL $22", "m.txt");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "Lobster Roll");
        assert_eq!(result.items[0].category, DEFAULT_SECTION);
    }

    #[test]
    fn test_long_uppercase_line_is_not_header() {
        let long = "THIS LINE IS FAR TOO LONG TO BE A SECTION HEADING ON A MENU";
        let result = parse_menu_text(&format!("{}\nFries 5.00", long), "m.txt");
        assert_eq!(result.items[0].category, DEFAULT_SECTION);
    }

    #[test]
    fn test_header_resets_description_target() {
        let result = parse_menu_text("Soup 8.00\nSIDES\nserved warm", "m.txt");
        assert_eq!(result.items[0].description, "");
    }

    #[test]
    fn test_description_lines_joined() {
        let result = parse_menu_text("Soup 8.00\nwith bread\nand butter", "m.txt");
        assert_eq!(result.items[0].description, "with bread and butter");
    }

    #[test]
    fn test_text_before_first_item_ignored() {
        let result = parse_menu_text("Welcome to our bistro\nSoup 8.00", "m.txt");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].description, "");
    }

    #[test]
    fn test_single_char_names_dropped() {
        let result = parse_menu_text("A 5.00\n$7", "m.txt");
        assert!(result.items.is_empty());
        assert_eq!(result.section_count, 0);
        assert_eq!(result.preview, "");
    }

    #[test]
    fn test_thousands_separator_price() {
        let result = parse_menu_text("Banquet Package $1,200\nWedding Buffet $2,450.50", "m.txt");
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].name, "Banquet Package");
        assert_eq!(result.items[0].price, Some(1200.0));
        assert_eq!(result.items[1].name, "Wedding Buffet");
        assert_eq!(result.items[1].price, Some(2450.5));
    }

    #[test]
    fn test_repeated_trailing_decimal_is_not_price() {
        let result = parse_menu_text("Bread 3.00\nSoup 8.00 8.00", "m.txt");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "Bread");
        assert_eq!(result.items[0].description, "Soup 8.00 8.00");
    }

    #[test]
    fn test_normalize_external_items() {
        let raw = |name: &str, price: Option<f64>, description: &str| MenuLineItem {
            id: String::new(),
            name: name.to_string(),
            price,
            description: description.to_string(),
            category: "Salads".to_string(),
            source: String::new(),
        };
        let items = vec![
            raw("caesar salad", None, ""),
            raw("x", Some(1.0), ""),
            raw("CAESAR SALAD", Some(9.5), "romaine, parmesan"),
            raw("house   salad", Some(7.0), ""),
        ];

        let merged = normalize_menu_items(items, "menu.pdf");
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "Caesar Salad");
        assert_eq!(merged[0].price, Some(9.5));
        assert_eq!(merged[0].description, "romaine, parmesan");
        assert_eq!(merged[0].id, "menu_import_menu.pdf_0");
        assert_eq!(merged[1].name, "House Salad");
        assert_eq!(merged[1].id, "menu_import_menu.pdf_1");
        assert_eq!(merged[1].source, "menu.pdf");
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let first = parse_menu_text(SAMPLE, "dinner.txt");
        let second = parse_menu_text(SAMPLE, "dinner.txt");
        assert_eq!(first, second);
    }

    #[test]
    fn test_preview_limited_to_three() {
        let text = "Aa 1.00\nBb 2.00\nCc 3.00\nDd 4.00";
        let result = parse_menu_text(text, "m.txt");
        assert_eq!(result.items.len(), 4);
        assert_eq!(result.preview, "Aa, Bb, Cc");
    }
}
