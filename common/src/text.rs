//! テキスト整形ユーティリティ

/// 単語ごとに先頭を大文字、残りを小文字にする
///
/// 連続する空白は1つにまとめる。
///
/// # Examples
/// ```
/// use menu_import_common::text::title_case;
///
/// assert_eq!(title_case("soup of the DAY"), "Soup Of The Day");
/// ```
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 価格トークンを数値に変換
///
/// 通貨記号などを除いた数字部分を読む。末尾の `,` + 2桁は小数点として扱い、
/// それ以外の `,` は桁区切りとして捨てる。
pub fn parse_price(token: &str) -> Option<f64> {
    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if digits.is_empty() {
        return None;
    }

    let normalized = match digits.rsplit_once(',') {
        Some((head, tail))
            if tail.len() == 2 && tail.chars().all(|c| c.is_ascii_digit()) && !head.contains('.') =>
        {
            format!("{}.{}", head.replace(',', ""), tail)
        }
        _ => digits.replace(',', ""),
    };

    normalized.parse::<f64>().ok()
}

/// 小文字化した拡張子を返す（ドットなし）
pub fn extension_of(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}
