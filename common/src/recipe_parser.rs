//! レシピファイルパーサー
//!
//! json / csv / txt のレシピを `Recipe` に変換する。

use crate::error::{Error, Result};
use crate::types::Recipe;
use regex::Regex;

lazy_static::lazy_static! {
    static ref SECTION_RE: Regex =
        Regex::new(r"(?i)^(ingredients|instructions|method|directions)\s*:\s*(.*)$").unwrap();
    static ref FIELD_RE: Regex =
        Regex::new(r"(?i)^(servings|yield|prep time|cook time)\s*:?\s*(.+)$").unwrap();
    static ref LIST_MARKER_RE: Regex = Regex::new(r"^(?:[-*•]\s*|\d+[.)]\s+)").unwrap();
}

/// JSONのレシピを読む
///
/// 受け付ける形:
/// 1. `[ {...}, ... ]`
/// 2. `{ "recipes": [ ... ] }`
/// 3. 単一の `{ ... }`
pub fn parse_recipe_json(content: &str) -> Result<Vec<Recipe>> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    let recipes: Vec<Recipe> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        serde_json::Value::Object(ref map) if map.get("recipes").is_some_and(|r| r.is_array()) => {
            serde_json::from_value(map["recipes"].clone())?
        }
        serde_json::Value::Object(_) => vec![serde_json::from_value(value)?],
        _ => return Err(Error::Parse("レシピのJSON形式ではありません".into())),
    };

    Ok(recipes
        .into_iter()
        .filter(|r| !r.name.trim().is_empty())
        .collect())
}

/// CSVの1行をフィールドに分割（ダブルクォート対応）
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields.into_iter().map(|f| f.trim().to_string()).collect()
}

/// `;` または `|` 区切りのリスト
fn split_list(value: &str) -> Vec<String> {
    value
        .split([';', '|'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// CSVのレシピを読む
///
/// 1行目はヘッダー。`name`（または `title`）列は必須。
/// `ingredients` / `instructions` は `;` か `|` 区切り。
pub fn parse_recipe_csv(content: &str) -> Result<Vec<Recipe>> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| Error::Parse("ヘッダー行がありません".into()))?;
    let columns: Vec<String> = split_csv_line(header)
        .into_iter()
        .map(|c| c.to_lowercase())
        .collect();

    let column = |names: &[&str]| columns.iter().position(|c| names.contains(&c.as_str()));
    let name_col = column(&["name", "title"])
        .ok_or_else(|| Error::Parse("name列がありません".into()))?;
    let ingredients_col = column(&["ingredients"]);
    let instructions_col = column(&["instructions", "directions", "method"]);
    let servings_col = column(&["servings"]);

    let mut recipes = Vec::new();
    for line in lines {
        let fields = split_csv_line(line);
        let get = |col: Option<usize>| col.and_then(|i| fields.get(i)).map(String::as_str);

        let name = get(Some(name_col)).unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        recipes.push(Recipe {
            name: name.to_string(),
            ingredients: get(ingredients_col).map(split_list).unwrap_or_default(),
            instructions: get(instructions_col).map(split_list).unwrap_or_default(),
            servings: get(servings_col)
                .filter(|s| !s.is_empty())
                .map(String::from),
            ..Default::default()
        });
    }

    Ok(recipes)
}

#[derive(Clone, Copy)]
enum TextSection {
    Preamble,
    Ingredients,
    Instructions,
}

/// プレーンテキストのレシピを読む
///
/// 最初の空でない行をタイトルとし、`Ingredients:` / `Instructions:` / `Method:`
/// の見出しで区切られた行をリストにする。材料も手順もなければレシピなし。
pub fn parse_recipe_text(content: &str) -> Result<Vec<Recipe>> {
    let mut recipe = Recipe::default();
    let mut section = TextSection::Preamble;

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if recipe.name.is_empty() {
            recipe.name = line.to_string();
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(line) {
            section = match caps[1].to_lowercase().as_str() {
                "ingredients" => TextSection::Ingredients,
                _ => TextSection::Instructions,
            };
            let rest = caps[2].trim();
            if rest.is_empty() {
                continue;
            }
            push_line(&mut recipe, section, rest);
            continue;
        }

        if let Some(caps) = FIELD_RE.captures(line) {
            let value = Some(caps[2].trim().to_string());
            match caps[1].to_lowercase().as_str() {
                "servings" => recipe.servings = value,
                "yield" => recipe.yield_amount = value,
                "prep time" => recipe.prep_time = value,
                _ => recipe.cook_time = value,
            }
            continue;
        }

        push_line(&mut recipe, section, line);
    }

    if recipe.name.is_empty() || (recipe.ingredients.is_empty() && recipe.instructions.is_empty()) {
        return Ok(Vec::new());
    }

    Ok(vec![recipe])
}

fn push_line(recipe: &mut Recipe, section: TextSection, line: &str) {
    let cleaned = LIST_MARKER_RE.replace(line, "").trim().to_string();
    match section {
        TextSection::Ingredients => recipe.ingredients.push(cleaned),
        TextSection::Instructions => recipe.instructions.push(cleaned),
        TextSection::Preamble => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // JSON
    // =============================================

    #[test]
    fn test_parse_json_array() {
        let json = r#"[{"name": "Pancakes", "ingredients": ["flour", "milk"]}, {"title": "Omelette"}]"#;
        let recipes = parse_recipe_json(json).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].ingredients.len(), 2);
        assert_eq!(recipes[1].name, "Omelette");
    }

    #[test]
    fn test_parse_json_wrapped() {
        let json = r#"{"recipes": [{"name": "Soup", "instructions": ["boil"]}]}"#;
        let recipes = parse_recipe_json(json).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].instructions, vec!["boil".to_string()]);
    }

    #[test]
    fn test_parse_json_single_and_nameless() {
        assert_eq!(parse_recipe_json(r#"{"name": "Toast"}"#).unwrap().len(), 1);
        assert!(parse_recipe_json(r#"[{"ingredients": ["x"]}]"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_invalid() {
        assert!(matches!(parse_recipe_json("{ nope"), Err(Error::Json(_))));
        assert!(matches!(parse_recipe_json("42"), Err(Error::Parse(_))));
    }

    // =============================================
    // CSV
    // =============================================

    #[test]
    fn test_parse_csv() {
        let csv = "Name,Ingredients,Instructions,Servings\n\
                   Pancakes,flour; milk; egg,Mix|Fry,4\n\
                   \"Salad, Greek\",feta;olives,Toss,\n";
        let recipes = parse_recipe_csv(csv).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].ingredients, vec!["flour", "milk", "egg"]);
        assert_eq!(recipes[0].instructions, vec!["Mix", "Fry"]);
        assert_eq!(recipes[0].servings.as_deref(), Some("4"));
        assert_eq!(recipes[1].name, "Salad, Greek");
        assert_eq!(recipes[1].servings, None);
    }

    #[test]
    fn test_parse_csv_missing_name_column() {
        let result = parse_recipe_csv("ingredients,instructions\nx,y");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_csv_empty() {
        assert!(parse_recipe_csv("").is_err());
    }

    #[test]
    fn test_split_csv_line_escaped_quotes() {
        let fields = split_csv_line(r#"a,"say ""hi""",c"#);
        assert_eq!(fields, vec!["a", "say \"hi\"", "c"]);
    }

    // =============================================
    // テキスト
    // =============================================

    #[test]
    fn test_parse_text_recipe() {
        let text = "Tomato Soup\n\
                    Servings: 4\n\
                    Prep time: 10 min\n\
                    Ingredients:\n\
                    - 6 tomatoes\n\
                    - 1 onion\n\
                    Instructions:\n\
                    1. Chop everything\n\
                    2. Simmer 20 minutes\n";
        let recipes = parse_recipe_text(text).unwrap();
        assert_eq!(recipes.len(), 1);
        let recipe = &recipes[0];
        assert_eq!(recipe.name, "Tomato Soup");
        assert_eq!(recipe.servings.as_deref(), Some("4"));
        assert_eq!(recipe.prep_time.as_deref(), Some("10 min"));
        assert_eq!(recipe.ingredients, vec!["6 tomatoes", "1 onion"]);
        assert_eq!(recipe.instructions, vec!["Chop everything", "Simmer 20 minutes"]);
    }

    #[test]
    fn test_parse_text_inline_section() {
        let recipes = parse_recipe_text("Toast\nIngredients: bread\nMethod: toast it").unwrap();
        assert_eq!(recipes[0].ingredients, vec!["bread"]);
        assert_eq!(recipes[0].instructions, vec!["toast it"]);
    }

    #[test]
    fn test_parse_text_without_sections() {
        assert!(parse_recipe_text("Just a title\nand some prose").unwrap().is_empty());
        assert!(parse_recipe_text("   \n").unwrap().is_empty());
    }
}
