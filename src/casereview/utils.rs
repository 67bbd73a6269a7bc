use flexstr::SharedStr as FlexStr;

use regex::Regex;

lazy_static! {
    static ref CAMEL_BOUNDARY_RE: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref SEPARATOR_RE: Regex = Regex::new(r"[\s\-]+").unwrap();
}

pub fn join(v: &[FlexStr], connector: &str) -> FlexStr {
    let result = itertools::join(v.iter().map(FlexStr::as_ref), connector);
    result.into()
}

// "case review" -> "case_review", "caseReview" -> "case_review"
pub fn to_snakecase(s: &str) -> String {
    let split_camel = CAMEL_BOUNDARY_RE.replace_all(s.trim(), "${1}_${2}");
    SEPARATOR_RE.replace_all(&split_camel, "_").to_lowercase()
}

// "case review" -> "caseReview", "case_review" -> "caseReview"
pub fn to_camelcase(s: &str) -> String {
    let mut ret = String::new();

    for (i, part) in s.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .enumerate()
    {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                ret.extend(first.to_lowercase());
            } else {
                ret.extend(first.to_uppercase());
            }
            ret.push_str(chars.as_str());
        }
    }

    ret
}

// "family_page" -> "Family Page"
pub fn snakecase_to_titlecase(s: &str) -> String {
    let words: Vec<String> =
        s.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    words.join(" ")
}

// the date part of an ISO timestamp: "2024-01-03T10:11:12" -> "2024-01-03"
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

#[test]
fn test_to_snakecase() {
    assert_eq!(to_snakecase("case review"), "case_review");
    assert_eq!(to_snakecase("Case Review"), "case_review");
    assert_eq!(to_snakecase("caseReview"), "case_review");
    assert_eq!(to_snakecase("family"), "family");
}

#[test]
fn test_to_camelcase() {
    assert_eq!(to_camelcase("case review"), "caseReview");
    assert_eq!(to_camelcase("case_review"), "caseReview");
    assert_eq!(to_camelcase("Family"), "family");
}

#[test]
fn test_snakecase_to_titlecase() {
    assert_eq!(snakecase_to_titlecase("family_page"), "Family Page");
    assert_eq!(snakecase_to_titlecase("analysis_group"), "Analysis Group");
    assert_eq!(snakecase_to_titlecase("project"), "Project");
}

#[test]
fn test_date_part() {
    assert_eq!(date_part("2024-01-03T10:11:12.123Z"), "2024-01-03");
    assert_eq!(date_part("2024-01-03"), "2024-01-03");
    assert_eq!(date_part(""), "");
}
