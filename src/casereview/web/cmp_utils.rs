use std::cell::RefCell;
use std::cmp::Ordering;

use feruca::{Collator, Locale, Tailoring};

thread_local! {
    // CLDR root collation with punctuation kept significant, which is what
    // browsers use for String.localeCompare()
    static COLLATOR: RefCell<Collator> =
        RefCell::new(Collator::new(Tailoring::Cldr(Locale::Root), false, true));
}

// Compare like a browser's default String.localeCompare(): accents and case
// only break ties between otherwise equal strings, and lowercase sorts before
// uppercase.
pub fn locale_cmp(s1: &str, s2: &str) -> Ordering {
    COLLATOR.with(|collator| collator.borrow_mut().collate(s1, s2))
}

#[test]
fn test_locale_cmp() {
    assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
    assert_eq!(locale_cmp("Banana", "apple"), Ordering::Greater);
    assert_eq!(locale_cmp("a", "A"), Ordering::Less);
    assert_eq!(locale_cmp("fam_1", "fam_1"), Ordering::Equal);
    assert_eq!(locale_cmp("", "a"), Ordering::Less);
    assert_eq!(locale_cmp("2024-01-01", "2023-12-31"), Ordering::Greater);
}

#[test]
fn test_locale_cmp_accents_and_punctuation() {
    assert_eq!(locale_cmp("Émile", "Fred"), Ordering::Less);
    assert_eq!(locale_cmp("emile", "Émile"), Ordering::Less);
    assert_eq!(locale_cmp("Zoë", "Émile"), Ordering::Greater);
    assert_eq!(locale_cmp("fam_2", "fam1"), Ordering::Less);
    assert_eq!(locale_cmp("fam1", "fam_2"), Ordering::Greater);
}
