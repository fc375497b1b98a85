use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Keywords offered while typing a category.
pub const COMMON_CATEGORIES: &[&str] = &[
    "bakery",
    "bar",
    "barbecue",
    "breakfast",
    "brunch",
    "bubble tea",
    "burger",
    "cafe",
    "curry",
    "dessert",
    "dumplings",
    "hot pot",
    "ice cream",
    "noodles",
    "pizza",
    "ramen",
    "restaurant",
    "seafood",
    "steak",
    "sushi",
    "tacos",
    "vegetarian",
];

/// Best fuzzy completion for `input`, if it differs from what was typed.
pub fn suggest_category(input: &str) -> Option<&'static str> {
    let typed = input.trim();
    if typed.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    COMMON_CATEGORIES
        .iter()
        .filter_map(|category| {
            matcher
                .fuzzy_match(category, typed)
                .map(|score| (score, *category))
        })
        .max_by(|(a, left), (b, right)| a.cmp(b).then_with(|| right.len().cmp(&left.len())))
        .map(|(_, category)| category)
        .filter(|category| !category.eq_ignore_ascii_case(typed))
}
