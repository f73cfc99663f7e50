use serde::{Deserialize, Serialize};

use crate::text::words;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Accommodation,
    Activities,
    Shopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryMatch {
    pub category: Category,
    pub confidence: f64,
}

const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &[
            "restaurant", "dinner", "lunch", "breakfast", "brunch", "food", "meal", "cafe",
            "coffee", "groceries", "grocery", "drinks", "drink", "bar", "pizza", "snacks",
            "takeout", "bakery",
        ],
    ),
    (
        Category::Transport,
        &[
            "taxi", "uber", "lyft", "cab", "train", "flight", "flights", "bus", "metro", "subway",
            "tram", "ferry", "fuel", "gas", "petrol", "parking", "toll", "rental", "airport",
        ],
    ),
    (
        Category::Accommodation,
        &[
            "hotel", "hostel", "airbnb", "accommodation", "lodging", "motel", "resort",
            "apartment", "room", "campsite",
        ],
    ),
    (
        Category::Activities,
        &[
            "museum", "tour", "tickets", "ticket", "concert", "show", "park", "hike", "excursion",
            "activity", "entrance", "gallery", "cinema", "surfing", "diving", "ski",
        ],
    ),
    (
        Category::Shopping,
        &[
            "shopping", "souvenir", "souvenirs", "gift", "gifts", "clothes", "market", "store",
            "mall", "pharmacy",
        ],
    ),
];

// Longer keywords are more specific.
const LONG_KEYWORD_CONFIDENCE: f64 = 0.7;
const SHORT_KEYWORD_CONFIDENCE: f64 = 0.5;
const LONG_KEYWORD_MIN_CHARS: usize = 6;

/// Category of the first keyword hit, walking the table in order.
pub fn infer_category(text: &str) -> Option<CategoryMatch> {
    let text_words: Vec<String> = words(text).map(|(word, _)| word).collect();

    KEYWORDS.iter().find_map(|&(category, keywords)| {
        keywords
            .iter()
            .find(|keyword| text_words.iter().any(|word| word == *keyword))
            .map(|keyword| CategoryMatch {
                category,
                confidence: if keyword.chars().count() >= LONG_KEYWORD_MIN_CHARS {
                    LONG_KEYWORD_CONFIDENCE
                } else {
                    SHORT_KEYWORD_CONFIDENCE
                },
            })
    })
}
