use crate::{
    category::Category,
    model::{Quote, QuoteSource},
};

/// Built-in quote for `category`, used once every remote provider has failed.
pub fn fallback_quote(category: Category) -> Quote {
    let (text, author) = match category {
        Category::Rain => (
            "Rain is a gift the sky gives us. Look for a new beginning within it.",
            "Rumi",
        ),
        Category::Snow => (
            "Snowflake by snowflake, the miracle of winter is made.",
            "Anonymous",
        ),
        Category::Clear => ("A clear sky is a symbol of endless possibility.", "Anonymous"),
        Category::Clouds => ("Clouds are the thoughts of the sky.", "Ralph Waldo Emerson"),
        Category::Thunderstorm => (
            "Be the kind of person who can dance even in the storm.",
            "Friedrich Nietzsche",
        ),
        Category::Fog => ("Fog is nature's magic, lending the world its mystery.", "Anonymous"),
        Category::Default => ("Today is a new day, different from yesterday.", "Anonymous"),
    };

    Quote {
        text: text.to_string(),
        author: author.to_string(),
        source: QuoteSource::Fallback,
    }
}
