use serde::{Deserialize, Serialize};

/// Weather mood bucket used to pick quote tags and fallback quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rain,
    Snow,
    Clear,
    Clouds,
    Thunderstorm,
    Fog,
    Default,
}

/// Classification rules, checked in order; the first rule with a matching
/// keyword wins.
const RULES: &[(&[&str], Category)] = &[
    (&["rain", "drizzle"], Category::Rain),
    (&["snow"], Category::Snow),
    (&["clear"], Category::Clear),
    (&["cloud"], Category::Clouds),
    (&["thunderstorm", "storm"], Category::Thunderstorm),
    (&["fog", "mist", "haze"], Category::Fog),
];

/// Map a provider condition string (e.g. "Rain", "Light Drizzle") to a category.
///
/// Matching is case-insensitive and substring-based. Absent or unmatched
/// input yields [`Category::Default`].
pub fn classify(condition_main: Option<&str>) -> Category {
    let Some(condition) = condition_main else {
        return Category::Default;
    };
    let condition = condition.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| condition.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Default)
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rain => "rain",
            Category::Snow => "snow",
            Category::Clear => "clear",
            Category::Clouds => "clouds",
            Category::Thunderstorm => "thunderstorm",
            Category::Fog => "fog",
            Category::Default => "default",
        }
    }

    pub const fn all() -> &'static [Category] {
        &[
            Category::Rain,
            Category::Snow,
            Category::Clear,
            Category::Clouds,
            Category::Thunderstorm,
            Category::Fog,
            Category::Default,
        ]
    }

    /// Parse a category name as sent back by clients. Unknown names map to
    /// [`Category::Default`].
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();

        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .unwrap_or(Category::Default)
    }

    /// Comma-separated tag list passed to the primary quote provider.
    pub fn quote_tags(&self) -> &'static str {
        match self {
            Category::Rain => "wisdom,life,inspirational",
            Category::Snow => "nature,peace,wisdom",
            Category::Clear => "happiness,success,motivational",
            Category::Clouds => "wisdom,life,philosophy",
            Category::Thunderstorm => "courage,strength,motivational",
            Category::Fog => "philosophy,wisdom,mystery",
            Category::Default => "inspirational,wisdom,life",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_all(inputs: &[&str], expected: Category) {
        for input in inputs {
            assert_eq!(classify(Some(input)), expected, "input: {input}");
        }
    }

    #[test]
    fn rain_and_drizzle() {
        assert_all(
            &["Rain", "rain", "Light Rain Shower", "DRIZZLE", "freezing drizzle", "xrainx"],
            Category::Rain,
        );
    }

    #[test]
    fn each_non_default_rule() {
        assert_all(&["Snow", "heavy snowfall"], Category::Snow);
        assert_all(&["Clear", "clear sky"], Category::Clear);
        assert_all(&["Clouds", "overcast CLOUDS", "cloudy"], Category::Clouds);
        assert_all(&["Thunderstorm", "Storm", "sandstorm"], Category::Thunderstorm);
        assert_all(&["Fog", "Mist", "Haze", "misty morning"], Category::Fog);
    }

    #[test]
    fn priority_order_first_match_wins() {
        // rain beats storm, snow beats cloud
        assert_eq!(classify(Some("Thunderstorm with rain")), Category::Rain);
        assert_eq!(classify(Some("Snow clouds")), Category::Snow);
        assert_eq!(classify(Some("clearing fog")), Category::Clear);
    }

    #[test]
    fn unmatched_and_absent_default() {
        assert_all(&["", "Tornado", "Smoke", "Dust", "Squall"], Category::Default);
        assert_eq!(classify(None), Category::Default);
    }

    #[test]
    fn from_name_is_lenient() {
        for category in Category::all() {
            assert_eq!(Category::from_name(category.as_str()), *category);
        }
        assert_eq!(Category::from_name(" SNOW "), Category::Snow);
        assert_eq!(Category::from_name("sunny"), Category::Default);
    }

    #[test]
    fn every_category_has_tags() {
        for category in Category::all() {
            assert!(!category.quote_tags().is_empty());
        }
        assert_eq!(Category::Fog.quote_tags(), "philosophy,wisdom,mystery");
    }
}
