//! Condition code to glyph lookup.

/// Half of a forecast day; selects the fallback glyph for unknown codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    Daytime,
    Overnight,
}

pub const DAYTIME_DEFAULT_ICON: &str = "🌞";
pub const OVERNIGHT_DEFAULT_ICON: &str = "🌝";

const CONDITION_ICONS: &[(&str, &str)] = &[
    ("Clear", "☀️"),
    ("Cloudy", "☁️"),
    ("Dust", "💨"),
    ("Fog", "🌫️"),
    ("Haze", "🌫️"),
    ("MostlyClear", "🌤️"),
    ("MostlyCloudy", "⛅"),
    ("PartlyCloudy", "⛅"),
    ("ScatteredThunderstorms", "⛈️"),
    ("Smoke", "🌫️"),
    ("Breezy", "💨"),
    ("Windy", "💨"),
    ("Drizzle", "🌧️"),
    ("HeavyRain", "🌧️"),
    ("Rain", "🌧️"),
    ("Showers", "🌦️"),
    ("Flurries", "❄️"),
    ("HeavySnow", "❄️"),
    ("MixedRainAndSleet", "🥶"),
    ("MixedRainAndSnow", "🥶"),
    ("MixedRainfall", "🥶"),
    ("MixedSnowAndSleet", "🥶"),
    ("ScatteredShowers", "🌦️"),
    ("ScatteredSnowShowers", "❄️"),
    ("Sleet", "🥶"),
    ("Snow", "❄️"),
    ("SnowShowers", "❄️"),
    ("Blizzard", "❄️"),
    ("BlowingSnow", "❄️"),
    ("FreezingDrizzle", "🥶"),
    ("FreezingRain", "🥶"),
    ("Frigid", "🥶"),
    ("Hail", "🥶"),
    ("Hot", "🥵"),
    ("Hurricane", "🌀"),
    ("IsolatedThunderstorms", "⛈️"),
    ("SevereThunderstorm", "⛈️"),
    ("Thunderstorm", "⛈️"),
    ("Tornado", "🌪️"),
    ("TropicalStorm", "🌀"),
];

/// Glyph for a WeatherKit condition code, or `None` if the code is unknown.
pub fn lookup(condition: &str) -> Option<&'static str> {
    CONDITION_ICONS
        .iter()
        .find(|(code, _)| *code == condition)
        .map(|(_, icon)| *icon)
}

/// Glyph for `condition`, falling back to a sun or a moon depending on `part`.
pub fn icon_for(condition: &str, part: DayPart) -> &'static str {
    lookup(condition).unwrap_or(match part {
        DayPart::Daytime => DAYTIME_DEFAULT_ICON,
        DayPart::Overnight => OVERNIGHT_DEFAULT_ICON,
    })
}
