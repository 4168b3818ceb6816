//! Player identity, localized labels and template-variable assembly.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DAYS_TO_PASS, GAME_YEAR_OFFSET};

/// Interface language of a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Rus,
    Eng,
}

impl Lang {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rus => "rus",
            Self::Eng => "eng",
        }
    }

    /// Labels for the reserved choices.
    #[must_use]
    pub const fn labels(self) -> ChoiceLabels {
        match self {
            Self::Rus => ChoiceLabels {
                i_agree: "Я берусь за это задание",
                next: "Далее",
                go_back_to_ship: "Вернуться на корабль",
            },
            Self::Eng => ChoiceLabels {
                i_agree: "I agree",
                next: "Next",
                go_back_to_ship: "Go back to ship",
            },
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Localized texts for the reserved choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceLabels {
    pub i_agree: &'static str,
    pub next: &'static str,
    pub go_back_to_ship: &'static str,
}

/// Identity of the player character, exposed to text templates verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerIdentity {
    pub ranger: String,
    pub player: String,
    pub money: String,
    pub from_planet: String,
    pub from_star: String,
    pub to_planet: String,
    pub to_star: String,
    #[serde(rename = "lang")]
    pub lang: Lang,
}

impl PlayerIdentity {
    /// Default Russian-language identity.
    #[must_use]
    pub fn default_rus() -> Self {
        Self {
            ranger: "Греф".to_string(),
            player: "Греф".to_string(),
            money: "65535".to_string(),
            from_planet: "Земля".to_string(),
            from_star: "Солнечная".to_string(),
            to_planet: "Боннасис".to_string(),
            to_star: "Процион".to_string(),
            lang: Lang::Rus,
        }
    }

    /// Default English-language identity.
    #[must_use]
    pub fn default_eng() -> Self {
        Self {
            ranger: "Ranger".to_string(),
            player: "Player".to_string(),
            money: "65535".to_string(),
            from_planet: "FromPlanet".to_string(),
            from_star: "FromStar".to_string(),
            to_planet: "ToPlanet".to_string(),
            to_star: "ToStar".to_string(),
            lang: Lang::Eng,
        }
    }
}

impl Default for PlayerIdentity {
    fn default() -> Self {
        Self::default_rus()
    }
}

/// Named variables handed to the substitution collaborator.
pub type TemplateVars = BTreeMap<&'static str, String>;

const MONTHS_ENG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_RUS: [&str; 12] = [
    "Января",
    "Февраля",
    "Марта",
    "Апреля",
    "Мая",
    "Июня",
    "Июля",
    "Августа",
    "Сентября",
    "Октября",
    "Ноября",
    "Декабря",
];

/// Render an in-game calendar date `days_to_add` days after `base`.
#[must_use]
pub fn format_game_date(days_to_add: u32, lang: Lang, base: NaiveDate) -> String {
    let date = base
        .checked_add_days(Days::new(u64::from(days_to_add)))
        .unwrap_or(base);
    let months = match lang {
        Lang::Eng => &MONTHS_ENG,
        Lang::Rus => &MONTHS_RUS,
    };
    let month = months
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!(
        "{} {} {}",
        date.day(),
        month,
        date.year() + GAME_YEAR_OFFSET
    )
}

/// Assemble the full variable set for one rendering pass: deadline
/// countdown, both calendar dates and every identity field.
#[must_use]
pub fn template_vars(
    player: &PlayerIdentity,
    days_passed: u32,
    base_date: NaiveDate,
) -> TemplateVars {
    let lang = player.lang;
    let days_left = i64::from(DEFAULT_DAYS_TO_PASS) - i64::from(days_passed);
    BTreeMap::from([
        ("Day", days_left.to_string()),
        ("Date", format_game_date(DEFAULT_DAYS_TO_PASS, lang, base_date)),
        ("CurDate", format_game_date(days_passed, lang, base_date)),
        ("lang", lang.as_str().to_string()),
        ("Ranger", player.ranger.clone()),
        ("Player", player.player.clone()),
        ("Money", player.money.clone()),
        ("FromPlanet", player.from_planet.clone()),
        ("FromStar", player.from_star.clone()),
        ("ToPlanet", player.to_planet.clone()),
        ("ToStar", player.to_star.clone()),
    ])
}

/// Today's date, used when the host does not inject a base date.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 30).expect("valid date")
    }

    #[test]
    fn dates_shift_by_a_millennium() {
        assert_eq!(format_game_date(0, Lang::Eng, base()), "30 January 3025");
        assert_eq!(format_game_date(2, Lang::Eng, base()), "1 February 3025");
        assert_eq!(format_game_date(2, Lang::Rus, base()), "1 Февраля 3025");
    }

    #[test]
    fn vars_carry_countdown_and_identity() {
        let player = PlayerIdentity::default_eng();
        let vars = template_vars(&player, 5, base());
        assert_eq!(vars.get("Day").map(String::as_str), Some("30"));
        assert_eq!(vars.get("CurDate").map(String::as_str), Some("4 February 3025"));
        assert_eq!(vars.get("Date").map(String::as_str), Some("6 March 3025"));
        assert_eq!(vars.get("Ranger").map(String::as_str), Some("Ranger"));
        assert_eq!(vars.get("lang").map(String::as_str), Some("eng"));
    }

    #[test]
    fn countdown_goes_negative_past_the_deadline() {
        let vars = template_vars(&PlayerIdentity::default_eng(), 40, base());
        assert_eq!(vars.get("Day").map(String::as_str), Some("-5"));
    }
}
