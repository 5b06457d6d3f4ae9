use chrono::{DateTime, Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};

/// Date/time placeholders accepted inside `{...}` groups of a scheme format string.
///
/// Names follow the familiar custom date format letters (`yyyy`, `MM`, `dd`, ...)
/// and are matched case-sensitively: `{MM}` is the month, `{mm}` the minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemeToken {
    DayName,
    DayNameAbbreviation,
    DayNumeral,
    DayNumeralLeadingZero,
    Hour12h,
    Hour12hLeadingZero,
    Hour24h,
    Hour24hLeadingZero,
    Minute,
    MinuteLeadingZero,
    MonthName,
    MonthNameAbbreviation,
    MonthNumeral,
    MonthNumeralLeadingZero,
    Year2Digit,
    Year2DigitLeadingZero,
    Year3DigitLeadingZero,
    Year4DigitLeadingZero,
}

impl SchemeToken {
    pub const ALL: [SchemeToken; 18] = [
        SchemeToken::DayName,
        SchemeToken::DayNameAbbreviation,
        SchemeToken::DayNumeral,
        SchemeToken::DayNumeralLeadingZero,
        SchemeToken::Hour12h,
        SchemeToken::Hour12hLeadingZero,
        SchemeToken::Hour24h,
        SchemeToken::Hour24hLeadingZero,
        SchemeToken::Minute,
        SchemeToken::MinuteLeadingZero,
        SchemeToken::MonthName,
        SchemeToken::MonthNameAbbreviation,
        SchemeToken::MonthNumeral,
        SchemeToken::MonthNumeralLeadingZero,
        SchemeToken::Year2Digit,
        SchemeToken::Year2DigitLeadingZero,
        SchemeToken::Year3DigitLeadingZero,
        SchemeToken::Year4DigitLeadingZero,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let token = match name {
            "dddd" => SchemeToken::DayName,
            "ddd" => SchemeToken::DayNameAbbreviation,
            "d" => SchemeToken::DayNumeral,
            "dd" => SchemeToken::DayNumeralLeadingZero,
            "h" => SchemeToken::Hour12h,
            "hh" => SchemeToken::Hour12hLeadingZero,
            "H" => SchemeToken::Hour24h,
            "HH" => SchemeToken::Hour24hLeadingZero,
            "m" => SchemeToken::Minute,
            "mm" => SchemeToken::MinuteLeadingZero,
            "MMMM" => SchemeToken::MonthName,
            "MMM" => SchemeToken::MonthNameAbbreviation,
            "M" => SchemeToken::MonthNumeral,
            "MM" => SchemeToken::MonthNumeralLeadingZero,
            "y" => SchemeToken::Year2Digit,
            "yy" => SchemeToken::Year2DigitLeadingZero,
            "yyy" => SchemeToken::Year3DigitLeadingZero,
            "yyyy" => SchemeToken::Year4DigitLeadingZero,
            _ => return None,
        };
        Some(token)
    }

    pub fn name(self) -> &'static str {
        match self {
            SchemeToken::DayName => "dddd",
            SchemeToken::DayNameAbbreviation => "ddd",
            SchemeToken::DayNumeral => "d",
            SchemeToken::DayNumeralLeadingZero => "dd",
            SchemeToken::Hour12h => "h",
            SchemeToken::Hour12hLeadingZero => "hh",
            SchemeToken::Hour24h => "H",
            SchemeToken::Hour24hLeadingZero => "HH",
            SchemeToken::Minute => "m",
            SchemeToken::MinuteLeadingZero => "mm",
            SchemeToken::MonthName => "MMMM",
            SchemeToken::MonthNameAbbreviation => "MMM",
            SchemeToken::MonthNumeral => "M",
            SchemeToken::MonthNumeralLeadingZero => "MM",
            SchemeToken::Year2Digit => "y",
            SchemeToken::Year2DigitLeadingZero => "yy",
            SchemeToken::Year3DigitLeadingZero => "yyy",
            SchemeToken::Year4DigitLeadingZero => "yyyy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SchemeToken::DayName => "day of the week (Sunday)",
            SchemeToken::DayNameAbbreviation => "abbreviated day of the week (Sun)",
            SchemeToken::DayNumeral => "day of the month (4)",
            SchemeToken::DayNumeralLeadingZero => "day of the month, two digits (04)",
            SchemeToken::Hour12h => "hour on a 12-hour clock (3)",
            SchemeToken::Hour12hLeadingZero => "hour on a 12-hour clock, two digits (03)",
            SchemeToken::Hour24h => "hour on a 24-hour clock (15)",
            SchemeToken::Hour24hLeadingZero => "hour on a 24-hour clock, two digits (15)",
            SchemeToken::Minute => "minute (5)",
            SchemeToken::MinuteLeadingZero => "minute, two digits (05)",
            SchemeToken::MonthName => "month name (July)",
            SchemeToken::MonthNameAbbreviation => "abbreviated month name (Jul)",
            SchemeToken::MonthNumeral => "month (7)",
            SchemeToken::MonthNumeralLeadingZero => "month, two digits (07)",
            SchemeToken::Year2Digit => "year without century (21)",
            SchemeToken::Year2DigitLeadingZero => "year without century, two digits (21)",
            SchemeToken::Year3DigitLeadingZero => "year, at least three digits (2021)",
            SchemeToken::Year4DigitLeadingZero => "year, four digits (2021)",
        }
    }

    pub fn render(self, date: &DateTime<Local>) -> String {
        let year_of_century = date.year().rem_euclid(100);
        match self {
            SchemeToken::DayName => date.format("%A").to_string(),
            SchemeToken::DayNameAbbreviation => date.format("%a").to_string(),
            SchemeToken::DayNumeral => date.day().to_string(),
            SchemeToken::DayNumeralLeadingZero => format!("{:02}", date.day()),
            SchemeToken::Hour12h => date.hour12().1.to_string(),
            SchemeToken::Hour12hLeadingZero => format!("{:02}", date.hour12().1),
            SchemeToken::Hour24h => date.hour().to_string(),
            SchemeToken::Hour24hLeadingZero => format!("{:02}", date.hour()),
            SchemeToken::Minute => date.minute().to_string(),
            SchemeToken::MinuteLeadingZero => format!("{:02}", date.minute()),
            SchemeToken::MonthName => date.format("%B").to_string(),
            SchemeToken::MonthNameAbbreviation => date.format("%b").to_string(),
            SchemeToken::MonthNumeral => date.month().to_string(),
            SchemeToken::MonthNumeralLeadingZero => format!("{:02}", date.month()),
            SchemeToken::Year2Digit => year_of_century.to_string(),
            SchemeToken::Year2DigitLeadingZero => format!("{:02}", year_of_century),
            SchemeToken::Year3DigitLeadingZero => format!("{:03}", date.year()),
            SchemeToken::Year4DigitLeadingZero => format!("{:04}", date.year()),
        }
    }
}
