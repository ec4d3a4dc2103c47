//! Token grammar: finds date and time fragments in Spanish free text.
//!
//! Each rule is a case-insensitive regex producing one [`Part`]. Rules run in
//! priority order and a later rule never claims bytes already claimed by an
//! earlier one, so "a las 9 de la mañana" is one time token and the trailing
//! "mañana" is not mistaken for "tomorrow".

use chrono::{Duration, NaiveTime, Weekday};
use regex::{Captures, Regex};

/// A wall-clock time, plus whether AM/PM was stated or implied unambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClockTime {
    pub time: NaiveTime,
    pub fixed: bool,
}

impl ClockTime {
    fn new(hour: u32, minute: u32, fixed: bool) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|time| Self { time, fixed })
    }
}

/// One recognized fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Part {
    /// "en 10 minutos", "dentro de dos horas".
    Offset(Duration),
    /// "hoy" (0), "mañana" (1), "pasado mañana" (2); "esta noche" carries an hour.
    Day { offset: i64, hour: Option<u32> },
    /// "el viernes", "el próximo lunes".
    Weekday(Weekday),
    /// "25 de diciembre", "25/12/2026".
    Date {
        day: u32,
        month: u32,
        year: Option<i32>,
    },
    /// "a las 9", "17:30", "7pm", "al mediodía", "por la tarde".
    Time(ClockTime),
}

impl Part {
    /// Fragments of the same kind cannot be combined into one expression.
    pub(crate) fn kind(&self) -> PartKind {
        match self {
            Part::Offset(_) => PartKind::Offset,
            Part::Day { .. } | Part::Weekday(_) | Part::Date { .. } => PartKind::Date,
            Part::Time(_) => PartKind::Time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartKind {
    Offset,
    Date,
    Time,
}

/// A fragment and its byte span in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub start: usize,
    pub end: usize,
    pub part: Part,
}

const NUMBER_WORDS: &str =
    "una?|media|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez|once|doce|quince|veinte|treinta";

const MONTHS: &str =
    "enero|febrero|marzo|abril|mayo|junio|julio|agosto|sept?iembre|octubre|noviembre|diciembre";

type Rule = fn(&Captures) -> Option<Part>;

fn rule(pattern: &str, parse: Rule) -> Result<(Regex, Rule), regex::Error> {
    Ok((Regex::new(pattern)?, parse))
}

/// Compiled grammar rules in priority order.
pub(crate) struct Grammar {
    rules: Vec<(Regex, Rule)>,
}

impl Grammar {
    pub(crate) fn new() -> Result<Self, regex::Error> {
        let rules = vec![
            rule(
                &format!(
                    r"(?i)\b(?:en|dentro\s+de)\s+(?P<qty>\d+|{NUMBER_WORDS})\s*(?P<unit>minutos?|mins?|horas?|hrs?|h|d[ií]as?|semanas?)\b"
                ),
                offset_rule,
            )?,
            rule(
                &format!(
                    r"(?i)\b(?:el\s+)?(?:d[ií]a\s+)?(?P<day>\d{{1,2}})\s+de\s+(?P<month>{MONTHS})(?:\s+(?:de|del)\s+(?P<year>\d{{4}}))?\b"
                ),
                date_long_rule,
            )?,
            rule(
                r"(?i)\b(?:el\s+)?(?P<day>\d{1,2})/(?P<month>\d{1,2})(?:/(?P<year>\d{4}|\d{2}))?\b",
                date_numeric_rule,
            )?,
            rule(
                &format!(
                    r"(?i)\b(?:a|sobre|hacia)\s+las?\s+(?P<hour>\d{{1,2}}|{NUMBER_WORDS})(?:(?::|\.|h)(?P<minute>\d{{2}}))?(?:\s+y\s+(?P<plus>media|cuarto)|\s+menos\s+(?P<minus>cuarto))?(?:\s*(?:h|hs|horas)\b)?(?:\s*(?P<meridiem>am|pm)\b)?(?:\s+(?:de|por)\s+la\s+(?P<period>mañana|tarde|noche|madrugada))?"
                ),
                time_rule,
            )?,
            rule(
                r"(?i)\b(?P<hour>\d{1,2}):(?P<minute>\d{2})(?:\s*(?P<meridiem>am|pm))?\b",
                time_rule,
            )?,
            rule(
                r"(?i)\b(?P<hour>\d{1,2})\s*(?P<meridiem>am|pm)\b",
                time_rule,
            )?,
            rule(
                r"(?i)\b(?:al|a|el)\s+mediod[ií]a\b",
                |_| ClockTime::new(12, 0, true).map(Part::Time),
            )?,
            rule(
                r"(?i)\b(?:a\s+)?(?:la\s+)?medianoche\b",
                |_| ClockTime::new(0, 0, true).map(Part::Time),
            )?,
            rule(
                r"(?i)\b(?:por|de|en)\s+la\s+(?P<period>mañana|tarde|noche)\b",
                period_rule,
            )?,
            rule(
                r"(?i)\b(?:el\s+)?(?:(?:pr[oó]xim[oa]|este)\s+)?(?P<weekday>lunes|martes|mi[eé]rcoles|jueves|viernes|s[aá]bado|domingo)(?:\s+que\s+viene)?\b",
                weekday_rule,
            )?,
            rule(
                r"(?i)\b(?P<day>pasado\s+mañana|mañana|hoy|esta\s+noche|esta\s+tarde)\b",
                day_rule,
            )?,
        ];

        Ok(Self { rules })
    }

    /// Find all non-overlapping fragments, ordered by position.
    pub(crate) fn scan(&self, text: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();

        for (re, rule) in &self.rules {
            for caps in re.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let (start, end) = (whole.start(), whole.end());
                if tokens.iter().any(|t| start < t.end && t.start < end) {
                    continue;
                }
                if let Some(part) = rule(&caps) {
                    tokens.push(Token { start, end, part });
                }
            }
        }

        tokens.sort_by_key(|t| t.start);
        tokens
    }
}

fn number(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let n = match raw.to_lowercase().as_str() {
        "un" | "una" => 1,
        "dos" => 2,
        "tres" => 3,
        "cuatro" => 4,
        "cinco" => 5,
        "seis" => 6,
        "siete" => 7,
        "ocho" => 8,
        "nueve" => 9,
        "diez" => 10,
        "once" => 11,
        "doce" => 12,
        "quince" => 15,
        "veinte" => 20,
        "treinta" => 30,
        _ => return None,
    };
    Some(n)
}

fn offset_rule(caps: &Captures) -> Option<Part> {
    let qty = caps.name("qty")?.as_str().to_lowercase();
    let unit = caps.name("unit")?.as_str().to_lowercase();

    let unit_minutes: i64 = if unit.starts_with("min") {
        1
    } else if unit.starts_with('h') {
        60
    } else if unit.starts_with('d') {
        60 * 24
    } else {
        60 * 24 * 7
    };

    let minutes = if qty == "media" {
        unit_minutes / 2
    } else {
        i64::from(number(&qty)?).checked_mul(unit_minutes)?
    };

    if minutes <= 0 {
        return None;
    }
    Duration::try_minutes(minutes).map(Part::Offset)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}

fn date_part(day: u32, month: u32, year: Option<i32>) -> Option<Part> {
    ((1..=31).contains(&day) && (1..=12).contains(&month)).then_some(Part::Date { day, month, year })
}

fn date_long_rule(caps: &Captures) -> Option<Part> {
    let day = caps.name("day")?.as_str().parse().ok()?;
    let month = month_number(caps.name("month")?.as_str())?;
    let year = match caps.name("year") {
        Some(y) => Some(y.as_str().parse().ok()?),
        None => None,
    };
    date_part(day, month, year)
}

fn date_numeric_rule(caps: &Captures) -> Option<Part> {
    let day = caps.name("day")?.as_str().parse().ok()?;
    let month = caps.name("month")?.as_str().parse().ok()?;
    let year = match caps.name("year") {
        Some(y) if y.as_str().len() == 2 => Some(2000 + y.as_str().parse::<i32>().ok()?),
        Some(y) => Some(y.as_str().parse().ok()?),
        None => None,
    };
    date_part(day, month, year)
}

fn time_rule(caps: &Captures) -> Option<Part> {
    let mut hour = number(caps.name("hour")?.as_str())?;
    let mut minute = match caps.name("minute") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if hour > 23 || minute > 59 {
        return None;
    }

    match caps.name("plus").map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("media") => minute = 30,
        Some("cuarto") => minute = 15,
        _ => {}
    }
    if caps.name("minus").is_some() {
        hour = if hour == 0 { 23 } else { hour - 1 };
        minute = 45;
    }

    let meridiem = caps.name("meridiem").map(|m| m.as_str().to_lowercase());
    let period = caps.name("period").map(|m| m.as_str().to_lowercase());

    let fixed = meridiem.is_some() || period.is_some() || hour > 12 || hour == 0;
    match (meridiem.as_deref(), period.as_deref()) {
        (Some("pm"), _) if hour < 12 => hour += 12,
        (Some("am"), _) if hour == 12 => hour = 0,
        (None, Some("tarde")) if hour < 12 => hour += 12,
        (None, Some("noche")) if hour == 12 => hour = 0,
        (None, Some("noche")) if (5..12).contains(&hour) => hour += 12,
        _ => {}
    }

    ClockTime::new(hour, minute, fixed).map(Part::Time)
}

fn period_hour(period: &str) -> Option<u32> {
    match period {
        "mañana" => Some(9),
        "tarde" => Some(16),
        "noche" => Some(21),
        _ => None,
    }
}

fn period_rule(caps: &Captures) -> Option<Part> {
    let period = caps.name("period")?.as_str().to_lowercase();
    ClockTime::new(period_hour(&period)?, 0, true).map(Part::Time)
}

fn weekday_rule(caps: &Captures) -> Option<Part> {
    let name = caps.name("weekday")?.as_str().to_lowercase();
    let weekday = match name.as_str() {
        "lunes" => Weekday::Mon,
        "martes" => Weekday::Tue,
        "miercoles" | "miércoles" => Weekday::Wed,
        "jueves" => Weekday::Thu,
        "viernes" => Weekday::Fri,
        "sabado" | "sábado" => Weekday::Sat,
        "domingo" => Weekday::Sun,
        _ => return None,
    };
    Some(Part::Weekday(weekday))
}

fn day_rule(caps: &Captures) -> Option<Part> {
    let raw = caps.name("day")?.as_str().to_lowercase();
    let words: Vec<&str> = raw.split_whitespace().collect();
    let part = match words.as_slice() {
        ["hoy"] => Part::Day {
            offset: 0,
            hour: None,
        },
        ["mañana"] => Part::Day {
            offset: 1,
            hour: None,
        },
        ["pasado", "mañana"] => Part::Day {
            offset: 2,
            hour: None,
        },
        ["esta", period] => Part::Day {
            offset: 0,
            hour: Some(period_hour(period)?),
        },
        _ => return None,
    };
    Some(part)
}
