//! # minitats-dates
//!
//! Finds Spanish date and time expressions ("mañana a las 9", "el viernes",
//! "en 10 minutos", "25/12 a las 18:30") in free text and resolves them to
//! absolute instants in the configured time zone.

mod grammar;
mod resolve;


use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use minitats_core::{
    error::MinitatsError,
    traits::{DateMatch, DateResolver},
};
use tracing::debug;

use grammar::{Grammar, PartKind, Token};

/// Date resolver for Spanish text.
pub struct SpanishDateParser {
    tz: Tz,
    grammar: Grammar,
}

impl SpanishDateParser {
    /// Build a parser that interprets wall-clock times in `tz`.
    pub fn new(tz: Tz) -> Result<Self, MinitatsError> {
        let grammar = Grammar::new()
            .map_err(|e| MinitatsError::Config(format!("date grammar: {e}")))?;
        Ok(Self { tz, grammar })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl DateResolver for SpanishDateParser {
    fn resolve(&self, text: &str, reference: DateTime<Utc>) -> Vec<DateMatch> {
        let tokens = self.grammar.scan(text);
        let mut matches = Vec::new();

        for group in group_tokens(text, &tokens) {
            let (Some(first), Some(last)) = (group.first(), group.last()) else {
                continue;
            };
            let parts: Vec<_> = group.iter().map(|t| t.part).collect();
            let span = &text[first.start..last.end];

            match resolve::resolve_group(&parts, reference, self.tz) {
                Some(at) => matches.push(DateMatch {
                    text: span.to_string(),
                    start: first.start,
                    end: last.end,
                    at,
                }),
                None => debug!("unresolvable date expression: {span:?}"),
            }
        }

        matches
    }
}

/// Merge tokens separated only by whitespace or commas into one expression,
/// as long as no two of them say the same kind of thing.
fn group_tokens<'a>(text: &str, tokens: &'a [Token]) -> Vec<Vec<&'a Token>> {
    let mut groups: Vec<Vec<&Token>> = Vec::new();

    for token in tokens {
        let joins = groups.last().is_some_and(|group| {
            let Some(prev) = group.last() else {
                return false;
            };
            let gap = &text[prev.end..token.start];
            let adjacent = gap.chars().all(|c| c.is_whitespace() || c == ',');
            let kind = token.part.kind();
            adjacent
                && kind != PartKind::Offset
                && group
                    .iter()
                    .all(|t| t.part.kind() != kind && t.part.kind() != PartKind::Offset)
        });

        match groups.last_mut() {
            Some(group) if joins => group.push(token),
            _ => groups.push(vec![token]),
        }
    }

    groups
}
