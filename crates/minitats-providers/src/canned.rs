//! Offline replies used when no AI backend is configured or it fails.

use rand::seq::SliceRandom;

const SPANISH: &[&str] = &[
    "¡Aquí estoy, {name}! 💛",
    "Te leo, {name}. Si quieres que te recuerde algo, dime cuándo.",
    "Qué bonito saber de ti, {name} ✨",
    "Estoy contigo, {name}. ¿Te ayudo con algún recordatorio?",
    "¡Ánimo, {name}! Lo estás haciendo genial 💪",
];

const ENGLISH: &[&str] = &[
    "I'm right here, {name}! 💛",
    "I hear you, {name}. Want me to remind you of something? Just tell me when.",
    "So nice to hear from you, {name} ✨",
    "I'm with you, {name}. Need a reminder?",
    "You've got this, {name}! 💪",
];

/// Picks a random friendly reply addressed to the partner.
pub struct CannedReplies {
    partner_name: String,
    language: String,
}

impl CannedReplies {
    pub fn new(partner_name: &str, language: &str) -> Self {
        Self {
            partner_name: partner_name.to_string(),
            language: language.to_string(),
        }
    }

    fn templates(&self) -> &'static [&'static str] {
        if self.language.eq_ignore_ascii_case("english") {
            ENGLISH
        } else {
            SPANISH
        }
    }

    /// One reply, chosen at random.
    pub fn pick(&self) -> String {
        let template = self
            .templates()
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("💛");
        template.replace("{name}", &self.partner_name)
    }
}
