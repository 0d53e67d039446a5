//! Canned empathetic replies.
//!
//! Trigger substrings are checked in order against the lowercased text and the
//! first match wins. The classifier label only picks the bucket when no
//! trigger matches.

use rand::seq::SliceRandom;

use crate::sentiment::SentimentLabel;

/// Interchangeable replies of one tone. Never empty.
pub type Bucket = &'static [&'static str];

#[derive(Debug, Clone, Copy)]
pub struct EmpathyTable {
    triggers: &'static [(&'static str, Bucket)],
    positive: Bucket,
    negative: Bucket,
    neutral: Bucket,
}

const PAUSE: Bucket = &["Tranquilo, todos empezamos asi. Proba hacer una pausa y volver con otra mirada."];
const ANGER: Bucket = &["Uf, entiendo que da bronca. Respira un segundo y contame que parte te esta complicando."];
const CHEER: Bucket = &["¡Genial! Me alegra que te haya salido. Segui asi, vas a aprender un monton."];
const NOT_KNOWING: Bucket = &["Esta bien no saberlo todavia. Podemos repasarlo paso a paso si queres."];

const POSITIVE: Bucket = &[
    "¡Que lindo leer eso! Segui así",
    "Me alegra mucho que te sientas así",
    "Que bueno que estes disfrutando",
];
const NEGATIVE: Bucket = &[
    "Uh, que bajon. Contame si queres, te escucho",
    "Uy, suena a que hoy no fue fácil",
    "A veces estos días son duros… estoy acá para escucharte",
];
const NEUTRAL: Bucket = &[
    "Mmm, entiendo… contame un poco mas",
    "Parece un día tranquilo",
    "Ah, interesante… si queres contame mas",
];

impl EmpathyTable {
    /// Study-support replies of the company assistant; one reply per trigger.
    pub const CORPORATE: Self = Self {
        triggers: &[
            ("estresado", PAUSE),
            ("frustrado", PAUSE),
            ("enojado", ANGER),
            ("feliz", CHEER),
            ("no sé", NOT_KNOWING),
        ],
        positive: CHEER,
        negative: PAUSE,
        neutral: NOT_KNOWING,
    };

    /// The emotional companion bot; several phrasings per tone.
    pub const COMPANION: Self = Self {
        triggers: &[
            ("triste", NEGATIVE),
            ("mal", NEGATIVE),
            ("deprimido", NEGATIVE),
            ("feliz", POSITIVE),
            ("contento", POSITIVE),
            ("alegre", POSITIVE),
            ("normal", NEUTRAL),
            ("ok", NEUTRAL),
        ],
        positive: POSITIVE,
        negative: NEGATIVE,
        neutral: NEUTRAL,
    };

    /// Bucket of the first trigger found in `text`.
    pub fn keyword_bucket(&self, text: &str) -> Option<Bucket> {
        let lower = text.to_lowercase();
        self.triggers
            .iter()
            .find(|(needle, _)| lower.contains(*needle))
            .map(|(_, bucket)| *bucket)
    }

    pub fn label_bucket(&self, label: SentimentLabel) -> Bucket {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    /// Keyword first, classifier label second.
    pub fn reply(&self, text: &str, label: SentimentLabel) -> &'static str {
        pick(self.keyword_bucket(text).unwrap_or_else(|| self.label_bucket(label)))
    }
}

pub fn pick(bucket: Bucket) -> &'static str {
    bucket.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_LABELS: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    #[test]
    fn test_keyword_wins_over_every_label() {
        let table = EmpathyTable::CORPORATE;
        for label in ALL_LABELS {
            assert_eq!(table.reply("Estoy muy ESTRESADO con el curso", label), PAUSE[0]);
            assert_eq!(table.reply("me siento enojado", label), ANGER[0]);
            assert_eq!(table.reply("hoy estoy feliz", label), CHEER[0]);
            assert_eq!(table.reply("No sé cómo seguir", label), NOT_KNOWING[0]);
        }
    }

    #[test]
    fn test_first_trigger_in_list_order_wins() {
        // "feliz" appears first in the text, but "frustrado" comes first in the table
        let table = EmpathyTable::CORPORATE;
        assert_eq!(table.reply("feliz pero frustrado", SentimentLabel::Positive), PAUSE[0]);
    }

    #[test]
    fn test_label_used_without_keyword() {
        let table = EmpathyTable::CORPORATE;
        assert_eq!(table.reply("qué día", SentimentLabel::Positive), CHEER[0]);
        assert_eq!(table.reply("qué día", SentimentLabel::Negative), PAUSE[0]);
        assert_eq!(table.reply("qué día", SentimentLabel::Neutral), NOT_KNOWING[0]);
    }

    #[test]
    fn test_companion_buckets() {
        let table = EmpathyTable::COMPANION;
        for _ in 0..20 {
            assert!(NEGATIVE.contains(&table.reply("estoy triste", SentimentLabel::Positive)));
            assert!(POSITIVE.contains(&table.reply("re contento hoy", SentimentLabel::Negative)));
            assert!(NEUTRAL.contains(&table.reply("todo ok", SentimentLabel::Positive)));
        }
    }

    #[test]
    fn test_companion_substring_semantics() {
        // plain substring match: "mal" also hits inside "animal" and "normal"
        let table = EmpathyTable::COMPANION;
        assert_eq!(table.keyword_bucket("mi animal favorito"), Some(NEGATIVE));
        assert_eq!(table.keyword_bucket("un día normal"), Some(NEGATIVE));
        assert_eq!(table.keyword_bucket("sin palabras clave"), None);
    }
}
