use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank cannot be empty")]
    Empty,

    #[error("question {index} has an empty prompt")]
    EmptyPrompt { index: usize },

    #[error("question {index} has an empty answer")]
    EmptyAnswer { index: usize },
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Immutable pool of questions that sessions draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank from an ordered list of questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` for an empty list, and
    /// `BankError::EmptyPrompt` / `BankError::EmptyAnswer` for blank entries.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        for (index, question) in questions.iter().enumerate() {
            if question.prompt().trim().is_empty() {
                return Err(BankError::EmptyPrompt { index });
            }
            if question.answer().trim().is_empty() {
                return Err(BankError::EmptyAnswer { index });
            }
        }

        Ok(Self { questions })
    }

    /// The general-knowledge set shipped with the app.
    #[must_use]
    pub fn builtin() -> Self {
        let questions = BUILTIN_QUESTIONS
            .iter()
            .map(|(prompt, answer)| Question::new(*prompt, *answer))
            .collect();
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Shuffles a copy of the bank and keeps the first `count` entries.
    ///
    /// Returns `None` when the bank holds fewer than `count` questions.
    pub fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Option<Vec<Question>> {
        if self.questions.len() < count {
            return None;
        }
        let mut pool = self.questions.clone();
        pool.shuffle(rng);
        pool.truncate(count);
        Some(pool)
    }
}

const BUILTIN_QUESTIONS: &[(&str, &str)] = &[
    ("Türkiye'nin başkenti neresidir?", "Ankara"),
    ("Hangi gezegen Güneş Sistemi'nin en büyüğüdür?", "Jüpiter"),
    ("İnsan vücudundaki en büyük organ hangisidir?", "Deri"),
    ("Hangi element periyodik tabloda 'Fe' sembolü ile gösterilir?", "Demir"),
    ("DNA'nın açılımı nedir?", "Deoksiribo Nükleik Asit"),
    ("Hangi yıl Türkiye Cumhuriyeti kuruldu?", "1923"),
    ("Dünyanın en derin okyanusu hangisidir?", "Pasifik Okyanusu"),
    ("İstanbul'un fethi hangi yılda gerçekleşti?", "1453"),
    ("Hangi gezegen 'Kızıl Gezegen' olarak bilinir?", "Mars"),
    ("Everest Dağı hangi ülkededir?", "Nepal"),
    ("Pi sayısının ilk 3 hanesi nedir?", "3.14"),
    ("İnsan vücudunda kaç kemik vardır?", "206"),
    ("Hangi hayvan en uzun boyunlu memelilerdir?", "Zürafa"),
    ("Dünya'nın en büyük kıtası hangisidir?", "Asya"),
    ("Hangi vitamin güneş ışığından sentezlenir?", "D vitamini"),
];
