//! Filtre de modération appliqué au texte d'un chirp avant sa persistance.

use std::fmt;

use crate::error::AppError;

/// Longueur maximale d'un chirp, en caractères Unicode
pub const MAX_CHIRP_LENGTH: usize = 140;

pub const DENYLIST: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

pub const MASK: &str = "****";

/// Texte validé et expurgé ; seule représentation d'un chirp que l'appelant peut persister
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeratedText(String);

impl ModeratedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ModeratedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModeratedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Rejette un texte trop long puis masque les mots interdits.
///
/// Le découpage se fait sur l'espace simple : un mot suivi d'une ponctuation
/// (`"Sharbert!"`) n'est pas masqué.
pub fn moderate(text: &str) -> Result<ModeratedText, AppError> {
    if text.chars().count() > MAX_CHIRP_LENGTH {
        return Err(AppError::TextTooLong {
            max: MAX_CHIRP_LENGTH,
        });
    }

    let cleaned = text
        .split(' ')
        .map(|word| {
            if DENYLIST.contains(&word.to_lowercase().as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ModeratedText(cleaned))
}
