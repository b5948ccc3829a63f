use std::str::FromStr;

use crate::db::models::{EnrollmentStatus, TrainingCategory};

/// Languages the presentation boundary can label things in. Status and
/// category values stay canonical everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupportedLanguage {
    #[default]
    Portuguese,
    English,
}

impl FromStr for SupportedLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        match tag.split('-').next().unwrap_or(&tag) {
            "pt" => Ok(SupportedLanguage::Portuguese),
            "en" => Ok(SupportedLanguage::English),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

impl SupportedLanguage {
    /// Picks the first supported tag from an Accept-Language header.
    pub fn from_accept_language(header: &str) -> Self {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .find_map(|tag| tag.parse().ok())
            .unwrap_or_default()
    }

    pub fn status_label(self, status: EnrollmentStatus) -> &'static str {
        match (self, status) {
            (SupportedLanguage::Portuguese, EnrollmentStatus::NotStarted) => "Não Iniciado",
            (SupportedLanguage::Portuguese, EnrollmentStatus::InProgress) => "Em Progresso",
            (SupportedLanguage::Portuguese, EnrollmentStatus::Completed) => "Concluído",
            (SupportedLanguage::English, EnrollmentStatus::NotStarted) => "Not Started",
            (SupportedLanguage::English, EnrollmentStatus::InProgress) => "In Progress",
            (SupportedLanguage::English, EnrollmentStatus::Completed) => "Completed",
        }
    }

    pub fn category_label(self, category: TrainingCategory) -> &'static str {
        match (self, category) {
            (SupportedLanguage::Portuguese, TrainingCategory::Leadership) => "Liderança",
            (SupportedLanguage::Portuguese, TrainingCategory::Technical) => "Técnico",
            (SupportedLanguage::Portuguese, TrainingCategory::Compliance) => "Conformidade",
            (SupportedLanguage::Portuguese, TrainingCategory::SoftSkills) => {
                "Habilidades Interpessoais"
            }
            (SupportedLanguage::English, TrainingCategory::Leadership) => "Leadership",
            (SupportedLanguage::English, TrainingCategory::Technical) => "Technical",
            (SupportedLanguage::English, TrainingCategory::Compliance) => "Compliance",
            (SupportedLanguage::English, TrainingCategory::SoftSkills) => "Soft Skills",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_language_picks_the_first_supported_tag() {
        assert_eq!(
            SupportedLanguage::from_accept_language("en-US,en;q=0.9,pt;q=0.8"),
            SupportedLanguage::English
        );
        assert_eq!(
            SupportedLanguage::from_accept_language("pt-BR"),
            SupportedLanguage::Portuguese
        );
        assert_eq!(
            SupportedLanguage::from_accept_language("fr-FR"),
            SupportedLanguage::Portuguese
        );
    }

    #[test]
    fn status_labels_are_localized() {
        assert_eq!(
            SupportedLanguage::Portuguese.status_label(EnrollmentStatus::Completed),
            "Concluído"
        );
        assert_eq!(
            SupportedLanguage::English.status_label(EnrollmentStatus::NotStarted),
            "Not Started"
        );
    }
}
