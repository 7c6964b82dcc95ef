//! Words of a fixed length over a bounded letter multiset
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use log::info;
use serde::Serialize;

use graphlab_core::algorithm::{count_arrangements, LetterMultiset};

use crate::config::LabConfig;
use crate::error::LabError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrangementsReport {
    pub letters: Vec<(char, usize)>,
    pub length: usize,
    pub selections: u64,
    pub arrangements: u128,
}

impl fmt::Display for ArrangementsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = self
            .letters
            .iter()
            .map(|(letter, max)| format!("{letter}{max}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(f, "Letters (max uses): {letters}")?;
        writeln!(f, "Letter selections of length {}: {}", self.length, self.selections)?;
        write!(f, "Distinct words of length {}: {}", self.length, self.arrangements)
    }
}

pub fn run(config: &LabConfig) -> Result<ArrangementsReport, LabError> {
    let settings = &config.arrangements;
    let multiset = LetterMultiset::new(settings.letters.clone())?;
    info!(
        "counting words of length {} over {} letters ({} copies)",
        settings.length,
        multiset.letters().len(),
        multiset.total()
    );
    let count = count_arrangements(&multiset, settings.length)?;

    Ok(ArrangementsReport {
        letters: settings.letters.clone(),
        length: count.length,
        selections: count.selections,
        arrangements: count.arrangements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exercise() {
        let report = run(&LabConfig::default()).unwrap();
        assert_eq!(report.arrangements, 363_240);
        assert!(report.to_string().ends_with("Distinct words of length 6: 363240"));
    }

    #[test]
    fn test_duplicate_letter_is_an_error() {
        let mut config = LabConfig::default();
        config.arrangements.letters = vec![('A', 1), ('A', 1)];
        assert!(matches!(run(&config), Err(LabError::Algorithm(_))));
    }
}
