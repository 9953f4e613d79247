//! Core value types shared by both pipelines

use crate::table::{ANTONYMS, DEFINITION, EXAMPLE, SYNONYMS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thesaurus relation queried against Datamuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Synonym,
    Antonym,
}

impl Relation {
    pub const ALL: [Relation; 2] = [Relation::Synonym, Relation::Antonym];

    /// Query parameter name understood by the thesaurus endpoint
    pub fn query_param(self) -> &'static str {
        match self {
            Relation::Synonym => "rel_syn",
            Relation::Antonym => "rel_ant",
        }
    }

    /// Table column receiving this relation's words
    pub fn column(self) -> &'static str {
        match self {
            Relation::Synonym => SYNONYMS,
            Relation::Antonym => ANTONYMS,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_param())
    }
}

/// First usable definition of a word and its example sentence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionPair {
    pub definition: String,
    pub example: String,
}

impl DefinitionPair {
    pub fn new(definition: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            example: example.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.definition.is_empty() && self.example.is_empty()
    }
}

/// Synonym and antonym lists resolved for one row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedWords {
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

impl RelatedWords {
    pub fn get(&self, relation: Relation) -> &[String] {
        match relation {
            Relation::Synonym => &self.synonyms,
            Relation::Antonym => &self.antonyms,
        }
    }

    pub fn set(&mut self, relation: Relation, words: Vec<String>) {
        match relation {
            Relation::Synonym => self.synonyms = words,
            Relation::Antonym => self.antonyms = words,
        }
    }
}

/// A resolved value that knows which table cells it fills
pub trait ColumnValues {
    /// `(column, text)` pairs to merge into a row
    fn column_values(&self) -> Vec<(&'static str, String)>;
}

impl ColumnValues for DefinitionPair {
    fn column_values(&self) -> Vec<(&'static str, String)> {
        vec![
            (DEFINITION, self.definition.clone()),
            (EXAMPLE, self.example.clone()),
        ]
    }
}

impl ColumnValues for RelatedWords {
    fn column_values(&self) -> Vec<(&'static str, String)> {
        Relation::ALL
            .iter()
            .map(|r| (r.column(), self.get(*r).join(", ")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_params() {
        assert_eq!(Relation::Synonym.query_param(), "rel_syn");
        assert_eq!(Relation::Antonym.query_param(), "rel_ant");
        assert_eq!(Relation::Antonym.column(), "antonyms");
    }

    #[test]
    fn test_related_words_join() {
        let related = RelatedWords {
            synonyms: vec!["large".into(), "huge".into()],
            antonyms: vec!["small".into()],
        };
        assert_eq!(
            related.column_values(),
            vec![
                ("synonyms", "large, huge".to_string()),
                ("antonyms", "small".to_string())
            ]
        );
    }

    #[test]
    fn test_definition_pair_empty() {
        assert!(DefinitionPair::default().is_empty());
        assert!(!DefinitionPair::new("feeling joy", "").is_empty());
    }
}
