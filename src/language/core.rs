use crate::error::{KeyorError, Result};
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

static VOCAB_DIR: Dir = include_dir!("src/vocab");

/// Id of the synthetic category holding every word of a language
pub const FULL_CATEGORY: &str = "full";
const FULL_TITLE: &str = "Full Vocabulary";

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    pub title: String,
    /// lowercase word -> translation
    pub words: BTreeMap<String, String>,
}

/// One language worth of words, partitioned into categories
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Vocabulary {
    pub code: String,
    pub name: String,
    /// Voice tag handed to the speech program
    pub voice: String,
    categories: BTreeMap<String, Category>,
}

impl Vocabulary {
    pub fn new(code: &str, name: &str, voice: &str, categories: BTreeMap<String, Category>) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            voice: voice.to_string(),
            categories,
        }
    }

    pub fn from_json(file: &str, contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|source| KeyorError::InvalidVocabulary {
            file: file.to_string(),
            source,
        })
    }

    /// `full` first, then the declared categories in id order
    pub fn category_ids(&self) -> Vec<&str> {
        std::iter::once(FULL_CATEGORY)
            .chain(
                self.categories
                    .keys()
                    .map(String::as_str)
                    .filter(|id| *id != FULL_CATEGORY),
            )
            .collect()
    }

    pub fn has_category(&self, id: &str) -> bool {
        id == FULL_CATEGORY || self.categories.contains_key(id)
    }

    pub fn category_title(&self, id: &str) -> Result<&str> {
        if id == FULL_CATEGORY {
            return Ok(FULL_TITLE);
        }
        self.categories
            .get(id)
            .map(|c| c.title.as_str())
            .ok_or_else(|| self.unknown_category(id))
    }

    /// Words of a category, lowercase and without duplicates
    pub fn words(&self, category: &str) -> Result<Vec<&str>> {
        let words: BTreeSet<&str> = if category == FULL_CATEGORY {
            self.categories
                .values()
                .flat_map(|c| c.words.keys())
                .map(String::as_str)
                .collect()
        } else {
            self.categories
                .get(category)
                .ok_or_else(|| self.unknown_category(category))?
                .words
                .keys()
                .map(String::as_str)
                .collect()
        };
        Ok(words.into_iter().collect())
    }

    /// Translation of `word`, or an empty string when none is known
    pub fn translate(&self, word: &str) -> &str {
        let key = word.to_lowercase();
        self.categories
            .values()
            .find_map(|c| c.words.get(&key))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The category after `current`, wrapping around to `full`
    pub fn next_category(&self, current: &str) -> &str {
        let ids = self.category_ids();
        match ids.iter().position(|id| *id == current) {
            Some(pos) => ids[(pos + 1) % ids.len()],
            None => FULL_CATEGORY,
        }
    }

    fn unknown_category(&self, id: &str) -> KeyorError {
        KeyorError::UnknownCategory {
            language: self.code.clone(),
            category: id.to_string(),
        }
    }
}

/// All languages available to the trainer, ordered by code
#[derive(Clone, Debug)]
pub struct Catalog {
    languages: Vec<Vocabulary>,
}

impl Catalog {
    /// Load the vocabularies compiled into the binary
    pub fn embedded() -> Result<Self> {
        let languages = VOCAB_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|f| {
                let name = f.path().display().to_string();
                match f.contents_utf8() {
                    Some(contents) => Some(Vocabulary::from_json(&name, contents)),
                    None => {
                        log::warn!("skipping non utf-8 vocabulary file {name}");
                        None
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_vocabularies(languages))
    }

    pub fn from_vocabularies(languages: Vec<Vocabulary>) -> Self {
        Self {
            languages: languages
                .into_iter()
                .sorted_by(|a, b| a.code.cmp(&b.code))
                .collect(),
        }
    }

    pub fn codes(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.code.as_str()).collect()
    }

    pub fn languages(&self) -> &[Vocabulary] {
        &self.languages
    }

    pub fn language(&self, code: &str) -> Result<&Vocabulary> {
        self.languages
            .iter()
            .find(|l| l.code == code)
            .ok_or_else(|| KeyorError::UnknownLanguage(code.to_string()))
    }

    /// The language after `current`, wrapping around
    pub fn next_language(&self, current: &str) -> Option<&str> {
        let codes = self.codes();
        if codes.is_empty() {
            return None;
        }
        let next = match codes.iter().position(|c| *c == current) {
            Some(pos) => codes[(pos + 1) % codes.len()],
            None => codes[0],
        };
        Some(next)
    }
}
