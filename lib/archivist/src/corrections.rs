//! Literal find/replace dictionary applied as the last content pass of the
//! description pipeline.
//!
//! The on-disk form is a JSON object mapping wrong text to correct text, e.g.
//! `{"Kyay": "Kyau"}`. Pairs are applied in file order.

use std::path::Path;

use regex::{NoExpand, Regex};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{ArchiveError, Result};

#[derive(Debug, Clone)]
struct Correction {
    wrong: String,
    correct: String,
    pattern: Regex,
}

/// Read-only set of spelling corrections, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct Corrections {
    pairs: Vec<Correction>,
}

impl Corrections {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from ordered (wrong, correct) pairs.
    pub fn from_pairs<I, W, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (W, C)>,
        W: Into<String>,
        C: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(wrong, correct)| {
                let wrong = wrong.into();
                if wrong.is_empty() {
                    return Err(ArchiveError::InvalidCorrection {
                        wrong,
                        reason: "empty search text".to_string(),
                    });
                }
                let pattern = Regex::new(&regex::escape(&wrong)).map_err(|e| {
                    ArchiveError::InvalidCorrection {
                        wrong: wrong.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Correction {
                    wrong,
                    correct: correct.into(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pairs })
    }

    /// Parse the JSON object form. `origin` is only used for error messages.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        let malformed = |reason: String| ArchiveError::MalformedCorrections {
            path: origin.to_path_buf(),
            reason,
        };

        let object: Map<String, Value> =
            serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;

        let pairs = object
            .into_iter()
            .map(|(wrong, correct)| match correct {
                Value::String(correct) => Ok((wrong, correct)),
                other => Err(malformed(format!(
                    "value for {wrong:?} must be a string, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_pairs(pairs)
    }

    /// Load from disk. A missing file yields an empty set; anything present
    /// but unparseable is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No corrections file at {}, continuing without corrections",
                    path.display()
                );
                return Ok(Self::empty());
            }
            Err(e) => return Err(e.into()),
        };

        let corrections = Self::from_json(&text, path)?;
        info!(
            "Loaded {} corrections from {}",
            corrections.len(),
            path.display()
        );
        Ok(corrections)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Replace every occurrence of each wrong text, pair by pair.
    pub fn apply(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_string(), |acc, correction| {
                if !correction.pattern.is_match(&acc) {
                    return acc;
                }
                debug!("Correcting {:?} -> {:?}", correction.wrong, correction.correct);
                correction
                    .pattern
                    .replace_all(&acc, NoExpand(&correction.correct))
                    .into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn replaces_every_occurrence() {
        let corrections = Corrections::from_pairs([("Kyay", "Kyau")]).unwrap();
        assert_eq!(
            corrections.apply("Kyay & Albert - \"Kyay Theme\""),
            "Kyau & Albert - \"Kyau Theme\""
        );
    }

    #[test]
    fn search_text_is_literal() {
        let corrections = Corrections::from_pairs([("(Mix.)", "(Mix)"), ("$1", "one")]).unwrap();
        assert_eq!(corrections.apply("a (Mix.) b (MixX)"), "a (Mix) b (MixX)");
        assert_eq!(corrections.apply("cost $1"), "cost one");
    }

    #[test]
    fn replacement_text_is_literal() {
        let corrections = Corrections::from_pairs([("x", "$0$0")]).unwrap();
        assert_eq!(corrections.apply("axb"), "a$0$0b");
    }

    #[test]
    fn pairs_apply_in_listed_order() {
        let corrections = Corrections::from_pairs([("a", "b"), ("b", "c")]).unwrap();
        assert_eq!(corrections.apply("a"), "c");

        let reversed = Corrections::from_pairs([("b", "c"), ("a", "b")]).unwrap();
        assert_eq!(reversed.apply("a"), "b");
    }

    #[test]
    fn json_object_order_is_kept() {
        let path = Path::new("corrections.json");
        let corrections = Corrections::from_json(r#"{"b": "c", "a": "b"}"#, path).unwrap();
        assert_eq!(corrections.apply("a"), "b");
    }

    #[test]
    fn empty_search_text_is_rejected() {
        let err = Corrections::from_pairs([("", "x")]).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidCorrection { .. }));

        let err = Corrections::from_json(r#"{"a": "b", "": "x"}"#, Path::new("c.json")).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidCorrection { ref wrong, .. } if wrong.is_empty()));
    }

    #[test]
    fn non_string_value_is_malformed() {
        let err = Corrections::from_json(r#"{"a": 1}"#, Path::new("c.json")).unwrap_err();
        assert!(matches!(err, ArchiveError::MalformedCorrections { .. }));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let corrections = Corrections::load(&dir.path().join("nope.json")).unwrap();
        assert!(corrections.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = Corrections::load(file.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::MalformedCorrections { .. }));
    }
}
