//! Keyword cross references
//!
//! Two halves: an annotator that rewrites entry text so known keywords
//! become `[[keyword]]` page references, and a detector that proposes new
//! keywords by scanning the cached corpus for repeated capitalized runs.
//! Detected candidates go to `ner_results.txt` for manual review; the
//! annotator only ever reads the curated `keywords.txt`.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::{Captures, Regex, RegexBuilder};

use crate::models::Document;

/// Rewrites text so that known keywords become `[[keyword]]` references
pub struct KeywordAnnotator {
    keywords: Vec<String>,
    pattern: Option<Regex>,
}

impl KeywordAnnotator {
    /// Build an annotator from a keyword list
    ///
    /// Blank entries are dropped. An empty list yields an annotator that
    /// leaves text untouched.
    pub fn new(keywords: Vec<String>) -> Self {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        let pattern = build_pattern(&keywords);
        Self { keywords, pattern }
    }

    /// Load the keyword list from a file, one keyword per line
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword list {:?}", path))?;
        Ok(Self::new(content.lines().map(str::to_string).collect()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Wrap every keyword occurrence in `[[...]]`, preserving the case of
    /// the matched text
    ///
    /// Matching is case-insensitive and respects word boundaries. Text
    /// without any match comes back unchanged.
    pub fn highlight_keywords(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &Captures| format!("[[{}]]", &caps[1]))
            .into_owned()
    }
}

fn build_pattern(keywords: &[String]) -> Option<Regex> {
    if keywords.is_empty() {
        return None;
    }
    let alternation = keywords
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!(r"\b({alternation})\b"))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Propose keywords by scanning a corpus for repeated capitalized runs
///
/// Candidates containing digits are dropped, a leading `the ` is stripped,
/// and only candidates seen more than once survive. The result is sorted.
pub fn detect_keywords<I, S>(corpus: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in corpus {
        for entity in extract_entities(text.as_ref()) {
            if entity.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            let keyword = strip_article(&entity).to_string();
            *counts.entry(keyword).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(keyword, _)| keyword)
        .collect()
}

/// The searchable text of one document: abstract, then notes, then
/// highlights
pub fn document_corpus(document: &Document) -> Vec<String> {
    let mut corpus = Vec::new();
    if let Some(abstract_text) = &document.abstract_text {
        corpus.push(abstract_text.clone());
    }
    corpus.extend(document.notes.iter().map(|note| note.text.clone()));
    corpus.extend(
        document
            .annotations
            .iter()
            .map(|highlight| highlight.text.clone()),
    );
    corpus
}

/// Write keywords to a file, one per line
pub fn write_keyword_file(
    path: &Path,
    keywords: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let mut content = String::new();
    for keyword in keywords {
        content.push_str(keyword.as_ref());
        content.push('\n');
    }
    fs::write(path, content).with_context(|| format!("Failed to write keyword file {:?}", path))
}

/// Collect runs of consecutive capitalized words
///
/// Surrounding punctuation is stripped from each word before the check,
/// so `Accra,` and `Ghana:` still count as capitalized.
fn extract_entities(text: &str) -> Vec<String> {
    let mut entities = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let cleaned = word.trim_matches(|c: char| !c.is_alphanumeric());
        if cleaned.chars().next().is_some_and(|c| c.is_uppercase()) {
            run.push(cleaned);
        } else if !run.is_empty() {
            entities.push(run.join(" "));
            run.clear();
        }
    }
    if !run.is_empty() {
        entities.push(run.join(" "));
    }

    entities
}

/// Strip a leading `the ` from an entity, case-insensitively
fn strip_article(entity: &str) -> &str {
    match entity.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("the ") && entity.len() > 4 => &entity[4..],
        _ => entity,
    }
}
