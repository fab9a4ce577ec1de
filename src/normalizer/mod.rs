//! Post-hoc cleanup of generated text.
//!
//! [`TextNormalizer`] runs an ordered list of [`Rule`]s over the raw model
//! output. The list comes from configuration, so a deployment can drop or
//! reorder passes without code changes. The default order matters: tags go
//! first so markers hidden inside markup are visible to later passes, and
//! whitespace is collapsed before the truncation check looks at the last
//! character.

pub mod rules;

use crate::{Error, Result, config::CleanupConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    StripTags,
    StripStepMarkers,
    StripLanguageTags,
    StripMetaCommentary,
    StripPromptEcho,
    CollapseWhitespace,
    FixTruncation,
}

impl Rule {
    /// Every rule, in the default order.
    pub const ALL: [Rule; 7] = [
        Rule::StripTags,
        Rule::StripStepMarkers,
        Rule::StripLanguageTags,
        Rule::StripMetaCommentary,
        Rule::StripPromptEcho,
        Rule::CollapseWhitespace,
        Rule::FixTruncation,
    ];
}

#[derive(Debug, Clone)]
pub struct TextNormalizer {
    rules: Vec<Rule>,
    echo_prefix_words: usize,
    meta_commentary: Option<Regex>,
}

impl TextNormalizer {
    pub fn new(config: &CleanupConfig) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &config.rules {
            if !seen.insert(rule) {
                return Err(Error::config(format!(
                    "Cleanup rule listed more than once: {:?}",
                    rule
                )));
            }
        }

        let meta_commentary = rules::meta_commentary_pattern(&config.meta_phrases)?;

        debug!("Text normalizer configured with rules: {:?}", config.rules);

        Ok(Self {
            rules: config.rules.clone(),
            echo_prefix_words: config.echo_prefix_words,
            meta_commentary,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Cleans `raw` model output. `prompt` is the text the output was
    /// generated from, used to detect an echoed prefix.
    pub fn normalize(&self, raw: &str, prompt: &str) -> String {
        let mut text = raw.to_string();
        for rule in &self.rules {
            text = self.apply(*rule, &text, prompt);
        }
        text.trim().to_string()
    }

    fn apply(&self, rule: Rule, text: &str, prompt: &str) -> String {
        match rule {
            Rule::StripTags => rules::strip_tags(text),
            Rule::StripStepMarkers => rules::strip_step_markers(text),
            Rule::StripLanguageTags => rules::strip_language_tags(text),
            Rule::StripMetaCommentary => match &self.meta_commentary {
                Some(pattern) => rules::strip_meta_commentary(text, pattern),
                None => text.to_string(),
            },
            Rule::StripPromptEcho => {
                rules::strip_prompt_echo(text, prompt, self.echo_prefix_words)
            }
            Rule::CollapseWhitespace => rules::collapse_whitespace(text),
            Rule::FixTruncation => rules::fix_truncation(text),
        }
    }
}
