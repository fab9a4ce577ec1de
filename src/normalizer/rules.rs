//! Individual cleanup passes. Each one is total over any input.

use once_cell::sync::Lazy;
use regex::Regex;

// ── Markup tags ──────────────────────────────────────────────────────────────

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

pub fn strip_tags(input: &str) -> String {
    RE_TAG.replace_all(input, "").into_owned()
}

// ── Step markers and enumerations ────────────────────────────────────────────

static RE_STEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bstep\s*\d+\s*[:.)\-]\s*").unwrap());

static RE_LIST_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:\d+[.)]|[-*•])[ \t]+").unwrap());

pub fn strip_step_markers(input: &str) -> String {
    let without_steps = RE_STEP.replace_all(input, "");
    RE_LIST_PREFIX.replace_all(&without_steps, "").into_owned()
}

// ── Language annotations ─────────────────────────────────────────────────────

static RE_LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:in\s+)?(?:english|spanish|french|german|italian|portuguese|dutch|russian|chinese|japanese|korean|arabic|hindi)(?:\s+(?:translation|version))?\s*:\s*",
    )
    .unwrap()
});

pub fn strip_language_tags(input: &str) -> String {
    RE_LANGUAGE_TAG.replace_all(input, "").into_owned()
}

// ── Meta-commentary ──────────────────────────────────────────────────────────

// A sentence is a run ending in terminal punctuation or a line break. The
// last alternative picks up a trailing unterminated run, so every character
// of the input belongs to exactly one piece.
static RE_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?\n]*(?:[.!?]+|\n+)|[^.!?\n]+").unwrap());

/// Builds the matcher for sentences opening with one of `phrases`.
/// Returns `None` when there is nothing to match.
pub fn meta_commentary_pattern(phrases: &[String]) -> Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = phrases
        .iter()
        .map(|phrase| {
            phrase
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|alt| !alt.is_empty())
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    let pattern = format!(r"(?i)^\s*(?:{})(?:\W|$)", alternatives.join("|"));
    Regex::new(&pattern).map(Some)
}

pub fn strip_meta_commentary(input: &str, pattern: &Regex) -> String {
    RE_SENTENCE
        .find_iter(input)
        .map(|m| m.as_str())
        .filter(|sentence| !pattern.is_match(sentence))
        .collect()
}

// ── Prompt echo ──────────────────────────────────────────────────────────────

/// Removes the first `max_words` words of `prompt` when the text opens with
/// them. Matching ignores case and the amount of whitespace between words.
pub fn strip_prompt_echo(input: &str, prompt: &str, max_words: usize) -> String {
    let words: Vec<String> = prompt
        .split_whitespace()
        .take(max_words)
        .map(regex::escape)
        .collect();
    if words.is_empty() {
        return input.to_string();
    }

    let pattern = format!(r"(?i)^\s*{}(?:[\s,:;.\-]+|$)", words.join(r"\s+"));
    match Regex::new(&pattern) {
        Ok(echo) => echo.replace(input, "").into_owned(),
        // Only reachable for prompts past the regex size limit.
        Err(_) => input.to_string(),
    }
}

// ── Whitespace ───────────────────────────────────────────────────────────────

static RE_HORIZONTAL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

static RE_SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ([,.!?;:])").unwrap());

static RE_LINE_EDGE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ +| +$").unwrap());

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

pub fn collapse_whitespace(input: &str) -> String {
    let s = input.replace("\r\n", "\n").replace('\r', "\n");
    let s = RE_HORIZONTAL_SPACE.replace_all(&s, " ");
    let s = RE_SPACE_BEFORE_PUNCT.replace_all(&s, "$1");
    let s = RE_LINE_EDGE_SPACE.replace_all(&s, "");
    let s = RE_BLANK_LINES.replace_all(&s, "\n\n");
    s.trim().to_string()
}

// ── Truncation ───────────────────────────────────────────────────────────────

static RE_TERMINATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]["'”’)\]]*$"#).unwrap());

static RE_BARE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+(\p{L})$").unwrap());

static RE_TRAILING_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,;:\-–—]+$").unwrap());

/// Ensures the text ends in terminal punctuation, dropping a dangling
/// single-letter fragment left by a cut-off generation.
pub fn fix_truncation(input: &str) -> String {
    let text = input.trim_end();
    if text.is_empty() || RE_TERMINATED.is_match(text) {
        return text.to_string();
    }

    // Drop a dangling letter unless it is "I" or nothing but separators
    // precede it.
    let text = match RE_BARE_LETTER.captures(text) {
        Some(caps) if &caps[1] != "I" => {
            let head = &text[..text.len() - caps[0].len()];
            if RE_TRAILING_SEPARATORS.replace(head, "").is_empty() {
                text
            } else {
                head
            }
        }
        _ => text,
    };

    let text = RE_TRAILING_SEPARATORS.replace(text, "");
    if text.is_empty() {
        return String::new();
    }
    format!("{text}.")
}
