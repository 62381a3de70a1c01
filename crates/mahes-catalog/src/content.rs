//! Raw YAML content schema and its conversion into catalog types.
//!
//! Content authors write item rewards as tokens (`fragment_crown_1`,
//! `fragment_sash_4`, `hint`, `lighthouse_key`). Tokens are parsed here,
//! once, into [`ItemEffect`] values; nothing downstream inspects strings.

use serde::Deserialize;

use mahes_types::{
    FragmentKind, ItemEffect, OptionEffect, OptionId, Question, QuestionId, QuestionOption,
    QuestionType, Region, RegionInfo,
};

use crate::error::CatalogError;

/// Item token that grants one hint.
pub const HINT_TOKEN: &str = "hint";

/// Prefix shared by every fragment token.
pub const FRAGMENT_PREFIX: &str = "fragment";

/// Top-level layout of a catalog content file.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCatalog {
    #[serde(default)]
    pub regions: Vec<RegionInfo>,
    pub questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawQuestion {
    id: QuestionId,
    region: Region,
    #[serde(rename = "type")]
    question_type: QuestionType,
    #[serde(default)]
    category: String,
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    title: String,
    #[serde(default)]
    scenario: Option<String>,
    question: String,
    options: Vec<RawOption>,
    #[serde(default)]
    hints: Vec<String>,
    #[serde(default = "default_time_limit")]
    time_limit: u32,
    #[serde(default)]
    required_karma: Option<u8>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    id: OptionId,
    text: String,
    #[serde(default)]
    correct: bool,
    effect: RawEffect,
}

#[derive(Debug, Deserialize)]
struct RawEffect {
    #[serde(default)]
    score: u32,
    #[serde(default)]
    karma: i32,
    #[serde(default)]
    item: Option<String>,
    #[serde(default)]
    feedback: String,
}

const fn default_difficulty() -> u8 {
    1
}

const fn default_time_limit() -> u32 {
    60
}

/// Parse an item reward token.
///
/// Empty tokens award nothing, `hint` awards a hint, tokens starting with
/// `fragment` must name `crown` or `sash`, and anything else becomes a
/// special item.
pub fn parse_item_token(question: &QuestionId, token: &str) -> Result<ItemEffect, CatalogError> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(ItemEffect::None);
    }
    if token == HINT_TOKEN {
        return Ok(ItemEffect::Hint);
    }
    if token.starts_with(FRAGMENT_PREFIX) {
        return if token.contains("crown") {
            Ok(ItemEffect::Fragment(FragmentKind::Crown))
        } else if token.contains("sash") {
            Ok(ItemEffect::Fragment(FragmentKind::Sash))
        } else {
            Err(CatalogError::UnknownItemToken {
                question: question.clone(),
                token: token.to_owned(),
            })
        };
    }
    Ok(ItemEffect::Special(token.to_owned()))
}

impl RawQuestion {
    /// Convert into a catalog [`Question`], parsing every item token.
    pub(crate) fn into_question(self) -> Result<Question, CatalogError> {
        let mut options = Vec::with_capacity(self.options.len());
        for raw in self.options {
            let item = match raw.effect.item.as_deref() {
                Some(token) => parse_item_token(&self.id, token)?,
                None => ItemEffect::None,
            };
            options.push(QuestionOption {
                id: raw.id,
                text: raw.text,
                is_correct: raw.correct,
                effect: OptionEffect {
                    score: raw.effect.score,
                    karma: raw.effect.karma,
                    item,
                    feedback: raw.effect.feedback,
                },
            });
        }

        Ok(Question {
            id: self.id,
            region: self.region,
            question_type: self.question_type,
            category: self.category,
            difficulty: self.difficulty,
            title: self.title,
            scenario: self.scenario,
            prompt: self.question,
            options,
            hints: self.hints,
            time_limit_secs: self.time_limit,
            required_karma: self.required_karma,
            tags: self.tags,
        })
    }
}
