//! The immutable question catalog and its read-only queries.
//!
//! A [`Catalog`] is validated once when it is built and never mutated
//! afterwards, so it can be shared across threads behind an `Arc` without
//! synchronization.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use mahes_types::{KARMA_MAX, OptionId, Question, QuestionId, QuestionOption, Region, RegionInfo};

use crate::content::RawCatalog;
use crate::error::CatalogError;

/// The reference content set bundled with the game.
const REFERENCE_CONTENT: &str = include_str!("../content/catalog.yaml");

/// Read-only table of every question in the game.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Questions in declaration order.
    questions: Vec<Question>,
    /// Position of each question in `questions`.
    index: BTreeMap<QuestionId, usize>,
    /// Map display metadata.
    regions: BTreeMap<Region, RegionInfo>,
}

impl Catalog {
    /// Load the reference content set bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the bundled content fails validation.
    pub fn reference() -> Result<Self, CatalogError> {
        Self::parse(REFERENCE_CONTENT)
    }

    /// Load a catalog from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, or any
    /// parse or validation error from [`Catalog::parse`].
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a catalog from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] for malformed YAML (including negative
    /// scores), or a validation error for duplicate ids, empty option lists,
    /// empty regions, or unknown fragment tokens.
    pub fn parse(yaml: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_yml::from_str(yaml)?;
        let questions = raw
            .questions
            .into_iter()
            .map(crate::content::RawQuestion::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_parts(questions, raw.regions)
    }

    /// Build a catalog from already-typed questions and region metadata.
    ///
    /// # Errors
    ///
    /// Returns a validation [`CatalogError`] if the content is inconsistent.
    pub fn from_parts(
        questions: Vec<Question>,
        region_info: Vec<RegionInfo>,
    ) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (position, question) in questions.iter().enumerate() {
            validate_question(question)?;
            if index.insert(question.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
        }

        for region in Region::ALL {
            if !questions.iter().any(|q| q.region == region) {
                return Err(CatalogError::EmptyRegion(region));
            }
        }

        let mut regions: BTreeMap<Region, RegionInfo> = region_info
            .into_iter()
            .map(|info| (info.region, info))
            .collect();
        for region in Region::ALL {
            regions.entry(region).or_insert_with(|| RegionInfo {
                region,
                title: region.slug().to_owned(),
                description: String::new(),
            });
        }

        tracing::debug!(question_count = questions.len(), "Catalog loaded");

        Ok(Self {
            questions,
            index,
            regions,
        })
    }

    /// Look up a question by id.
    ///
    /// A miss means the caller and the catalog disagree about content, so it
    /// is logged as an error before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::QuestionNotFound`] if no question has this id.
    pub fn question(&self, id: &QuestionId) -> Result<&Question, CatalogError> {
        let found = self
            .index
            .get(id)
            .and_then(|position| self.questions.get(*position));
        found.ok_or_else(|| {
            tracing::error!(question_id = %id, "Question not found in catalog");
            CatalogError::QuestionNotFound(id.clone())
        })
    }

    /// Look up a question and one of its options.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::QuestionNotFound`] or
    /// [`CatalogError::OptionNotFound`].
    pub fn option(
        &self,
        question_id: &QuestionId,
        option_id: &OptionId,
    ) -> Result<(&Question, &QuestionOption), CatalogError> {
        let question = self.question(question_id)?;
        let option = question.option(option_id).ok_or_else(|| {
            tracing::error!(
                question_id = %question_id,
                option_id = %option_id,
                "Option not found in catalog question"
            );
            CatalogError::OptionNotFound {
                question: question_id.clone(),
                option: option_id.clone(),
            }
        })?;
        Ok((question, option))
    }

    /// Every question of a region, in declaration order.
    pub fn questions_in_region(&self, region: Region) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.region == region)
    }

    /// Number of questions in a region.
    pub fn region_question_count(&self, region: Region) -> usize {
        self.questions_in_region(region).count()
    }

    /// Every question, in declaration order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Total number of questions.
    pub const fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the catalog holds no questions. Never true for a validated catalog.
    pub const fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Display metadata for a region.
    pub fn region_info(&self, region: Region) -> Option<&RegionInfo> {
        self.regions.get(&region)
    }
}

/// Check the per-question invariants.
fn validate_question(question: &Question) -> Result<(), CatalogError> {
    if question.options.is_empty() {
        return Err(CatalogError::EmptyOptions(question.id.clone()));
    }

    if let Some(required) = question.required_karma {
        if required > KARMA_MAX {
            return Err(CatalogError::KarmaGateOutOfRange {
                question: question.id.clone(),
                required,
            });
        }
    }

    let mut seen = BTreeSet::new();
    for option in &question.options {
        if !seen.insert(&option.id) {
            return Err(CatalogError::DuplicateOption {
                question: question.id.clone(),
                option: option.id.clone(),
            });
        }
    }
    Ok(())
}
