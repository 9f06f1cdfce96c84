//! Per-category summary of the observations for one city

use crate::app::models::{ScoreCategory, WeatherRecord};
use crate::constants::SCORE_CATEGORY_COUNT;
use serde::Serialize;

/// Aggregate of one score category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Rounded mean of the present scores
    pub average: Option<u8>,

    /// Number of records with a score in this category
    pub count: usize,

    /// Present comments in record order
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeatherSummary {
    categories: [CategorySummary; SCORE_CATEGORY_COUNT],
}

impl WeatherSummary {
    /// Summarize records, usually every observation of a single city
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a WeatherRecord>) -> Self {
        let mut totals = [0u32; SCORE_CATEGORY_COUNT];
        let mut summary = Self::default();

        for record in records {
            for (category, score) in record.iter_scores() {
                let entry = &mut summary.categories[category.index()];
                if let Some(value) = score.score() {
                    totals[category.index()] += u32::from(value);
                    entry.count += 1;
                }
                if let Some(comment) = score.comment() {
                    entry.comments.push(comment.to_string());
                }
            }
        }

        for (entry, total) in summary.categories.iter_mut().zip(totals) {
            if entry.count > 0 {
                let mean = f64::from(total) / entry.count as f64;
                entry.average = Some(mean.round() as u8);
            }
        }
        summary
    }

    pub fn category(&self, category: ScoreCategory) -> &CategorySummary {
        &self.categories[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreCategory, &CategorySummary)> {
        ScoreCategory::ALL
            .into_iter()
            .map(move |category| (category, &self.categories[category.index()]))
    }

    /// Number of categories with at least one score
    pub fn scored_categories(&self) -> usize {
        self.categories.iter().filter(|c| c.count > 0).count()
    }
}
