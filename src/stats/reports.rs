//! Canned reports over repository metadata
//!
//! Every report is an ordinary query run through a fresh `QueryBuilder`.

use std::fmt;

use clap::ValueEnum;

use crate::planner::{Aggregation, Aggregations, Condition};
use crate::query::{QueryBuilder, QueryResult};
use crate::record::Record;
use crate::schema::ValidatorConfig;

/// Report names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Report {
    /// The single most starred repository
    MostStarred,
    /// Repositories without a language
    NoLanguage,
    /// Most forked repositories
    TopForked,
    /// Most watched repositories
    TopWatched,
    /// Average stars and repository count per language
    StarsByLanguage,
}

impl Report {
    pub fn as_str(&self) -> &'static str {
        match self {
            Report::MostStarred => "most-starred",
            Report::NoLanguage => "no-language",
            Report::TopForked => "top-forked",
            Report::TopWatched => "top-watched",
            Report::StarsByLanguage => "stars-by-language",
        }
    }

    /// Runs the report; `top_n` bounds the top-forked and top-watched lists
    pub fn run(&self, stats: &RepositoryStats<'_>, top_n: usize) -> QueryResult<Vec<Record>> {
        match self {
            Report::MostStarred => stats.most_starred(),
            Report::NoLanguage => stats.without_language(),
            Report::TopForked => stats.top_forked(top_n),
            Report::TopWatched => stats.top_watched(top_n),
            Report::StarsByLanguage => stats.stars_by_language(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reports over one loaded dataset
pub struct RepositoryStats<'a> {
    records: &'a [Record],
    config: ValidatorConfig,
}

impl<'a> RepositoryStats<'a> {
    pub fn new(records: &'a [Record]) -> Self {
        Self::with_config(records, ValidatorConfig::default())
    }

    pub fn with_config(records: &'a [Record], config: ValidatorConfig) -> Self {
        Self { records, config }
    }

    fn builder(&self) -> QueryBuilder {
        QueryBuilder::with_config(self.records.to_vec(), self.config)
    }

    /// Median repository size; `None` when no size is known
    pub fn median_size(&self) -> QueryResult<Option<f64>> {
        let mut builder = self.builder();
        builder
            .filter_condition(Condition::not_null("Size"))?
            .select(&["Size"])?;

        let mut sizes: Vec<f64> = builder
            .execute()?
            .iter()
            .filter_map(|r| r.get("Size").and_then(|v| v.as_f64()))
            .collect();
        if sizes.is_empty() {
            return Ok(None);
        }

        sizes.sort_by(f64::total_cmp);
        let mid = sizes.len() / 2;
        let median = if sizes.len() % 2 == 0 {
            (sizes[mid - 1] + sizes[mid]) / 2.0
        } else {
            sizes[mid]
        };
        Ok(Some(median))
    }

    pub fn most_starred(&self) -> QueryResult<Vec<Record>> {
        let mut builder = self.builder();
        builder
            .select(&["Name", "Description", "Stars"])?
            .sort("Stars", true)?
            .limit(1);
        Ok(builder.execute()?)
    }

    pub fn without_language(&self) -> QueryResult<Vec<Record>> {
        let mut builder = self.builder();
        builder
            .filter_condition(Condition::is_null("Language"))?
            .select(&["Name", "Description", "URL"])?;
        Ok(builder.execute()?)
    }

    pub fn top_forked(&self, n: usize) -> QueryResult<Vec<Record>> {
        self.top_by("Forks", n)
    }

    pub fn top_watched(&self, n: usize) -> QueryResult<Vec<Record>> {
        self.top_by("Watchers", n)
    }

    fn top_by(&self, field: &str, n: usize) -> QueryResult<Vec<Record>> {
        let mut builder = self.builder();
        builder
            .select(&["Name", "Description", "URL", field])?
            .sort(field, true)?
            .limit(n);
        Ok(builder.execute()?)
    }

    pub fn stars_by_language(&self) -> QueryResult<Vec<Record>> {
        let mut builder = self.builder();
        builder.group_by(
            "Language",
            Aggregations::new()
                .with("Stars", Aggregation::Average)
                .with("Name", Aggregation::Count),
        )?;
        Ok(builder.execute()?)
    }
}
