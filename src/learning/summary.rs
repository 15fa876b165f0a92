use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Concise,
    Detailed,
}

impl std::fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// Produces the summary stored on a learning item.
pub trait Summarizer {
    fn summarize(&self, text: &str, detail: DetailLevel) -> String;
}

const CONCISE_SUMMARY: &str = "This is a concise AI-generated summary of the content. It focuses on \
the key points and main ideas, providing a quick overview that captures the essence of the \
original material in just a few sentences.";

const DETAILED_SUMMARY: &str = "This is a detailed AI-generated summary of the content. It provides \
a comprehensive overview of the main ideas, supporting points, and significant details. The \
summary maintains the structure of the original content while condensing it to about 1/3 of the \
original length. It includes specific examples, data points, and nuanced arguments that are \
essential to understanding the full context and implications of the material.";

/// Fixed text per detail level, in place of a real model call.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedSummarizer;

impl Summarizer for CannedSummarizer {
    fn summarize(&self, _text: &str, detail: DetailLevel) -> String {
        match detail {
            DetailLevel::Concise => CONCISE_SUMMARY.to_string(),
            DetailLevel::Detailed => DETAILED_SUMMARY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_summaries_differ_by_detail() {
        let concise = CannedSummarizer.summarize("anything", DetailLevel::Concise);
        let detailed = CannedSummarizer.summarize("anything", DetailLevel::Detailed);
        assert!(concise.starts_with("This is a concise"));
        assert!(detailed.len() > concise.len());
    }
}
