//! Prompt builders for the generative stages

use crate::types::{CritiqueResult, EvidenceBundle};
use sleuth_core::truncate_chars;

/// Analyst placeholder when the primary model call fails
pub const ANALYSIS_FAILED: &str = "Primary analysis failed.";
/// Reviewer placeholder when the secondary model call fails
pub const REVIEW_FAILED: &str = "Critical review failed.";
/// Answer text when the synthesis call fails
pub const SYNTHESIS_FAILED: &str = "Synthesis failed.";
/// Title given to web hits that arrive without one
pub const UNTITLED_WEB_SOURCE: &str = "Web Source";

fn preview(content: &str, max_chars: usize) -> String {
    format!("{}...", truncate_chars(content, max_chars))
}

pub fn query_expansion_prompt(question: &str) -> String {
    format!(
        r#"Break the user's question down into 3 to 5 search queries that together cover the topic from several angles:
1. Different aspects and perspectives on the subject
2. Recent developments and trends
3. Expert opinion and analysis
4. Statistics, measurements and studies
5. Historical background

User question: {question}

Respond with JSON only, in the form {{"queries": ["first query", "second query", ...]}}"#
    )
}

/// Query line plus a bounded preview of every bundle, in bundle order
pub fn analysis_context(question: &str, bundles: &[EvidenceBundle], preview_chars: usize) -> String {
    let mut context = format!("Original Query: {}\n\n", question);
    for (i, bundle) in bundles.iter().enumerate() {
        context.push_str(&format!(
            "Research Source {} ({}):\n{}\n\n",
            i + 1,
            bundle.source,
            preview(&bundle.content, preview_chars)
        ));
    }
    context
}

pub fn analyst_prompt(context: &str) -> String {
    format!(
        r#"You are a research analyst. Examine the research material below and report what it shows.

{context}

Structure your analysis around:
1. Key findings and insights
2. Quality and reliability of the data
3. Gaps or missing information
4. Contradictions or inconsistencies between sources

Analysis:"#
    )
}

pub fn reviewer_prompt(question: &str, analysis: &str) -> String {
    format!(
        r#"You are a critical reviewer. Assess the analysis below that was written in answer to a research question.

Original Query: {question}

Primary Analysis:
{analysis}

Structure your review around:
1. Accuracy of the analysis
2. Perspectives it misses
3. Possible biases
4. Concrete recommendations for improvement

Critical Review:"#
    )
}

pub fn synthesis_prompt(
    question: &str,
    critique: &CritiqueResult,
    bundles: &[EvidenceBundle],
    preview_chars: usize,
) -> String {
    let raw_sources = bundles
        .iter()
        .map(|bundle| {
            format!(
                "Source: {} - {}",
                bundle.source,
                preview(&bundle.content, preview_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a research synthesis expert. Combine the findings below into one well-structured answer.

Original Query: {question}

Research Results:
{critique}

Additional Research Sources:
{raw_sources}

Write a final answer that:
1. Directly addresses the original query
2. Integrates insights from all sources
3. Highlights the key findings and supporting evidence
4. Acknowledges limitations and uncertainty
5. Ends with clear, actionable conclusions

Final Answer:"#
    )
}
