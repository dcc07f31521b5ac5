//! Analysis Pipeline Integration Tests
//!
//! Drives `AnalysisOrchestrator` with mock providers: well-formed output,
//! malformed output, transport failure, partial output, and a single provider
//! backing every capability.

use std::sync::Arc;

use policy_guardian::models::settings::AnalysisConfig;
use policy_guardian::services::analysis::AnalysisOrchestrator;
use policy_guardian::services::generative::{AiCapabilities, GenerativeAdapter};
use policy_guardian::services::heuristics::RISK_MATRIX;
use policy_guardian::utils::text::{trim_to_word_limit, word_count};
use policy_guardian_core::{Analysis, Evidence, PageType};

use crate::support::{language_model_only, Behavior, MockProvider, RoutingProvider, PRIVACY_BODY};

fn orchestrator_with(provider: Arc<MockProvider>) -> AnalysisOrchestrator {
    AnalysisOrchestrator::new(
        GenerativeAdapter::new(language_model_only(provider)),
        AnalysisConfig::default(),
    )
}

fn level(analysis: &Analysis, category: &str) -> u8 {
    analysis
        .risk_heatmap
        .iter()
        .find(|e| e.category == category)
        .map(|e| e.risk_level)
        .unwrap_or_else(|| panic!("missing category {}", category))
}

fn assert_well_formed(analysis: &Analysis) {
    assert!(!analysis.summary.trim().is_empty());
    assert!(word_count(&analysis.summary) <= 300);
    assert!(analysis.suspicious_clauses.len() <= 8);
    for clause in &analysis.suspicious_clauses {
        assert!((1..=5).contains(&clause.risk_score));
        assert!(clause.excerpt.chars().count() <= 400);
    }
    for entry in &analysis.risk_heatmap {
        assert!((1..=5).contains(&entry.risk_level));
    }
}

#[tokio::test]
async fn test_fallback_on_privacy_example() {
    let analysis = AnalysisOrchestrator::default()
        .run_policy_analysis(PRIVACY_BODY, Some(PageType::PrivacyPolicy))
        .await;

    assert_well_formed(&analysis);
    assert_eq!(analysis.risk_heatmap.len(), RISK_MATRIX.len());
    assert!(level(&analysis, "Data Sharing & Selling") >= 3);
    assert!(level(&analysis, "Tracking & Analytics") >= 2);
    assert!(analysis
        .suspicious_clauses
        .iter()
        .any(|c| c.reason == "Shares data with third parties"));
}

#[tokio::test]
async fn test_fallback_without_flag_keywords() {
    let text = "Welcome to our site.\n\nWe hope you enjoy your visit.";
    let analysis = AnalysisOrchestrator::default()
        .run_policy_analysis(text, None)
        .await;

    assert!(analysis.suspicious_clauses.is_empty());
    for (entry, category) in analysis.risk_heatmap.iter().zip(RISK_MATRIX.iter()) {
        assert_eq!(entry.category, category.category);
        assert_eq!(entry.risk_level, category.baseline);
    }
    assert!(analysis.summary.contains("No suspicious clauses were flagged."));
}

#[tokio::test]
async fn test_generative_output_is_normalized() {
    let reply = r#"Sure, here is the analysis:
```json
{
  "summary": "ignored",
  "suspiciousClauses": [
    {"excerpt": "We sell your browsing history to data brokers.", "reason": "Sale of data", "riskScore": "4"},
    {"excerpt": "You waive any right to a jury trial.", "reason": "Jury waiver", "riskScore": 11}
  ],
  "riskHeatmap": [
    {"category": "Data Sharing & Selling", "riskLevel": 9, "evidence": "Sells browsing history"},
    {"category": "data sharing & selling", "riskLevel": 2, "evidence": "duplicate"},
    {"category": "Dispute Resolution", "riskLevel": 3, "evidence": ["waive", "jury"]}
  ]
}
```"#;
    let provider = MockProvider::replying(reply);
    let analysis = orchestrator_with(provider.clone())
        .run_policy_analysis(PRIVACY_BODY, Some(PageType::PrivacyPolicy))
        .await;

    assert_eq!(provider.calls(), 1);
    assert_well_formed(&analysis);

    assert_eq!(analysis.risk_heatmap.len(), 2);
    assert_eq!(level(&analysis, "Data Sharing & Selling"), 5);
    assert_eq!(
        analysis.risk_heatmap[1].evidence,
        Evidence::Keywords(vec!["waive".to_string(), "jury".to_string()])
    );

    assert_eq!(analysis.suspicious_clauses.len(), 2);
    assert_eq!(analysis.suspicious_clauses[0].risk_score, 4);
    assert_eq!(analysis.suspicious_clauses[1].risk_score, 5);
    assert_ne!(analysis.summary, "ignored");
}

#[tokio::test]
async fn test_malformed_output_falls_back() {
    let provider = MockProvider::replying("I'm sorry, I can't produce JSON today.");
    let analysis = orchestrator_with(provider.clone())
        .run_policy_analysis(PRIVACY_BODY, Some(PageType::PrivacyPolicy))
        .await;
    let baseline = AnalysisOrchestrator::default()
        .run_policy_analysis(PRIVACY_BODY, Some(PageType::PrivacyPolicy))
        .await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(analysis, baseline);
}

#[tokio::test]
async fn test_provider_failure_falls_back() {
    let provider = MockProvider::new(Behavior::Fail);
    let analysis = orchestrator_with(provider)
        .run_policy_analysis(PRIVACY_BODY, None)
        .await;
    let baseline = AnalysisOrchestrator::default()
        .run_policy_analysis(PRIVACY_BODY, None)
        .await;
    assert_eq!(analysis, baseline);
}

#[tokio::test]
async fn test_partial_output_fills_missing_heatmap() {
    let reply = r#"{"suspiciousClauses": [{"excerpt": "We keep your data forever.", "reason": "Retention", "riskScore": 3}]}"#;
    let analysis = orchestrator_with(MockProvider::replying(reply))
        .run_policy_analysis(PRIVACY_BODY, None)
        .await;

    assert_eq!(analysis.suspicious_clauses.len(), 1);
    assert_eq!(analysis.suspicious_clauses[0].reason, "Retention");
    assert_eq!(analysis.risk_heatmap.len(), RISK_MATRIX.len());
}

#[tokio::test]
async fn test_large_input_stays_bounded() {
    let paragraph = "We may sell your data to any third party and you waive all claims. ";
    let text = vec![paragraph.repeat(20); 60].join("\n\n");
    let analysis = AnalysisOrchestrator::default()
        .run_policy_analysis(&text, Some(PageType::TermsOfService))
        .await;

    assert_well_formed(&analysis);
    assert_eq!(analysis.suspicious_clauses.len(), 8);
}

#[tokio::test]
async fn test_full_provider_enriches_and_summarizes() {
    let analysis_reply = r#"{
  "suspiciousClauses": [
    {"excerpt": "We sell your browsing history to data brokers.", "reason": "Sale of data", "riskScore": 4},
    {"excerpt": "You waive any right to a jury trial.", "reason": "Jury waiver", "riskScore": 3}
  ],
  "riskHeatmap": [
    {"category": "Data Sharing & Selling", "riskLevel": 4, "evidence": "Sells browsing history"}
  ]
}"#;
    let summary_reply = (0..400)
        .map(|i| format!("finding{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let provider = RoutingProvider::new(analysis_reply, &summary_reply, "jury trial");
    let orchestrator = AnalysisOrchestrator::new(
        GenerativeAdapter::new(AiCapabilities::from_provider(provider.clone())),
        AnalysisConfig::default(),
    );

    let analysis = orchestrator
        .run_policy_analysis(PRIVACY_BODY, Some(PageType::PrivacyPolicy))
        .await;
    assert_well_formed(&analysis);

    // Each clause was sent to the rewriter once; the second one failed
    assert_eq!(provider.rewrite_calls(), 2);
    let sold = &analysis.suspicious_clauses[0];
    assert_eq!(
        sold.plain_language.as_deref(),
        Some("In plain words: We sell your browsing history to data brokers.")
    );
    let jury = &analysis.suspicious_clauses[1];
    assert_eq!(jury.excerpt, "You waive any right to a jury trial.");
    assert_eq!(jury.reason, "Jury waiver");
    assert_eq!(jury.risk_score, 3);
    assert!(jury.plain_language.is_none());

    // Over-long paragraph, over-long key points, then a word trim
    assert_eq!(provider.summary_calls(), 2);
    assert_eq!(analysis.summary, trim_to_word_limit(&summary_reply, 300));
    assert_eq!(word_count(&analysis.summary), 300);
    assert!(!analysis.summary.starts_with("Policy Guardian review"));
}
