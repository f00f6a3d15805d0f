mod common;

use catalog::Domain;
use common::{registry, MapEmbedding, StubLlm};
use recommender_core::classifier::{classify, fallback_domains, QueryIntent};

fn intent(domains: &[Domain]) -> QueryIntent {
    domains.iter().copied().collect()
}

#[test]
fn fallback_spots_technical_keywords() {
    assert_eq!(
        fallback_domains("Looking for a Java developer"),
        intent(&[Domain::Knowledge])
    );
    assert_eq!(
        fallback_domains("strong SQL and Python"),
        intent(&[Domain::Knowledge])
    );
}

#[test]
fn fallback_spots_behavioral_keywords() {
    assert_eq!(
        fallback_domains("great collaboration and leadership"),
        intent(&[Domain::Personality])
    );
}

#[test]
fn fallback_unions_matched_domains() {
    assert_eq!(
        fallback_domains("Java developer who is a good team player"),
        intent(&[Domain::Knowledge, Domain::Personality])
    );
    assert_eq!(
        fallback_domains("manager with numerical reasoning and coding skills"),
        intent(&[Domain::Ability, Domain::Competencies, Domain::Knowledge])
    );
}

#[test]
fn fallback_is_case_insensitive() {
    assert_eq!(
        fallback_domains("JAVA DEVELOPER"),
        intent(&[Domain::Knowledge])
    );
}

#[test]
fn fallback_yields_empty_set_without_indicators() {
    assert!(fallback_domains("someone for the open position").is_empty());
}

#[tokio::test]
async fn llm_reply_with_code_fences_parses() {
    let reg = registry(
        MapEmbedding::new(vec![]),
        StubLlm::replies("```json\n[\"K\", \"P\"]\n```"),
    );
    let result = classify("any query at all", &reg, None).await;
    assert_eq!(result, intent(&[Domain::Knowledge, Domain::Personality]));
}

#[tokio::test]
async fn llm_reply_accepts_full_domain_names() {
    let reg = registry(
        MapEmbedding::new(vec![]),
        StubLlm::replies(r#"["Knowledge & Skills", "Simulations"]"#),
    );
    let result = classify("any query at all", &reg, None).await;
    assert_eq!(result, intent(&[Domain::Knowledge, Domain::Simulations]));
}

#[tokio::test]
async fn unknown_tags_are_ignored() {
    let reg = registry(MapEmbedding::new(vec![]), StubLlm::replies(r#"["K", "Z"]"#));
    let result = classify("any query at all", &reg, None).await;
    assert_eq!(result, intent(&[Domain::Knowledge]));
}

#[tokio::test]
async fn unparseable_reply_falls_back_to_keywords() {
    let reg = registry(
        MapEmbedding::new(vec![]),
        StubLlm::replies("I think Knowledge & Skills fits best."),
    );
    let result = classify("senior Java engineer", &reg, None).await;
    assert_eq!(result, intent(&[Domain::Knowledge]));
}

#[tokio::test]
async fn provider_error_falls_back_to_keywords() {
    let reg = registry(MapEmbedding::new(vec![]), StubLlm::failing());
    let result = classify("team leadership coach", &reg, None).await;
    assert_eq!(result, intent(&[Domain::Personality]));
}

#[tokio::test]
async fn very_long_queries_are_classified_without_error() {
    let reg = registry(MapEmbedding::new(vec![]), StubLlm::failing());
    let long_query = format!("{} java", "requirements ".repeat(5_000));
    let result = classify(&long_query, &reg, None).await;
    assert_eq!(result, intent(&[Domain::Knowledge]));
}
