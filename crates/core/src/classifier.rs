//! Query-to-domain classification with a deterministic keyword fallback.

use catalog::Domain;
use providers::ProviderRegistry;
use std::collections::BTreeSet;
use std::str::FromStr;

/// The set of domains judged relevant to one query. Ephemeral,
/// request-scoped. Empty means "no balance constraint".
pub type QueryIntent = BTreeSet<Domain>;

/// Queries longer than this are truncated before prompting; the
/// classifier never rejects long input.
const MAX_PROMPT_QUERY_CHARS: usize = 2000;

/// Maps a query to its relevant domains. The LLM path is advisory: any
/// provider error or unusable reply degrades to the keyword fallback,
/// never to an error.
pub async fn classify(
    query: &str,
    registry: &ProviderRegistry,
    provider: Option<&str>,
) -> QueryIntent {
    if let Ok(llm) = registry.llm(provider) {
        let prompt = build_prompt(query);
        match llm.complete(&prompt).await {
            Ok(reply) => {
                if let Some(intent) = parse_domains(&reply) {
                    tracing::debug!(?intent, "llm classified query");
                    return intent;
                }
                tracing::warn!(reply = %reply, "llm reply unusable, falling back to keywords");
            }
            Err(e) => {
                tracing::warn!(error = %e, "llm classification failed, falling back to keywords");
            }
        }
    } else {
        tracing::debug!("no llm provider configured, using keyword fallback");
    }
    fallback_domains(query)
}

fn build_prompt(query: &str) -> String {
    let query: String = query.chars().take(MAX_PROMPT_QUERY_CHARS).collect();
    format!(
        "You are an expert recruitment assistant. Analyze the following job query \
         and identify the distinct skill domains required.\n\
         \n\
         The available assessment categories are:\n\
         - A: Ability & Aptitude\n\
         - B: Biodata & Situational Judgement\n\
         - C: Competencies\n\
         - D: Development & 360\n\
         - E: Assessment Exercises\n\
         - K: Knowledge & Skills (specific technical skills like 'Java', 'Python', 'SQL')\n\
         - P: Personality & Behavior (soft skills like 'collaboration', 'leadership', 'teamwork')\n\
         - S: Simulations\n\
         \n\
         Query: \"{query}\"\n\
         \n\
         Respond ONLY with a JSON list of the relevant category letters. \
         For example, for \"a Java developer who is a good team player\" \
         respond: [\"K\", \"P\"]"
    )
}

/// Parses an LLM reply into a domain set. Returns `None` when nothing
/// usable could be extracted, which sends the caller to the fallback.
fn parse_domains(reply: &str) -> Option<QueryIntent> {
    // Models wrap JSON in code fences more often than not.
    let cleaned = reply.replace('`', "").replace("json", "");
    let tags: Vec<String> = serde_json::from_str(cleaned.trim()).ok()?;
    let intent: QueryIntent = tags
        .iter()
        .filter_map(|t| match Domain::from_str(t) {
            Ok(d) => Some(d),
            Err(_) => {
                tracing::warn!(tag = %t, "ignoring unknown domain tag from llm");
                None
            }
        })
        .collect();
    if intent.is_empty() {
        None
    } else {
        Some(intent)
    }
}

/// Deterministic keyword heuristic. Pure and synchronous; unions every
/// domain whose indicator list matches the lowercased query.
pub fn fallback_domains(query: &str) -> QueryIntent {
    const KNOWLEDGE: &[&str] = &[
        "java",
        "python",
        "sql",
        "javascript",
        "c++",
        "c#",
        "developer",
        "engineer",
        "programming",
        "coding",
        "technical",
        "cloud",
        "devops",
        "database",
        "frontend",
        "backend",
        "qa",
    ];
    const PERSONALITY: &[&str] = &[
        "team",
        "collaborat",
        "leadership",
        "communicat",
        "interpersonal",
        "personality",
        "culture",
        "motivat",
        "stakeholder",
        "soft skill",
    ];
    const ABILITY: &[&str] = &[
        "aptitude",
        "reasoning",
        "numerical",
        "verbal",
        "cognitive",
        "problem solving",
        "problem-solving",
    ];
    const COMPETENCIES: &[&str] = &["competenc", "manager", "management", "supervis"];
    const SIMULATIONS: &[&str] = &["simulation", "hands-on exercise"];

    let lower = query.to_lowercase();
    let mut intent = QueryIntent::new();
    let groups: [(&[&str], Domain); 5] = [
        (KNOWLEDGE, Domain::Knowledge),
        (PERSONALITY, Domain::Personality),
        (ABILITY, Domain::Ability),
        (COMPETENCIES, Domain::Competencies),
        (SIMULATIONS, Domain::Simulations),
    ];
    for (keywords, domain) in groups {
        if keywords.iter().any(|k| lower.contains(k)) {
            intent.insert(domain);
        }
    }
    intent
}
