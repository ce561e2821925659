/// LLM-assisted query enhancement and candidate reranking.
///
/// Both steps are strictly best-effort: any client error, malformed reply, or
/// empty selection logs a warning and falls back to the non-LLM behavior (the
/// raw query, or the raw similarity order). The service never fails a request
/// because the LLM did.
use serde::Serialize;
use tracing::warn;

use recommend_common::llm::LlmClient;

use crate::search::Candidate;

/// Maximum recommendations returned per request.
pub const MAX_RESULTS: usize = 10;
/// Minimum recommendations per request when enough candidates exist.
pub const MIN_RESULTS: usize = 5;
/// Candidates fetched from vector search before reranking.
pub const CANDIDATE_LIMIT: usize = 30;
/// Candidates offered to the reranking model.
const RERANK_CANDIDATES: usize = 20;

/// Expand a job query into search keywords and append them to the query.
///
/// Returns `"{query} {keywords}"`, or the unmodified query on any failure.
pub async fn enhance_query(llm: &LlmClient, query: &str) -> String {
    let prompt = format!(
        "Extract key skills, competencies, and assessment requirements from this job query.\n\
         Return a comma-separated list of relevant keywords and phrases for searching assessments.\n\
         \n\
         Query: {query}\n\
         \n\
         Focus on:\n\
         - Technical skills (e.g., Java, Python, SQL)\n\
         - Soft skills (e.g., collaboration, leadership, communication)\n\
         - Cognitive abilities (e.g., problem-solving, analytical thinking)\n\
         - Personality traits (e.g., conscientiousness, teamwork)\n\
         - Job level (e.g., entry-level, mid-level, senior)\n\
         \n\
         Return only the keywords, separated by commas."
    );

    match llm.complete(&prompt).await {
        Ok(keywords) if !keywords.is_empty() => format!("{query} {keywords}"),
        Ok(_) => query.to_string(),
        Err(e) => {
            warn!(error = %e, "query enhancement failed, using raw query");
            query.to_string()
        }
    }
}

#[derive(Serialize)]
struct RerankCandidate<'a> {
    name: &'a str,
    description: &'a str,
    test_type: &'a str,
}

/// Rerank candidates with the LLM, balancing test types.
///
/// The model sees the query plus the top candidates and returns a JSON array
/// of assessment names in relevance order. Falls back to the similarity order
/// (truncated to `MAX_RESULTS`) on any failure.
pub async fn rerank(llm: &LlmClient, query: &str, candidates: &[Candidate]) -> Vec<Candidate> {
    let shortlist: Vec<RerankCandidate<'_>> = candidates
        .iter()
        .take(RERANK_CANDIDATES)
        .map(|c| RerankCandidate {
            name: &c.name,
            description: &c.description,
            test_type: c.test_type.label(),
        })
        .collect();

    let shortlist_json = match serde_json::to_string_pretty(&shortlist) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "failed to serialize rerank candidates, keeping similarity order");
            return similarity_order(candidates);
        }
    };

    let prompt = format!(
        "You are an expert HR assessment recommender. Given a job query and a list of assessment \
         candidates, you need to select the most relevant assessments and provide a balanced mix.\n\
         \n\
         Query: {query}\n\
         \n\
         Candidates:\n{shortlist_json}\n\
         \n\
         Instructions:\n\
         1. Select 5-10 most relevant assessments\n\
         2. Balance between different test types (Knowledge & Skills, Personality & Behavior, etc.)\n\
         3. Prioritize assessments that directly match the job requirements\n\
         4. Return ONLY a JSON array of assessment names in order of relevance\n\
         \n\
         Example format: [\"Assessment 1\", \"Assessment 2\", ...]"
    );

    let reply = match llm.complete(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "llm reranking failed, keeping similarity order");
            return similarity_order(candidates);
        }
    };

    let names: Vec<String> = match serde_json::from_str(strip_code_fences(&reply)) {
        Ok(names) => names,
        Err(e) => {
            warn!(error = %e, "rerank reply was not a JSON name array, keeping similarity order");
            return similarity_order(candidates);
        }
    };

    let reranked = reorder_by_names(candidates, &names);
    if reranked.is_empty() {
        warn!("rerank selected no known assessments, keeping similarity order");
        return similarity_order(candidates);
    }
    reranked
}

fn similarity_order(candidates: &[Candidate]) -> Vec<Candidate> {
    candidates.iter().take(MAX_RESULTS).cloned().collect()
}

/// Strip a surrounding markdown code fence (``` or ```json) if present.
fn strip_code_fences(reply: &str) -> &str {
    let reply = reply.trim();
    let Some(rest) = reply.strip_prefix("```") else {
        return reply;
    };
    // Drop the language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Reorder candidates to follow the LLM's name selection.
///
/// Takes the first `MAX_RESULTS` selected names, skipping names that match no
/// candidate; each candidate appears at most once.
fn reorder_by_names(candidates: &[Candidate], names: &[String]) -> Vec<Candidate> {
    let mut reranked: Vec<Candidate> = Vec::new();
    for name in names.iter().take(MAX_RESULTS) {
        if reranked.iter().any(|c| &c.name == name) {
            continue;
        }
        if let Some(candidate) = candidates.iter().find(|c| &c.name == name) {
            reranked.push(candidate.clone());
        }
    }
    reranked
}

/// Apply the 5–10 result contract.
///
/// Takes the first `MAX_RESULTS` of the reranked list; if fewer than
/// `MIN_RESULTS` survived and the raw candidate pool can cover the minimum,
/// falls back to the top candidates by similarity.
pub fn finalize(mut reranked: Vec<Candidate>, candidates: &[Candidate]) -> Vec<Candidate> {
    reranked.truncate(MAX_RESULTS);
    if reranked.len() < MIN_RESULTS && candidates.len() >= MIN_RESULTS {
        return candidates[..MIN_RESULTS].to_vec();
    }
    reranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use recommend_common::model::TestType;

    fn candidate(name: &str) -> Candidate {
        Candidate {
            id: format!("assessment_{name}"),
            name: name.to_string(),
            url: format!("https://example.com/{name}"),
            description: String::new(),
            test_type: TestType::Other,
            score: 0.5,
        }
    }

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names.iter().map(|n| candidate(n)).collect()
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fences("[\"a\"]"), "[\"a\"]");
        assert_eq!(strip_code_fences("```json\n[\"a\"]\n```"), "[\"a\"]");
        assert_eq!(strip_code_fences("```\n[\"a\"]\n```"), "[\"a\"]");
        assert_eq!(strip_code_fences("  ```json\n[\"a\", \"b\"]\n```  "), "[\"a\", \"b\"]");
    }

    #[test]
    fn reorder_follows_selection_and_skips_unknowns() {
        let pool = candidates(&["a", "b", "c"]);
        let names = vec!["c".to_string(), "ghost".to_string(), "a".to_string()];
        let out = reorder_by_names(&pool, &names);
        let out_names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(out_names, ["c", "a"]);
    }

    #[test]
    fn reorder_dedupes_repeated_names() {
        let pool = candidates(&["a", "b"]);
        let names = vec!["a".to_string(), "a".to_string(), "b".to_string()];
        let out = reorder_by_names(&pool, &names);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn reorder_caps_at_max_results() {
        let all: Vec<String> = (0..15).map(|i| format!("c{i}")).collect();
        let pool: Vec<Candidate> = all.iter().map(|n| candidate(n)).collect();
        let out = reorder_by_names(&pool, &all);
        assert_eq!(out.len(), MAX_RESULTS);
    }

    #[test]
    fn finalize_truncates_to_max() {
        let pool: Vec<Candidate> = (0..20).map(|i| candidate(&format!("c{i}"))).collect();
        let out = finalize(pool.clone(), &pool);
        assert_eq!(out.len(), MAX_RESULTS);
    }

    #[test]
    fn finalize_falls_back_to_top_candidates_when_too_few_survive() {
        let pool: Vec<Candidate> = (0..8).map(|i| candidate(&format!("c{i}"))).collect();
        let survivors = candidates(&["c7", "c3"]);
        let out = finalize(survivors, &pool);
        let out_names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(out_names, ["c0", "c1", "c2", "c3", "c4"]);
    }

    #[test]
    fn finalize_keeps_short_lists_when_pool_is_small() {
        let pool = candidates(&["a", "b", "c"]);
        let survivors = candidates(&["b", "a"]);
        let out = finalize(survivors, &pool);
        let out_names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(out_names, ["b", "a"]);
    }
}
