use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct SearchPayload {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Deserialize)]
struct HitSource {
    symbol: String,
}

/// Builds the ranked multi-match body sent to the gene search index: a
/// `dis_max` over one fuzzy match on the description field, joined from all
/// gene symbols, sorted by descending relevance, page size = gene count.
pub fn ranked_symbol_query(genes: &[String]) -> Value {
    json!({
        "from": 0,
        "size": genes.len(),
        "query": {
            "dis_max": {
                "queries": [
                    {
                        "match": {
                            "description": {
                                "query": genes.join(" "),
                                "fuzziness": 1,
                                "boost": 4
                            }
                        }
                    }
                ],
                "tie_breaker": 0.4
            }
        },
        "sort": [{ "_score": { "order": "desc" } }]
    })
}

pub fn parse_symbol_hits(text: &str) -> Result<Vec<String>, String> {
    let payload: SearchPayload = serde_json::from_str(text)
        .map_err(|e| format!("search index response is not valid JSON: {e}"))?;
    Ok(payload
        .hits
        .hits
        .into_iter()
        .map(|hit| hit.source.symbol)
        .collect())
}

/// Resolves gene symbols to their ranked index spellings. Symbols come back
/// in relevance order; an empty input resolves to an empty list without a
/// request.
pub fn resolve_symbols(client: &Client, url: &str, genes: &[String]) -> Result<Vec<String>, String> {
    if genes.is_empty() {
        return Ok(vec![]);
    }
    let body = ranked_symbol_query(genes);
    let response = client
        .post(url)
        .json(&body)
        .send()
        .map_err(|e| format!("search index request failed at {url}: {e}"))?;
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| format!("could not read search index response body: {e}"))?;
    if !status.is_success() {
        return Err(format!("search index query failed at {url} (status={status})"));
    }
    parse_symbol_hits(&text)
}
