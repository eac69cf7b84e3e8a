use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// One autocomplete row from the ontology service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSuggestion {
    pub id: String,
    pub label: String,
}

#[derive(Deserialize)]
struct AutocompletePayload {
    docs: Vec<TermSuggestion>,
}

#[derive(Deserialize)]
struct GeneAssociationPayload {
    compact_associations: Vec<CompactAssociation>,
}

#[derive(Deserialize)]
struct CompactAssociation {
    objects: Vec<String>,
}

/// Number of characters stripped from each association object id to obtain
/// a bare gene symbol. Inherited empirical assumption about the curie prefix
/// length; kept as-is rather than parsed on the ':' separator.
const CURIE_PREFIX_LEN: usize = 5;

pub fn autocomplete_url(base: &str, query: &str) -> String {
    format!(
        "{}/search/entity/autocomplete/{}?category=phenotype&prefix=HP&rows=5&start=0&minimal_tokenizer=false",
        base.trim_end_matches('/'),
        query
    )
}

pub fn phenotype_genes_url(base: &str, term_id: &str) -> String {
    format!(
        "{}/bioentity/phenotype/{}/genes?rows=100&facet=false&unselect_evidence=false&exclude_automatic_assertions=false&fetch_objects=false&use_compact_associations=true&direct=false&direct_taxon=false",
        base.trim_end_matches('/'),
        term_id
    )
}

pub fn parse_autocomplete_payload(text: &str) -> Result<Vec<TermSuggestion>, String> {
    let payload: AutocompletePayload = serde_json::from_str(text)
        .map_err(|e| format!("autocomplete response is not valid JSON: {e}"))?;
    Ok(payload.docs)
}

/// Extracts bare gene symbols from a compact-association payload by
/// stripping the first five characters of each object id.
pub fn extract_gene_symbols(text: &str) -> Result<Vec<String>, String> {
    let payload: GeneAssociationPayload = serde_json::from_str(text)
        .map_err(|e| format!("gene association response is not valid JSON: {e}"))?;
    let association = payload
        .compact_associations
        .first()
        .ok_or_else(|| "gene association response has no compact associations".to_string())?;
    Ok(association
        .objects
        .iter()
        .map(|id| id.chars().skip(CURIE_PREFIX_LEN).collect())
        .collect())
}

/// Fetches phenotype term suggestions for a partial query string.
pub fn autocomplete(
    client: &Client,
    base: &str,
    query: &str,
) -> Result<Vec<TermSuggestion>, String> {
    let url = autocomplete_url(base, query);
    let response = client
        .get(&url)
        .send()
        .map_err(|e| format!("autocomplete request failed at {url}: {e}"))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| format!("could not read autocomplete response body: {e}"))?;
    if !status.is_success() {
        return Err(format!("autocomplete failed at {url} (status={status})"));
    }
    parse_autocomplete_payload(&body)
}

/// Fetches the gene symbols associated with a phenotype term.
pub fn phenotype_genes(client: &Client, base: &str, term_id: &str) -> Result<Vec<String>, String> {
    let url = phenotype_genes_url(base, term_id);
    let response = client
        .get(&url)
        .send()
        .map_err(|e| format!("gene association request failed at {url}: {e}"))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| format!("could not read gene association response body: {e}"))?;
    if !status.is_success() {
        return Err(format!(
            "gene association lookup failed at {url} (status={status})"
        ));
    }
    extract_gene_symbols(&body)
}
