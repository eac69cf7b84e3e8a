//! Patient and query validation against the genome database. The database
//! exposes a GraphQL root with `genome(genomeId)` and
//! `genomes(genomeIds, variantId)` fields; each validation is a single POST
//! and reports back exactly once per request cycle.

use crate::{patient_form::PatientFormValues, query_form::QueryFormValues};
use reqwest::blocking::Client;
use serde_json::{json, Value};

pub fn patient_lookup_query(values: &PatientFormValues) -> Value {
    json!({
        "query": format!(
            "{{ genome(genomeId: \"{}\") {{ genomeId variants }} }}",
            values.genome_id
        )
    })
}

pub fn genome_search_query(values: &QueryFormValues) -> Value {
    let query = match first_variant_id(&values.variants) {
        Some(id) => format!("{{ genomes(variantId: {id}) {{ genomeId variants }} }}"),
        None => "{ genomes { genomeId variants } }".to_string(),
    };
    json!({ "query": query })
}

fn first_variant_id(variants: &str) -> Option<i64> {
    variants.split_whitespace().next()?.parse().ok()
}

fn post_graphql(client: &Client, url: &str, body: &Value) -> Result<Value, String> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .map_err(|e| format!("genome database request failed at {url}: {e}"))?;
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| format!("could not read genome database response body: {e}"))?;
    if !status.is_success() {
        return Err(format!(
            "genome database query failed at {url} (status={status})"
        ));
    }
    serde_json::from_str(&text)
        .map_err(|e| format!("genome database response is not valid JSON: {e}"))
}

pub fn extract_patient_record(payload: &Value) -> Option<Value> {
    let record = payload.get("data")?.get("genome")?;
    if record.is_null() {
        return None;
    }
    Some(record.clone())
}

pub fn extract_genome_rows(payload: &Value) -> Value {
    payload
        .get("data")
        .and_then(|data| data.get("genomes"))
        .cloned()
        .unwrap_or(Value::Array(vec![]))
}

/// Looks the patient up in the genome database. A missing record, a GraphQL
/// error or a failed request all report as not-found; the caller always gets
/// its one callback.
pub fn validate_patient(
    client: &Client,
    url: &str,
    values: &PatientFormValues,
) -> (Option<Value>, Value) {
    let body = patient_lookup_query(values);
    match post_graphql(client, url, &body) {
        Ok(payload) => match extract_patient_record(&payload) {
            Some(record) => {
                let mapping_data = json!({
                    "name": values.name,
                    "genome_id": values.genome_id,
                });
                (Some(record), mapping_data)
            }
            None => (None, Value::Null),
        },
        Err(e) => {
            eprintln!("{e}");
            (None, Value::Null)
        }
    }
}

/// Runs the submitted query against the genome database and returns the
/// matching rows as the gene data payload.
pub fn validate_query(client: &Client, url: &str, values: &QueryFormValues) -> Result<Value, String> {
    let body = genome_search_query(values);
    let payload = post_graphql(client, url, &body)?;
    Ok(extract_genome_rows(&payload))
}
