pub mod app;
pub mod collaborators;
pub mod config;
pub mod gene_index;
pub mod ontology;
pub mod patient_form;
pub mod query_form;
pub mod wizard;
