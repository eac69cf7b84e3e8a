use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};

use crate::{
    collaborators,
    config::EndpointConfig,
    gene_index,
    ontology::{self, TermSuggestion},
    patient_form::{PatientFormState, PatientFormValues},
    query_form::{QueryFormAction, QueryFormState, QueryFormValues},
    wizard::{Wizard, WizardEvent, WizardStage},
};
use anyhow::{Context, Result};
use eframe::egui;
use serde_json::Value;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Stand-in dwell for the one-shot authentication animation; its expiry is
/// the completion event the wizard sees.
const AUTH_DWELL: Duration = Duration::from_millis(1200);

/// Everything the background workers can deliver to the UI thread.
pub enum AppEvent {
    Wizard(WizardEvent),
    Suggestions(Vec<TermSuggestion>),
    ResolvedGenes(Vec<String>),
}

pub struct AirlockApp {
    wizard: Wizard,
    patient_form: PatientFormState,
    query_form: QueryFormState,
    config: EndpointConfig,
    client: reqwest::blocking::Client,
    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
    auth_started: Option<Instant>,
}

impl AirlockApp {
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let (events_tx, events_rx) = mpsc::channel();
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("could not build the HTTP client")?;
        Ok(Self {
            wizard: Wizard::new(),
            patient_form: PatientFormState::new(),
            query_form: QueryFormState::new(),
            config,
            client,
            events_tx,
            events_rx,
            auth_started: None,
        })
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Wizard(event) => self.wizard.apply(event),
            AppEvent::Suggestions(suggestions) => self.query_form.replace_suggestions(suggestions),
            AppEvent::ResolvedGenes(symbols) => self.query_form.apply_resolved_genes(&symbols),
        }
    }

    /// Autocomplete side flow. A failed lookup sends nothing; the previous
    /// suggestions stay up.
    fn spawn_autocomplete(&self, query: String) {
        let client = self.client.clone();
        let base = self.config.ontology_base.clone();
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            if let Ok(suggestions) = ontology::autocomplete(&client, &base, &query) {
                let _ = tx.send(AppEvent::Suggestions(suggestions));
            }
        });
    }

    /// Phenotype→gene resolution side flow: fetch the term's associated
    /// genes, then rank their symbols through the search index. No
    /// cancellation and no request identity; if the user picks another term
    /// before this lands, the last response to arrive wins.
    fn spawn_gene_resolution(&self, term_id: String) {
        let client = self.client.clone();
        let base = self.config.ontology_base.clone();
        let index_url = self.config.search_index_url.clone();
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            let symbols = ontology::phenotype_genes(&client, &base, &term_id)
                .and_then(|genes| gene_index::resolve_symbols(&client, &index_url, &genes));
            if let Ok(symbols) = symbols {
                let _ = tx.send(AppEvent::ResolvedGenes(symbols));
            }
        });
    }

    fn spawn_patient_validation(&self, values: PatientFormValues) {
        let client = self.client.clone();
        let url = self.config.genome_db_url.clone();
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            let (user_data, mapping_data) =
                collaborators::validate_patient(&client, &url, &values);
            let _ = tx.send(AppEvent::Wizard(WizardEvent::PatientValidated {
                user_data,
                mapping_data,
            }));
        });
    }

    fn spawn_query_validation(&self, values: QueryFormValues) {
        let client = self.client.clone();
        let url = self.config.genome_db_url.clone();
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            // The validation reports back exactly once per request cycle; a
            // failed run reports an empty result set.
            let gene_data = match collaborators::validate_query(&client, &url, &values) {
                Ok(rows) => rows,
                Err(e) => {
                    eprintln!("{e}");
                    Value::Array(vec![])
                }
            };
            let _ = tx.send(AppEvent::Wizard(WizardEvent::QueryValidated(gene_data)));
        });
    }

    fn render_authenticate(&mut self, ui: &mut egui::Ui) {
        if ui.button("Authenticate").clicked() {
            self.wizard.apply(WizardEvent::AuthenticateRequested);
            self.auth_started = Some(Instant::now());
        }
    }

    fn render_patient_form(&mut self, ui: &mut egui::Ui) {
        if let Some(values) = self.patient_form.render(ui) {
            self.wizard
                .apply(WizardEvent::PatientFormSubmitted(values.clone()));
            self.spawn_patient_validation(values);
        }
    }

    fn render_patient_validation(&mut self, ui: &mut egui::Ui) {
        if self.wizard.is_validating_patient() {
            ui.spinner();
            match self.wizard.patient_form_values() {
                Some(values) => {
                    ui.label(format!("Validating patient details for {}...", values.name))
                }
                None => ui.label("Validating patient details..."),
            };
            return;
        }
        if !self.wizard.patient_found() {
            ui.heading(":c");
            ui.label("We couldn't find that patient");
            return;
        }

        ui.label("Please confirm the patient details:");
        ui.monospace(pretty(self.wizard.user_data().unwrap_or(&Value::Null)));
        ui.monospace(pretty(self.wizard.mapping_data()));
        let mut decision = None;
        ui.horizontal(|ui| {
            if ui.button("Confirm").clicked() {
                decision = Some(true);
            }
            if ui.button("Not this patient").clicked() {
                decision = Some(false);
            }
        });
        if let Some(confirmed) = decision {
            self.wizard.apply(WizardEvent::PatientConfirmed(confirmed));
        }
    }

    fn render_query_form(&mut self, ui: &mut egui::Ui) {
        let actions = self.query_form.render(ui);
        for action in actions {
            match action {
                QueryFormAction::Autocomplete(query) => self.spawn_autocomplete(query),
                QueryFormAction::ResolveGenes(term_id) => self.spawn_gene_resolution(term_id),
                QueryFormAction::Submit(values) => {
                    self.wizard
                        .apply(WizardEvent::QueryFormSubmitted(values.clone()));
                    self.spawn_query_validation(values);
                }
            }
        }
    }

    fn render_results(&mut self, ui: &mut egui::Ui) {
        ui.heading("Results");
        ui.label("Patient");
        ui.monospace(pretty(self.wizard.user_data().unwrap_or(&Value::Null)));
        ui.label("Query");
        match self.wizard.query_form_values() {
            Some(values) => {
                let payload = serde_json::to_value(values).unwrap_or(Value::Null);
                ui.monospace(pretty(&payload));
            }
            None => {
                ui.monospace("null");
            }
        }
        ui.label("Matches");
        ui.monospace(pretty(self.wizard.gene_data()));
    }

    fn render_stage(&mut self, ui: &mut egui::Ui) {
        match self.wizard.stage() {
            WizardStage::Authenticate => self.render_authenticate(ui),
            WizardStage::Authenticating => {
                ui.spinner();
                ui.label("Authenticating...");
            }
            WizardStage::PatientForm => self.render_patient_form(ui),
            WizardStage::PatientValidation => self.render_patient_validation(ui),
            WizardStage::QueryForm => self.render_query_form(ui),
            WizardStage::QueryValidation => {
                ui.spinner();
                ui.label("Running genomic query...");
            }
            WizardStage::Results => self.render_results(ui),
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

impl eframe::App for AirlockApp {
    // All rendering happens in `update`, which eframe still calls every frame
    // alongside this required-but-unused hook.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Deliver the one-shot authentication completion event.
        if let Some(started) = self.auth_started {
            if self.wizard.stage() == WizardStage::Authenticating
                && started.elapsed() >= AUTH_DWELL
            {
                self.wizard.apply(WizardEvent::AuthenticationFinished);
                self.auth_started = None;
            }
        }

        // Route worker completions before picking the view for this frame.
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }

        egui::TopBottomPanel::top("clinician_title").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Clinician View");
                ui.label(self.wizard.stage().label());
            });
        });

        // Exactly one view per frame, selected by the wizard stage.
        egui::CentralPanel::default().show(ctx, |ui| self.render_stage(ui));

        // Keep polling while anything may complete in the background.
        match self.wizard.stage() {
            WizardStage::Authenticating
            | WizardStage::PatientValidation
            | WizardStage::QueryForm
            | WizardStage::QueryValidation => {
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            _ => {}
        }
    }
}
