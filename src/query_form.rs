use crate::ontology::TermSuggestion;
use eframe::egui;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantType {
    Snp,
    Indel,
    #[default]
    Both,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    #[serde(rename = "highmed")]
    HighMed,
    #[default]
    All,
}

/// Snapshot of the query form at submission time. Produced once; the form
/// does not retain it afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryFormValues {
    pub hpo: Option<String>,
    pub region: String,
    pub genes: String,
    pub variants: String,
    pub allele_freq: f32,
    pub variant_type: VariantType,
    pub impact: Impact,
}

/// Requests the query form hands back to its owner. The form itself performs
/// no network work.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryFormAction {
    /// Fetch autocomplete suggestions for the current phenotype text.
    Autocomplete(String),
    /// A suggested term was picked; resolve its genes into the genes field.
    ResolveGenes(String),
    /// The form was submitted.
    Submit(QueryFormValues),
}

/// Autocomplete throttle inherited from the original interface: only query
/// on substantial strings, and only on every second letter. Length 3 does
/// not fire, 4 does, 5 does not, 6 does.
pub fn should_autocomplete(query: &str) -> bool {
    let len = query.chars().count();
    len >= 3 && len % 2 == 0
}

/// Live state of the genomic query builder.
#[derive(Debug)]
pub struct QueryFormState {
    hpo_text: String,
    selected_term: Option<String>,
    region: String,
    genes: String,
    variants: String,
    allele_freq: f32,
    variant_type: VariantType,
    impact: Impact,
    suggestions: Vec<TermSuggestion>,
    touched: bool,
}

impl Default for QueryFormState {
    fn default() -> Self {
        Self {
            hpo_text: String::new(),
            selected_term: None,
            region: String::new(),
            genes: String::new(),
            variants: String::new(),
            allele_freq: 1.0,
            variant_type: VariantType::Both,
            impact: Impact::All,
            suggestions: vec![],
            touched: false,
        }
    }
}

impl QueryFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submission stays disabled until at least one of the phenotype,
    /// region, genes or variants fields has been touched. Once touched, it
    /// stays enabled for the lifetime of the form.
    pub fn can_submit(&self) -> bool {
        self.touched
    }

    pub fn suggestions(&self) -> &[TermSuggestion] {
        &self.suggestions
    }

    /// Replaces the suggestion list wholesale; superseded suggestions are
    /// discarded, never merged.
    pub fn replace_suggestions(&mut self, suggestions: Vec<TermSuggestion>) {
        self.suggestions = suggestions;
    }

    /// Overwrites the genes field with the ranked symbols, newline-joined,
    /// discarding whatever was typed there. Programmatic writes do not count
    /// as touching the field. There is no request identity: if two
    /// resolutions are in flight, whichever lands last wins.
    pub fn apply_resolved_genes(&mut self, symbols: &[String]) {
        self.genes = symbols.join("\n");
    }

    pub fn submission(&self) -> Option<QueryFormValues> {
        if !self.can_submit() {
            return None;
        }
        Some(QueryFormValues {
            hpo: self.selected_term.clone(),
            region: self.region.clone(),
            genes: self.genes.clone(),
            variants: self.variants.clone(),
            allele_freq: self.allele_freq,
            variant_type: self.variant_type,
            impact: self.impact,
        })
    }

    pub fn render(&mut self, ui: &mut egui::Ui) -> Vec<QueryFormAction> {
        let mut actions = vec![];

        ui.label("Patient has phenotype...");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.hpo_text).hint_text("HPO (optional)"),
        );
        if response.changed() {
            self.touched = true;
            if should_autocomplete(&self.hpo_text) {
                actions.push(QueryFormAction::Autocomplete(self.hpo_text.clone()));
            }
        }

        let mut picked = None;
        for (row, suggestion) in self.suggestions.iter().enumerate() {
            let text = format!("{} ({})", suggestion.label, suggestion.id);
            if ui.selectable_label(false, text).clicked() {
                picked = Some(row);
            }
        }
        if let Some(row) = picked {
            let suggestion = self.suggestions[row].clone();
            self.hpo_text = suggestion.label;
            self.selected_term = Some(suggestion.id.clone());
            self.suggestions.clear();
            self.touched = true;
            actions.push(QueryFormAction::ResolveGenes(suggestion.id));
        }

        ui.separator();
        ui.columns(3, |columns| {
            columns[0].label("Region");
            if columns[0]
                .add(
                    egui::TextEdit::multiline(&mut self.region)
                        .hint_text("Enter region or list of regions"),
                )
                .changed()
            {
                self.touched = true;
            }
            columns[1].label("Genes");
            if columns[1]
                .add(
                    egui::TextEdit::multiline(&mut self.genes)
                        .hint_text("Enter gene or list of genes"),
                )
                .changed()
            {
                self.touched = true;
            }
            columns[2].label("Variants");
            if columns[2]
                .add(
                    egui::TextEdit::multiline(&mut self.variants)
                        .hint_text("Enter variant or list of variants"),
                )
                .changed()
            {
                self.touched = true;
            }
        });

        ui.separator();
        ui.label("Allele Frequency");
        ui.add(
            egui::Slider::new(&mut self.allele_freq, 0.0..=10.0)
                .step_by(0.1)
                .suffix("%"),
        );

        ui.label("Variant Type");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.variant_type, VariantType::Snp, "SNP");
            ui.selectable_value(&mut self.variant_type, VariantType::Indel, "Indel");
            ui.selectable_value(&mut self.variant_type, VariantType::Both, "Both");
        });

        ui.label("Impact");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.impact, Impact::High, "High");
            ui.selectable_value(&mut self.impact, Impact::HighMed, "High & Med");
            ui.selectable_value(&mut self.impact, Impact::All, "All");
        });

        ui.separator();
        if ui
            .add_enabled(self.can_submit(), egui::Button::new("Next"))
            .clicked()
        {
            if let Some(values) = self.submission() {
                actions.push(QueryFormAction::Submit(values));
            }
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autocomplete_fires_on_even_lengths_of_three_or_more() {
        assert!(!should_autocomplete(""));
        assert!(!should_autocomplete("ab"));
        assert!(!should_autocomplete("abc"));
        assert!(should_autocomplete("abcd"));
        assert!(!should_autocomplete("abcde"));
        assert!(should_autocomplete("abcdef"));
    }

    #[test]
    fn submit_disabled_until_a_field_is_touched() {
        let mut form = QueryFormState::new();
        assert!(!form.can_submit());
        assert!(form.submission().is_none());

        form.touched = true;
        assert!(form.can_submit());

        // Enabling is monotonic for the form instance.
        form.apply_resolved_genes(&[]);
        form.replace_suggestions(vec![]);
        assert!(form.can_submit());
    }

    #[test]
    fn submission_defaults_match_the_form_defaults() {
        let mut form = QueryFormState::new();
        form.touched = true;
        let values = form.submission().unwrap();
        assert_eq!(values.allele_freq, 1.0);
        assert_eq!(values.variant_type, VariantType::Both);
        assert_eq!(values.impact, Impact::All);
        assert_eq!(values.hpo, None);
    }

    #[test]
    fn suggestions_are_replaced_wholesale() {
        let mut form = QueryFormState::new();
        form.replace_suggestions(vec![
            TermSuggestion {
                id: "HP:0001250".to_string(),
                label: "Seizure".to_string(),
            },
            TermSuggestion {
                id: "HP:0001251".to_string(),
                label: "Ataxia".to_string(),
            },
        ]);
        assert_eq!(form.suggestions().len(), 2);

        form.replace_suggestions(vec![TermSuggestion {
            id: "HP:0002133".to_string(),
            label: "Status epilepticus".to_string(),
        }]);
        assert_eq!(form.suggestions().len(), 1);
        assert_eq!(form.suggestions()[0].id, "HP:0002133");
    }

    #[test]
    fn resolved_genes_overwrite_typed_text() {
        let mut form = QueryFormState::new();
        form.genes = "MY_TYPED_GENE".to_string();
        form.apply_resolved_genes(&["BRCA1".to_string(), "BRCA2".to_string()]);
        assert_eq!(form.genes, "BRCA1\nBRCA2");
    }

    #[test]
    fn late_resolution_wins_over_earlier_one() {
        // Two selections in flight; responses land out of order. There is no
        // request identity, so the last response to arrive is kept.
        let mut form = QueryFormState::new();
        form.apply_resolved_genes(&["GENE_FROM_SECOND_PICK".to_string()]);
        form.apply_resolved_genes(&["GENE_FROM_FIRST_PICK".to_string()]);
        assert_eq!(form.genes, "GENE_FROM_FIRST_PICK");
    }

    #[test]
    fn variant_type_and_impact_serialize_to_wire_strings() {
        assert_eq!(serde_json::to_string(&VariantType::Snp).unwrap(), "\"snp\"");
        assert_eq!(
            serde_json::to_string(&VariantType::Both).unwrap(),
            "\"both\""
        );
        assert_eq!(serde_json::to_string(&Impact::HighMed).unwrap(), "\"highmed\"");
        assert_eq!(serde_json::to_string(&Impact::All).unwrap(), "\"all\"");
    }
}
