use eframe::egui;
use serde::{Deserialize, Serialize};

/// Patient details as entered by the clinician.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFormValues {
    pub name: String,
    pub date_of_birth: String,
    pub genome_id: String,
}

#[derive(Debug, Default)]
pub struct PatientFormState {
    values: PatientFormValues,
}

impl PatientFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_submit(&self) -> bool {
        !self.values.name.trim().is_empty()
    }

    /// Renders the entry form; returns the submitted values once per click
    /// of the submit button.
    pub fn render(&mut self, ui: &mut egui::Ui) -> Option<PatientFormValues> {
        ui.label("Patient name");
        ui.text_edit_singleline(&mut self.values.name);
        ui.label("Date of birth");
        ui.add(egui::TextEdit::singleline(&mut self.values.date_of_birth).hint_text("YYYY-MM-DD"));
        ui.label("Genome ID");
        ui.add(
            egui::TextEdit::singleline(&mut self.values.genome_id)
                .hint_text("Genome ID (optional)"),
        );

        ui.separator();
        if ui
            .add_enabled(self.can_submit(), egui::Button::new("Next"))
            .clicked()
        {
            return Some(self.values.clone());
        }
        None
    }
}
