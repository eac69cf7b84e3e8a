use crate::{patient_form::PatientFormValues, query_form::QueryFormValues};
use serde_json::Value;

/// The seven mutually exclusive views of the clinician walkthrough.
///
/// `PatientValidation` covers three presentations (loading, confirmation,
/// not-found), selected by `Wizard::is_validating_patient` and whether the
/// lookup produced user data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WizardStage {
    #[default]
    Authenticate,
    Authenticating,
    PatientForm,
    PatientValidation,
    QueryForm,
    QueryValidation,
    Results,
}

impl WizardStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Authenticate => "Authenticate",
            Self::Authenticating => "Authenticating",
            Self::PatientForm => "Patient details",
            Self::PatientValidation => "Patient validation",
            Self::QueryForm => "Genomic query",
            Self::QueryValidation => "Running query",
            Self::Results => "Results",
        }
    }
}

/// One variant per collaborator callback of the walkthrough.
#[derive(Clone, Debug)]
pub enum WizardEvent {
    AuthenticateRequested,
    AuthenticationFinished,
    PatientFormSubmitted(PatientFormValues),
    PatientValidated {
        user_data: Option<Value>,
        mapping_data: Value,
    },
    PatientConfirmed(bool),
    QueryFormSubmitted(QueryFormValues),
    QueryValidated(Value),
}

/// The single mutable state record behind the walkthrough. Data slots are
/// opaque payloads owned here and handed to the views by reference.
#[derive(Debug, Default)]
pub struct Wizard {
    stage: WizardStage,
    is_validating_patient: bool,
    patient_form_values: Option<PatientFormValues>,
    query_form_values: Option<QueryFormValues>,
    user_data: Option<Value>,
    mapping_data: Value,
    gene_data: Value,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn is_validating_patient(&self) -> bool {
        self.is_validating_patient
    }

    pub fn patient_found(&self) -> bool {
        self.user_data.is_some()
    }

    pub fn patient_form_values(&self) -> Option<&PatientFormValues> {
        self.patient_form_values.as_ref()
    }

    pub fn query_form_values(&self) -> Option<&QueryFormValues> {
        self.query_form_values.as_ref()
    }

    pub fn user_data(&self) -> Option<&Value> {
        self.user_data.as_ref()
    }

    pub fn mapping_data(&self) -> &Value {
        &self.mapping_data
    }

    pub fn gene_data(&self) -> &Value {
        &self.gene_data
    }

    /// Applies one collaborator event. Events arriving in a stage that does
    /// not expect them are dropped, with one exception: a finished query
    /// validation moves to `Results` from any stage, preserving the
    /// precedence the original view cascade gave its final branch.
    pub fn apply(&mut self, event: WizardEvent) {
        if let WizardEvent::QueryValidated(gene_data) = event {
            self.gene_data = gene_data;
            self.stage = WizardStage::Results;
            return;
        }

        match (self.stage, event) {
            (WizardStage::Authenticate, WizardEvent::AuthenticateRequested) => {
                self.stage = WizardStage::Authenticating;
            }
            (WizardStage::Authenticating, WizardEvent::AuthenticationFinished) => {
                self.stage = WizardStage::PatientForm;
            }
            (WizardStage::PatientForm, WizardEvent::PatientFormSubmitted(values)) => {
                self.patient_form_values = Some(values);
                self.is_validating_patient = true;
                self.stage = WizardStage::PatientValidation;
            }
            (
                WizardStage::PatientValidation,
                WizardEvent::PatientValidated {
                    user_data,
                    mapping_data,
                },
            ) => {
                self.user_data = user_data;
                self.mapping_data = mapping_data;
                self.is_validating_patient = false;
            }
            (WizardStage::PatientValidation, WizardEvent::PatientConfirmed(true))
                if !self.is_validating_patient && self.user_data.is_some() =>
            {
                self.stage = WizardStage::QueryForm;
            }
            (WizardStage::QueryForm, WizardEvent::QueryFormSubmitted(values)) => {
                self.query_form_values = Some(values);
                self.stage = WizardStage::QueryValidation;
            }
            // Declining confirmation keeps the confirmation view up; the
            // walkthrough has no backward transitions.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient_form::PatientFormValues;
    use crate::query_form::{Impact, QueryFormValues, VariantType};
    use serde_json::json;

    fn patient_named(name: &str) -> PatientFormValues {
        PatientFormValues {
            name: name.to_string(),
            date_of_birth: String::new(),
            genome_id: String::new(),
        }
    }

    fn region_query(region: &str) -> QueryFormValues {
        QueryFormValues {
            hpo: None,
            region: region.to_string(),
            genes: String::new(),
            variants: String::new(),
            allele_freq: 1.0,
            variant_type: VariantType::Both,
            impact: Impact::All,
        }
    }

    #[test]
    fn starts_unauthenticated() {
        let wizard = Wizard::new();
        assert_eq!(wizard.stage(), WizardStage::Authenticate);
        assert!(!wizard.patient_found());
    }

    #[test]
    fn full_walkthrough_keeps_payloads_intact() {
        let mut wizard = Wizard::new();

        wizard.apply(WizardEvent::AuthenticateRequested);
        assert_eq!(wizard.stage(), WizardStage::Authenticating);
        wizard.apply(WizardEvent::AuthenticationFinished);
        assert_eq!(wizard.stage(), WizardStage::PatientForm);

        wizard.apply(WizardEvent::PatientFormSubmitted(patient_named("X")));
        assert_eq!(wizard.stage(), WizardStage::PatientValidation);
        assert!(wizard.is_validating_patient());

        wizard.apply(WizardEvent::PatientValidated {
            user_data: Some(json!({"id": 1})),
            mapping_data: json!({}),
        });
        assert!(!wizard.is_validating_patient());
        assert!(wizard.patient_found());

        wizard.apply(WizardEvent::PatientConfirmed(true));
        assert_eq!(wizard.stage(), WizardStage::QueryForm);

        wizard.apply(WizardEvent::QueryFormSubmitted(region_query("chr1:1-100")));
        assert_eq!(wizard.stage(), WizardStage::QueryValidation);

        wizard.apply(WizardEvent::QueryValidated(json!([{"gene": "BRCA1"}])));
        assert_eq!(wizard.stage(), WizardStage::Results);

        assert_eq!(wizard.user_data(), Some(&json!({"id": 1})));
        assert_eq!(wizard.gene_data(), &json!([{"gene": "BRCA1"}]));
        assert_eq!(
            wizard.patient_form_values().map(|v| v.name.as_str()),
            Some("X")
        );
        assert_eq!(
            wizard.query_form_values().map(|v| v.region.as_str()),
            Some("chr1:1-100")
        );
    }

    #[test]
    fn patient_not_found_stays_on_validation_view() {
        let mut wizard = Wizard::new();
        wizard.apply(WizardEvent::AuthenticateRequested);
        wizard.apply(WizardEvent::AuthenticationFinished);
        wizard.apply(WizardEvent::PatientFormSubmitted(patient_named("nobody")));
        wizard.apply(WizardEvent::PatientValidated {
            user_data: None,
            mapping_data: Value::Null,
        });

        assert_eq!(wizard.stage(), WizardStage::PatientValidation);
        assert!(!wizard.is_validating_patient());
        assert!(!wizard.patient_found());

        // Confirming a missing patient must not advance the walkthrough.
        wizard.apply(WizardEvent::PatientConfirmed(true));
        assert_eq!(wizard.stage(), WizardStage::PatientValidation);
    }

    #[test]
    fn declining_confirmation_keeps_confirmation_view() {
        let mut wizard = Wizard::new();
        wizard.apply(WizardEvent::AuthenticateRequested);
        wizard.apply(WizardEvent::AuthenticationFinished);
        wizard.apply(WizardEvent::PatientFormSubmitted(patient_named("X")));
        wizard.apply(WizardEvent::PatientValidated {
            user_data: Some(json!({"id": 7})),
            mapping_data: json!({}),
        });
        wizard.apply(WizardEvent::PatientConfirmed(false));
        assert_eq!(wizard.stage(), WizardStage::PatientValidation);
    }

    #[test]
    fn query_validated_wins_from_any_stage() {
        for start in [
            WizardEvent::AuthenticateRequested,
            WizardEvent::AuthenticationFinished,
        ] {
            let mut wizard = Wizard::new();
            wizard.apply(start);
            wizard.apply(WizardEvent::QueryValidated(json!([])));
            assert_eq!(wizard.stage(), WizardStage::Results);
        }

        let mut wizard = Wizard::new();
        wizard.apply(WizardEvent::QueryValidated(json!([{"gene": "TP53"}])));
        assert_eq!(wizard.stage(), WizardStage::Results);
        assert_eq!(wizard.gene_data(), &json!([{"gene": "TP53"}]));
    }

    #[test]
    fn out_of_stage_events_are_dropped() {
        let mut wizard = Wizard::new();
        wizard.apply(WizardEvent::QueryFormSubmitted(region_query("chr2:5-10")));
        assert_eq!(wizard.stage(), WizardStage::Authenticate);
        assert!(wizard.query_form_values().is_none());

        wizard.apply(WizardEvent::PatientValidated {
            user_data: Some(json!({"id": 1})),
            mapping_data: json!({}),
        });
        assert_eq!(wizard.stage(), WizardStage::Authenticate);
        assert!(!wizard.patient_found());

        wizard.apply(WizardEvent::AuthenticationFinished);
        assert_eq!(wizard.stage(), WizardStage::Authenticate);
    }

    #[test]
    fn results_stage_is_terminal() {
        let mut wizard = Wizard::new();
        wizard.apply(WizardEvent::QueryValidated(json!([])));
        wizard.apply(WizardEvent::AuthenticateRequested);
        wizard.apply(WizardEvent::PatientFormSubmitted(patient_named("X")));
        assert_eq!(wizard.stage(), WizardStage::Results);
    }
}
