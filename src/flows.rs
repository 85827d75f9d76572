//! The application's multi-step flows: which steps they have, which fields each
//! step owns, and the glue between a [`Wizard`] and a [`FormState`].

use tracing::{debug, info};

use crate::calculator::{LoanInputs, MAX_RATE_PERCENT, MAX_TERM_YEARS};
use crate::form::{FieldErrors, FieldKind, FieldSpec, FormData, FormState};
use crate::format::{parse_amount, parse_rate};
use crate::listing::{fields as keys, FilterInputs, PROPERTY_TYPE_LABELS};
use crate::wizard::{Step, SubmitAction, Wizard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorStep {
    PropertyValue,
    DownPayment,
    InterestRate,
    LoanTerm,
    ExtraPrincipal,
}

impl CalculatorStep {
    /// Whether the step's input is usable enough to move past it.
    pub fn is_complete(&self, inputs: &LoanInputs) -> bool {
        let value = parse_amount(&inputs.property_value).filter(|v| *v > 0.0);
        match self {
            CalculatorStep::PropertyValue => value.is_some(),
            CalculatorStep::DownPayment => value
                .and_then(|v| inputs.down_payment(v).map(|down| (0.0..=v).contains(&down)))
                .unwrap_or(false),
            CalculatorStep::InterestRate => {
                parse_rate(&inputs.interest_rate)
                    .is_some_and(|rate| (0.0..=MAX_RATE_PERCENT).contains(&rate))
            }
            CalculatorStep::LoanTerm => inputs
                .term_years
                .trim()
                .parse::<u32>()
                .is_ok_and(|years| (1..=MAX_TERM_YEARS).contains(&years)),
            // optional; anything unparsable counts as no extra payment
            CalculatorStep::ExtraPrincipal => true,
        }
    }
}

pub fn calculator_wizard() -> Wizard<CalculatorStep> {
    Wizard::new(
        Step::new(
            CalculatorStep::PropertyValue,
            "What is the price of the property?",
            &["property_value"],
        ),
        [
            Step::new(
                CalculatorStep::DownPayment,
                "Down Payment - Press Tab to switch between % and $",
                &["down_payment"],
            ),
            Step::new(
                CalculatorStep::InterestRate,
                "Annual Interest Rate (%)",
                &["interest_rate"],
            ),
            Step::new(
                CalculatorStep::LoanTerm,
                "Loan Term (years) - common values: 15, 20, 30",
                &["term_years"],
            ),
            Step::new(
                CalculatorStep::ExtraPrincipal,
                "Extra Monthly Principal Payment (optional)",
                &["extra_principal"],
            ),
        ],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Welcome,
    Profile,
    Preferences,
}

pub const ROLES: &[&str] = &["Buyer", "Seller", "Investor"];

pub static ONBOARDING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Full name", FieldKind::Text),
    FieldSpec::required("email", "Email", FieldKind::Email),
    FieldSpec::required("role", "I am a", FieldKind::Choice(ROLES)),
    FieldSpec::optional("city", "Preferred city", FieldKind::Text),
    FieldSpec::optional("budget", "Budget", FieldKind::Money),
];

pub fn onboarding_flow() -> Flow<OnboardingStep> {
    Flow::new(
        Wizard::new(
            Step::new(OnboardingStep::Welcome, "Welcome", &[]),
            [
                Step::new(OnboardingStep::Profile, "About you", &["name", "email"]),
                Step::new(
                    OnboardingStep::Preferences,
                    "What are you looking for?",
                    &["role", "city", "budget"],
                ),
            ],
        ),
        FormState::new(ONBOARDING_FIELDS),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStep {
    Basics,
    Details,
    Media,
    Review,
}

pub static LISTING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(keys::TITLE, "Title", FieldKind::Text),
    FieldSpec::required(
        keys::PROPERTY_TYPE,
        "Property type",
        FieldKind::Choice(PROPERTY_TYPE_LABELS),
    ),
    FieldSpec::required(keys::LOCATION, "Location", FieldKind::Text),
    FieldSpec::required(keys::PRICE, "Price", FieldKind::Money),
    FieldSpec::optional(keys::BEDROOMS, "Bedrooms", FieldKind::Integer),
    FieldSpec::optional(keys::BATHROOMS, "Bathrooms", FieldKind::Integer),
    FieldSpec::optional(keys::AREA, "Area (sq ft)", FieldKind::Integer),
    FieldSpec::required(keys::SHARES, "Ownership shares", FieldKind::Integer),
    FieldSpec::optional(keys::PHOTOS, "Photos (comma-separated paths)", FieldKind::Text),
];

pub fn listing_flow() -> Flow<ListingStep> {
    Flow::new(
        Wizard::new(
            Step::new(
                ListingStep::Basics,
                "Basics",
                &[keys::TITLE, keys::PROPERTY_TYPE, keys::LOCATION],
            ),
            [
                Step::new(
                    ListingStep::Details,
                    "Details",
                    &[
                        keys::PRICE,
                        keys::BEDROOMS,
                        keys::BATHROOMS,
                        keys::AREA,
                        keys::SHARES,
                    ],
                ),
                Step::new(ListingStep::Media, "Photos", &[keys::PHOTOS]),
                Step::new(ListingStep::Review, "Review and publish", &[]),
            ],
        ),
        FormState::new(LISTING_FIELDS),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Buyer,
    Seller,
    Investor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub city: Option<String>,
    pub budget: Option<f64>,
}

impl Profile {
    pub fn from_form(data: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = data.text("name").unwrap_or_default().to_string();
        let email = data.text("email").unwrap_or_default().to_string();
        if name.is_empty() {
            errors.insert("name", "required");
        }
        if email.is_empty() {
            errors.insert("email", "required");
        }
        let role = match data.text("role") {
            Some("Buyer") => Some(Role::Buyer),
            Some("Seller") => Some(Role::Seller),
            Some("Investor") => Some(Role::Investor),
            _ => None,
        };

        match role {
            Some(role) if errors.is_empty() => Ok(Self {
                name,
                email,
                role,
                city: data.text("city").map(str::to_string),
                budget: data.money("budget"),
            }),
            _ => {
                if role.is_none() {
                    errors.insert("role", "required");
                }
                Err(errors)
            }
        }
    }

    /// Seeds the browse filters with the profile's city and budget.
    pub fn apply_to(&self, filter: &mut FilterInputs) {
        if let Some(city) = &self.city {
            filter.query = city.clone();
        }
        if let Some(budget) = self.budget {
            filter.max_price = format!("{budget}");
        }
    }
}

/// Outcome of submitting the current step.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    Rejected(FieldErrors),
    Advanced,
    Completed(FormData),
}

/// A wizard whose steps own fields of one form. Keyboard focus moves between
/// the fields of the current step only.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow<K> {
    wizard: Wizard<K>,
    form: FormState,
    focus: usize,
}

impl<K> Flow<K> {
    pub fn new(wizard: Wizard<K>, form: FormState) -> Self {
        Self {
            wizard,
            form,
            focus: 0,
        }
    }

    pub fn wizard(&self) -> &Wizard<K> {
        &self.wizard
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn focused_field(&self) -> Option<&'static str> {
        self.wizard.current_step().fields.get(self.focus).copied()
    }

    /// Focused field, if it belongs to the step on screen and may be edited.
    fn editable_field(&self) -> Option<&'static str> {
        self.focused_field()
            .filter(|key| self.wizard.is_field_active(key))
    }

    pub fn focus_next(&mut self) {
        let count = self.wizard.current_step().fields.len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_previous(&mut self) {
        let count = self.wizard.current_step().fields.len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    /// Routes a typed character to the focused field. Space cycles choice fields.
    pub fn type_char(&mut self, c: char) -> bool {
        let Some(key) = self.editable_field() else {
            return false;
        };
        match self.form.spec(key).map(|spec| spec.kind) {
            Some(FieldKind::Choice(_)) if c == ' ' => {
                self.form.cycle_choice(key);
                true
            }
            _ => self.form.push(key, c),
        }
    }

    pub fn backspace(&mut self) {
        if let Some(key) = self.editable_field() {
            self.form.pop(key);
        }
    }

    /// Validates the current step, then advances or, on the last step,
    /// validates the whole form and hands back its data.
    pub fn submit(&mut self) -> FlowEvent {
        let fields = self.wizard.current_step().fields;
        if let Err(errors) = self.form.validate_fields(fields) {
            debug!(step = self.wizard.current_step().label, %errors, "step rejected");
            return FlowEvent::Rejected(errors);
        }

        match self.wizard.submit_action() {
            SubmitAction::Advance => {
                self.wizard.advance();
                self.focus = 0;
                FlowEvent::Advanced
            }
            SubmitAction::Finalize => match self.form.validate() {
                Ok(data) => {
                    info!(steps = self.wizard.step_count(), "flow completed");
                    FlowEvent::Completed(data)
                }
                Err(errors) => FlowEvent::Rejected(errors),
            },
        }
    }

    /// Goes back one step. Returns `false` on the first step.
    pub fn back(&mut self) -> bool {
        let moved = self.wizard.retreat();
        if moved {
            self.focus = 0;
        }
        moved
    }

    pub fn reset(&mut self) {
        self.wizard.reset();
        self.form.clear();
        self.focus = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculatorDefaults;

    #[test]
    fn calculator_steps_gate_on_usable_input() {
        let mut inputs = LoanInputs::with_defaults(&CalculatorDefaults::default());
        assert!(!CalculatorStep::PropertyValue.is_complete(&inputs));
        assert!(!CalculatorStep::DownPayment.is_complete(&inputs));

        inputs.property_value = "$350,000".to_string();
        assert!(CalculatorStep::PropertyValue.is_complete(&inputs));
        assert!(CalculatorStep::DownPayment.is_complete(&inputs));
        assert!(CalculatorStep::InterestRate.is_complete(&inputs));
        assert!(CalculatorStep::LoanTerm.is_complete(&inputs));

        inputs.down_payment_is_percent = false;
        inputs.down_payment_amount = "400000".to_string();
        assert!(!CalculatorStep::DownPayment.is_complete(&inputs));

        inputs.term_years = "0".to_string();
        assert!(!CalculatorStep::LoanTerm.is_complete(&inputs));
        inputs.term_years = "400000000".to_string();
        assert!(!CalculatorStep::LoanTerm.is_complete(&inputs));
        inputs.term_years = MAX_TERM_YEARS.to_string();
        assert!(CalculatorStep::LoanTerm.is_complete(&inputs));

        inputs.interest_rate = "1000000".to_string();
        assert!(!CalculatorStep::InterestRate.is_complete(&inputs));
    }

    #[test]
    fn calculator_wizard_ends_with_optional_extra_principal() {
        let wizard = calculator_wizard();
        assert_eq!(wizard.step_count(), 5);
        assert_eq!(
            wizard.steps().last().map(|step| step.kind),
            Some(CalculatorStep::ExtraPrincipal)
        );
        assert_eq!(wizard.current_step().kind, CalculatorStep::PropertyValue);
    }

    #[test]
    fn onboarding_walks_to_profile() {
        let mut flow = onboarding_flow();
        assert_eq!(flow.focused_field(), None);
        assert!(!flow.type_char('x'));
        assert_eq!(flow.submit(), FlowEvent::Advanced);

        assert_eq!(flow.focused_field(), Some("name"));
        assert!(matches!(flow.submit(), FlowEvent::Rejected(_)));
        assert_eq!(flow.wizard().current_step().kind, OnboardingStep::Profile);

        for c in "Ada".chars() {
            flow.type_char(c);
        }
        flow.focus_next();
        for c in "ada@example.com".chars() {
            flow.type_char(c);
        }
        assert_eq!(flow.submit(), FlowEvent::Advanced);

        assert_eq!(flow.focused_field(), Some("role"));
        flow.type_char(' ');
        flow.type_char(' ');
        flow.focus_next();
        for c in "Denver".chars() {
            flow.type_char(c);
        }
        flow.focus_next();
        for c in "600000".chars() {
            flow.type_char(c);
        }

        let FlowEvent::Completed(data) = flow.submit() else {
            panic!("expected the flow to complete");
        };
        let profile = Profile::from_form(&data).unwrap();
        assert_eq!(profile.role, Role::Seller);
        assert_eq!(profile.city.as_deref(), Some("Denver"));

        let mut filter = FilterInputs::default();
        profile.apply_to(&mut filter);
        assert_eq!(filter.query, "Denver");
        assert_eq!(filter.to_filter().max_price, Some(600_000.0));
    }

    #[test]
    fn focus_wraps_within_step() {
        let mut flow = listing_flow();
        assert_eq!(flow.focused_field(), Some(keys::TITLE));
        flow.focus_previous();
        assert_eq!(flow.focused_field(), Some(keys::LOCATION));
        flow.focus_next();
        assert_eq!(flow.focused_field(), Some(keys::TITLE));
    }

    #[test]
    fn only_fields_of_the_current_step_take_typing() {
        let mut flow = listing_flow();
        assert!(flow.type_char('C'));
        assert_eq!(flow.form().value(keys::TITLE), "C");

        flow.form_mut().set(keys::PROPERTY_TYPE, "Condo");
        flow.form_mut().set(keys::LOCATION, "Reno, NV");
        flow.form_mut().set(keys::PRICE, "210000");
        flow.form_mut().set(keys::SHARES, "20");
        for _ in 0..3 {
            assert_eq!(flow.submit(), FlowEvent::Advanced);
        }
        assert_eq!(flow.wizard().current_step().kind, ListingStep::Review);

        assert!(!flow.type_char('x'));
        flow.backspace();
        assert_eq!(flow.form().value(keys::TITLE), "C");
        assert!(!flow.wizard().is_field_active(keys::TITLE));
    }

    #[test]
    fn back_resets_focus_and_keeps_values() {
        let mut flow = listing_flow();
        flow.form_mut().set(keys::TITLE, "Cedar Cabin");
        flow.form_mut().set(keys::PROPERTY_TYPE, "House");
        flow.form_mut().set(keys::LOCATION, "Bend, OR");
        assert_eq!(flow.submit(), FlowEvent::Advanced);
        flow.focus_next();
        assert!(flow.back());
        assert_eq!(flow.focused_field(), Some(keys::TITLE));
        assert_eq!(flow.form().value(keys::TITLE), "Cedar Cabin");
        assert!(!flow.back());

        flow.reset();
        assert_eq!(flow.form().value(keys::TITLE), "");
    }

    #[test]
    fn profile_requires_role() {
        let mut form = FormState::new(ONBOARDING_FIELDS);
        form.set("name", "Ada");
        form.set("email", "ada@example.com");
        let data = form.validate_fields(&["name", "email"]).unwrap();
        let errors = Profile::from_form(&data).unwrap_err();
        assert_eq!(errors.get("role"), Some("required"));
    }
}
