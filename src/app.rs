use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use tracing::{info, warn};

use homebase::calculator::{schedule, LoanInputs, Schedule};
use homebase::flows::{
    calculator_wizard, listing_flow, onboarding_flow, CalculatorStep, Flow, FlowEvent,
    ListingStep, OnboardingStep, Profile,
};
use homebase::format::is_amount_char;
use homebase::listing::{Catalog, FilterInputs, ListingDraft, Property};
use homebase::{Paginator, Settings, UploadGateway, Wizard};

pub const SCHEDULE_CSV: &str = "amortization_schedule.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Onboarding,
    Browse,
    Calculator,
    Results,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Query,
    MinPrice,
    MaxPrice,
    MinBedrooms,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Query,
        FilterField::MinPrice,
        FilterField::MaxPrice,
        FilterField::MinBedrooms,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Query => "Search",
            FilterField::MinPrice => "Min price",
            FilterField::MaxPrice => "Max price",
            FilterField::MinBedrooms => "Min beds",
        }
    }

    fn next(self) -> Self {
        match self {
            FilterField::Query => FilterField::MinPrice,
            FilterField::MinPrice => FilterField::MaxPrice,
            FilterField::MaxPrice => FilterField::MinBedrooms,
            FilterField::MinBedrooms => FilterField::Query,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self {
            FilterField::Query => !c.is_control(),
            FilterField::MinPrice | FilterField::MaxPrice => is_amount_char(c),
            FilterField::MinBedrooms => c.is_ascii_digit(),
        }
    }

    pub fn value<'a>(&self, filters: &'a FilterInputs) -> &'a str {
        match self {
            FilterField::Query => &filters.query,
            FilterField::MinPrice => &filters.min_price,
            FilterField::MaxPrice => &filters.max_price,
            FilterField::MinBedrooms => &filters.min_bedrooms,
        }
    }

    fn value_mut<'a>(&self, filters: &'a mut FilterInputs) -> &'a mut String {
        match self {
            FilterField::Query => &mut filters.query,
            FilterField::MinPrice => &mut filters.min_price,
            FilterField::MaxPrice => &mut filters.max_price,
            FilterField::MinBedrooms => &mut filters.min_bedrooms,
        }
    }
}

pub struct BrowseState {
    pub filters: FilterInputs,
    pub editing: Option<FilterField>,
    pub paginator: Paginator,
    pub table_state: TableState,
}

pub struct CalculatorState {
    pub wizard: Wizard<CalculatorStep>,
    pub inputs: LoanInputs,
    pub schedule: Option<Schedule>,
    pub table_state: TableState,
}

impl CalculatorState {
    /// Text of the field the current step edits.
    pub fn current_text(&self) -> &str {
        match self.wizard.current_step().kind {
            CalculatorStep::PropertyValue => &self.inputs.property_value,
            CalculatorStep::DownPayment => self.inputs.down_payment_text(),
            CalculatorStep::InterestRate => &self.inputs.interest_rate,
            CalculatorStep::LoanTerm => &self.inputs.term_years,
            CalculatorStep::ExtraPrincipal => &self.inputs.extra_principal,
        }
    }

    fn current_text_mut(&mut self) -> &mut String {
        match self.wizard.current_step().kind {
            CalculatorStep::PropertyValue => &mut self.inputs.property_value,
            CalculatorStep::DownPayment => self.inputs.down_payment_text_mut(),
            CalculatorStep::InterestRate => &mut self.inputs.interest_rate,
            CalculatorStep::LoanTerm => &mut self.inputs.term_years,
            CalculatorStep::ExtraPrincipal => &mut self.inputs.extra_principal,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.wizard.current_step().kind {
            CalculatorStep::PropertyValue | CalculatorStep::ExtraPrincipal => is_amount_char(c),
            CalculatorStep::DownPayment if self.inputs.down_payment_is_percent => {
                c.is_ascii_digit() || c == '.'
            }
            CalculatorStep::DownPayment => is_amount_char(c),
            CalculatorStep::InterestRate => c.is_ascii_digit() || c == '.',
            CalculatorStep::LoanTerm => c.is_ascii_digit(),
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub settings: Settings,
    pub catalog: Catalog,
    pub browse: BrowseState,
    pub calculator: CalculatorState,
    pub onboarding: Flow<OnboardingStep>,
    pub upload: Flow<ListingStep>,
    pub profile: Option<Profile>,
    pub status: Option<String>,
    gateway: Box<dyn UploadGateway>,
}

impl App {
    pub fn new(settings: Settings, catalog: Catalog, gateway: Box<dyn UploadGateway>) -> Self {
        let paginator = Paginator::new(catalog.len(), settings.page_size);
        let inputs = LoanInputs::with_defaults(&settings.calculator);
        let mut app = Self {
            screen: Screen::Onboarding,
            settings,
            catalog,
            browse: BrowseState {
                filters: FilterInputs::default(),
                editing: None,
                paginator,
                table_state: TableState::default(),
            },
            calculator: CalculatorState {
                wizard: calculator_wizard(),
                inputs,
                schedule: None,
                table_state: TableState::default(),
            },
            onboarding: onboarding_flow(),
            upload: listing_flow(),
            profile: None,
            status: None,
            gateway,
        };
        app.refresh_results();
        app
    }

    /// Every listing matching the current filters, in display order.
    pub fn results(&self) -> Vec<&Property> {
        self.catalog.search(&self.browse.filters.to_filter())
    }

    /// The slice of results on the current page.
    pub fn page(&self) -> Vec<&Property> {
        let results = self.results();
        let range = self.browse.paginator.page_range();
        results
            .get(range)
            .map(|page| page.to_vec())
            .unwrap_or_default()
    }

    pub fn selected_property(&self) -> Option<&Property> {
        let index = self.browse.table_state.selected()?;
        self.page().get(index).copied()
    }

    fn refresh_results(&mut self) {
        let count = self.results().len();
        self.browse.paginator.set_total_items(count);
        self.select_first_row();
    }

    fn select_first_row(&mut self) {
        let selected = if self.page().is_empty() { None } else { Some(0) };
        self.browse.table_state.select(selected);
    }

    /// Returns `true` when the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        self.status = None;

        match self.screen {
            Screen::Onboarding => self.handle_onboarding_input(key),
            Screen::Browse => return self.handle_browse_input(key),
            Screen::Calculator => self.handle_calculator_input(key),
            Screen::Results => return self.handle_results_input(key),
            Screen::Upload => self.handle_upload_input(key),
        }
        false
    }

    fn handle_onboarding_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => match self.onboarding.submit() {
                FlowEvent::Advanced => {}
                FlowEvent::Rejected(_) => {
                    self.status = Some("Please fix the highlighted fields".to_string());
                }
                FlowEvent::Completed(data) => match Profile::from_form(&data) {
                    Ok(profile) => {
                        profile.apply_to(&mut self.browse.filters);
                        self.status = Some(format!("Welcome, {}!", profile.name));
                        info!(role = ?profile.role, "onboarding finished");
                        self.profile = Some(profile);
                        self.refresh_results();
                        self.screen = Screen::Browse;
                    }
                    Err(errors) => self.status = Some(errors.to_string()),
                },
            },
            KeyCode::Esc => {
                if !self.onboarding.back() {
                    self.screen = Screen::Browse;
                }
            }
            KeyCode::Tab => self.onboarding.focus_next(),
            KeyCode::BackTab => self.onboarding.focus_previous(),
            KeyCode::Backspace => self.onboarding.backspace(),
            KeyCode::Char(c) => {
                self.onboarding.type_char(c);
            }
            _ => {}
        }
    }

    fn handle_browse_input(&mut self, key: KeyEvent) -> bool {
        if let Some(field) = self.browse.editing {
            self.handle_filter_input(field, key);
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Char('/') => self.browse.editing = Some(FilterField::Query),
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.page().len();
                let current = self.browse.table_state.selected().unwrap_or(0);
                if current + 1 < rows {
                    self.browse.table_state.select(Some(current + 1));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let current = self.browse.table_state.selected().unwrap_or(0);
                if current > 0 {
                    self.browse.table_state.select(Some(current - 1));
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.browse.paginator.next();
                self.select_first_row();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.browse.paginator.previous();
                self.select_first_row();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let page = c as usize - '0' as usize;
                if self.browse.paginator.window().contains(&page) {
                    self.browse.paginator.go_to(page);
                    self.select_first_row();
                }
            }
            KeyCode::Char('t') => {
                self.browse.filters.cycle_property_type();
                self.refresh_results();
            }
            KeyCode::Char('s') => {
                self.browse.filters.sort = self.browse.filters.sort.next();
                self.refresh_results();
            }
            KeyCode::Char('x') => {
                self.browse.filters = FilterInputs::default();
                self.refresh_results();
            }
            KeyCode::Enter | KeyCode::Char('c') => {
                let price = self.selected_property().map(|p| p.price);
                self.open_calculator(price);
            }
            KeyCode::Char('u') => {
                self.upload.reset();
                self.screen = Screen::Upload;
            }
            KeyCode::Char('o') => {
                self.onboarding.reset();
                self.screen = Screen::Onboarding;
            }
            _ => {}
        }
        false
    }

    fn handle_filter_input(&mut self, field: FilterField, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.browse.editing = None,
            KeyCode::Tab => self.browse.editing = Some(field.next()),
            KeyCode::Backspace => {
                field.value_mut(&mut self.browse.filters).pop();
                self.refresh_results();
            }
            KeyCode::Char(c) if field.accepts(c) => {
                field.value_mut(&mut self.browse.filters).push(c);
                self.refresh_results();
            }
            _ => {}
        }
    }

    /// Starts the calculator over, prefilled with a listing price when one is given.
    fn open_calculator(&mut self, price: Option<f64>) {
        self.calculator.wizard.reset();
        self.calculator.schedule = None;
        if let Some(price) = price {
            self.calculator.inputs.property_value = format!("{price:.0}");
        }
        self.screen = Screen::Calculator;
    }

    fn handle_calculator_input(&mut self, key: KeyEvent) {
        let step = self.calculator.wizard.current_step().kind;
        match key.code {
            KeyCode::Tab if step == CalculatorStep::DownPayment => {
                let inputs = &mut self.calculator.inputs;
                inputs.down_payment_is_percent = !inputs.down_payment_is_percent;
            }
            KeyCode::Char(c) if self.calculator.accepts(c) => {
                self.calculator.current_text_mut().push(c);
            }
            KeyCode::Backspace => {
                self.calculator.current_text_mut().pop();
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if !step.is_complete(&self.calculator.inputs) {
                    self.status = Some("Enter a valid value to continue".to_string());
                } else if !self.calculator.wizard.advance() {
                    self.finish_calculation();
                }
            }
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
                if !self.calculator.wizard.retreat() {
                    self.screen = Screen::Browse;
                }
            }
            _ => {}
        }
    }

    fn finish_calculation(&mut self) {
        match self.calculator.inputs.quote() {
            Some(quote) => {
                let table = schedule(&quote, self.calculator.inputs.extra_principal());
                info!(months = table.summary.months_to_payoff, "calculated loan schedule");
                self.calculator.schedule = Some(table);
                self.calculator.table_state.select(Some(0));
                self.screen = Screen::Results;
            }
            None => {
                warn!("calculator finished with incomplete inputs");
                self.status = Some("Some inputs are incomplete".to_string());
            }
        }
    }

    fn handle_results_input(&mut self, key: KeyEvent) -> bool {
        let rows = self
            .calculator
            .schedule
            .as_ref()
            .map(|s| s.rows.len())
            .unwrap_or(0);
        let table_state = &mut self.calculator.table_state;

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => self.screen = Screen::Calculator,
            KeyCode::Char('b') => self.screen = Screen::Browse,
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_schedule(SCHEDULE_CSV),
            KeyCode::Down | KeyCode::Char('j') => {
                let current = table_state.selected().unwrap_or(0);
                if current + 1 < rows {
                    table_state.select(Some(current + 1));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let current = table_state.selected().unwrap_or(0);
                if current > 0 {
                    table_state.select(Some(current - 1));
                }
            }
            KeyCode::PageDown | KeyCode::Char('d')
                if key.code == KeyCode::PageDown || key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                let current = table_state.selected().unwrap_or(0);
                table_state.select(Some((current + 12).min(rows.saturating_sub(1))));
            }
            KeyCode::PageUp | KeyCode::Char('u')
                if key.code == KeyCode::PageUp || key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                let current = table_state.selected().unwrap_or(0);
                table_state.select(Some(current.saturating_sub(12)));
            }
            KeyCode::Char('g') => table_state.select(Some(0)),
            KeyCode::Char('G') => {
                if rows > 0 {
                    table_state.select(Some(rows - 1));
                }
            }
            _ => {}
        }
        false
    }

    fn export_schedule(&mut self, filename: &str) {
        let Some(table) = &self.calculator.schedule else {
            return;
        };
        let written = File::create(filename)
            .map_err(anyhow::Error::from)
            .and_then(|file| {
                table
                    .write_csv(BufWriter::new(file))
                    .with_context(|| format!("writing {filename}"))
            });
        self.status = Some(match written {
            Ok(()) => {
                info!(filename, "exported schedule");
                format!("Exported to {filename}")
            }
            Err(e) => {
                warn!("export failed: {e:#}");
                format!("Error exporting to CSV: {e:#}")
            }
        });
    }

    fn handle_upload_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => match self.upload.submit() {
                FlowEvent::Advanced => {}
                FlowEvent::Rejected(_) => {
                    self.status = Some("Please fix the highlighted fields".to_string());
                }
                FlowEvent::Completed(data) => {
                    if let Err(e) = self.publish(&data) {
                        warn!("listing not published: {e:#}");
                        self.status = Some(format!("{e:#}"));
                    }
                }
            },
            KeyCode::Esc => {
                if !self.upload.back() {
                    self.screen = Screen::Browse;
                }
            }
            KeyCode::Tab => self.upload.focus_next(),
            KeyCode::BackTab => self.upload.focus_previous(),
            KeyCode::Backspace => self.upload.backspace(),
            KeyCode::Char(c) => {
                self.upload.type_char(c);
            }
            _ => {}
        }
    }

    fn publish(&mut self, data: &homebase::FormData) -> Result<()> {
        let draft = ListingDraft::from_form(data)?;
        let published = draft
            .publish(self.gateway.as_mut(), &mut self.catalog)
            .context("could not publish listing")?;
        self.status = Some(format!(
            "Published \"{}\" as listing #{}",
            published.title, published.id
        ));
        self.upload.reset();
        self.refresh_results();
        self.screen = Screen::Browse;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homebase::listing::fields;
    use homebase::LocalGateway;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn new_app() -> (App, tempfile::TempDir) {
        let media = tempfile::tempdir().unwrap();
        let app = App::new(
            Settings::default(),
            Catalog::builtin().unwrap(),
            Box::new(LocalGateway::new(media.path())),
        );
        (app, media)
    }

    fn browsing() -> (App, tempfile::TempDir) {
        let (mut app, media) = new_app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Browse);
        (app, media)
    }

    #[test]
    fn starts_on_onboarding_and_escape_skips_it() {
        let (app, _media) = browsing();
        assert!(app.profile.is_none());
    }

    #[test]
    fn onboarding_seeds_browse_filters() {
        let (mut app, _media) = new_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Ada Lovelace");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ada@example.com");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Denver");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Browse);
        assert_eq!(app.browse.filters.query, "Denver");
        assert_eq!(app.results().len(), 1);
        assert_eq!(app.status.as_deref(), Some("Welcome, Ada Lovelace!"));
    }

    #[test]
    fn onboarding_rejects_missing_email() {
        let (mut app, _media) = new_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Ada");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Onboarding);
        assert_eq!(app.onboarding.form().error("email"), Some("required"));
    }

    #[test]
    fn pages_through_listings() {
        let (mut app, _media) = browsing();
        assert_eq!(app.browse.paginator.total_pages(), 3);
        assert_eq!(app.page().len(), 6);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.browse.paginator.current_page(), 3);
        assert_eq!(app.page().len(), 2);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.browse.paginator.current_page(), 1);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.browse.paginator.current_page(), 1);
    }

    #[test]
    fn filter_editing_narrows_results() {
        let (mut app, _media) = browsing();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "portland");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.browse.editing, None);
        assert_eq!(app.results().len(), 1);
        assert!(!app.browse.paginator.is_visible());
        assert_eq!(
            app.selected_property().map(|p| p.title.as_str()),
            Some("Maple Street Craftsman")
        );

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.results().len(), app.catalog.len());
    }

    #[test]
    fn price_filter_ignores_letters() {
        let (mut app, _media) = browsing();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "abc");
        assert_eq!(app.browse.filters.min_price, "");
        type_text(&mut app, "$900,000");
        assert_eq!(app.results().len(), 1);
    }

    #[test]
    fn calculator_walkthrough_reaches_schedule() {
        let (mut app, _media) = browsing();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.screen, Screen::Calculator);
        assert_eq!(app.calculator.inputs.property_value, "685000");

        for _ in 0..6 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "500000");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "100000");
        press(&mut app, KeyCode::Enter);

        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "3.25");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Results);
        let result = app.calculator.inputs.result().unwrap();
        assert_eq!(result.loan_amount, 400_000.0);
        assert_eq!(result.loan_to_value_percent, 80.0);
        let table = app.calculator.schedule.as_ref().unwrap();
        assert_eq!(table.summary.months_to_payoff, 360);

        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.calculator.table_state.selected(), Some(359));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Calculator);
    }

    #[test]
    fn calculator_blocks_empty_step() {
        let (mut app, _media) = browsing();
        app.browse.filters.query = "no such place".to_string();
        app.refresh_results();
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.calculator.wizard.step_index(), 0);
        assert!(app.status.is_some());

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.calculator.inputs.property_value, "");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Browse);
    }

    #[test]
    fn upload_flow_publishes_listing() {
        let (mut app, _media) = browsing();
        let before = app.catalog.len();
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.screen, Screen::Upload);

        type_text(&mut app, "Cedar Cabin");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Bend, OR");
        press(&mut app, KeyCode::Enter);

        type_text(&mut app, "385000");
        press(&mut app, KeyCode::BackTab);
        type_text(&mut app, "100");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Browse);
        assert_eq!(app.catalog.len(), before + 1);
        let added = app.catalog.get(before as u32 + 1).unwrap();
        assert_eq!(added.title, "Cedar Cabin");
        assert_eq!(added.available_shares, 100);
        assert_eq!(app.upload.form().value(fields::TITLE), "");
    }

    #[test]
    fn upload_reports_bad_photo() {
        let (mut app, _media) = browsing();
        press(&mut app, KeyCode::Char('u'));
        app.upload.form_mut().set(fields::TITLE, "Cedar Cabin");
        app.upload.form_mut().set(fields::PROPERTY_TYPE, "House");
        app.upload.form_mut().set(fields::LOCATION, "Bend, OR");
        app.upload.form_mut().set(fields::PRICE, "385000");
        app.upload.form_mut().set(fields::SHARES, "10");
        app.upload.form_mut().set(fields::PHOTOS, "/definitely/not/here.jpg");
        for _ in 0..4 {
            press(&mut app, KeyCode::Enter);
        }

        assert_eq!(app.screen, Screen::Upload);
        assert!(app.status.as_deref().unwrap().contains("does not exist"));
    }

    #[test]
    fn quit_from_browse_and_ctrl_c_anywhere() {
        let (mut app, _media) = browsing();
        assert!(press(&mut app, KeyCode::Char('q')));
        let (mut app, _media) = new_app();
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }
}
