//! Core of the homebase marketplace front-end: loan math, step wizards, forms,
//! pagination and listing search. Everything here is synchronous and free of
//! terminal concerns; the `homebase` binary draws it with ratatui.

pub mod calculator;
pub mod config;
pub mod flows;
pub mod form;
pub mod format;
pub mod listing;
pub mod pagination;
pub mod upload;
pub mod wizard;

pub use calculator::{compute, schedule, AmortizationResult, LoanError, LoanInputs, LoanQuote, Schedule};
pub use config::Settings;
pub use flows::{Flow, FlowEvent};
pub use form::{FieldErrors, FormData, FormState};
pub use listing::{Catalog, Property, PropertyFilter, PropertyType};
pub use pagination::Paginator;
pub use upload::{LocalGateway, UploadError, UploadGateway};
pub use wizard::{Step, SubmitAction, Wizard};
