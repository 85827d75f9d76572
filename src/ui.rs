use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use homebase::flows::{CalculatorStep, Flow, ListingStep, OnboardingStep};
use homebase::form::FieldKind;
use homebase::format::{
    format_percent, AVAILABILITY_DECIMALS, LTV_DECIMALS, OWNERSHIP_DECIMALS,
};

use crate::app::{App, FilterField, Screen};

const HEADING: &str = "Homebase";

pub fn ui(f: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::Onboarding => render_onboarding_screen(f, app),
        Screen::Browse => render_browse_screen(f, app),
        Screen::Calculator => render_calculator_screen(f, app),
        Screen::Results => render_results_screen(f, app),
        Screen::Upload => render_upload_screen(f, app),
    }
}

fn render_title(f: &mut Frame, area: Rect, text: &str) {
    let title = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, area);
}

/// Bottom line: the last status message if there is one, otherwise key help.
fn render_help(f: &mut Frame, area: Rect, app: &App, help: &str) {
    let line = match &app.status {
        Some(status) => Paragraph::new(status.clone()).style(Style::default().fg(Color::Cyan)),
        None => Paragraph::new(help.to_string()).style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(
        line.alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn highlight(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_browse_screen(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = match &app.profile {
        Some(profile) => format!("{HEADING} - Browse Properties | {}", profile.name),
        None => format!("{HEADING} - Browse Properties"),
    };
    render_title(f, chunks[0], &title);

    let filters = &app.browse.filters;
    let mut spans = Vec::new();
    for field in FilterField::ALL {
        let editing = app.browse.editing == Some(field);
        spans.push(Span::styled(format!("{}: ", field.label()), highlight(editing)));
        let value = field.value(filters);
        let shown = if editing { format!("{value}_") } else { value.to_string() };
        spans.push(Span::styled(format!("[{shown}]  "), highlight(editing)));
    }
    let kind = filters.property_type.map(|k| k.label()).unwrap_or("Any");
    spans.push(Span::raw(format!("Type: {kind}  Sort: {}", filters.sort.label())));
    let filter_bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Filters"));
    f.render_widget(filter_bar, chunks[1]);

    let currency = &app.settings.currency;
    let page = app.page();
    let total = app.results().len();
    let rows: Vec<Row> = page
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.title.clone()),
                Cell::from(p.location.clone()),
                Cell::from(p.property_type.label()),
                Cell::from(currency.format(p.price)),
                Cell::from(p.bedrooms.to_string()),
                Cell::from(p.bathrooms.to_string()),
                Cell::from(p.area_sqft.to_string()),
                Cell::from(format_percent(p.availability_percent(), AVAILABILITY_DECIMALS)),
                Cell::from(currency.format(p.share_price())),
            ])
            .height(1)
        })
        .collect();
    let selected = app.selected_property().map(|p| {
        format!(
            "{} | 1 share = {} ownership for {}",
            p.title,
            format_percent(p.ownership_percent(1), OWNERSHIP_DECIMALS),
            currency.format(p.share_price())
        )
    });

    let header = Row::new(vec![
        "Title", "Location", "Type", "Price", "Beds", "Baths", "Sq ft", "Available", "Share",
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    .height(1);
    let widths = [
        Constraint::Length(24),
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{total} properties")),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, chunks[2], &mut app.browse.table_state);

    f.render_widget(
        Paragraph::new(selected.unwrap_or_default()).style(Style::default().fg(Color::Green)),
        chunks[3],
    );
    render_pagination(f, chunks[4], app);

    let help = if app.browse.editing.is_some() {
        "type to filter | Tab: next field | Enter/Esc: done"
    } else {
        "j/k: select | h/l or 1-5: page | /: filter | t: type | s: sort | x: clear | c/Enter: loan | u: list a property | o: onboarding | q: quit"
    };
    render_help(f, chunks[5], app, help);
}

/// Page buttons. Nothing at all is drawn when there is only one page.
fn render_pagination(f: &mut Frame, area: Rect, app: &App) {
    let paginator = &app.browse.paginator;
    if !paginator.is_visible() {
        return;
    }

    let current = paginator.current_page();
    let mut spans = vec![Span::styled("‹ prev ", highlight(current > 1))];
    for page in paginator.window() {
        spans.push(Span::styled(format!("[{page}]"), highlight(page == current)));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        "next ›",
        highlight(current < paginator.total_pages()),
    ));
    spans.push(Span::styled(
        format!("   page {current} of {}", paginator.total_pages()),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn render_step_progress(f: &mut Frame, area: Rect, index: usize, count: usize, label: &str) {
    let gauge = Gauge::default()
        .block(Block::default())
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((index + 1) as f64 / count as f64)
        .label(format!("Step {} of {count}: {label}", index + 1));
    f.render_widget(gauge, area);
}

fn render_calculator_screen(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(7),
                Constraint::Length(8),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(f.size());

    render_title(f, chunks[0], &format!("{HEADING} - Loan Calculator"));

    let calculator = &app.calculator;
    let step = calculator.wizard.current_step();
    render_step_progress(
        f,
        chunks[1],
        calculator.wizard.step_index(),
        calculator.wizard.step_count(),
        step.label,
    );

    let inputs = &calculator.inputs;
    let input_block = Block::default().borders(Borders::ALL).title(step.label);
    let input = match step.kind {
        CalculatorStep::DownPayment => {
            let percent = inputs.down_payment_is_percent;
            let marker = |active: bool| if active { "▶" } else { " " };
            Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("{} Percentage: {}%", marker(percent), inputs.down_payment_percent),
                    highlight(percent),
                )),
                Line::from(Span::styled(
                    format!(
                        "{} Dollar Amount: ${}",
                        marker(!percent),
                        inputs.down_payment_amount
                    ),
                    highlight(!percent),
                )),
            ])
        }
        CalculatorStep::InterestRate => {
            Paragraph::new(format!("{}%", calculator.current_text())).style(highlight(true))
        }
        CalculatorStep::LoanTerm => {
            Paragraph::new(format!("{} years", calculator.current_text())).style(highlight(true))
        }
        CalculatorStep::PropertyValue | CalculatorStep::ExtraPrincipal => {
            Paragraph::new(format!("${}", calculator.current_text())).style(highlight(true))
        }
    };
    f.render_widget(input.block(input_block), chunks[2]);

    let currency = &app.settings.currency;
    let preview = match inputs.result() {
        Some(result) => vec![
            Line::from(vec![
                Span::styled("Monthly Payment: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    currency.format_with_digits(result.monthly_payment, 2),
                    Style::default().fg(Color::Green),
                ),
            ]),
            Line::from(vec![
                Span::styled("Loan Amount: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(currency.format(result.loan_amount)),
            ]),
            Line::from(vec![
                Span::styled("Total Interest: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    currency.format(result.total_interest),
                    Style::default().fg(Color::Red),
                ),
            ]),
            Line::from(vec![
                Span::styled("Loan-to-Value: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format_percent(result.loan_to_value_percent, LTV_DECIMALS)),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "Fill in every field to see your payment.",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    f.render_widget(
        Paragraph::new(preview).block(Block::default().borders(Borders::ALL).title("Estimate")),
        chunks[3],
    );

    let help = match step.kind {
        CalculatorStep::DownPayment => {
            "Tab: toggle between % and $ | Enter/l/→: continue | Esc/h/←: back"
        }
        CalculatorStep::ExtraPrincipal => "Enter/l/→: calculate | Esc/h/←: back",
        _ => "Enter/l/→: continue | Esc/h/←: back",
    };
    render_help(f, chunks[4], app, help);
}

fn render_results_screen(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Length(7),
                Constraint::Min(0),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.size());

    render_title(f, chunks[0], "Loan Summary");

    let Some(table_data) = &app.calculator.schedule else {
        return;
    };
    let currency = &app.settings.currency;
    let result = app.calculator.inputs.result();
    let summary = &table_data.summary;

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    if let Some(result) = result {
        lines.push(Line::from(vec![
            Span::styled("Monthly Payment: ", bold),
            Span::styled(
                currency.format_with_digits(result.monthly_payment, 2),
                Style::default().fg(Color::Green),
            ),
            Span::styled("   Loan Amount: ", bold),
            Span::raw(currency.format(result.loan_amount)),
            Span::styled("   Loan-to-Value: ", bold),
            Span::raw(format_percent(result.loan_to_value_percent, LTV_DECIMALS)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Interest Paid: ", bold),
        Span::styled(currency.format(summary.total_interest), Style::default().fg(Color::Red)),
        Span::styled("   Principal Paid: ", bold),
        Span::styled(currency.format(summary.total_principal), Style::default().fg(Color::Green)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Total Paid: ", bold),
        Span::raw(currency.format(summary.total_paid)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Months to Payoff: ", bold),
        Span::raw(format!(
            "{} ({:.1} years)",
            summary.months_to_payoff,
            summary.months_to_payoff as f64 / 12.0
        )),
    ]));
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Financial Summary")),
        chunks[1],
    );

    let header = Row::new(vec!["Month", "Payment", "Interest", "Principal", "Extra", "Balance"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1);
    let rows: Vec<Row> = table_data
        .rows
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.month.to_string()),
                Cell::from(currency.format_with_digits(row.payment, 2)),
                Cell::from(currency.format_with_digits(row.interest, 2)),
                Cell::from(currency.format_with_digits(row.principal, 2)),
                Cell::from(currency.format_with_digits(row.extra_principal, 2)),
                Cell::from(currency.format(row.balance)),
            ])
            .height(1)
        })
        .collect();
    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Amortization Schedule"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, chunks[2], &mut app.calculator.table_state);

    render_help(
        f,
        chunks[3],
        app,
        "j/k or ↑/↓: navigate | g/G: top/bottom | e: export CSV | h/←: back | b: browse | q: quit",
    );
}

/// Step strip, the current step's fields and their errors.
fn render_flow<K>(f: &mut Frame, area: Rect, flow: &Flow<K>, intro: &str) {
    let wizard = flow.wizard();
    let step = wizard.current_step();
    let fields = step.fields;

    let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let strip: Vec<Span> = wizard
        .steps()
        .iter()
        .enumerate()
        .flat_map(|(i, s)| {
            let style = if i == wizard.step_index() {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {}. {} ", i + 1, s.label), style), Span::raw("›")]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(strip)), chunks[0]);

    if fields.is_empty() {
        f.render_widget(
            Paragraph::new(intro.to_string()).style(Style::default().fg(Color::White)),
            chunks[2],
        );
        return;
    }

    let form = flow.form();
    for (i, key) in fields.iter().enumerate() {
        let Some(spec) = form.spec(key) else {
            continue;
        };
        let focused = flow.focused_field() == Some(*key);
        let mut title = spec.label.to_string();
        if !spec.required {
            title.push_str(" (optional)");
        }
        if let FieldKind::Choice(_) = spec.kind {
            title.push_str(" - Space to choose");
        }
        let mut block = Block::default().borders(Borders::ALL).title(title);
        if let Some(error) = form.error(key) {
            block = block
                .title(format!(" {error} "))
                .border_style(Style::default().fg(Color::Red));
        }
        let cursor = if focused { "_" } else { "" };
        let value = Paragraph::new(format!("{}{cursor}", form.value(key)))
            .style(highlight(focused))
            .block(block);
        f.render_widget(value, chunks[i + 2]);
    }
}

fn render_onboarding_screen(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(2)].as_ref())
        .split(f.size());

    render_title(f, chunks[0], &format!("Welcome to {HEADING}"));
    let intro = "Find a home, buy a share of one, or list your own property.\n\
                 Tell us a little about yourself and we will tailor the listings.";
    render_flow(f, chunks[1], &app.onboarding, intro);

    let help = match app.onboarding.wizard().current_step().kind {
        OnboardingStep::Welcome => "Enter: get started | Esc: skip",
        OnboardingStep::Profile => "Tab: next field | Enter: continue | Esc: back",
        OnboardingStep::Preferences => "Tab: next field | Space: choose | Enter: finish | Esc: back",
    };
    render_help(f, chunks[2], app, help);
}

fn render_upload_screen(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(2)].as_ref())
        .split(f.size());

    render_title(f, chunks[0], &format!("{HEADING} - List a Property"));

    let kind = app.upload.wizard().current_step().kind;
    if kind == ListingStep::Review {
        render_listing_review(f, chunks[1], app);
    } else {
        render_flow(f, chunks[1], &app.upload, "");
    }

    let help = match kind {
        ListingStep::Review => "Enter: publish | Esc: back",
        _ => "Tab/Shift-Tab: move between fields | Space: choose | Enter: continue | Esc: back",
    };
    render_help(f, chunks[2], app, help);
}

fn render_listing_review(f: &mut Frame, area: Rect, app: &App) {
    let form = app.upload.form();
    let lines: Vec<Line> = form
        .specs()
        .iter()
        .map(|spec| {
            let value = form.value(spec.key);
            let shown = if value.is_empty() { "-" } else { value };
            Line::from(vec![
                Span::styled(
                    format!("{}: ", spec.label),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(shown.to_string()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Review your listing")),
        area,
    );
}
