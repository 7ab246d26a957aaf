use std::str::FromStr;

use codedaily_core::snapshot::{DurationChoice, FeatureStatus};
use codedaily_core::{Screen, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::app::TuiApp;

const QUOTE: &str = "\"One line of code at a time.\"";

pub fn draw(f: &mut Frame, app: &TuiApp) {
    let accent = Color::from_str(&app.ui.accent_color).unwrap_or(Color::Green);
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(2), // Notice + keys
        ])
        .split(area);

    if app.snapshot.view != View::Onboarding {
        draw_header(f, app, accent, chunks[0]);
    }

    match &app.snapshot.screen {
        Screen::Onboarding => draw_onboarding(f, app, accent, chunks[1]),
        Screen::Input {
            selected_duration,
            durations,
            credits_to_deep_focus,
        } => draw_input(
            f,
            app,
            accent,
            chunks[1],
            *selected_duration,
            durations,
            *credits_to_deep_focus,
        ),
        Screen::Timer {
            task_name,
            is_timer_active,
            ..
        } => draw_timer(f, app, accent, chunks[1], task_name, *is_timer_active),
        Screen::Completed { task_name, reward } => {
            draw_completed(f, app, accent, chunks[1], task_name, *reward)
        }
        Screen::Roadmap {
            features,
            next_feature,
            progress,
            credits_to_next,
        } => {
            let next = next_feature.map(|n| (n.title, n.cost));
            draw_roadmap(f, app, accent, chunks[1], features, next, *progress, *credits_to_next)
        }
    }

    draw_footer(f, app, chunks[2]);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn draw_header(f: &mut Frame, app: &TuiApp, accent: Color, area: Rect) {
    let line = Line::from(vec![
        Span::styled("</> Code Daily", bold().fg(accent)),
        Span::raw("   "),
        Span::styled(format!("Hi, {}", app.snapshot.username), dim()),
        Span::raw("   "),
        Span::styled(format!("💎 {} credits", app.snapshot.credits), bold()),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_onboarding(f: &mut Frame, app: &TuiApp, accent: Color, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Welcome to Code Daily", bold().fg(accent))),
        Line::from(""),
        Line::from("Let's personalize your focus journey. What should we call you?"),
        Line::from(""),
        Line::from(Span::styled(format!("> {}_", app.input), bold())),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn draw_input(
    f: &mut Frame,
    app: &TuiApp,
    accent: Color,
    area: Rect,
    selected_duration: u64,
    durations: &[DurationChoice],
    credits_to_deep_focus: Option<u64>,
) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Ready to Code, {}?", app.snapshot.username),
            bold().fg(accent),
        )),
        Line::from("Commit to a session. Earn credits to unlock new tools."),
    ];
    if let Some(missing) = credits_to_deep_focus {
        lines.push(Line::from(Span::styled(
            format!("{missing} more credits to unlock Deep Focus Mode"),
            dim(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(format!("> {}_", app.input), bold())));
    lines.push(Line::from(""));

    let buttons: Vec<Span> = durations
        .iter()
        .flat_map(|d| {
            let style = if d.locked {
                dim().add_modifier(Modifier::CROSSED_OUT)
            } else if d.selected {
                bold().fg(Color::Black).bg(accent)
            } else {
                Style::default()
            };
            let label = if d.locked {
                format!(" 🔒{} ", d.label)
            } else {
                format!(" {} ", d.label)
            };
            [Span::styled(label, style), Span::raw("  ")]
        })
        .collect();
    lines.push(Line::from(buttons));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Set your task and focus for {} minutes.",
            selected_duration / 60
        ),
        dim(),
    )));

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(p, area);
}

fn draw_timer(
    f: &mut Frame,
    app: &TuiApp,
    accent: Color,
    area: Rect,
    task_name: &str,
    is_timer_active: bool,
) {
    let (clock, progress) = app.timer_face().unwrap_or_else(|| ("00:00".into(), 0.0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Progress bar
            Constraint::Length(3), // Task
            Constraint::Length(3), // Clock
            Constraint::Length(2), // Status
            Constraint::Min(0),
        ])
        .split(area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(accent))
        .ratio(progress.clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, chunks[0]);

    let task = Paragraph::new(vec![
        Line::from(Span::styled("FOCUS MODE", dim())),
        Line::from(Span::styled(task_name.to_string(), bold())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(task, chunks[1]);

    let clock = Paragraph::new(Line::from(Span::styled(clock, bold().fg(accent))))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(clock, chunks[2]);

    let status = if is_timer_active {
        "Keep coding..."
    } else {
        "Paused"
    };
    let mut lines = vec![Line::from(Span::styled(status, dim()))];
    if app.ui.show_quote {
        lines.push(Line::from(Span::styled(
            QUOTE,
            dim().add_modifier(Modifier::ITALIC),
        )));
    }
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[3],
    );
}

fn draw_completed(
    f: &mut Frame,
    app: &TuiApp,
    accent: Color,
    area: Rect,
    task_name: &str,
    reward: u64,
) {
    let lines = vec![
        Line::from("💎"),
        Line::from(Span::styled(
            format!("Awesome, {}!", app.snapshot.username),
            bold().fg(accent),
        )),
        Line::from(vec![
            Span::raw("You completed "),
            Span::styled(task_name.to_string(), bold()),
            Span::raw("."),
        ]),
        Line::from(""),
        Line::from(Span::styled("REWARD", dim())),
        Line::from(Span::styled(format!("+{reward} Credits"), bold().fg(accent))),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

#[allow(clippy::too_many_arguments)]
fn draw_roadmap(
    f: &mut Frame,
    app: &TuiApp,
    accent: Color,
    area: Rect,
    features: &[FeatureStatus],
    next: Option<(&str, u64)>,
    progress: f64,
    credits_to_next: Option<u64>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Balance
            Constraint::Length(1), // Progress
            Constraint::Length(2), // Hint
            Constraint::Min(0),    // Features
        ])
        .split(area);

    let next_label = match next {
        Some((_, cost)) => format!("Next unlock: {cost} Credits"),
        None => "Max Level".to_string(),
    };
    let balance = Paragraph::new(vec![
        Line::from(Span::styled("Feature Roadmap", bold().fg(accent))),
        Line::from(vec![
            Span::styled(format!("Current balance: {}", app.snapshot.credits), bold()),
            Span::raw("   "),
            Span::styled(next_label, dim()),
        ]),
    ]);
    f.render_widget(balance, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(accent))
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);

    let hint = match (next, credits_to_next) {
        (Some((title, _)), Some(missing)) => format!("{missing} more credits to unlock {title}"),
        _ => "You have unlocked everything!".to_string(),
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, dim())).alignment(Alignment::Center),
        chunks[2],
    );

    let lines: Vec<Line> = features
        .iter()
        .flat_map(|s| {
            let f = &s.feature;
            let badge = if s.unlocked {
                Span::styled(" UNLOCKED ", bold().fg(Color::Black).bg(accent))
            } else {
                Span::styled(format!(" LOCKED • {} ", f.cost), dim())
            };
            let title_style = if s.unlocked { bold() } else { dim() };
            [
                Line::from(vec![
                    Span::raw(format!("{}  ", f.icon)),
                    Span::styled(f.title, title_style),
                    Span::raw(" "),
                    badge,
                ]),
                Line::from(Span::styled(format!("    {}", f.description), dim())),
                Line::from(""),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[3]);
}

fn draw_footer(f: &mut Frame, app: &TuiApp, area: Rect) {
    let keys = match app.snapshot.view {
        View::Onboarding => "enter: let's go  esc: quit",
        View::Input => "enter: start  tab/←→: duration  F2: upgrades  esc: quit",
        View::Timer => "space: pause/resume  esc: exit session  r: upgrades  q: quit",
        View::Completed => "enter: collect & continue  r: upgrades  q: quit",
        View::Roadmap => "esc: back  s: sign out  q: quit",
    };
    let mut lines = Vec::new();
    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(keys, dim())));
    f.render_widget(Paragraph::new(lines), area);
}
