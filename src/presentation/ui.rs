use crate::application::{App, AppMode, CameraStatus, CandidatePanel, EligibilityStatus};
use crate::domain::CPF_LEN;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    if app.mode == AppMode::Confirmation {
        render_confirmation(f, chunks[1]);
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        render_identification(f, app, columns[0]);
        render_ballot(f, app, columns[1]);
    }
    render_status_bar(f, app, chunks[2]);

    if app.show_help {
        render_help_popup(f);
    }
    if let Some(ref message) = app.alert {
        render_alert_popup(f, message);
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("urna - Electronic Ballot Box")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(header, area);
}

fn cpf_field(input: &str) -> String {
    let mut field: String = input.to_string();
    field.extend(std::iter::repeat('_').take(CPF_LEN.saturating_sub(input.len())));
    field
}

fn eligibility_line(status: &EligibilityStatus) -> Line<'static> {
    match status {
        EligibilityStatus::Neutral => Line::from(""),
        EligibilityStatus::Checking => {
            Line::styled("Checking...", Style::default().fg(Color::Yellow))
        }
        EligibilityStatus::Allowed { message } => {
            let text = match message {
                Some(message) => format!("✓ CPF cleared. {message}"),
                None => "✓ CPF cleared".to_string(),
            };
            Line::styled(text, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        }
        EligibilityStatus::Denied { message } => Line::styled(
            format!("⚠ {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        EligibilityStatus::Unreachable => {
            Line::styled("⚠ Unable to verify CPF", Style::default().fg(Color::Red))
        }
    }
}

fn render_identification(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if app.mode == AppMode::Identify {
        let field_style = match app.eligibility {
            EligibilityStatus::Allowed { .. } => Style::default().fg(Color::Green),
            EligibilityStatus::Denied { .. } => Style::default().fg(Color::Red),
            _ => Style::default(),
        };
        lines.push(Line::from(vec![
            Span::raw("CPF: "),
            Span::styled(cpf_field(&app.cpf_input), field_style),
        ]));
        lines.push(eligibility_line(&app.eligibility));
        lines.push(Line::from(""));

        let start_style = if app.can_start_voting() {
            Style::default().fg(Color::Black).bg(Color::Blue)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let start_label = if app.capturing {
            " Taking photo... "
        } else {
            " Enter: start voting "
        };
        lines.push(Line::styled(start_label, start_style));
    } else {
        let voter = app.session.voter_name.as_deref().unwrap_or("Voter");
        lines.push(Line::styled(
            format!("✓ {voter} authenticated"),
            Style::default().fg(Color::Green),
        ));
        if let Some(ref photo) = app.session.photo {
            lines.push(Line::from(format!("Photo captured ({} bytes)", photo.len())));
        }
    }

    lines.push(Line::from(""));
    lines.push(match app.camera {
        CameraStatus::Unknown => Line::styled("Camera: starting", Style::default().fg(Color::Yellow)),
        CameraStatus::Ready => Line::styled("Camera: ready", Style::default().fg(Color::Green)),
        CameraStatus::Failed => Line::styled("Camera: unavailable", Style::default().fg(Color::Red)),
    });

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Identification"));
    f.render_widget(panel, area);
}

fn digit_box(digit: Option<char>) -> Span<'static> {
    Span::styled(
        format!("[ {} ]", digit.unwrap_or(' ')),
        Style::default().add_modifier(Modifier::BOLD),
    )
}

fn candidate_lines(panel: &CandidatePanel) -> Vec<Line<'static>> {
    match panel {
        CandidatePanel::Hidden => vec![Line::from("...")],
        CandidatePanel::Found(info) => vec![
            Line::styled(
                format!("Name: {}", info.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::from(format!("Department: {}", info.department)),
        ],
        CandidatePanel::NotFound => vec![
            Line::styled(
                "NO SUCH CANDIDATE",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::from("Check the number"),
        ],
        CandidatePanel::Blank => vec![Line::styled(
            "BLANK VOTE",
            Style::default().add_modifier(Modifier::BOLD),
        )],
    }
}

fn render_ballot(f: &mut Frame, app: &App, area: Rect) {
    let live = app.mode == AppMode::Voting;

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Number: "),
            digit_box(app.ballot.slot(0)),
            Span::raw(" "),
            digit_box(app.ballot.slot(1)),
        ]),
        Line::from(""),
    ];
    if live {
        lines.extend(candidate_lines(&app.candidate));
    }
    if app.submitting {
        lines.push(Line::from(""));
        lines.push(Line::styled("Sending vote...", Style::default().fg(Color::Yellow)));
    }

    let style = if live {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let panel = Paragraph::new(lines)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Ballot"));
    f.render_widget(panel, area);
}

fn render_confirmation(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::styled("FIM", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("Vote recorded. Thank you!"),
    ];

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Ballot"));
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.mode {
        AppMode::Identify => "Type your CPF | Backspace: erase | Esc: clear | Enter: start voting | F1: help",
        AppMode::Voting => "0-9: number | B: blank | C/Backspace: correct | Enter: confirm | F1: help",
        AppMode::Confirmation => "Please wait, the kiosk will restart shortly",
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Identify => Style::default(),
            AppMode::Voting => Style::default().fg(Color::Green),
            AppMode::Confirmation => Style::default().fg(Color::Cyan),
        });
    f.render_widget(status, area);
}

fn render_alert_popup(f: &mut Frame, message: &str) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 4,
        y: area.height / 3,
        width: area.width / 2,
        height: area.height.min(5),
    };

    f.render_widget(Clear, popup_area);
    let alert = Paragraph::new(vec![Line::from(message.to_string()), Line::from("(Enter to close)")])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Attention")
                .style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(alert, popup_area);
}

fn render_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);
    let help_widget = Paragraph::new(HELP_TEXT)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("How to vote")
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = "1. Type your 11-digit CPF.
2. Wait for \"CPF cleared\", then press Enter.
   Your photo is taken once, when voting starts.
3. Type the 2-digit candidate number.
   The candidate's name and department appear.
4. Press Enter to confirm.

B               Blank vote
C / Backspace   Correct (start the number over)
Enter           Confirm vote / close messages
F1 / Esc        Close this help";
