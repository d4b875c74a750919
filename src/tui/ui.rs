use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, CreatorForm, FormKind, ReportStatus};
use crate::models::{CreatorReport, Panel, SentimentLabel};

pub fn draw(frame: &mut Frame, app: &App) {
    // Main horizontal split: 1/3 left, 2/3 right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3), // Left pane: roster
            Constraint::Ratio(2, 3), // Right pane: dashboard
        ])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Creator list
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Creator heading
            Constraint::Length(5),      // Channel stats
            Constraint::Percentage(50), // Sentiment
            Constraint::Min(0),         // News
            Constraint::Length(1),      // Report status
        ])
        .split(main_chunks[1]);

    render_header(frame, app, left_chunks[0]);
    render_creator_list(frame, app, left_chunks[1]);
    render_left_status(frame, app, left_chunks[2]);

    render_creator_heading(frame, app, right_chunks[0]);
    match (&app.report, app.report_status) {
        (Some(report), ReportStatus::Loaded) => {
            render_stats(frame, report, right_chunks[1]);
            render_sentiment(frame, report, right_chunks[2]);
            render_news(frame, app, report, right_chunks[3]);
        }
        _ => {
            let area = right_chunks[1].union(right_chunks[3]);
            render_report_prompt(frame, app, area);
        }
    }
    render_right_status(frame, app, right_chunks[4]);

    if let Some(form) = &app.session.form {
        render_form(frame, form);
    }

    if let Some(name) = &app.session.pending_removal {
        render_confirm_remove(frame, name);
    }

    if app.session.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Creator Pulse ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stats = format!(" {} creators in roster", app.creators.len());
    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_creator_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .creators
        .iter()
        .map(|creator| {
            let mut spans = vec![Span::styled(
                creator.name.clone(),
                Style::default().fg(Color::White),
            )];
            if let Some(priority) = &creator.priority {
                spans.push(Span::styled(
                    format!(" [{priority}]"),
                    Style::default().fg(Color::Yellow),
                ));
            }
            if let Some(status) = &creator.status {
                spans.push(Span::styled(
                    format!(" {status}"),
                    Style::default().fg(Color::Blue),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.creators.is_empty() {
        state.select(Some(app.session.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_left_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match (&app.lookup_pending, &app.session.status) {
        (Some(name), _) => (
            format!("{} Looking up channel for {name}...", app.spinner()),
            Color::Yellow,
        ),
        (None, Some(message)) => (message.clone(), Color::Yellow),
        (None, None) => (
            "j/k:nav  a:add  e:edit  d:remove  ?:help  q:quit".to_string(),
            Color::DarkGray,
        ),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_creator_heading(frame: &mut Frame, app: &App, area: Rect) {
    let heading = match app.selected_creator() {
        Some(creator) => {
            let title = app
                .report
                .as_ref()
                .and_then(|r| r.channel_title.as_deref())
                .filter(|t| *t != creator.name);
            match title {
                Some(title) => format!("{} ({}) - {}", creator.name, title, creator.channel_id),
                None => format!("{} - {}", creator.name, creator.channel_id),
            }
        }
        None => "No creators yet. Press 'a' to add one.".to_string(),
    };

    let block = Block::default()
        .title(" Creator ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(heading).block(block);
    frame.render_widget(paragraph, area);
}

fn render_report_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.report_status {
        ReportStatus::Loading => format!("{} Loading report...", app.spinner()),
        _ if app.selected_creator().is_some() => {
            "Press Enter to load the dashboard for this creator.".to_string()
        }
        _ => String::new(),
    };

    let block = Block::default()
        .title(" Dashboard ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn placeholder_line<T>(panel: &Panel<T>) -> Line<'static> {
    let color = match panel {
        Panel::Failed(_) => Color::Red,
        Panel::MissingCredential(_) => Color::Yellow,
        _ => Color::DarkGray,
    };
    Line::styled(
        panel.placeholder().unwrap_or_default(),
        Style::default().fg(color),
    )
}

fn render_stats(frame: &mut Frame, report: &CreatorReport, area: Rect) {
    let lines = match &report.stats {
        Panel::Loaded(stats) => vec![
            Line::from(format!("Subscribers:  {}", stats.subscribers_label())),
            Line::from(format!("Total Views:  {}", stats.views_label())),
            Line::from(format!("Total Videos: {}", stats.videos_label())),
        ],
        other => vec![placeholder_line(other)],
    };

    let block = Block::default()
        .title(" Channel Stats ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn label_color(label: SentimentLabel) -> Color {
    match label {
        SentimentLabel::Positive => Color::Green,
        SentimentLabel::Neutral => Color::Gray,
        SentimentLabel::Negative => Color::Red,
    }
}

fn render_sentiment(frame: &mut Frame, report: &CreatorReport, area: Rect) {
    let mut lines = Vec::new();

    match &report.sentiment {
        Panel::Loaded(sentiment) => {
            lines.push(Line::styled(
                format!("Based on {} comments", sentiment.total),
                Style::default().fg(Color::DarkGray),
            ));
            for label in SentimentLabel::ALL {
                let percent = sentiment.summary.get(label);
                let bar = "█".repeat((percent / 5.0).round() as usize);
                lines.push(Line::from(vec![
                    Span::raw(format!("{:<9} {:>5.1}% ", label.label(), percent)),
                    Span::styled(bar, Style::default().fg(label_color(label))),
                ]));
            }
            for label in [SentimentLabel::Positive, SentimentLabel::Negative] {
                let examples = sentiment.examples.get(label);
                if examples.is_empty() {
                    continue;
                }
                lines.push(Line::from(""));
                lines.push(Line::styled(
                    format!("{} examples:", label.label()),
                    Style::default()
                        .fg(label_color(label))
                        .add_modifier(Modifier::BOLD),
                ));
                for example in examples {
                    lines.push(Line::from(format!("  \"{example}\"")));
                }
            }
        }
        other => lines.push(placeholder_line(other)),
    }

    let title = match &report.video_id {
        Some(id) => format!(" Comment Sentiment (video {id}) "),
        None => " Comment Sentiment ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_news(frame: &mut Frame, app: &App, report: &CreatorReport, area: Rect) {
    let block = Block::default()
        .title(" News Mentions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let articles = match &report.news {
        Panel::Loaded(articles) => articles,
        other => {
            let paragraph = Paragraph::new(placeholder_line(other))
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let items: Vec<ListItem> = articles
        .iter()
        .map(|article| {
            ListItem::new(vec![
                Line::styled(article.title.clone(), Style::default().fg(Color::White)),
                Line::styled(
                    format!("  {} - {}", article.source, article.published_label()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.session.selected_article));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_right_status(frame: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.report, app.report_status) {
        (_, ReportStatus::Loading) => format!("{} Loading...", app.spinner()),
        (Some(report), ReportStatus::Loaded) => format!(
            "Loaded {}  r:reload  n:next article  o:open",
            report.generated_at.format("%H:%M:%S")
        ),
        _ => String::new(),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_form(frame: &mut Frame, form: &CreatorForm) {
    let area = centered_rect(60, 40, frame.area());

    let title = match form.kind {
        FormKind::Add => " Add Creator ".to_string(),
        FormKind::Edit => format!(
            " Edit {} ",
            form.target.as_deref().unwrap_or_default()
        ),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut lines: Vec<Line> = Vec::new();
    for (index, field) in form.fields.iter().enumerate() {
        let focused = index == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::styled(format!(" {}", field.label), label_style));
        lines.push(Line::from(format!(" > {}{}", field.value, cursor)));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(
        " Tab:next field  Enter:save  Esc:cancel",
        Style::default().fg(Color::DarkGray),
    ));

    let paragraph = Paragraph::new(lines).block(block);

    // Clear the area first
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_confirm_remove(frame: &mut Frame, name: &str) {
    let area = centered_rect(50, 20, frame.area());

    let block = Block::default()
        .title(" Remove Creator ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = format!("Remove {name} from the roster? (y/n)");
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = [
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   Enter    Load dashboard",
        "   r        Reload dashboard",
        "",
        " Roster:",
        "   a        Add creator",
        "   e        Edit creator",
        "   d        Remove creator",
        "",
        " News:",
        "   n        Next article",
        "   o        Open article in browser",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::roster::RosterStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[tokio::test]
    async fn draws_roster_and_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::with_services(
            RosterStore::new(dir.path().join("roster.csv")),
            Dashboard::from_parts(None, None, 10),
        )
        .unwrap();
        app.add_creator("Alice", "UC1", "").await.unwrap();

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("1 creators in roster"));
        assert!(text.contains("Alice"));
        assert!(text.contains("Press Enter to load"));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 20, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 10);
        assert_eq!((inner.x, inner.y), (20, 20));
    }
}
