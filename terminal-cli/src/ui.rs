use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Tab, TAB_ORDER};
use crate::views::send::{Field, SendView, Tone};

const TITLE: &str = "Bitcoin Wallet App";
const ADDRESS_PLACEHOLDER: &str = "myeFgAddr...";
const AMOUNT_PLACEHOLDER: &str = "0.001";

pub fn draw_ui(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            Local::now().format("%H:%M:%S").to_string(),
            Style::default().fg(Color::Gray),
        ),
    ]));
    f.render_widget(header, chunks[0]);

    let titles: Vec<String> = TAB_ORDER
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, t.name()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.active.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[1]);

    match app.active {
        Tab::Overview => draw_text_pane(
            f,
            chunks[2],
            Tab::Overview.name(),
            app.overview.body(),
            app.overview.is_error(),
        ),
        Tab::Send => draw_send(f, chunks[2], &app.send),
        Tab::Receive => draw_text_pane(
            f,
            chunks[2],
            Tab::Receive.name(),
            app.receive.body(),
            app.receive.is_error(),
        ),
        Tab::Transactions => draw_transactions(f, chunks[2], app),
    }

    let footer = Paragraph::new(footer_hint(app.active)).style(Style::default().fg(Color::Gray));
    f.render_widget(footer, chunks[3]);
}

fn footer_hint(tab: Tab) -> &'static str {
    match tab {
        Tab::Send => "F1-F4 tabs · Tab/↑↓ move · Enter submit · Esc clear field · Ctrl-C quit",
        Tab::Transactions => "F1-F4 tabs · r/Enter refresh · ↑↓ scroll · q quit",
        Tab::Overview | Tab::Receive => "F1-F4 tabs · Ctrl-←/→ cycle · q quit",
    }
}

fn draw_text_pane(f: &mut Frame, area: Rect, title: &str, body: String, is_error: bool) {
    let style = if is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let para = Paragraph::new(body)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn draw_send(f: &mut Frame, area: Rect, send: &SendView) {
    let outer = Block::default().borders(Borders::ALL).title(Tab::Send.name());
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(inner);

    f.render_widget(Paragraph::new("Recipient Address:"), rows[0]);
    draw_input(
        f,
        rows[1],
        &send.address,
        ADDRESS_PLACEHOLDER,
        send.focus == Field::Address,
    );
    f.render_widget(Paragraph::new("Amount (BTC):"), rows[2]);
    draw_input(
        f,
        rows[3],
        &send.amount,
        AMOUNT_PLACEHOLDER,
        send.focus == Field::Amount,
    );

    let button_style = if send.focus == Field::SendButton {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
    };
    let button = Paragraph::new(Span::styled(" Send ", button_style))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, Rect { width: rows[4].width.min(10), ..rows[4] });

    if let Some((text, tone)) = send.feedback() {
        let color = match tone {
            Tone::Pending => Color::Gray,
            Tone::Success => Color::Green,
            Tone::Error => Color::Red,
        };
        let feedback = Paragraph::new(text)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false });
        f.render_widget(feedback, rows[5]);
    }
}

fn draw_input(f: &mut Frame, area: Rect, value: &str, placeholder: &str, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let content = if value.is_empty() {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    };
    let input = Paragraph::new(content).block(Block::default().borders(Borders::ALL).border_style(border));
    f.render_widget(input, area);
    if focused {
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1).saturating_add(value.chars().count() as u16).min(max_x);
        f.set_cursor_position((x, area.y + 1));
    }
}

fn draw_transactions(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(area);

    let button = Paragraph::new(" Refresh ").block(Block::default().borders(Borders::ALL));
    f.render_widget(button, Rect { width: rows[0].width.min(11), ..rows[0] });

    let entry_style = if app.transactions.is_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let items: Vec<ListItem> = app
        .transactions
        .entries()
        .into_iter()
        .map(|entry| ListItem::new(Text::from(format!("{entry}\n"))).style(entry_style))
        .collect();
    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.transactions.selected.min(items.len() - 1)));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(Tab::Transactions.name()))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_stateful_widget(list, rows[1], &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::OverviewView;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draws_tabs_and_title() {
        let app = AppState::new();
        let text = screen_text(&app);
        assert!(text.contains(TITLE));
        for tab in TAB_ORDER {
            assert!(text.contains(tab.name()));
        }
        assert!(text.contains("Loading wallet summary"));
    }

    #[test]
    fn test_send_feedback_hidden_until_submit() {
        let mut app = AppState::new();
        app.overview = OverviewView::Failed("offline".to_string());
        app.activate(Tab::Send);
        let text = screen_text(&app);
        assert!(text.contains("Recipient Address:"));
        assert!(text.contains(ADDRESS_PLACEHOLDER));
        assert!(!text.contains("Missing address"));

        app.send.state = crate::views::send::SendState::Rejected(
            crate::views::send::ValidationError::MissingAddress,
        );
        assert!(screen_text(&app).contains("Missing address"));
    }
}
