use {
    super::{
        input::{InputMode, InputState},
        renderer::{
            format_amount, format_fee_eth, format_fee_usdt, format_filter, format_market_value,
            short_hex,
        },
    },
    crate::view::{Tab, ViewSnapshot},
    ratatui::{
        layout::{Constraint, Layout as RatLayout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Paragraph, Row, Table, Tabs},
        Frame,
    },
};

/// Render one frame
pub fn render_layout(f: &mut Frame, snapshot: &ViewSnapshot, input: &InputState) {
    let chunks = RatLayout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Records
            Constraint::Length(4), // Status
        ])
        .split(f.size());

    render_tabs(f, chunks[0], snapshot);
    render_records_table(f, chunks[1], snapshot);
    render_footer(f, chunks[2], snapshot, input);
}

fn render_tabs(f: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()));
    let selected = Tab::ALL
        .iter()
        .position(|tab| *tab == snapshot.tab)
        .unwrap_or_default();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Fee Watch"))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn render_records_table(f: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let title = match snapshot.tab {
        Tab::Historical => format!("History (page {})", snapshot.page),
        tab => format!("Live {} (newest first)", tab.title()),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if snapshot.loading {
        let loading = Paragraph::new(Span::styled(
            "Loading…",
            Style::default().fg(Color::Yellow),
        ))
        .block(block);
        f.render_widget(loading, area);
        return;
    }

    let header = Row::new(vec![
        "Hash", "Sender", "Recipient", "Amount0", "Amount1", "Fee ETH", "Fee USDT", "Price",
        "Liquidity", "Tick",
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = snapshot
        .records
        .iter()
        .map(|record| {
            Row::new(vec![
                short_hex(&record.hash),
                short_hex(&record.sender),
                short_hex(&record.recipient),
                format_amount(record.amount0, 6),
                format_amount(record.amount1, 6),
                format_fee_eth(record.fee_eth),
                format_fee_usdt(record.fee_usdt),
                format_market_value(&record.price),
                format_market_value(&record.liquidity),
                format_market_value(&record.tick),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(13), // Hash
        Constraint::Length(13), // Sender
        Constraint::Length(13), // Recipient
        Constraint::Length(14), // Amount0
        Constraint::Length(14), // Amount1
        Constraint::Length(14), // Fee ETH
        Constraint::Length(11), // Fee USDT
        Constraint::Length(12), // Price
        Constraint::Length(14), // Liquidity
        Constraint::Length(8),  // Tick
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn render_footer(f: &mut Frame, area: Rect, snapshot: &ViewSnapshot, input: &InputState) {
    let first = match snapshot.tab {
        Tab::Historical => {
            let pages = snapshot
                .page_count
                .map(|count| format!("/{}", count))
                .unwrap_or_default();
            let mut spans = vec![
                Span::styled("Page: ", Style::default().fg(Color::Cyan)),
                Span::raw(format!("{}{}", snapshot.page, pages)),
                Span::raw(" | "),
                Span::styled("Size: ", Style::default().fg(Color::Cyan)),
                Span::raw(snapshot.page_size.to_string()),
                Span::raw(" | "),
                Span::styled("Filter: ", Style::default().fg(Color::Cyan)),
                Span::raw(format_filter(&snapshot.filter)),
            ];
            if snapshot.no_more_data {
                spans.push(Span::raw(" | "));
                spans.push(Span::styled("end of data", Style::default().fg(Color::Gray)));
            }
            Line::from(spans)
        }
        _ => Line::from(vec![
            Span::styled("Swaps: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "{} kept, {} rejected",
                snapshot.swaps_len, snapshot.swaps.rejected
            )),
            Span::raw(" | "),
            Span::styled("Transfers: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "{} kept, {} rejected",
                snapshot.transfers_len, snapshot.transfers.rejected
            )),
        ]),
    };

    let second = match input.mode() {
        InputMode::Filter(text) => {
            let mut spans = vec![
                Span::styled("Filter> ", Style::default().fg(Color::Green)),
                Span::raw(text.clone()),
            ];
            if let Some(error) = input.prompt_error() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(error.to_string(), Style::default().fg(Color::Red)));
            }
            Line::from(spans)
        }
        InputMode::Normal => match (&snapshot.last_error, snapshot.tab) {
            (Some(error), Tab::Historical) => Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )),
            (_, Tab::Historical) => Line::from(
                "1-3 tabs | ←/→ page | +/- size | / filter | c clear | r refresh | q quit",
            ),
            _ => Line::from("1-3 tabs | q quit"),
        },
    };

    let footer = Block::default().borders(Borders::ALL).title("Status");
    f.render_widget(Paragraph::new(vec![first, second]).block(footer), area);
}
