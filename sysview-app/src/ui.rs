use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Tabs, Wrap,
};
use ratatui::Frame;

use crate::app::{App, Confirm, EditState, EditTarget, LogSource, Tab};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_tab_bar(f, chunks[0], app);

    match app.tab {
        Tab::System => draw_system(f, chunks[1], app),
        Tab::Processes => draw_processes(f, chunks[1], app),
        Tab::Settings => draw_settings(f, chunks[1], app),
        Tab::Applications => draw_applications(f, chunks[1], app),
        Tab::Snapshots => draw_snapshots(f, chunks[1], app),
        Tab::BootEnvironments => draw_bootenvs(f, chunks[1], app),
        Tab::Logs => draw_logs(f, chunks[1], app),
    }

    draw_footer(f, chunks[2], app);

    if let Some(Confirm::Uninstall(name)) = &app.confirm {
        draw_confirm_popup(f, name);
    }
}

fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" sysview "))
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_system(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .system_props
        .iter()
        .map(|prop| Row::new(vec![Cell::from(prop.label.clone()), Cell::from(prop.value.clone())]))
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Percentage(35), Constraint::Percentage(65)],
    )
    .header(Row::new(vec!["Property", "Value"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::default().borders(Borders::ALL).title(" System Information "));
    f.render_widget(table, area);
}

fn draw_processes(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .processes
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(p.pid.to_string()),
                Cell::from(format!("{:.2}", p.cpu_percent)),
                Cell::from(format!("{:.2}", p.mem_percent)),
                Cell::from(p.status.clone()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["Name", "PID", "CPU %", "Memory %", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Processes "))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    state.select((!app.processes.is_empty()).then_some(app.process_selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_settings(f: &mut Frame, area: Rect, app: &App) {
    if app.settings.entries.is_empty() {
        let empty = Paragraph::new(format!(
            "No settings loaded from {}",
            app.settings.path().display()
        ))
        .block(Block::default().borders(Borders::ALL).title(" Settings "));
        f.render_widget(empty, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let items: Vec<ListItem> = app
        .settings
        .entries
        .iter()
        .map(|s| ListItem::new(s.name.clone()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Settings "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.setting_selected));
    f.render_stateful_widget(list, columns[0], &mut state);

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(columns[1]);

    let entry = &app.settings.entries[app.setting_selected.min(app.settings.entries.len() - 1)];

    let description = Paragraph::new(entry.description.clone())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Description "));
    f.render_widget(description, detail[0]);

    let command = Paragraph::new(editable_text(
        app,
        EditTarget::SettingCommand,
        &entry.command,
    ))
    .style(editable_style(app, EditTarget::SettingCommand))
    .block(Block::default().borders(Borders::ALL).title(" Command "));
    f.render_widget(command, detail[1]);

    let output = app
        .setting_outputs
        .get(app.setting_selected)
        .cloned()
        .unwrap_or_default();
    let output = Paragraph::new(output)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Output "));
    f.render_widget(output, detail[2]);
}

fn draw_applications(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = app
        .packages
        .iter()
        .map(|p| ListItem::new(p.name.clone()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Installed Applications "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select((!app.packages.is_empty()).then_some(app.package_selected));
    f.render_stateful_widget(list, columns[0], &mut state);

    let detail = match app.packages.get(app.package_selected) {
        Some(package) => format!("{}\n\n{}", package.name, package.description),
        None => "No application selected".to_string(),
    };
    let description = Paragraph::new(detail)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Description "));
    f.render_widget(description, columns[1]);
}

fn draw_snapshots(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let pool = app
        .selected_pool()
        .unwrap_or_else(|| "none found".to_string());
    let header = Paragraph::new(vec![
        Line::from(format!("Pool: {pool}")),
        Line::from(format!(
            "Snapshot name: {}",
            editable_text(app, EditTarget::SnapshotName, &app.snapshot_name)
        )),
    ])
    .style(editable_style(app, EditTarget::SnapshotName))
    .block(Block::default().borders(Borders::ALL).title(" ZFS "));
    f.render_widget(header, chunks[0]);

    let rows: Vec<Row> = app
        .snapshots
        .iter()
        .map(|s| Row::new(vec![Cell::from(s.name.clone()), Cell::from(s.created.clone())]))
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Percentage(60), Constraint::Percentage(40)],
    )
    .header(
        Row::new(vec!["Snapshot Name", "Creation Time"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Snapshots "));
    f.render_widget(table, chunks[1]);
}

fn draw_bootenvs(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input = Paragraph::new(format!(
        "Boot environment name: {}",
        editable_text(app, EditTarget::BootEnvName, &app.bootenv_name)
    ))
    .style(editable_style(app, EditTarget::BootEnvName))
    .block(Block::default().borders(Borders::ALL).title(" beadm "));
    f.render_widget(input, chunks[0]);

    let rows: Vec<Row> = app
        .bootenvs
        .iter()
        .map(|be| {
            Row::new(vec![
                Cell::from(be.name.clone()),
                Cell::from(be.active.clone()),
                Cell::from(be.mountpoint.clone()),
                Cell::from(be.space.clone()),
                Cell::from(be.created.clone()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Length(8),
            Constraint::Percentage(20),
            Constraint::Length(10),
            Constraint::Percentage(25),
        ],
    )
    .header(
        Row::new(vec!["BE", "Active", "Mountpoint", "Space", "Created"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Boot Environments "),
    );
    f.render_widget(table, chunks[1]);
}

fn draw_logs(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.log_source {
        Some(LogSource::Dmesg) => " Logs - dmesg ",
        Some(LogSource::Syslog) => " Logs - syslog ",
        None => " Logs ",
    };
    let paragraph = Paragraph::new(app.log_text.clone())
        .scroll((app.log_scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let text = match &app.status {
        Some(status) => status.clone(),
        None => hint_for(app).to_string(),
    };
    let footer = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn hint_for(app: &App) -> &'static str {
    if app.editing.is_some() {
        return "editing: Enter commit | Esc cancel";
    }
    match app.tab {
        Tab::System => "r rebuild | Tab next tab | q quit",
        Tab::Processes => "Up/Down select | t terminate | k kill | r refresh | q quit",
        Tab::Settings => "Up/Down select | e edit command | Enter run | q quit",
        Tab::Applications => "Up/Down select | u uninstall | r reload | q quit",
        Tab::Snapshots => "p pool | e name | s show | c create | q quit",
        Tab::BootEnvironments => "e name | s show | c create | q quit",
        Tab::Logs => "d dmesg | s syslog | Up/Down scroll | q quit",
    }
}

fn draw_confirm_popup(f: &mut Frame, name: &str) {
    let area = centered_rect(50, 5, f.area());
    let popup = Paragraph::new(format!(
        "Are you sure you want to uninstall {name}?\n\n(y) yes    (any other key) no"
    ))
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm Uninstall "),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Show the live edit buffer (with a cursor mark) instead of the stored
/// value while the matching field is being edited.
fn editable_text(app: &App, target: EditTarget, stored: &str) -> String {
    match &app.editing {
        Some(EditState { target: t, buffer }) if *t == target => format!("{buffer}_"),
        _ => stored.to_string(),
    }
}

fn editable_style(app: &App, target: EditTarget) -> Style {
    match &app.editing {
        Some(EditState { target: t, .. }) if *t == target => Style::default().fg(Color::Yellow),
        _ => Style::default(),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
