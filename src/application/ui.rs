use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;
use tui_textarea::TextArea;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::AuthState;
use crate::domain::models::Event;
use crate::domain::models::Template;
use crate::domain::models::TemplateType;
use crate::domain::services::substitution;
use crate::domain::services::substitution::OutputKind;
use crate::domain::services::Drafts;
use crate::domain::services::EditorField;
use crate::domain::services::EditorForm;
use crate::domain::services::PreviewPane;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Boot,
    Login,
    List,
    Editor,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Email,
    Password,
}

struct AppState<'a> {
    screen: Screen,
    auth: AuthState,
    waiting_for_worker: bool,
    status: Option<String>,

    // Login screen.
    login_field: LoginField,
    email_input: TextArea<'a>,
    password_input: String,

    // Template list.
    templates: Vec<Template>,
    filter: Option<TemplateType>,
    list_state: ListState,
    confirm_delete: bool,

    // Editor.
    form: EditorForm,
    focused: EditorField,
    field_input: TextArea<'a>,
    preview: PreviewPane,
    drafts: Option<Drafts>,
    restore_prompt: bool,
}

impl AppState<'_> {
    fn new() -> AppState<'static> {
        return AppState {
            screen: Screen::Boot,
            auth: AuthState::default(),
            waiting_for_worker: true,
            status: None,
            login_field: LoginField::Email,
            email_input: TextArea::default(),
            password_input: "".to_string(),
            templates: vec![],
            filter: None,
            list_state: ListState::default(),
            confirm_delete: false,
            form: EditorForm::default(),
            focused: EditorField::TemplateId,
            field_input: TextArea::default(),
            preview: PreviewPane::default(),
            drafts: None,
            restore_prompt: false,
        };
    }

    fn selected_template(&self) -> Option<&Template> {
        return self.list_state.selected().and_then(|idx| {
            return self.templates.get(idx);
        });
    }

    fn select_delta(&mut self, delta: i64) {
        if self.templates.is_empty() {
            self.list_state.select(None);
            return;
        }

        let current = self.list_state.selected().unwrap_or(0) as i64;
        let max = self.templates.len() as i64 - 1;
        self.list_state
            .select(Some(current.saturating_add(delta).clamp(0, max) as usize));
    }

    fn autosave_delay(&self) -> Duration {
        let millis = Config::get(ConfigKey::DraftAutosaveDelay)
            .parse::<u64>()
            .unwrap_or(1000);
        return Duration::from_millis(millis);
    }

    /// Rebuilds the focused-field textarea from the form, called whenever
    /// focus moves.
    fn sync_field_input(&mut self) {
        let lines = self
            .form
            .get(self.focused)
            .split('\n')
            .map(|line| return line.to_string())
            .collect::<Vec<String>>();
        self.field_input = TextArea::new(lines);
    }

    /// Pushes the textarea content back into the form and refreshes the
    /// local preview and draft.
    fn absorb_field_input(&mut self) {
        self.form
            .set(self.focused, self.field_input.lines().join("\n"));
        self.refresh_preview();

        let delay = self.autosave_delay();
        let draft = self.form.to_draft();
        if let Some(drafts) = self.drafts.as_mut() {
            drafts.auto_save(draft, delay);
        }
    }

    fn refresh_preview(&mut self) {
        let bindings = substitution::resolve_bindings(&self.form.variables, &BTreeMap::new());
        let html = substitution::substitute(&self.form.html_content, &bindings, OutputKind::Html);
        self.preview.set_content(&html);
    }

    /// Re-derives the variable list from the placeholders used across the
    /// subject and both bodies, keeping declarations the author already made.
    fn sync_variables(&mut self) {
        let combined = format!(
            "{}\n{}\n{}",
            self.form.subject, self.form.html_content, self.form.text_content
        );
        let names = substitution::extract_variable_names(&combined);

        let mut variables = vec![];
        for name in names {
            match self.form.variables.iter().find(|v| return v.name == name) {
                Some(existing) => variables.push(existing.clone()),
                None => variables.push(crate::domain::models::Variable::new(
                    &name,
                    crate::domain::models::VariableType::String,
                )),
            }
        }

        self.form.variables = variables;
        self.refresh_preview();
    }

    async fn open_editor(&mut self, form: EditorForm) {
        let template_id = form.existing().map(|(_, id)| return id);
        let drafts = Drafts::for_template(template_id.as_deref());

        self.restore_prompt = drafts.has_draft().await;
        self.drafts = Some(drafts);
        self.form = form;
        self.focused = EditorField::TemplateId;
        self.screen = Screen::Editor;
        self.status = None;
        self.sync_field_input();
        self.refresh_preview();
    }

    async fn close_editor(&mut self) {
        if let Some(drafts) = self.drafts.as_mut() {
            drafts.cancel_pending();
        }
        self.drafts = None;
        self.restore_prompt = false;
        self.screen = Screen::List;
    }
}

fn centered_rect(width: u16, height: u16, rect: Rect) -> Rect {
    let x = rect.x + rect.width.saturating_sub(width) / 2;
    let y = rect.y + rect.height.saturating_sub(height) / 2;
    return Rect {
        x,
        y,
        width: width.min(rect.width),
        height: height.min(rect.height),
    };
}

fn draw_status<B: Backend>(frame: &mut Frame<'_, B>, rect: Rect, app_state: &AppState<'_>) {
    let text = match (&app_state.status, app_state.waiting_for_worker) {
        (_, true) => "Working...".to_string(),
        (Some(status), _) => status.to_string(),
        (None, _) => "".to_string(),
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
        rect,
    );
}

fn draw_login<B: Backend>(frame: &mut Frame<'_, B>, app_state: &mut AppState<'_>) {
    let area = centered_rect(60, 12, frame.size());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let focus_style = Style::default().fg(Color::Cyan);
    let blur_style = Style::default().fg(Color::DarkGray);

    app_state.email_input.set_block(
        Block::default().borders(Borders::ALL).title("Email").style(
            if app_state.login_field == LoginField::Email {
                focus_style
            } else {
                blur_style
            },
        ),
    );
    frame.render_widget(app_state.email_input.widget(), layout[0]);

    // The password is never held in a textarea so it cannot be echoed.
    let masked = "*".repeat(app_state.password_input.chars().count());
    frame.render_widget(
        Paragraph::new(masked).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Password")
                .style(if app_state.login_field == LoginField::Password {
                    focus_style
                } else {
                    blur_style
                }),
        ),
        layout[1],
    );

    if let Some(error) = &app_state.auth.error {
        frame.render_widget(
            Paragraph::new(error.to_string())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            layout[2],
        );
    } else {
        draw_status(frame, layout[2], app_state);
    }

    frame.render_widget(
        Paragraph::new("Tab switches fields, Enter signs in, Ctrl+C quits.")
            .style(Style::default().fg(Color::DarkGray)),
        layout[3],
    );
}

fn draw_list<B: Backend>(frame: &mut Frame<'_, B>, app_state: &mut AppState<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let filter_label = match app_state.filter {
        Some(template_type) => template_type.label().to_string(),
        None => "All".to_string(),
    };

    let items = app_state
        .templates
        .iter()
        .map(|template| {
            return ListItem::new(format!(
                "{} {} \"{}\" v{} [{}]",
                template.template_type,
                template.template_id,
                template.name,
                template.version,
                template.app_entry.label(),
            ));
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Templates ({filter_label})")),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, layout[0], &mut app_state.list_state);

    draw_status(frame, layout[1], app_state);
    frame.render_widget(
        Paragraph::new(
            "Enter opens, n creates, d deletes, t cycles the type filter, r refreshes, x signs out, q quits.",
        )
        .style(Style::default().fg(Color::DarkGray)),
        layout[2],
    );

    if app_state.confirm_delete {
        if let Some(template) = app_state.selected_template() {
            let prompt = format!(
                "Delete {}/{}? This cannot be undone. (y/n)",
                template.template_type, template.template_id
            );
            let area = centered_rect(60, 3, frame.size());
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(prompt)
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().borders(Borders::ALL).title("Confirm")),
                area,
            );
        }
    }
}

fn draw_editor<B: Backend>(frame: &mut Frame<'_, B>, app_state: &mut AppState<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let title = if app_state.form.is_new() {
        format!(
            "New template: {} / {}",
            app_state.form.template_type.label(),
            app_state.form.app_entry.label()
        )
    } else {
        format!(
            "Editing {} ({})",
            app_state.form.template_id,
            app_state.form.template_type.label()
        )
    };
    frame.render_widget(
        Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD)),
        layout[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);

    app_state.field_input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(app_state.focused.to_string())
            .style(Style::default().fg(Color::Cyan)),
    );

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(5), Constraint::Length(8)])
        .split(columns[0]);

    frame.render_widget(app_state.field_input.widget(), fields[0]);

    let summary = EditorField::iter()
        .filter(|field| return *field != app_state.focused)
        .map(|field| {
            let value = app_state.form.get(field);
            let first_line = value.split('\n').next().unwrap_or("");
            return Line::from(format!("{field}: {first_line}"));
        })
        .collect::<Vec<Line<'_>>>();
    frame.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title("Fields")),
        fields[1],
    );

    app_state.preview.render(frame, columns[1]);

    if app_state.form.errors.is_empty() {
        draw_status(frame, layout[2], app_state);
    } else {
        frame.render_widget(
            Paragraph::new(app_state.form.errors.join("\n"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::TOP).title("Errors")),
            layout[2],
        );
    }

    frame.render_widget(
        Paragraph::new(
            "Tab cycles fields, Ctrl+S saves, Ctrl+P renders on the server, Ctrl+V syncs variables, Esc closes.",
        )
        .style(Style::default().fg(Color::DarkGray)),
        layout[3],
    );

    if app_state.restore_prompt {
        let area = centered_rect(64, 3, frame.size());
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new("An unsaved draft exists for this template. Restore it? (y/n)")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title("Draft")),
            area,
        );
    }
}

async fn handle_event(
    app_state: &mut AppState<'_>,
    tx: &mpsc::UnboundedSender<Action>,
    event: Event,
) -> Result<()> {
    match event {
        Event::AuthState(auth) => {
            if auth.loading {
                app_state.auth = auth;
                return Ok(());
            }

            let was_signed_in = app_state.auth.user.is_some();
            app_state.auth = auth;
            app_state.waiting_for_worker = false;

            if app_state.auth.user.is_some() {
                if !was_signed_in || app_state.screen == Screen::Boot {
                    app_state.screen = Screen::List;
                    app_state.waiting_for_worker = true;
                    tx.send(Action::ListTemplates(app_state.filter))?;
                }
            } else {
                app_state.password_input.clear();
                app_state.screen = Screen::Login;
            }
        }
        Event::TemplatesLoaded(templates) => {
            app_state.templates = templates;
            app_state.waiting_for_worker = false;
            if app_state.templates.is_empty() {
                app_state.list_state.select(None);
            } else {
                app_state.list_state.select(Some(0));
            }
        }
        Event::TemplateLoaded(template) => {
            app_state.waiting_for_worker = false;
            app_state.open_editor(EditorForm::from_template(&template)).await;
        }
        Event::TemplateSaved(saved) => {
            app_state.waiting_for_worker = false;
            app_state.status = Some(format!("Saved template {}", saved.template_id));
            if let Some(drafts) = app_state.drafts.as_mut() {
                if let Err(err) = drafts.clear().await {
                    tracing::warn!(err = ?err, "Failed to clear draft after save");
                }
            }
            app_state.close_editor().await;
            app_state.waiting_for_worker = true;
            tx.send(Action::ListTemplates(app_state.filter))?;
        }
        Event::TemplateDeleted { template_id } => {
            app_state.waiting_for_worker = true;
            app_state.status = Some(format!("Deleted template {template_id}"));
            tx.send(Action::ListTemplates(app_state.filter))?;
        }
        Event::RemotePreviewReady(preview) => {
            app_state.waiting_for_worker = false;
            app_state.status = Some(format!("Server render of \"{}\"", preview.subject));
            app_state.preview.set_content(&preview.html_content);
        }
        Event::ApiError(message) => {
            app_state.waiting_for_worker = false;
            app_state.status = Some(message);
        }
    }

    return Ok(());
}

async fn handle_login_input(
    app_state: &mut AppState<'_>,
    tx: &mpsc::UnboundedSender<Action>,
    input: Input,
) -> Result<()> {
    match input {
        Input { key: Key::Tab, .. } | Input { key: Key::Down, .. } | Input { key: Key::Up, .. } => {
            app_state.login_field = match app_state.login_field {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
        }
        Input {
            key: Key::Enter, ..
        } => {
            let email = app_state.email_input.lines().join("");
            let password = app_state.password_input.to_string();
            if email.is_empty() || password.is_empty() {
                app_state.status = Some("Enter both an email and a password.".to_string());
                return Ok(());
            }

            app_state.status = None;
            app_state.waiting_for_worker = true;
            tx.send(Action::Login { email, password })?;
        }
        input => match app_state.login_field {
            LoginField::Email => {
                app_state.email_input.input(input);
            }
            LoginField::Password => match input {
                Input {
                    key: Key::Char(c),
                    ctrl: false,
                    ..
                } => {
                    app_state.password_input.push(c);
                }
                Input {
                    key: Key::Backspace,
                    ..
                } => {
                    app_state.password_input.pop();
                }
                _ => {}
            },
        },
    }

    return Ok(());
}

async fn handle_list_input(
    app_state: &mut AppState<'_>,
    tx: &mpsc::UnboundedSender<Action>,
    input: Input,
) -> Result<bool> {
    if app_state.confirm_delete {
        match input {
            Input {
                key: Key::Char('y'),
                ..
            } => {
                app_state.confirm_delete = false;
                let address = app_state.selected_template().map(|template| {
                    return (
                        template.template_type,
                        template.template_id.to_string(),
                        template.app_entry,
                    );
                });
                if let Some((template_type, template_id, app_entry)) = address {
                    app_state.waiting_for_worker = true;
                    tx.send(Action::DeleteTemplate {
                        template_type,
                        template_id,
                        app_entry,
                    })?;
                }
            }
            _ => {
                app_state.confirm_delete = false;
            }
        }
        return Ok(false);
    }

    match input {
        Input {
            key: Key::Char('q'),
            ..
        } => {
            return Ok(true);
        }
        Input { key: Key::Down, .. } => {
            app_state.select_delta(1);
        }
        Input { key: Key::Up, .. } => {
            app_state.select_delta(-1);
        }
        Input {
            key: Key::Enter, ..
        } => {
            let address = app_state.selected_template().map(|template| {
                return (
                    template.template_type,
                    template.template_id.to_string(),
                    template.app_entry,
                );
            });
            if let Some((template_type, template_id, app_entry)) = address {
                app_state.waiting_for_worker = true;
                tx.send(Action::LoadTemplate {
                    template_type,
                    template_id,
                    app_entry,
                })?;
            }
        }
        Input {
            key: Key::Char('n'),
            ..
        } => {
            app_state.open_editor(EditorForm::default()).await;
        }
        Input {
            key: Key::Char('d'),
            ..
        } => {
            if app_state.selected_template().is_some() {
                app_state.confirm_delete = true;
            }
        }
        Input {
            key: Key::Char('t'),
            ..
        } => {
            app_state.filter = TemplateType::next_filter(app_state.filter);
            app_state.waiting_for_worker = true;
            tx.send(Action::ListTemplates(app_state.filter))?;
        }
        Input {
            key: Key::Char('r'),
            ..
        } => {
            app_state.waiting_for_worker = true;
            tx.send(Action::ListTemplates(app_state.filter))?;
        }
        Input {
            key: Key::Char('x'),
            ..
        } => {
            app_state.waiting_for_worker = true;
            tx.send(Action::Logout())?;
        }
        _ => {}
    }

    return Ok(false);
}

async fn handle_editor_input(
    app_state: &mut AppState<'_>,
    tx: &mpsc::UnboundedSender<Action>,
    input: Input,
) -> Result<()> {
    if app_state.restore_prompt {
        match input {
            Input {
                key: Key::Char('y'),
                ..
            } => {
                app_state.restore_prompt = false;
                let draft = match app_state.drafts.as_ref() {
                    Some(drafts) => drafts.load().await,
                    None => None,
                };
                if let Some(draft) = draft {
                    app_state.form.apply_draft(&draft);
                    app_state.sync_field_input();
                    app_state.refresh_preview();
                    app_state.status = Some("Draft restored.".to_string());
                }
            }
            _ => {
                app_state.restore_prompt = false;
                if let Some(drafts) = app_state.drafts.as_mut() {
                    if let Err(err) = drafts.clear().await {
                        tracing::warn!(err = ?err, "Failed to discard draft");
                    }
                }
                app_state.status = Some("Draft discarded.".to_string());
            }
        }
        return Ok(());
    }

    match input {
        Input { key: Key::Esc, .. } => {
            // Cancelling the edit discards its draft; only a quit mid-edit
            // leaves one behind for the restore prompt.
            if let Some(drafts) = app_state.drafts.as_mut() {
                if let Err(err) = drafts.clear().await {
                    tracing::warn!(err = ?err, "Failed to discard draft on cancel");
                }
            }
            app_state.close_editor().await;
        }
        Input { key: Key::Tab, .. } => {
            app_state.absorb_field_input();
            app_state.focused = app_state.focused.next();
            app_state.sync_field_input();
        }
        Input {
            key: Key::BackTab, ..
        } => {
            app_state.absorb_field_input();
            app_state.focused = app_state.focused.previous();
            app_state.sync_field_input();
        }
        Input {
            key: Key::Char('s'),
            ctrl: true,
            ..
        } => {
            app_state.absorb_field_input();
            app_state.form.derive_template_id();
            app_state.sync_field_input();
            if app_state.form.validate().is_err() {
                return Ok(());
            }

            app_state.waiting_for_worker = true;
            match app_state.form.existing() {
                Some((template_type, template_id)) => {
                    tx.send(Action::UpdateTemplate {
                        template_type,
                        template_id,
                        request: Box::new(app_state.form.build_update_request()),
                    })?;
                }
                None => {
                    tx.send(Action::CreateTemplate(Box::new(
                        app_state.form.build_create_request(),
                    )))?;
                }
            }
        }
        Input {
            key: Key::Char('p'),
            ctrl: true,
            ..
        } => {
            if let Some((template_type, template_id)) = app_state.form.existing() {
                app_state.absorb_field_input();
                app_state.waiting_for_worker = true;
                tx.send(Action::RemotePreview {
                    template_type,
                    template_id,
                    app_entry: app_state.form.app_entry,
                    data: substitution::sample_bindings(&app_state.form.variables),
                })?;
            } else {
                app_state.status =
                    Some("Save the template before requesting a server render.".to_string());
            }
        }
        Input {
            key: Key::Char('v'),
            ctrl: true,
            ..
        } => {
            app_state.absorb_field_input();
            app_state.sync_variables();
            app_state.status = Some(format!(
                "Variables synced ({}).",
                app_state.form.variables.len()
            ));
        }
        Input {
            key: Key::Char('t'),
            ctrl: true,
            ..
        } => {
            // The type is part of the address, so it is fixed once stored.
            if app_state.form.is_new() {
                let all = TemplateType::iter().collect::<Vec<TemplateType>>();
                let idx = all
                    .iter()
                    .position(|t| return *t == app_state.form.template_type)
                    .unwrap();
                app_state.form.template_type = all[(idx + 1) % all.len()];
            }
        }
        Input {
            key: Key::Char('a'),
            ctrl: true,
            ..
        } => {
            app_state.form.app_entry = app_state.form.app_entry.next();
        }
        input => {
            app_state.field_input.input(input);
            app_state.absorb_field_input();
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    tx: mpsc::UnboundedSender<Action>,
    rx: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| match app_state.screen {
            Screen::Boot => {
                let area = centered_rect(40, 1, frame.size());
                frame.render_widget(Paragraph::new("Checking session..."), area);
            }
            Screen::Login => draw_login(frame, app_state),
            Screen::List => draw_list(frame, app_state),
            Screen::Editor => draw_editor(frame, app_state),
        })?;

        if app_state.waiting_for_worker {
            let event = rx.recv().await;
            if event.is_none() {
                continue;
            }

            handle_event(app_state, &tx, event.unwrap()).await?;
            continue;
        }

        let input: Input = crossterm::event::read()?.into();
        if let Input {
            key: Key::Char('c'),
            ctrl: true,
            ..
        } = input
        {
            break;
        }

        match app_state.screen {
            Screen::Boot => {}
            Screen::Login => handle_login_input(app_state, &tx, input).await?,
            Screen::List => {
                if handle_list_input(app_state, &tx, input).await? {
                    break;
                }
            }
            Screen::Editor => handle_editor_input(app_state, &tx, input).await?,
        }
    }

    return Ok(());
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    mut rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    let mut app_state = AppState::new();

    start_loop(&mut terminal, &mut app_state, tx, &mut rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
