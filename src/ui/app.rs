use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{estimates, layouts, user_details};
use crate::introduction::TOKENS;
use crate::models::{Estimate, EstimateStatus};

use super::forms::{ConfirmEstimateDelete, IntroductionEditor, LoginField, LoginForm};
use super::helpers::{centered_rect, labelled_line, status_style, surface_error};
use super::screens::{EstimatePreview, HomeScreen, LayoutPicker, LayoutTab, StatusPicker};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// High-level navigation states.
enum Screen {
    Login(LoginForm),
    Home(HomeScreen),
}

/// Overlays that sit on top of the current screen.
enum Mode {
    Normal,
    ChangingLayout(LayoutPicker),
    ChangingStatus(StatusPicker),
    EstimateActions(Estimate),
    EditingIntroduction(IntroductionEditor),
    ViewingEstimate(EstimatePreview),
    ConfirmEstimateDelete(ConfirmEstimateDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the single database connection handed
/// over by startup.
pub struct App {
    conn: Connection,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the initial state, resuming straight into the home screen when a
    /// user is still marked as signed in from a previous run.
    pub fn new(conn: Connection) -> Result<Self> {
        let screen = match user_details::fetch_logged_in(&conn)? {
            Some(user) => Screen::Home(HomeScreen::load(&conn, user)?),
            None => Screen::Login(LoginForm::default()),
        };

        Ok(Self {
            conn,
            screen,
            mode: Mode::Normal,
            status: None,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Route a key press. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);
        let on_login = matches!(self.screen, Screen::Login(_));

        self.mode = match mode {
            Mode::Normal if on_login => self.handle_login_key(code, &mut exit)?,
            Mode::Normal => self.handle_home_key(code, &mut exit)?,
            Mode::ChangingLayout(picker) => self.handle_layout_dialog(code, picker)?,
            Mode::ChangingStatus(picker) => self.handle_status_picker(code, picker)?,
            Mode::EstimateActions(estimate) => self.handle_estimate_actions(code, estimate)?,
            Mode::EditingIntroduction(editor) => self.handle_introduction_editor(code, editor)?,
            Mode::ViewingEstimate(preview) => Self::handle_estimate_preview(code, preview),
            Mode::ConfirmEstimateDelete(confirm) => {
                self.handle_confirm_estimate_delete(code, confirm)?
            }
        };

        Ok(exit)
    }

    fn handle_login_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let Screen::Login(form) = &mut self.screen else {
            return Ok(Mode::Normal);
        };

        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => self.submit_login()?,
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }

        Ok(Mode::Normal)
    }

    fn submit_login(&mut self) -> Result<()> {
        let Screen::Login(form) = &mut self.screen else {
            return Ok(());
        };

        let (username, password) = match form.parse_inputs() {
            Ok(inputs) => inputs,
            Err(err) => {
                form.error = Some(err.to_string());
                return Ok(());
            }
        };

        match user_details::authenticate(&self.conn, &username, &password)? {
            Some(user) => {
                user_details::set_logged_in(&self.conn, user.id, true)?;
                let home = HomeScreen::load(&self.conn, user)?;
                self.set_status(
                    format!("Welcome, {}.", home.user.display_name()),
                    StatusKind::Info,
                );
                self.screen = Screen::Home(home);
            }
            None => {
                if let Screen::Login(form) = &mut self.screen {
                    form.reject("Invalid username or password.");
                }
            }
        }

        Ok(())
    }

    fn handle_home_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                Ok(Mode::Normal)
            }
            KeyCode::Up => {
                self.move_estimate_cursor(-1);
                Ok(Mode::Normal)
            }
            KeyCode::Down => {
                self.move_estimate_cursor(1);
                Ok(Mode::Normal)
            }
            KeyCode::Enter => {
                Ok(self.with_selected_estimate(|estimate| Mode::EstimateActions(estimate.clone())))
            }
            KeyCode::Char('s') => {
                Ok(self.with_selected_estimate(|estimate| {
                    Mode::ChangingStatus(StatusPicker::new(estimate))
                }))
            }
            KeyCode::Char('l') => self.open_layout_dialog(),
            KeyCode::Char('o') => {
                self.sign_out()?;
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::Normal),
        }
    }

    fn move_estimate_cursor(&mut self, offset: isize) {
        if let Screen::Home(home) = &mut self.screen {
            home.move_cursor(offset);
        }
    }

    /// Open a mode for the highlighted estimate, or explain why nothing opened.
    fn with_selected_estimate(&mut self, open: impl FnOnce(&Estimate) -> Mode) -> Mode {
        let mode = match &self.screen {
            Screen::Home(home) => home.selected_estimate().map(open),
            Screen::Login(_) => None,
        };
        match mode {
            Some(mode) => {
                self.clear_status();
                mode
            }
            None => {
                self.set_status("No estimate selected.", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    /// Re-read the dashboard list after a write, optionally landing on `focus`.
    fn reload_estimates(&mut self, focus: Option<i64>) -> Result<()> {
        if let Screen::Home(home) = &mut self.screen {
            home.reload_estimates(&self.conn, focus)?;
        }
        Ok(())
    }

    fn handle_status_picker(&mut self, code: KeyCode, mut picker: StatusPicker) -> Result<Mode> {
        match code {
            KeyCode::Esc => return Ok(Mode::Normal),
            KeyCode::Up => picker.move_cursor(-1),
            KeyCode::Down => picker.move_cursor(1),
            KeyCode::Enter => {
                let status = picker.current();
                match estimates::update_status(&self.conn, picker.estimate_id, status) {
                    Ok(()) => {
                        self.reload_estimates(Some(picker.estimate_id))?;
                        self.set_status(
                            format!("{} marked as {status}.", picker.customer_name),
                            StatusKind::Info,
                        );
                        return Ok(Mode::Normal);
                    }
                    Err(err) => {
                        let message = surface_error(&err.into());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            _ => {}
        }

        Ok(Mode::ChangingStatus(picker))
    }

    fn handle_estimate_actions(&mut self, code: KeyCode, estimate: Estimate) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Char('e') => Ok(Mode::EditingIntroduction(IntroductionEditor::from(
                &estimate,
            ))),
            KeyCode::Char('v') => Ok(Mode::ViewingEstimate(EstimatePreview::new(&estimate))),
            KeyCode::Char('d') => match estimates::duplicate(&self.conn, estimate.id) {
                Ok(copy) => {
                    self.reload_estimates(Some(copy.id))?;
                    self.set_status(
                        format!(
                            "Duplicated {} as {}.",
                            estimate.quote_number, copy.quote_number
                        ),
                        StatusKind::Info,
                    );
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    let message = surface_error(&err.into());
                    self.set_status(message, StatusKind::Error);
                    Ok(Mode::EstimateActions(estimate))
                }
            },
            KeyCode::Char('x') => Ok(Mode::ConfirmEstimateDelete(ConfirmEstimateDelete::from(
                &estimate,
            ))),
            _ => Ok(Mode::EstimateActions(estimate)),
        }
    }

    fn handle_introduction_editor(
        &mut self,
        code: KeyCode,
        mut editor: IntroductionEditor,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Introduction edit cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                let saved =
                    estimates::update_introduction(&self.conn, editor.estimate_id, &editor.text);
                match saved {
                    Ok(()) => {
                        self.reload_estimates(Some(editor.estimate_id))?;
                        self.set_status("Introduction saved.", StatusKind::Info);
                        return Ok(Mode::Normal);
                    }
                    Err(err) => {
                        let message = surface_error(&err.into());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Backspace => editor.backspace(),
            KeyCode::F(key) => {
                editor.insert_token(key);
            }
            KeyCode::Char(ch) => editor.push_char(ch),
            _ => {}
        }

        Ok(Mode::EditingIntroduction(editor))
    }

    fn handle_estimate_preview(code: KeyCode, preview: EstimatePreview) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Mode::Normal,
            _ => Mode::ViewingEstimate(preview),
        }
    }

    fn handle_confirm_estimate_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmEstimateDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match estimates::delete(&self.conn, confirm.id) {
                    Ok(()) => {
                        self.reload_estimates(None)?;
                        self.set_status(
                            format!("Deleted estimate {}.", confirm.quote_number),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err.into());
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmEstimateDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmEstimateDelete(confirm)),
        }
    }

    fn sign_out(&mut self) -> Result<()> {
        if let Screen::Home(home) = &self.screen {
            user_details::set_logged_in(&self.conn, home.user.id, false)?;
        }
        self.screen = Screen::Login(LoginForm::default());
        self.set_status("Signed out.", StatusKind::Info);
        Ok(())
    }

    fn open_layout_dialog(&mut self) -> Result<Mode> {
        let Screen::Home(home) = &self.screen else {
            return Ok(Mode::Normal);
        };

        let company_id = home.user.company_id;
        let available = layouts::fetch_by_company_id(&self.conn, company_id)?;
        let picker = LayoutPicker::new(company_id, available, home.layout.as_ref());

        if picker.is_empty() {
            self.set_status("No active layouts for this company.", StatusKind::Error);
            return Ok(Mode::Normal);
        }

        self.clear_status();
        Ok(Mode::ChangingLayout(picker))
    }

    fn handle_layout_dialog(&mut self, code: KeyCode, mut picker: LayoutPicker) -> Result<Mode> {
        match code {
            KeyCode::Esc => return Ok(Mode::Normal),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => picker.switch_tab(),
            KeyCode::Up => picker.move_cursor(-1),
            KeyCode::Down => picker.move_cursor(1),
            KeyCode::Enter => {
                let Some(layout) = picker.select_current() else {
                    return Ok(Mode::ChangingLayout(picker));
                };
                match layouts::save_company_layout(&self.conn, picker.company_id, &layout) {
                    Ok(preference) => {
                        if let Screen::Home(home) = &mut self.screen {
                            home.layout = Some(preference);
                        }
                        self.set_status(
                            format!("Layout set to {}.", layout.layout_name),
                            StatusKind::Info,
                        );
                        return Ok(Mode::Normal);
                    }
                    Err(err) => {
                        let message = surface_error(&err.into());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            _ => {}
        }

        Ok(Mode::ChangingLayout(picker))
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Login(form) => self.draw_login(frame, content_area, form),
            Screen::Home(home) => self.draw_home(frame, content_area, home),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Normal => {}
            Mode::ChangingLayout(picker) => self.draw_layout_dialog(frame, area, picker),
            Mode::ChangingStatus(picker) => self.draw_status_picker(frame, area, picker),
            Mode::EstimateActions(estimate) => self.draw_estimate_actions(frame, area, estimate),
            Mode::EditingIntroduction(editor) => {
                self.draw_introduction_editor(frame, area, editor)
            }
            Mode::ViewingEstimate(preview) => self.draw_estimate_preview(frame, area, preview),
            Mode::ConfirmEstimateDelete(confirm) => {
                self.draw_confirm_estimate_delete(frame, area, confirm)
            }
        }
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect, form: &LoginForm) {
        let popup_area = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Mr. Quote - Sign In")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Username", LoginField::Username),
            form.build_line("Password", LoginField::Password),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to sign in • Tab to switch field • Esc to quit",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            LoginField::Username => ("Username: ".len() as u16, 0),
            LoginField::Password => ("Password: ".len() as u16, 1),
        };
        frame.set_cursor_position((inner.x + prefix + form.active_len() as u16, inner.y + row));
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect, home: &HomeScreen) {
        let block = Block::default().title("Home").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let heading = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let user = &home.user;

        let mut lines = vec![
            Line::from(Span::styled("Signed in", heading)),
            labelled_line("Name", &user.display_name()),
            labelled_line("Username", &user.username),
            labelled_line("Email", &user.email),
            Line::from(""),
            Line::from(Span::styled("Company", heading)),
        ];

        match &home.company {
            Some(company) => {
                lines.push(labelled_line("Name", &company.to_string()));
                lines.push(labelled_line("Phone", &company.company_phone_number));
                lines.push(labelled_line("Email", &company.company_email));
                lines.push(labelled_line("Business no.", &company.business_number));
                lines.push(labelled_line("Website", &company.web_address));
            }
            None => lines.push(Line::from(Span::styled(
                "Company record not found.",
                Style::default().fg(Color::Red),
            ))),
        }

        let layout_name = home
            .layout
            .as_ref()
            .map(|pref| pref.layout_name.as_str())
            .unwrap_or("");
        lines.push(labelled_line("Report layout", layout_name));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Estimates ({})", home.estimates.len()),
            heading,
        )));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(lines.len() as u16), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        if home.estimates.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No estimates yet.",
                    Style::default().fg(Color::DarkGray),
                )),
                chunks[1],
            );
            return;
        }

        let items: Vec<ListItem> = home
            .estimates
            .iter()
            .map(|estimate| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!(
                        "{:<8} {:<20} {:<30} {:<11} {:>13}  ",
                        estimate.quote_number,
                        estimate.customer_name,
                        estimate.project_address,
                        estimate.quote_date,
                        estimate.formatted_total(),
                    )),
                    Span::styled(
                        estimate.status.label().to_uppercase(),
                        status_style(estimate.status),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(home.cursor));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_status_picker(&self, frame: &mut Frame, area: Rect, picker: &StatusPicker) {
        let popup_area = centered_rect(40, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Status - {}", picker.customer_name))
            .borders(Borders::ALL);

        let items: Vec<ListItem> = EstimateStatus::ALL
            .iter()
            .map(|status| ListItem::new(Span::styled(status.label(), status_style(*status))))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(picker.cursor));
        frame.render_stateful_widget(list, popup_area, &mut list_state);
    }

    fn draw_estimate_actions(&self, frame: &mut Frame, area: Rect, estimate: &Estimate) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("{}'s Estimate", estimate.customer_name))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            labelled_line("Quote no.", &estimate.quote_number),
            labelled_line("Address", &estimate.project_address),
            labelled_line("Date", &estimate.quote_date),
            labelled_line("Total", &estimate.formatted_total()),
            Line::from(vec![
                Span::styled(
                    format!("{:<16}", "Status"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(estimate.status.label(), status_style(estimate.status)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "e Edit • v View Estimate • d Duplicate • x Delete",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_introduction_editor(
        &self,
        frame: &mut Frame,
        area: Rect,
        editor: &IntroductionEditor,
    ) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Introduction - {}", editor.customer_name))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(inner);

        let text = Paragraph::new(format!("{}▏", editor.text)).wrap(Wrap { trim: false });
        frame.render_widget(text, chunks[0]);

        let tokens: Vec<Span> = TOKENS
            .iter()
            .enumerate()
            .map(|(idx, token)| {
                Span::styled(
                    format!("F{} {}  ", idx + 1, token.label),
                    Style::default().fg(Color::Gray),
                )
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(tokens)).wrap(Wrap { trim: true }),
            chunks[1],
        );
    }

    fn draw_estimate_preview(&self, frame: &mut Frame, area: Rect, preview: &EstimatePreview) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(preview.title.clone())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = preview
            .summary
            .iter()
            .map(|(label, value)| labelled_line(label, value))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(preview.introduction.clone()));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_estimate_delete(
        &self,
        frame: &mut Frame,
        area: Rect,
        confirm: &ConfirmEstimateDelete,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete estimate {} for {}?",
                confirm.quote_number, confirm.customer_name
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_layout_dialog(&self, frame: &mut Frame, area: Rect, picker: &LayoutPicker) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Change Layout")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let tab_style = |tab: LayoutTab| {
            if picker.tab == tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::Gray)
            }
        };
        let tabs = Line::from(vec![
            Span::styled(
                format!("My Layouts ({})", picker.mine.len()),
                tab_style(LayoutTab::Mine),
            ),
            Span::raw("   "),
            Span::styled(
                format!("Shared Layouts ({})", picker.shared.len()),
                tab_style(LayoutTab::Shared),
            ),
        ]);
        frame.render_widget(Paragraph::new(tabs), chunks[0]);

        let items: Vec<ListItem> = picker
            .visible()
            .iter()
            .map(|layout| {
                let mark = if picker.selected_id == Some(layout.id) {
                    "(•)"
                } else {
                    "( )"
                };
                ListItem::new(format!("{mark} {layout}"))
            })
            .collect();

        if items.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No layouts in this tab.",
                    Style::default().fg(Color::DarkGray),
                )),
                chunks[1],
            );
            return;
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::NONE))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(picker.cursor));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let text = match (&self.mode, &self.screen) {
            (Mode::ChangingLayout(_), _) => {
                "←/→ switch tab • ↑/↓ move • Enter use layout • Esc cancel"
            }
            (Mode::ChangingStatus(_), _) => "↑/↓ move • Enter set status • Esc cancel",
            (Mode::EstimateActions(_), _) => {
                "e edit • v view • d duplicate • x delete • Esc close"
            }
            (Mode::EditingIntroduction(_), _) => {
                "type to edit • F1-F5 insert token • Enter save • Esc cancel"
            }
            (Mode::ViewingEstimate(_), _) => "Esc close",
            (Mode::ConfirmEstimateDelete(_), _) => "y confirm • n cancel",
            (Mode::Normal, Screen::Login(_)) => "Enter sign in • Tab switch field • Esc quit",
            (Mode::Normal, Screen::Home(_)) => {
                "↑/↓ move • Enter open • s status • l change layout • o sign out • q quit"
            }
        };
        Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
