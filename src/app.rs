use eframe::egui;
use egui::{CornerRadius, RichText, ScrollArea, Ui};

use crate::config::Settings;
use crate::executor::SearchExecutor;
use crate::hn_client::SearchBackend;
use crate::models::Hit;
use crate::session::SessionState;
use crate::sort::{SortKey, SortState};
use crate::theme::AppTheme;

pub const ERROR_MESSAGE: &str = "Something is wrong.";

pub struct SearchApp<B: SearchBackend> {
    session: SessionState,
    executor: SearchExecutor<B>,
    sort: SortState,
    theme: AppTheme,
    is_dark_mode: bool,
    focus_requested: bool,
}

impl<B: SearchBackend> SearchApp<B> {
    /// Starts with the configured default query already submitted.
    pub fn new(settings: &Settings, executor: SearchExecutor<B>) -> Self {
        let mut app = Self {
            session: SessionState::new(settings.default_query.clone()),
            executor,
            sort: SortState::default(),
            theme: AppTheme::for_mode(settings.dark_mode),
            is_dark_mode: settings.dark_mode,
            focus_requested: false,
        };
        app.submit();
        app
    }

    fn submit(&mut self) {
        if let Some(request) = self.session.submit() {
            self.executor.fetch(&mut self.session, request);
        }
    }

    fn load_more(&mut self) {
        let request = self.session.load_more();
        self.executor.fetch(&mut self.session, request);
    }

    fn dismiss(&mut self, object_id: &str) {
        self.session.dismiss(object_id);
    }

    fn sort_by(&mut self, key: SortKey) {
        self.sort.select(key);
    }

    /// Rows to draw for the active query, or `None` when the error message
    /// replaces the table.
    fn display_rows(&self) -> Option<Vec<Hit>> {
        if self.session.error.is_some() {
            return None;
        }
        Some(self.sort.apply(self.session.visible_hits()))
    }

    fn open_link(&self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::error!(url, "failed to open link: {e}");
        }
    }

    fn copy_link(&self, url: &str) {
        let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url.to_owned()));
        match copied {
            Ok(()) => tracing::debug!(url, "copied link to clipboard"),
            Err(e) => tracing::error!(url, "failed to copy link: {e}"),
        }
    }

    fn toggle_theme(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
        self.theme = AppTheme::for_mode(self.is_dark_mode);
    }

    fn render_header(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading(
                RichText::new("Hacker News Search")
                    .color(self.theme.highlight)
                    .size(24.0),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_icon = if self.is_dark_mode { "☀" } else { "☾" };
                let theme_btn = ui
                    .add(
                        egui::Button::new(
                            RichText::new(theme_icon)
                                .color(self.theme.button_foreground)
                                .size(20.0),
                        )
                        .min_size(egui::Vec2::new(32.0, 32.0))
                        .corner_radius(CornerRadius::same(16))
                        .fill(self.theme.button_background),
                    )
                    .on_hover_text(if self.is_dark_mode {
                        "Switch to Light Mode"
                    } else {
                        "Switch to Dark Mode"
                    });

                if theme_btn.clicked() {
                    self.toggle_theme();
                    ui.ctx().request_repaint();
                }
            });
        });
    }

    fn render_search_form(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let mut input = self.session.input_text.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut input)
                    .hint_text("Search stories")
                    .desired_width(320.0),
            );

            if !self.focus_requested {
                response.request_focus();
                self.focus_requested = true;
            }

            if response.changed() {
                self.session.change_input(input);
            }

            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let search_btn = ui.add(
                egui::Button::new(RichText::new("Search").color(self.theme.button_foreground))
                    .corner_radius(CornerRadius::same(6))
                    .fill(self.theme.button_background),
            );

            if entered || search_btn.clicked() {
                self.submit();
            }
        });
    }

    fn render_sort_header(&mut self, ui: &mut Ui) {
        let mut selected = None;

        ui.horizontal(|ui| {
            ui.label(RichText::new("Sort by").color(self.theme.secondary_text));
            for key in SortKey::COLUMNS {
                let active = self.sort.key == key;
                let mut label = key.label().to_string();
                if active {
                    label.push_str(if self.sort.is_reverse { " ▲" } else { " ▼" });
                }

                let button = egui::Button::new(RichText::new(label).color(if active {
                    self.theme.highlight
                } else {
                    self.theme.button_foreground
                }))
                .corner_radius(CornerRadius::same(4))
                .fill(self.theme.button_background);

                if ui.add(button).clicked() {
                    selected = Some(key);
                }
            }
        });

        if let Some(key) = selected {
            self.sort_by(key);
        }
    }

    fn render_results(&mut self, ui: &mut Ui) {
        let Some(rows) = self.display_rows() else {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label(
                    RichText::new(ERROR_MESSAGE)
                        .color(self.theme.error)
                        .size(18.0),
                );
                ui.add_space(20.0);
            });
            return;
        };

        if rows.is_empty() && !self.session.is_loading {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label(
                    RichText::new(format!("No results for '{}'", self.session.active_query))
                        .color(self.theme.secondary_text)
                        .italics(),
                );
            });
            return;
        }

        let now = chrono::Utc::now();
        let mut to_dismiss = None;
        let mut to_open = None;
        let mut to_copy = None;

        for hit in &rows {
            egui::Frame::new()
                .fill(self.theme.card_background)
                .corner_radius(CornerRadius::same(8))
                .stroke(self.theme.row_stroke(hit.points))
                .inner_margin(10.0)
                .outer_margin(egui::vec2(4.0, 4.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let title = if hit.title.is_empty() { "(untitled)" } else { hit.title.as_str() };
                        let mut title_text = RichText::new(title).color(self.theme.text).size(16.0);
                        if !hit.url.is_empty() {
                            title_text = title_text.strong();
                        }

                        let title_label = ui.add(egui::Label::new(title_text).sense(egui::Sense::click()));
                        if !hit.url.is_empty() {
                            if title_label.clicked() {
                                to_open = Some(hit.url.clone());
                            }
                            if title_label.hovered() {
                                ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                            }
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                RichText::new(format!("{} pts", hit.points))
                                    .color(self.theme.points_color(hit.points))
                                    .strong(),
                            );
                        });
                    });

                    ui.horizontal(|ui| {
                        ui.label(RichText::new("by").color(self.theme.secondary_text).size(14.0));
                        ui.label(RichText::new(&hit.author).color(self.theme.text).size(14.0));
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(format!("{} comments", hit.num_comments))
                                .color(self.theme.secondary_text)
                                .size(14.0),
                        );
                        let age = hit.time_ago(now);
                        if !age.is_empty() {
                            ui.add_space(8.0);
                            ui.label(RichText::new(age).color(self.theme.secondary_text).size(14.0));
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let remove_btn = ui.add(
                                egui::Button::new(RichText::new("Remove").color(self.theme.button_foreground))
                                    .corner_radius(CornerRadius::same(6))
                                    .fill(self.theme.button_background),
                            );
                            if remove_btn.clicked() {
                                to_dismiss = Some(hit.object_id.clone());
                            }

                            if !hit.url.is_empty() {
                                ui.add_space(4.0);
                                let copy_btn = ui
                                    .add(
                                        egui::Button::new(RichText::new("Copy link").color(self.theme.button_foreground))
                                            .corner_radius(CornerRadius::same(6))
                                            .fill(self.theme.button_background),
                                    )
                                    .on_hover_text(hit.url.as_str());
                                if copy_btn.clicked() {
                                    to_copy = Some(hit.url.clone());
                                }
                            }
                        });
                    });
                });
        }

        if let Some(url) = to_open {
            self.open_link(&url);
        }
        if let Some(url) = to_copy {
            self.copy_link(&url);
        }
        if let Some(object_id) = to_dismiss {
            self.dismiss(&object_id);
        }
    }

    fn render_more_button(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            if self.session.is_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading...").color(self.theme.secondary_text));
                });
                return;
            }

            let more_btn = ui.add(
                egui::Button::new(RichText::new("More").color(self.theme.button_foreground))
                    .min_size(egui::Vec2::new(120.0, 28.0))
                    .corner_radius(CornerRadius::same(6))
                    .fill(self.theme.button_background),
            );
            if more_btn.clicked() {
                self.load_more();
            }
        });
    }
}

impl<B: SearchBackend> eframe::App for SearchApp<B> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);
        self.executor.drain(&mut self.session);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_header(ui);
            ui.add_space(4.0);
            self.render_search_form(ui);
            ui.add_space(4.0);
            self.render_sort_header(ui);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                self.render_results(ui);
                self.render_more_button(ui);
            });
        });
    }
}

impl<B: SearchBackend> Drop for SearchApp<B> {
    fn drop(&mut self) {
        self.session.teardown();
    }
}
