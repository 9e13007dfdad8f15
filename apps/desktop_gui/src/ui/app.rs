//! App shell: renders the single page's sections, hosts the carousel and
//! the page-view tracker, and bridges UI intent to the backend worker.

use std::collections::HashMap;

use content::{Experience, PortfolioData, Project};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use ui_core::analytics::{AnalyticsClient, PageViewTracker};
use ui_core::carousel::{ArrowKey, Carousel, CarouselNext, CarouselOptions, CarouselPrevious};
use ui_core::loader::{LoadState, LOAD_FAILED_MESSAGE};
use ui_core::navigation::{HistoryEntry, Router};
use ui_core::{placeholder, PreviewImage};
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::{category_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::sections::{ProjectCardView, Section};
use crate::ui::{theme, widgets};

const CARD_WIDTH: f32 = 300.0;
const CARD_GAP: f32 = 16.0;
const CARD_IMAGE_HEIGHT: f32 = 150.0;
const SECTION_SPACING: f32 = 48.0;
const CAROUSEL_OFFSET_ANIM_SECS: f32 = 0.25;

pub struct PortfolioApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    settings: Settings,
    data: PortfolioData,
    projects: LoadState,
    images: HashMap<usize, PreviewImage>,
    textures: HashMap<usize, egui::TextureHandle>,
    placeholder_texture: Option<egui::TextureHandle>,
    carousel: Carousel,
    prev_control: CarouselPrevious,
    next_control: CarouselNext,
    carousel_hovered: bool,
    router: Router,
    tracker: Option<PageViewTracker>,
    active_section: Section,
    pending_scroll: Option<Section>,
    status_banner: Option<String>,
    window_title: String,
    theme_applied: bool,
}

impl PortfolioApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: Settings,
    ) -> Self {
        let data = PortfolioData::sample();
        if let Err(err) = data.validate() {
            tracing::warn!("site data failed validation: {err}");
        }

        let carousel = Carousel::new(CarouselOptions::default());
        let scope = carousel.scope();
        // Building a control outside a carousel scope fails loudly; these
        // live inside the root by construction.
        let prev_control =
            CarouselPrevious::new(&scope).expect("control must be used within a Carousel");
        let next_control =
            CarouselNext::new(&scope).expect("control must be used within a Carousel");

        let mut router = Router::new(HistoryEntry::new(
            Section::Home.path(),
            Section::Home.title(),
        ));
        let tracker = settings.analytics_config().map(|config| {
            let client = AnalyticsClient::initialize(config);
            let mut tracker = PageViewTracker::new(client);
            tracker.mount(&mut router);
            tracker
        });

        let mut app = Self {
            cmd_tx,
            ui_rx,
            settings,
            data,
            projects: LoadState::Idle,
            images: HashMap::new(),
            textures: HashMap::new(),
            placeholder_texture: None,
            carousel,
            prev_control,
            next_control,
            carousel_hovered: false,
            router,
            tracker,
            active_section: Section::Home,
            pending_scroll: None,
            status_banner: None,
            window_title: String::new(),
            theme_applied: false,
        };
        app.bootstrap();
        app
    }

    fn bootstrap(&mut self) {
        if self.settings.manifest_url().is_some() {
            self.projects = LoadState::Loading;
            self.dispatch(BackendCommand::LoadProjects { force: false });
        } else {
            let projects = self.data.projects.clone();
            self.apply_projects(projects);
        }
        if self.tracker.is_some() {
            // Ship the initial page view.
            self.dispatch(BackendCommand::SubmitAnalytics);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status_banner);
    }

    fn apply_projects(&mut self, projects: Vec<Project>) {
        for (index, project) in projects.iter().enumerate() {
            if let Some(url) = self.resolve_image_url(&project.image) {
                self.dispatch(BackendCommand::FetchProjectImage { index, url });
            }
        }
        self.projects = LoadState::from_projects(projects);
    }

    /// Absolute image references fetch directly; site-relative paths only
    /// resolve when a manifest host is configured. Everything else keeps
    /// the placeholder.
    fn resolve_image_url(&self, image: &str) -> Option<Url> {
        if let Ok(url) = Url::parse(image) {
            return Some(url);
        }
        self.settings
            .manifest_url()
            .and_then(|base| base.join(image).ok())
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ProjectsLoaded(projects) => self.apply_projects(projects),
                UiEvent::ProjectsFailed { reason } => {
                    let error = UiError::from_message(UiErrorContext::LoadProjects, reason);
                    tracing::error!(
                        "{} failure: {}",
                        category_label(error.category()),
                        error.message()
                    );
                    self.projects = LoadState::Failed(LOAD_FAILED_MESSAGE.to_string());
                }
                UiEvent::ImageLoaded { index, image } => {
                    self.textures.remove(&index);
                    self.images.insert(index, image);
                }
                UiEvent::ImageFailed { index, reason } => {
                    // Placeholder stays; the card renders on regardless.
                    let error = UiError::from_message(UiErrorContext::FetchImage, reason);
                    tracing::warn!(index, "image could not be loaded: {}", error.message());
                }
                UiEvent::Info(message) => tracing::info!("{message}"),
                UiEvent::Error(error) => {
                    tracing::error!(context = ?error.context(), "{}", error.message());
                    self.status_banner = Some(format!(
                        "{}: {}",
                        category_label(error.category()),
                        error.message()
                    ));
                }
            }
        }
    }

    fn navigate(&mut self, section: Section) {
        self.active_section = section;
        self.pending_scroll = Some(section);
        self.router
            .push(HistoryEntry::new(section.path(), section.title()));
        if self.tracker.is_some() {
            self.dispatch(BackendCommand::SubmitAnalytics);
        }
    }

    fn traverse_history(&mut self, forward: bool) {
        let moved = if forward {
            self.router.forward()
        } else {
            self.router.back()
        };
        if !moved {
            return;
        }
        if let Some(section) = Section::from_path(&self.router.current().path) {
            self.active_section = section;
            self.pending_scroll = Some(section);
        }
        if self.tracker.is_some() {
            self.dispatch(BackendCommand::SubmitAnalytics);
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }
    }

    fn sync_window_title(&mut self, ctx: &egui::Context) {
        let title = self.router.current().title.clone();
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }

    /// Capture-phase arrow handling scoped to the carousel region.
    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if !self.carousel_hovered {
            return;
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowLeft)) {
            self.carousel.handle_key(ArrowKey::Left);
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowRight)) {
            self.carousel.handle_key(ArrowKey::Right);
        }
    }

    fn open_link(ctx: &egui::Context, url: &str) {
        ctx.open_url(egui::OpenUrl::new_tab(url));
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::new()
                    .fill(theme::SURFACE)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let back = ui.add_enabled(
                        self.router.can_go_back(),
                        egui::Button::new("←").frame(false),
                    );
                    if back.clicked() {
                        self.traverse_history(false);
                    }
                    let forward = ui.add_enabled(
                        self.router.can_go_forward(),
                        egui::Button::new("→").frame(false),
                    );
                    if forward.clicked() {
                        self.traverse_history(true);
                    }

                    ui.add_space(8.0);
                    ui.label(egui::RichText::new(&self.data.profile.name).strong().size(16.0));
                    ui.add_space(16.0);

                    for section in Section::ALL {
                        let selected = section == self.active_section;
                        if ui.selectable_label(selected, section.label()).clicked() && !selected {
                            self.navigate(section);
                        }
                    }
                });
                self.show_status_banner(ui);
            });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.status_banner.clone() else {
            return;
        };
        egui::Frame::new()
            .fill(theme::ERROR.linear_multiply(0.15))
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(egui::Margin::symmetric(8, 4))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&message).color(theme::ERROR).size(12.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
    }

    fn show_hero(&mut self, ui: &mut egui::Ui) {
        ui.add_space(SECTION_SPACING);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(&self.data.profile.name)
                    .size(42.0)
                    .strong(),
            );
            ui.label(
                egui::RichText::new(&self.data.profile.headline)
                    .size(20.0)
                    .color(theme::MUTED_FOREGROUND),
            );
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new("This site is experimental and not a reflection of my skills")
                    .size(14.0)
                    .color(theme::MUTED_FOREGROUND),
            );
            ui.add_space(12.0);

            let contact = self.data.profile.contact.clone();
            ui.horizontal(|ui| {
                // Center the row of round contact buttons.
                let button_count =
                    1 + usize::from(contact.github.is_some()) + usize::from(contact.linkedin.is_some());
                let row_width = button_count as f32 * 40.0;
                ui.add_space((ui.available_width() - row_width).max(0.0) / 2.0);

                if widgets::pill_button(ui, "Email").clicked() {
                    Self::open_link(ui.ctx(), &format!("mailto:{}", contact.email));
                }
                if let Some(github) = &contact.github {
                    if widgets::pill_button(ui, "GitHub").clicked() {
                        Self::open_link(ui.ctx(), github);
                    }
                }
                if let Some(linkedin) = &contact.linkedin {
                    if widgets::pill_button(ui, "LinkedIn").clicked() {
                        Self::open_link(ui.ctx(), linkedin);
                    }
                }
            });
        });
        ui.add_space(SECTION_SPACING);
    }

    fn show_about(&mut self, ui: &mut egui::Ui) {
        egui::Frame::new()
            .fill(theme::MUTED)
            .inner_margin(egui::Margin::symmetric(24, 32))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("About Me").size(26.0).strong());
                    ui.add_space(12.0);
                    ui.set_max_width(640.0);
                    ui.label(
                        egui::RichText::new(&self.data.profile.about)
                            .size(15.0)
                            .color(theme::FOREGROUND),
                    );
                });
            });
    }

    fn show_projects(&mut self, ui: &mut egui::Ui) {
        ui.add_space(SECTION_SPACING / 2.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("Projects").size(26.0).strong());
        });
        ui.add_space(12.0);

        if let Some(status) = self.projects.status_message() {
            let status = status.to_string();
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(status)
                        .italics()
                        .color(theme::MUTED_FOREGROUND),
                );
            });
            ui.add_space(SECTION_SPACING / 2.0);
            return;
        }
        let LoadState::Ready(projects) = &self.projects else {
            return;
        };
        let cards: Vec<ProjectCardView> =
            projects.iter().map(ProjectCardView::from_project).collect();

        let viewport = ui.available_width();
        let extents = vec![CARD_WIDTH; cards.len()];
        self.carousel.sync_geometry(viewport, &extents, CARD_GAP);

        let target = self.carousel.scroll_offset();
        let offset = ui.ctx().animate_value_with_time(
            egui::Id::new("project_carousel_offset"),
            target,
            CAROUSEL_OFFSET_ANIM_SECS,
        );

        let output = egui::ScrollArea::horizontal()
            .id_salt("projects_strip")
            .auto_shrink([false, true])
            .scroll_offset(egui::Vec2::new(offset, 0.0))
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing.x = CARD_GAP;
                ui.horizontal(|ui| {
                    for (index, card) in cards.iter().enumerate() {
                        self.show_project_card(ui, index, card);
                    }
                });
            });
        self.carousel_hovered = ui.rect_contains_pointer(output.inner_rect);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let row_width = 2.0 * 32.0 + 60.0;
            ui.add_space((ui.available_width() - row_width).max(0.0) / 2.0);
            if widgets::arrow_button(ui, self.prev_control.enabled(), "←").clicked() {
                self.prev_control.press();
            }
            {
                let engine = self.carousel.handle();
                let engine = engine.borrow();
                ui.label(
                    egui::RichText::new(format!(
                        "{} / {}",
                        engine.selected() + 1,
                        engine.snap_count()
                    ))
                    .color(theme::MUTED_FOREGROUND)
                    .size(12.0),
                );
            }
            if widgets::arrow_button(ui, self.next_control.enabled(), "→").clicked() {
                self.next_control.press();
            }
        });
        ui.add_space(SECTION_SPACING / 2.0);
    }

    fn show_project_card(&mut self, ui: &mut egui::Ui, index: usize, card: &ProjectCardView) {
        let texture = self.texture_for(ui.ctx(), index);
        widgets::card_frame().show(ui, |ui| {
            ui.set_width(CARD_WIDTH - 24.0);
            ui.vertical(|ui| {
                ui.add(
                    egui::Image::new(&texture)
                        .fit_to_exact_size(egui::Vec2::new(CARD_WIDTH - 24.0, CARD_IMAGE_HEIGHT))
                        .corner_radius(egui::CornerRadius::same(4)),
                );
                ui.add_space(8.0);
                ui.label(egui::RichText::new(&card.title).size(17.0).strong());
                ui.label(
                    egui::RichText::new(&card.description)
                        .size(13.0)
                        .color(theme::MUTED_FOREGROUND),
                );
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    for tag in &card.tags {
                        widgets::badge(ui, tag);
                    }
                });
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if let Some(code_url) = &card.code_url {
                        if widgets::pill_button(ui, "Code").clicked() {
                            Self::open_link(ui.ctx(), code_url);
                        }
                    }
                    if let Some(demo_url) = &card.demo_url {
                        if widgets::pill_button(ui, "Demo").clicked() {
                            Self::open_link(ui.ctx(), demo_url);
                        }
                    }
                });
            });
        });
    }

    fn texture_for(&mut self, ctx: &egui::Context, index: usize) -> egui::TextureHandle {
        if let Some(texture) = self.textures.get(&index) {
            return texture.clone();
        }
        if let Some(image) = self.images.get(&index) {
            let texture = upload_texture(ctx, &format!("project_image_{index}"), image);
            self.textures.insert(index, texture.clone());
            return texture;
        }
        self.placeholder_texture
            .get_or_insert_with(|| upload_texture(ctx, "project_placeholder", &placeholder()))
            .clone()
    }

    fn show_experience(&mut self, ui: &mut egui::Ui) {
        egui::Frame::new()
            .fill(theme::MUTED)
            .inner_margin(egui::Margin::symmetric(24, 32))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("Experience").size(26.0).strong());
                    ui.add_space(16.0);
                    ui.set_max_width(640.0);
                    let experiences = self.data.experiences.clone();
                    for experience in &experiences {
                        show_experience_entry(ui, experience);
                        ui.add_space(20.0);
                    }
                });
            });
    }

    fn show_skills(&mut self, ui: &mut egui::Ui) {
        ui.add_space(SECTION_SPACING / 2.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("Skills").size(26.0).strong());
            ui.add_space(16.0);
            ui.set_max_width(640.0);
            let skills = self.data.skills.clone();
            egui::Grid::new("skills_grid")
                .num_columns(2)
                .spacing(egui::Vec2::new(32.0, 4.0))
                .show(ui, |ui| {
                    for pair in skills.chunks(2) {
                        for skill in pair {
                            ui.vertical(|ui| {
                                ui.set_width(290.0);
                                widgets::skill_bar(ui, skill);
                            });
                        }
                        ui.end_row();
                    }
                });
        });
        ui.add_space(SECTION_SPACING / 2.0);
    }

    fn show_footer(&mut self, ui: &mut egui::Ui) {
        ui.separator();
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let year = chrono::Local::now().format("%Y");
            ui.label(
                egui::RichText::new(format!(
                    "© {year} {}. All rights reserved.",
                    self.data.profile.name
                ))
                .size(12.0)
                .color(theme::MUTED_FOREGROUND),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("v{}", self.data.profile.version))
                        .size(12.0)
                        .color(theme::MUTED_FOREGROUND),
                );
            });
        });
        ui.add_space(8.0);
    }

    fn show_page(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::BACKGROUND))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let sections: [(Section, fn(&mut Self, &mut egui::Ui)); 5] = [
                            (Section::Home, Self::show_hero),
                            (Section::About, Self::show_about),
                            (Section::Projects, Self::show_projects),
                            (Section::Experience, Self::show_experience),
                            (Section::Skills, Self::show_skills),
                        ];
                        for (section, show) in sections {
                            let response = ui.scope(|ui| show(self, ui)).response;
                            if self.pending_scroll == Some(section) {
                                response.scroll_to_me(Some(egui::Align::Min));
                                self.pending_scroll = None;
                            }
                        }
                        self.show_footer(ui);
                    });
            });
    }
}

fn show_experience_entry(ui: &mut egui::Ui, experience: &Experience) {
    ui.horizontal_top(|ui| {
        // Timeline dot and rail.
        let (rect, _) =
            ui.allocate_exact_size(egui::Vec2::new(16.0, 16.0), egui::Sense::hover());
        ui.painter()
            .circle_filled(rect.center(), 5.0, theme::PRIMARY);

        ui.vertical(|ui| {
            ui.label(egui::RichText::new(&experience.role).size(16.0).strong());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&experience.company).strong().size(13.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(&experience.period)
                            .size(12.0)
                            .color(theme::MUTED_FOREGROUND),
                    );
                });
            });
            ui.label(
                egui::RichText::new(&experience.description)
                    .size(13.0)
                    .color(theme::MUTED_FOREGROUND),
            );
        });
    });
}

fn upload_texture(
    ctx: &egui::Context,
    name: &str,
    image: &PreviewImage,
) -> egui::TextureHandle {
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);
        self.sync_window_title(ctx);
        self.handle_keyboard(ctx);

        self.show_top_bar(ctx);
        self.show_page(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

impl Drop for PortfolioApp {
    fn drop(&mut self) {
        // Teardown is unconditional: the tracker unsubscribes and one last
        // drain request heads to the worker before the channels close.
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.teardown(&mut self.router);
        }
        let _ = self.cmd_tx.try_send(BackendCommand::SubmitAnalytics);
    }
}
