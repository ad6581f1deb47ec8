use iced::keyboard::{self, key, Key, Modifiers};
use iced::widget::{button, canvas, column, container, image, row, stack, text, Row, Space};
use iced::{time, window, Alignment, ContentFit, Element, Length, Size, Subscription, Task, Theme};
use rfd::FileDialog;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod audio;
mod config;
mod error;
mod manifest;
mod state;
mod ui;

use audio::{AudioPlayer, SoundEffect};
use config::CarouselConfig;
use error::CarouselError;
use state::carousel::{CarouselState, Phase};
use state::gesture::Swipe;
use state::point::ImagePoint;
use state::transition::Direction;
use ui::spinner::RatingSpinner;
use ui::stage::{pulse_scale, Stage, StageEvent};

/// Initial window size; the stage is fitted against this until the first resize
const WINDOW_SIZE: Size = Size::new(1280.0, 800.0);

const THUMBNAIL_SIZE: f32 = 64.0;

/// Main application state
struct PhotoCarousel {
    config: CarouselConfig,
    carousel: CarouselState,
    /// None when no sound is configured or no output device exists
    audio: Option<AudioPlayer>,
    /// Status message to display to the user
    status: String,
    /// Time of the last animation frame
    now: Instant,
    /// Reference point for the idle pulse
    pulse_epoch: Instant,
    /// Bumped on every navigation and reload; stale swap and settle timers are ignored
    navigation_generation: u64,
    /// Bumped on every resize; only the latest debounce timer applies
    resize_generation: u64,
    pending_viewport: Option<Size>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Open Manifest"
    OpenManifest,
    /// Background manifest load finished
    ManifestLoaded(Result<Vec<ImagePoint>, Arc<CarouselError>>),
    /// Sound effect file was read
    SoundLoaded(Result<SoundEffect, Arc<CarouselError>>),
    Next,
    Previous,
    /// Hide delay elapsed: render the new point
    ContentSwap(u64),
    /// Settle delay elapsed: accept navigation again
    Settled(u64),
    /// Next strip rotation timer
    NextStripTick,
    /// Animation frame
    Frame(Instant),
    Resized(Size),
    /// Debounce timer for the resize with this generation
    ResizeSettled(u64),
    Stage(StageEvent),
    ToggleRating,
    SelectAlternate(usize),
    CycleAlternate,
}

impl PhotoCarousel {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (config, status) = match CarouselConfig::load() {
            Ok(config) => (config, "Loading images...".to_string()),
            Err(e) => {
                tracing::error!("❌ {}", e);
                (CarouselConfig::default(), format!("⚠️  {}, using defaults", e))
            }
        };

        let mut tasks = vec![load_manifest(config.clone())];
        if let Some(path) = config.sound_effect.clone() {
            tasks.push(Task::perform(SoundEffect::load(path), |result| {
                Message::SoundLoaded(result.map_err(Arc::new))
            }));
        }

        tracing::info!("🎨 Photo Carousel starting with manifest {}", config.manifest.display());

        (PhotoCarousel::with_config(config, status), Task::batch(tasks))
    }

    fn with_config(config: CarouselConfig, status: String) -> Self {
        let carousel = CarouselState::new(&config, WINDOW_SIZE);
        let now = Instant::now();

        PhotoCarousel {
            config,
            carousel,
            audio: None,
            status,
            now,
            pulse_epoch: now,
            navigation_generation: 0,
            resize_generation: 0,
            pending_viewport: None,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenManifest => {
                let picked = FileDialog::new()
                    .set_title("Select Image Manifest")
                    .add_filter("Manifest", &["json"])
                    .pick_file();

                if let Some(path) = picked {
                    self.status = format!("Loading {}...", path.display());
                    self.config = self.config.with_manifest(path);
                    return load_manifest(self.config.clone());
                }

                Task::none()
            }
            Message::ManifestLoaded(Ok(points)) => {
                self.status = format!("{} images", points.len());
                self.navigation_generation += 1;
                self.carousel.load(points);
                Task::none()
            }
            Message::ManifestLoaded(Err(e)) => {
                tracing::error!("❌ Manifest failed: {}", e);
                self.status = format!("❌ {}", e);
                Task::none()
            }
            Message::SoundLoaded(Ok(effect)) => {
                match AudioPlayer::new(effect, self.config.volume) {
                    Ok(player) => self.audio = Some(player),
                    Err(e) => tracing::warn!("⚠️  Sound disabled: {}", e),
                }
                Task::none()
            }
            Message::SoundLoaded(Err(e)) => {
                tracing::warn!("⚠️  Sound disabled: {}", e);
                Task::none()
            }
            Message::Next => self.navigate(Direction::Forward),
            Message::Previous => self.navigate(Direction::Backward),
            Message::ContentSwap(generation) => {
                if generation != self.navigation_generation
                    || !self.carousel.swap_content(Instant::now())
                {
                    return Task::none();
                }
                delay(self.config.settle_delay(), Message::Settled(generation))
            }
            Message::Settled(generation) => {
                if generation == self.navigation_generation {
                    self.carousel.settle();
                }
                Task::none()
            }
            Message::NextStripTick => {
                self.carousel.advance_next_strip();
                Task::none()
            }
            Message::Frame(now) => {
                self.now = now;
                self.carousel.tick(now);
                Task::none()
            }
            Message::Resized(size) => {
                self.resize_generation += 1;
                self.pending_viewport = Some(size);
                let generation = self.resize_generation;
                delay(self.config.resize_debounce(), Message::ResizeSettled(generation))
            }
            Message::ResizeSettled(generation) => {
                if generation == self.resize_generation {
                    if let Some(size) = self.pending_viewport.take() {
                        tracing::debug!(width = size.width, height = size.height, "📐 Re-fitting stage");
                        self.carousel.set_viewport(size);
                    }
                }
                Task::none()
            }
            Message::Stage(event) => self.handle_stage(event),
            Message::ToggleRating => {
                self.now = Instant::now();
                self.carousel.toggle_rating(self.now);
                Task::none()
            }
            Message::SelectAlternate(index) => {
                self.carousel.select_alternate(index);
                Task::none()
            }
            Message::CycleAlternate => {
                self.carousel.cycle_alternate();
                Task::none()
            }
        }
    }

    /// Start a transition and schedule the content swap
    fn navigate(&mut self, direction: Direction) -> Task<Message> {
        if self.carousel.navigate(direction).is_none() {
            if self.carousel.is_transitioning() {
                tracing::debug!("⏳ Navigation dropped mid-transition");
            }
            return Task::none();
        }
        self.navigation_generation += 1;

        if let Some(player) = &self.audio {
            if let Err(e) = player.play() {
                tracing::warn!("⚠️  Could not play sound: {}", e);
            }
        }

        delay(
            self.config.hide_delay(),
            Message::ContentSwap(self.navigation_generation),
        )
    }

    fn handle_stage(&mut self, event: StageEvent) -> Task<Message> {
        let zoom = &mut self.carousel.zoom;
        match event {
            StageEvent::Swipe(Swipe::Next) => return self.navigate(Direction::Forward),
            StageEvent::Swipe(Swipe::Previous) => return self.navigate(Direction::Backward),
            StageEvent::PinchStart { a, b, image } => zoom.begin_pinch(a, b, image),
            StageEvent::PinchMove(distance) => {
                zoom.update_pinch(distance);
            }
            StageEvent::PinchEnd => zoom.end_pinch(),
            StageEvent::Pan(delta) => {
                zoom.pan(delta);
            }
            StageEvent::Zoom { delta, at, image } => {
                zoom.zoom_at(delta, at, image, self.config.max_scale);
            }
        }
        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = row![
            button("Open Manifest")
                .on_press(Message::OpenManifest)
                .padding(10),
            text(&self.status).size(16),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let Some(point) = self.carousel.current_point() else {
            return container(column![header].padding(40))
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        };

        let header = header.push(
            text(format!("{} / {}", self.carousel.current() + 1, self.carousel.len())).size(16),
        );

        let source = point.current_source();
        let pulse = if self.carousel.zoom.pulse_enabled() && self.carousel.phase() == Phase::Idle {
            pulse_scale(
                self.now.saturating_duration_since(self.pulse_epoch),
                self.config.pulse_period(),
                self.config.pulse_amplitude,
            )
        } else {
            1.0
        };

        let stage = canvas(Stage {
            image: Some(source.handle()),
            size: self.carousel.stage_size(),
            zoom: &self.carousel.zoom,
            appearance: self.carousel.appearance(self.now),
            pulse,
            swipe_threshold: self.config.swipe_threshold,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let caption = text(&point.caption).size(28);

        let mut rating_row = Row::new().spacing(16).align_y(Alignment::Center);
        if self.carousel.rating.is_visible() {
            let spec = *self.carousel.rating.spec();
            rating_row = rating_row.push(
                canvas(RatingSpinner {
                    spec,
                    offset: self.carousel.rating.offset_at(self.now),
                })
                .width(Length::Fixed(spec.digit_height * 1.4))
                .height(Length::Fixed(spec.digit_height)),
            );
        }
        rating_row = rating_row.push(
            button(text(self.carousel.rating_button_label()))
                .on_press(Message::ToggleRating)
                .padding(10),
        );

        let main = column![
            header,
            stage,
            caption,
            thumbnails(point),
            rating_row,
        ]
        .spacing(16)
        .padding(24)
        .align_x(Alignment::Center)
        .width(Length::Fill);

        let strip = if self.carousel.next_strip_visible() {
            ui::next_strip::view(self.carousel.next_cards())
        } else {
            ui::next_strip::view(None)
        };

        let content = row![main, container(strip).padding(24).center_y(Length::Fill)];

        let background = image(source.handle())
            .content_fit(ContentFit::Cover)
            .width(Length::Fill)
            .height(Length::Fill)
            .opacity(0.25);

        stack![background, content].into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![
            keyboard::on_key_press(handle_key),
            window::resize_events().map(|(_id, size)| Message::Resized(size)),
        ];

        if !self.carousel.is_empty() {
            subscriptions
                .push(time::every(self.config.next_strip_interval()).map(|_| Message::NextStripTick));

            // The idle pulse keeps the stage moving; without it frames stop once still
            if self.config.pulse_amplitude > 0.0 || self.carousel.is_animating(self.now) {
                subscriptions.push(window::frames().map(Message::Frame));
            }
        }

        Subscription::batch(subscriptions)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Alternate images of the current point, if it has any
fn thumbnails(point: &ImagePoint) -> Element<'_, Message> {
    if !point.has_alternates() {
        return Space::with_height(Length::Fixed(0.0)).into();
    }

    point
        .sources()
        .iter()
        .enumerate()
        .fold(Row::new().spacing(8), |row, (index, source)| {
            let style = if index == point.current_index() {
                button::primary
            } else {
                button::secondary
            };
            row.push(
                button(
                    image(source.handle())
                        .width(Length::Fixed(THUMBNAIL_SIZE))
                        .height(Length::Fixed(THUMBNAIL_SIZE))
                        .content_fit(ContentFit::Cover),
                )
                .padding(2)
                .style(style)
                .on_press(Message::SelectAlternate(index)),
            )
        })
        .into()
}

fn handle_key(key: Key, _modifiers: Modifiers) -> Option<Message> {
    match key.as_ref() {
        Key::Named(key::Named::ArrowRight | key::Named::Space | key::Named::Enter) => {
            Some(Message::Next)
        }
        Key::Named(key::Named::ArrowLeft) => Some(Message::Previous),
        Key::Character("t") => Some(Message::CycleAlternate),
        Key::Character("r") => Some(Message::ToggleRating),
        _ => None,
    }
}

fn load_manifest(config: CarouselConfig) -> Task<Message> {
    Task::perform(manifest::load_points(config), |result| {
        Message::ManifestLoaded(result.map_err(Arc::new))
    })
}

/// Deliver `message` after `duration`
fn delay(duration: std::time::Duration, message: Message) -> Task<Message> {
    Task::perform(
        async move { tokio::time::sleep(duration).await },
        move |_| message.clone(),
    )
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photo_carousel=info")),
        )
        .init();

    iced::application(
        "Photo Carousel",
        PhotoCarousel::update,
        PhotoCarousel::view,
    )
    .subscription(PhotoCarousel::subscription)
    .theme(PhotoCarousel::theme)
    .window_size(WINDOW_SIZE)
    .centered()
    .run_with(PhotoCarousel::new)
}
