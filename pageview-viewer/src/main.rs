use std::path::PathBuf;

use clap::Parser;
use iced::{
    event, keyboard, mouse,
    widget::{button, column, container, horizontal_space, image as img, row, text},
    window, ContentFit, Element, Event, Length, Size, Subscription, Task, Theme,
};
use pageview_core::{InputEvent, ViewportConfig};
use tracing_subscriber::EnvFilter;

mod events;
mod pdf_viewer;
mod renderer;

use pdf_viewer::PdfViewer;

const WINDOW_SIZE: Size = Size::new(1024.0, 768.0);
const TOOLBAR_HEIGHT: f32 = 48.0;

/// Continuous-scroll PDF viewer
#[derive(Debug, Parser)]
#[command(name = "pageview", version, about)]
struct Args {
    /// PDF file to open
    file: PathBuf,

    /// Initial zoom, 1.0 fits one page to the window height
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    /// JSON file with viewport settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> iced::Result {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pageview=debug,pageview_core=info,info")),
        )
        .init();

    iced::application("PageView", App::update, App::view)
        .subscription(App::subscription)
        .theme(|_| Theme::Dark)
        .window_size(WINDOW_SIZE)
        .run_with(move || App::new(args))
}

#[derive(Debug, Clone)]
enum Message {
    Resized(Size),
    ModifiersChanged(keyboard::Modifiers),
    Wheel(mouse::ScrollDelta),
    Input(InputEvent),
    ZoomIn,
    ZoomOut,
    ZoomReset,
    GoToPage(usize),
}

struct App {
    viewer: Result<PdfViewer, String>,
    modifiers: keyboard::Modifiers,
}

impl App {
    fn new(args: Args) -> (Self, Task<Message>) {
        let viewer = open(&args, page_area(WINDOW_SIZE)).map_err(|e| {
            tracing::error!("Failed to open {}: {:#}", args.file.display(), e);
            format!("{:#}", e)
        });
        (
            Self {
                viewer,
                modifiers: keyboard::Modifiers::default(),
            },
            Task::none(),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        if let Message::ModifiersChanged(modifiers) = message {
            self.modifiers = modifiers;
            return Task::none();
        }
        let Ok(viewer) = &mut self.viewer else {
            return Task::none();
        };
        match message {
            Message::Resized(size) => {
                let (width, height) = page_area(size);
                viewer.resize(width, height);
            }
            Message::Wheel(delta) => {
                viewer.handle_inputs(events::wheel_events(delta, self.modifiers))
            }
            Message::Input(event) => viewer.handle_input(event),
            Message::ZoomIn => viewer.zoom_in(),
            Message::ZoomOut => viewer.zoom_out(),
            Message::ZoomReset => viewer.reset_zoom(),
            Message::GoToPage(page) => viewer.go_to_page(page),
            Message::ModifiersChanged(_) => {}
        }
        Task::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, status, _window| match event {
            Event::Window(window::Event::Resized(size)) => Some(Message::Resized(size)),
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                Some(Message::ModifiersChanged(modifiers))
            }
            _ if status == event::Status::Captured => None,
            Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
                events::key_event(&key, modifiers).map(Message::Input)
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => Some(Message::Wheel(delta)),
            _ => None,
        })
    }

    fn view(&self) -> Element<Message> {
        let viewer = match &self.viewer {
            Ok(viewer) => viewer,
            Err(error) => {
                return container(
                    column![
                        text("Cannot display document").size(24),
                        text(error.clone()).size(14),
                    ]
                    .spacing(12)
                    .align_x(iced::Alignment::Center),
                )
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
            }
        };

        let current = viewer.current_page();
        let count = viewer.page_count();
        let toolbar = row![
            text(viewer.file_name()).size(14),
            horizontal_space(),
            button("−").on_press(Message::ZoomOut),
            text(format!("{}%", (viewer.zoom() * 100.0).round() as i32)),
            button("+").on_press(Message::ZoomIn),
            button("Reset").on_press(Message::ZoomReset),
            horizontal_space(),
            text(format!("Page {} of {}", current + 1, count)),
            button("◀").on_press_maybe((current > 0).then(|| Message::GoToPage(current - 1))),
            button("▶").on_press_maybe((current + 1 < count).then(|| Message::GoToPage(current + 1))),
        ]
        .spacing(10)
        .padding(8)
        .align_y(iced::Alignment::Center)
        .height(Length::Fixed(TOOLBAR_HEIGHT));

        let pages = img(viewer.frame())
            .content_fit(ContentFit::None)
            .width(Length::Fill)
            .height(Length::Fill);

        column![toolbar, pages].into()
    }
}

fn open(args: &Args, (width, height): (u32, u32)) -> anyhow::Result<PdfViewer> {
    let config = match &args.config {
        Some(path) => ViewportConfig::load(path)?,
        None => ViewportConfig::default(),
    };
    PdfViewer::open(&args.file, config, args.zoom, (width, height))
}

/// Pixel size left for pages below the toolbar
fn page_area(window: Size) -> (u32, u32) {
    let width = window.width.max(1.0).round() as u32;
    let height = (window.height - TOOLBAR_HEIGHT).max(1.0).round() as u32;
    (width, height)
}
