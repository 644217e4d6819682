use iced::widget::image::Handle as ImageHandle;
use iced::widget::{button, column, container, row, text, Column};
use iced::{Alignment, Color, Element, Length, Task, Theme};
use std::sync::Arc;

// Declare the app modules
mod resolver;
mod view;

use resolver::{
    DishSurface, FsProbe, GeneratorConfig, HttpGenerator, ImageResolver, Resolution,
    SharedSurface, DISH_IMAGE_ID,
};
use view::{ViewController, ViewId, FADE_OUT};

/// The concrete resolver wired to the filesystem and the HTTP API
type DishResolver = ImageResolver<FsProbe, HttpGenerator>;

/// Main application state
struct MenuApp {
    /// Which section is visible and how faded each one is
    views: ViewController,
    /// The image container the resolver writes into
    surface: SharedSurface,
    /// Dish-of-the-day pipeline, shared with its detached task
    resolver: Arc<DishResolver>,
    /// Render cache so the resolved bytes are uploaded once
    dish_handle: Option<ImageHandle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User navigated to a section
    ShowView(ViewId),
    /// Next-tick opacity bump for a freshly shown view
    FadeInTick(ViewId),
    /// A fading view's 300ms window elapsed
    FadeOutDone(ViewId),
    /// The detached resolution task finished
    DishResolved(Resolution),
}

impl MenuApp {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = GeneratorConfig::from_env();
        println!(
            "🍽️  Breezeway menu starting (generation endpoint: {})",
            config.endpoint
        );

        let resolver = Arc::new(ImageResolver::new(FsProbe, HttpGenerator::new(config)));

        let mut app = MenuApp {
            views: ViewController::new(),
            surface: SharedSurface::new(),
            resolver,
            dish_handle: None,
        };

        // The landing view greets the user on startup
        let task = app.switch_to(ViewId::Landing);
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ShowView(id) => self.switch_to(id),
            Message::FadeInTick(id) => {
                self.views.fade_in_tick(id);
                Task::none()
            }
            Message::FadeOutDone(id) => {
                self.views.finish_fade_out(id);
                Task::none()
            }
            Message::DishResolved(resolution) => {
                if let DishSurface::Image(dish) = self.surface.snapshot() {
                    println!("🖼️  {} ready: {}", DISH_IMAGE_ID, dish.alt_text());
                    self.dish_handle = Some(ImageHandle::from_bytes(dish.bytes));
                }
                if resolution == Resolution::Failed {
                    eprintln!("🍽️  Showing the menu image error message");
                }
                Task::none()
            }
        }
    }

    /// Switch sections, schedule the fade timers, and (for the menu view)
    /// kick off image resolution as a detached task.
    ///
    /// The resolution task does not participate in the switch itself: its
    /// completion message only refreshes the render cache. Re-entering the
    /// menu view spawns the task again, but the resolver's surface guard
    /// makes every run after a displayed image a no-op.
    fn switch_to(&mut self, id: ViewId) -> Task<Message> {
        let mut tasks = Vec::new();

        // The next-tick opacity bump, so unhide and fade-in are sequenced
        tasks.push(Task::perform(async {}, move |_| Message::FadeInTick(id)));

        for other in self.views.show(id) {
            tasks.push(Task::perform(
                async move { tokio::time::sleep(FADE_OUT).await },
                move |_| Message::FadeOutDone(other),
            ));
        }

        if id == ViewId::Menu {
            let resolver = Arc::clone(&self.resolver);
            let surface = self.surface.clone();
            tasks.push(Task::perform(
                async move { resolver.run(&surface).await },
                Message::DishResolved,
            ));
        }

        Task::batch(tasks)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut stack = Column::new().spacing(30).align_x(Alignment::Center);
        for id in ViewId::ALL {
            if !self.views.is_hidden(id) {
                stack = stack.push(self.render_section(id));
            }
        }

        container(stack)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn render_section(&self, id: ViewId) -> Element<Message> {
        let opacity = self.views.opacity(id);
        match id {
            ViewId::Landing => self.landing_section(opacity),
            ViewId::Menu => self.menu_section(opacity),
            ViewId::Orders => self.orders_section(opacity),
        }
    }

    fn landing_section(&self, opacity: f32) -> Element<Message> {
        column![
            text("AES Breezeway").size(48).color(faded(INK, opacity)),
            text("Fresh from the cafeteria, every day.")
                .size(18)
                .color(faded(INK, opacity)),
            row![
                button("Today's Menu")
                    .on_press(Message::ShowView(ViewId::Menu))
                    .padding(10),
                button("My Orders")
                    .on_press(Message::ShowView(ViewId::Orders))
                    .padding(10),
            ]
            .spacing(20),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .into()
    }

    fn menu_section(&self, opacity: f32) -> Element<Message> {
        let dish: Element<Message> = match self.surface.snapshot() {
            DishSurface::Empty => column![].into(),
            DishSurface::Loading => text("⏳ Plating today's special...")
                .size(16)
                .color(faded(INK, opacity))
                .into(),
            DishSurface::Image(dish) => {
                let handle = self
                    .dish_handle
                    .clone()
                    .unwrap_or_else(|| ImageHandle::from_bytes(dish.bytes.clone()));
                column![
                    iced::widget::image(handle).width(Length::Fixed(420.0)),
                    text(dish.alt_text()).size(14).color(faded(INK, opacity)),
                ]
                .spacing(10)
                .align_x(Alignment::Center)
                .into()
            }
            DishSurface::Error(message) => {
                text(message).size(16).color(faded(ALERT, opacity)).into()
            }
        };

        column![
            text("Today's Special").size(36).color(faded(INK, opacity)),
            dish,
            row![
                button("Back")
                    .on_press(Message::ShowView(ViewId::Landing))
                    .padding(10),
                button("My Orders")
                    .on_press(Message::ShowView(ViewId::Orders))
                    .padding(10),
            ]
            .spacing(20),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .into()
    }

    fn orders_section(&self, opacity: f32) -> Element<Message> {
        column![
            text("My Orders").size(36).color(faded(INK, opacity)),
            text("No orders yet. Check out today's menu!")
                .size(16)
                .color(faded(INK, opacity)),
            row![
                button("Back")
                    .on_press(Message::ShowView(ViewId::Landing))
                    .padding(10),
                button("Today's Menu")
                    .on_press(Message::ShowView(ViewId::Menu))
                    .padding(10),
            ]
            .spacing(20),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Base ink color for text
const INK: Color = Color::BLACK;

/// Error text color
const ALERT: Color = Color {
    r: 0.86,
    g: 0.15,
    b: 0.15,
    a: 1.0,
};

/// Apply a view's fade opacity to a text color
fn faded(base: Color, opacity: f32) -> Color {
    Color {
        a: base.a * opacity,
        ..base
    }
}

fn main() -> iced::Result {
    iced::application("AES Breezeway Menu", MenuApp::update, MenuApp::view)
        .theme(MenuApp::theme)
        .centered()
        .run_with(MenuApp::new)
}
