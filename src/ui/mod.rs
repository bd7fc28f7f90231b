mod glide;
mod lake;
mod values;

use crate::common::layout::Layout;
use crate::connection::{self, Connection};
use crate::params::{Field, ParamsEditor};
use crate::projection::Latest;
use crate::protocol::{Command as ServerCommand, Snapshot};
use crate::settings::Settings;
use chrono::{DateTime, Local};
use glide::Glide;
use iced::executor;
use iced::theme::{self, Theme};
use iced::widget::canvas::Cache;
use iced::widget::{button, column, container, row, scrollable, slider, text, toggler};
use iced::{time, Alignment, Application, Command, Element, Length, Subscription};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const FRAME: Duration = Duration::from_millis(16);

pub struct ShowcaseApp {
    settings: Settings,
    layout: Layout,
    connection: Option<Connection>,
    latest: Latest,
    agent: Option<Glide>,
    now: Instant,
    lake_cache: Cache,
    editor: ParamsEditor,
    is_simulating: bool,
    expanded: HashSet<String>,
    last_update: Option<DateTime<Local>>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Channel(connection::Event),
    Tick(Instant),
    Step,
    ToggleSimulation,
    Reset,
    ParamChanged(Field, f64),
    ParamsCommitted,
    SlipperyToggled(bool),
    RowToggled(String),
}

impl Application for ShowcaseApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = executor::Default;
    type Flags = Settings;

    fn new(settings: Settings) -> (Self, Command<Message>) {
        (
            Self {
                layout: settings.layout(),
                settings,
                connection: Default::default(),
                latest: Default::default(),
                agent: None,
                now: Instant::now(),
                lake_cache: Default::default(),
                editor: Default::default(),
                is_simulating: Default::default(),
                expanded: Default::default(),
                last_update: Default::default(),
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        format!("FrozenLake - {}", self.settings.endpoint)
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Channel(connection::Event::Connected(connection)) => {
                self.connection = Some(connection);
            }
            Message::Channel(connection::Event::Received(snapshot)) => {
                self.apply(*snapshot);
            }
            Message::Channel(connection::Event::Disconnected) => {
                // The server keeps simulation state per connection.
                self.connection = None;
                self.is_simulating = false;
            }
            Message::Tick(now) => {
                self.now = now;
            }
            Message::Step => {
                if !self.is_simulating {
                    self.send(ServerCommand::Step);
                }
            }
            Message::ToggleSimulation => {
                // The server flips its own flag only if the command reaches it.
                if self.send(ServerCommand::Simulate) {
                    self.is_simulating = !self.is_simulating;
                }
            }
            Message::Reset => {
                if !self.is_simulating {
                    self.send(ServerCommand::Reset);
                }
            }
            Message::ParamChanged(field, value) => {
                if !self.is_simulating {
                    self.editor.adjust(field, value);
                }
            }
            Message::ParamsCommitted => {
                if !self.is_simulating {
                    let command = self.editor.commit();
                    self.send(command);
                }
            }
            Message::SlipperyToggled(is_slippery) => {
                if !self.is_simulating {
                    let command = self.editor.set_slippery(is_slippery);
                    self.send(command);
                }
            }
            Message::RowToggled(key) => {
                if !self.expanded.remove(&key) {
                    self.expanded.insert(key);
                }
            }
        }

        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        let channel = connection::connect(
            self.settings.endpoint.clone(),
            self.settings.reconnect_delay(),
        )
        .map(Message::Channel);

        match &self.agent {
            Some(glide) if glide.is_moving(self.now) => {
                Subscription::batch([channel, time::every(FRAME).map(Message::Tick)])
            }
            _ => channel,
        }
    }

    fn view(&self) -> Element<Message> {
        let board: Element<Message> = match self.latest.view() {
            Some(view) => {
                let agent = self
                    .agent
                    .map_or(view.agent, |glide| glide.position(self.now));
                lake::view(view, agent, &self.lake_cache)
            }
            None => container(text("Waiting for the server...").size(18))
                .width(Length::Fixed(self.layout.board_size))
                .height(Length::Fixed(self.layout.board_size))
                .center_x()
                .center_y()
                .into(),
        };

        let rows = self
            .latest
            .view()
            .map(|view| view.rows.as_slice())
            .unwrap_or_default();

        let content = row![
            self.view_params(),
            column![board, self.view_status()]
                .spacing(10)
                .align_items(Alignment::Center)
                .width(Length::Fill),
            column![
                self.view_playback(),
                scrollable(values::view(rows, &self.expanded)).height(Length::Fill),
            ]
            .spacing(10)
            .width(Length::Fixed(350.)),
        ]
        .padding(10)
        .spacing(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

impl ShowcaseApp {
    pub fn run(settings: Settings) -> iced::Result {
        <Self as Application>::run(iced::Settings {
            antialiasing: true,
            window: iced::window::Settings {
                position: iced::window::Position::Centered,
                size: iced::Size {
                    height: 760.,
                    width: 1280.,
                },
                ..iced::window::Settings::default()
            },
            ..iced::Settings::with_flags(settings)
        })
    }

    fn apply(&mut self, snapshot: Snapshot) {
        let now = Instant::now();
        let view = self.latest.replace(snapshot, &self.layout);
        self.agent
            .get_or_insert_with(|| Glide::settled(view.agent, self.settings.glide(), now))
            .retarget(view.agent, now);
        self.now = now;

        for overlay in &view.overlays {
            if let Err(e) = &overlay.values {
                debug!(direction = overlay.action.label(), error = %e, "overlay unavailable");
            }
        }

        self.lake_cache.clear();
        self.last_update = Some(Local::now());
    }

    /// Returns whether the command was handed to the connection.
    fn send(&mut self, command: ServerCommand) -> bool {
        match &mut self.connection {
            Some(connection) => connection.send(command),
            None => {
                warn!(command = command.name(), "not connected, dropping command");
                false
            }
        }
    }

    fn view_params(&self) -> Element<Message> {
        let params = self.editor.params();
        let enabled = !self.is_simulating;

        let sliders = Field::ALL
            .into_iter()
            .fold(column![text("Algorithm Variables").size(18)], |col, field| {
                col.push(view_param(field, field.get(params), enabled))
            })
            .spacing(12);

        let slippery = toggler(
            String::from("Is slippery"),
            params.is_slippery,
            Message::SlipperyToggled,
        )
        .size(18);

        column![
            sliders,
            text("Environment Variables").size(18),
            slippery,
        ]
        .spacing(20)
        .width(Length::Fixed(300.))
        .into()
    }

    fn view_playback(&self) -> Element<Message> {
        let is_idle = !self.is_simulating;

        row![
            button("Reset")
                .on_press_maybe(is_idle.then_some(Message::Reset))
                .style(theme::Button::Destructive),
            button("Step")
                .on_press_maybe(is_idle.then_some(Message::Step))
                .style(theme::Button::Secondary),
            button(if self.is_simulating { "Pause" } else { "Play" })
                .on_press(Message::ToggleSimulation),
        ]
        .spacing(10)
        .into()
    }

    fn view_status(&self) -> Element<Message> {
        let link = if self.connection.is_some() {
            "online"
        } else {
            "offline"
        };

        let mut status = vec![link.to_string()];
        if let Some(snapshot) = self.latest.snapshot() {
            if let Some(reward) = snapshot.step.reward {
                status.push(format!("reward {reward}"));
            }
            if snapshot.step.done == Some(true) {
                status.push("done".into());
            }
            if snapshot.terminated {
                status.push("terminated".into());
            }
        }
        if let Some(at) = self.last_update {
            status.push(format!("updated {}", at.format("%H:%M:%S")));
        }

        text(status.join(" | ")).size(14).into()
    }
}

fn view_param<'a>(field: Field, value: f64, enabled: bool) -> Element<'a, Message> {
    let shown = match field {
        Field::Steps => format!("{value:.0}"),
        _ => format!("{value:.2}"),
    };
    let label = text(format!("{}: {shown}", field.label())).size(14);

    if !enabled {
        return label.into();
    }

    column![
        label,
        slider(field.range(), value, move |v| Message::ParamChanged(field, v))
            .step(field.step())
            .on_release(Message::ParamsCommitted),
    ]
    .spacing(4)
    .into()
}
