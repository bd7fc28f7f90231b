use super::Message;
use crate::common::layout::INFO_OUTSET;
use crate::projection::{Overlay, View};
use crate::{Action, Tile};
use iced::alignment;
use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, Path, Text};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme, Vector};

const BUBBLE: Color = Color {
    r: 1.,
    g: 1.,
    b: 1.,
    a: 0.4,
};

/// Draws the lake with the agent marker at `agent`, which trails `view.agent` while it glides.
pub fn view<'a>(view: &'a View, agent: Point, cache: &'a Cache) -> Element<'a, Message> {
    let extent = view.board.square_size() * view.board.map_size() as f32 + 2. * INFO_OUTSET;

    Canvas::new(Lake { view, agent, cache })
        .width(Length::Fixed(extent))
        .height(Length::Fixed(extent))
        .into()
}

struct Lake<'a> {
    view: &'a View,
    agent: Point,
    cache: &'a Cache,
}

impl<'a> canvas::Program<Message> for Lake<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let margin = Vector::new(INFO_OUTSET, INFO_OUTSET);
        let board = &self.view.board;

        let lake = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.with_save(|frame| {
                frame.translate(margin);

                let square = board.square_size();
                for (index, tile) in self.view.tiles.iter().enumerate() {
                    let selected = index == self.view.current;
                    let fill = if selected { 0.95 } else { 0.9 };
                    let origin = board.tile_origin(index);
                    let inset = square * (1. - fill) / 2.;

                    frame.fill_rectangle(
                        Point::new(origin.x + inset, origin.y + inset),
                        Size::new(square * fill, square * fill),
                        tile_color(*tile),
                    );
                }
            });
        });

        let agent = {
            let mut frame = Frame::new(renderer, bounds.size());
            frame.translate(margin);

            let radius = board.agent_size() / 2.;
            let center = Point::new(self.agent.x + radius, self.agent.y + radius);
            frame.fill(&Path::circle(center, radius), Color::from_rgb(0.9, 0.1, 0.1));

            for overlay in &self.view.overlays {
                draw_overlay(&mut frame, overlay);
            }

            frame.into_geometry()
        };

        vec![lake, agent]
    }
}

fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Hole => Color::from_rgb8(0x45, 0x7b, 0x9d),
        Tile::Goal => Color::from_rgb8(0xe3, 0xb2, 0x3c),
        Tile::Start | Tile::Ice => Color::from_rgb8(0xa8, 0xda, 0xdc),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Bubble {
    center: Point,
    radius: f32,
    label: &'static str,
    value: String,
}

/// Lays the readouts of one direction out as a row (up, down) or column (left, right) of
/// bubbles centered in the overlay box. Missing values only hide this direction.
fn bubbles(overlay: &Overlay) -> Vec<Bubble> {
    let Ok(values) = &overlay.values else {
        return Vec::new();
    };

    let bounds = overlay.bounds;
    let horizontal = matches!(overlay.action, Action::Up | Action::Down);
    let diameter = bounds.width.min(bounds.height);
    let total = diameter * values.len() as f32;

    values
        .iter()
        .enumerate()
        .map(|(i, info)| {
            let along = diameter * (i as f32 + 0.5);
            let center = if horizontal {
                Point::new(
                    bounds.x + (bounds.width - total) / 2. + along,
                    bounds.y + diameter / 2.,
                )
            } else {
                Point::new(
                    bounds.x + diameter / 2.,
                    bounds.y + (bounds.height - total) / 2. + along,
                )
            };

            Bubble {
                center,
                radius: diameter / 2.,
                label: info.label,
                value: info.value.clone(),
            }
        })
        .collect()
}

fn draw_overlay(frame: &mut Frame, overlay: &Overlay) {
    for bubble in bubbles(overlay) {
        let Bubble {
            center,
            radius,
            label,
            value,
        } = bubble;

        frame.fill(&Path::circle(center, radius), BUBBLE);
        frame.fill_text(Text {
            content: label.to_string(),
            position: Point::new(center.x, center.y - radius * 0.4),
            color: Color::from_rgb8(0x1d, 0x35, 0x57),
            size: 9.0.into(),
            horizontal_alignment: alignment::Horizontal::Center,
            vertical_alignment: alignment::Vertical::Center,
            ..Text::default()
        });
        frame.fill_text(Text {
            content: value,
            position: Point::new(center.x, center.y + radius * 0.2),
            color: Color::BLACK,
            size: 12.0.into(),
            horizontal_alignment: alignment::Horizontal::Center,
            vertical_alignment: alignment::Vertical::Center,
            ..Text::default()
        });
    }
}
