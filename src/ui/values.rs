use super::Message;
use crate::projection::DisplayRow;
use iced::theme;
use iced::widget::{button, column, container, row, text, Column};
use iced::{Element, Length};
use itertools::Itertools;
use std::collections::HashSet;

/// Symbol/value table of the agent's variables. Sequences collapse behind their key.
pub fn view<'a>(rows: &'a [DisplayRow], expanded: &HashSet<String>) -> Element<'a, Message> {
    let mut table = Column::new()
        .push(
            row![
                text("Symbol").size(14).width(Length::FillPortion(1)),
                text("Value").size(14).width(Length::FillPortion(2)),
            ]
            .spacing(10),
        )
        .spacing(6);
    let mut sequences = Column::new().spacing(6);

    for r in rows {
        match r {
            DisplayRow::Scalar { key, value } => {
                table = table.push(
                    row![
                        text(key).width(Length::FillPortion(1)),
                        text(value).width(Length::FillPortion(2)),
                    ]
                    .spacing(10),
                );
            }
            DisplayRow::Sequence { key, items } => {
                sequences = sequences.push(view_sequence(key, items, expanded.contains(key)));
            }
        }
    }

    column![table, sequences].spacing(12).into()
}

fn view_sequence<'a>(key: &str, items: &[String], is_expanded: bool) -> Element<'a, Message> {
    let toggle = button(text(format!("{key} ({})", items.len())))
        .on_press(Message::RowToggled(key.to_string()))
        .style(theme::Button::Text);

    if !is_expanded {
        return toggle.into();
    }

    column![
        toggle,
        container(text(items.iter().join("  ")).size(14)).padding(6),
    ]
    .into()
}
