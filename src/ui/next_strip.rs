/// Next strip: two preview cards beside the stage
use iced::widget::{column, container, image, text, Column};
use iced::{ContentFit, Element, Length};

use crate::state::point::ImagePoint;
use crate::Message;

const CARD_WIDTH: f32 = 180.0;
const CARD_IMAGE_HEIGHT: f32 = 110.0;

fn card(point: &ImagePoint) -> Element<'_, Message> {
    let preview = image(point.current_source().handle())
        .width(Length::Fixed(CARD_WIDTH))
        .height(Length::Fixed(CARD_IMAGE_HEIGHT))
        .content_fit(ContentFit::Cover);

    container(column![preview, text(&point.caption).size(14)].spacing(6))
        .padding(8)
        .style(container::rounded_box)
        .into()
}

/// The strip, or an empty column of the same width when hidden
pub fn view(cards: Option<[&ImagePoint; 2]>) -> Element<'_, Message> {
    let mut strip = Column::new()
        .spacing(16)
        .width(Length::Fixed(CARD_WIDTH + 16.0));

    if let Some([first, second]) = cards {
        strip = strip.push(text("NEXT").size(12)).push(card(first)).push(card(second));
    }

    strip.into()
}
