use cablecore::math::sampling::argmin_abs;
use iced::{
    mouse, time,
    widget::{
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, image, mouse_area, row, scrollable, text, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";
const MAP_WIDTH: f32 = 720.0;
const MAP_HEIGHT: f32 = 420.0;
const MAP_MARGIN: f32 = 16.0;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Cable Spectrogram Visualizer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Light
}

#[derive(Debug)]
struct Visualizer {
    route: Option<RouteView>,
    hover: Option<Point>,
    selected: Option<usize>,
    spectrogram: Option<image::Handle>,
    title: String,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    RouteFetched(Result<RouteView, String>),
    MapHovered(Point),
    MapClicked,
    SelectSubmitted(Result<SelectReply, String>),
    ImageFetched(Result<Vec<u8>, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                route: None,
                hover: None,
                selected: None,
                spectrogram: None,
                title: "Click a point to view its spectrogram".into(),
                status: "Waiting for the route...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_route(), Message::RouteFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_route(), Message::RouteFetched),
            Message::RouteFetched(Ok(route)) => {
                let is_new = state
                    .route
                    .as_ref()
                    .map(|known| known.x.len() != route.x.len())
                    .unwrap_or(true);
                if is_new {
                    state.status = format!("Route loaded: {} points", route.x.len());
                    state.push_history(format!("Route: {} points", route.x.len()));
                }
                if state.selected.is_none() {
                    state.selected = route.selected;
                }
                state.route = Some(route);
                Task::none()
            }
            Message::RouteFetched(Err(err)) => {
                state.status = format!("Route error: {err}");
                Task::none()
            }
            Message::MapHovered(position) => {
                state.hover = Some(position);
                Task::none()
            }
            Message::MapClicked => {
                let clicked = state.route.as_ref().zip(state.hover).and_then(
                    |(route, position)| nearest_route_point(route, position),
                );
                match clicked {
                    Some(index) => {
                        state.status = format!("Selecting channel {index}...");
                        Task::perform(post_select(index), Message::SelectSubmitted)
                    }
                    None => Task::none(),
                }
            }
            Message::SelectSubmitted(Ok(reply)) => {
                state.selected = Some(reply.index);
                state.title = reply.label.clone();
                state.status = format!("Selected channel {}", reply.index);
                state.push_history(reply.label);
                Task::perform(fetch_image(), Message::ImageFetched)
            }
            Message::SelectSubmitted(Err(err)) => {
                state.status = format!("Select error: {err}");
                Task::none()
            }
            Message::ImageFetched(Ok(bytes)) => {
                state.spectrogram = Some(image::Handle::from_bytes(bytes));
                Task::none()
            }
            Message::ImageFetched(Err(err)) => {
                state.status = format!("Image error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let map = Canvas::new(RouteMap {
            route: state.route.clone(),
            selected: state.selected,
        })
        .width(Length::Fixed(MAP_WIDTH))
        .height(Length::Fixed(MAP_HEIGHT));

        let clickable_map = mouse_area(map)
            .on_move(Message::MapHovered)
            .on_press(Message::MapClicked);

        let hover_info = match (state.route.as_ref(), state.hover) {
            (Some(route), Some(position)) => match nearest_route_point(route, position) {
                Some(index) => {
                    let distance = route.distances_m.get(index).copied().unwrap_or(0.0);
                    text(format!("Channel {}, {:.1} m", index, distance)).size(14)
                }
                None => text("").size(14),
            },
            _ => text("").size(14),
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let map_column = column![
            text("Cable map").size(26),
            clickable_map,
            hover_info,
            text(&state.status).size(14),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(120.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Shrink);

        let image_pane: Element<'_, Message> = match &state.spectrogram {
            Some(handle) => image(handle.clone())
                .height(Length::Fixed(MAP_HEIGHT))
                .into(),
            None => text("No spectrogram yet").size(14).into(),
        };

        let image_column = column![text(&state.title).size(20), image_pane]
            .spacing(10)
            .padding(16)
            .width(Length::Fill);

        let layout = row![map_column, image_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_route() -> Result<RouteView, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/route"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<RouteView>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_select(index: usize) -> Result<SelectReply, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/select"))
        .json(&SelectRequest { index })
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        response
            .json::<SelectReply>()
            .await
            .map_err(|e| e.to_string())
    } else {
        Err(response.status().to_string())
    }
}

async fn fetch_image() -> Result<Vec<u8>, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/spectrogram"))
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err("no spectrogram selected yet".into());
    }
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}

#[derive(Debug, Serialize)]
struct SelectRequest {
    index: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct SelectReply {
    index: usize,
    label: String,
    #[allow(dead_code)]
    distance_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RouteView {
    #[serde(default)]
    x: Vec<f64>,
    #[serde(default)]
    y: Vec<f64>,
    #[serde(default)]
    distances_m: Vec<f64>,
    #[serde(default)]
    selected: Option<usize>,
}

/// Uniform scale-to-fit mapping from route coordinates to map pixels, shared
/// by drawing and click resolution so both agree on point positions.
struct MapTransform {
    scale: f64,
    min_x: f64,
    mid_y: f64,
}

impl MapTransform {
    fn fit(route: &RouteView) -> Option<Self> {
        if route.x.is_empty() {
            return None;
        }
        let min_x = route.x.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_x = route.x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_y = route.y.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_y = route.y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let span_x = (max_x - min_x).max(1e-9);
        let span_y = (max_y - min_y).max(1e-9);
        let usable_w = (MAP_WIDTH - 2.0 * MAP_MARGIN) as f64;
        let usable_h = (MAP_HEIGHT - 2.0 * MAP_MARGIN) as f64;
        let scale = (usable_w / span_x).min(usable_h / span_y);
        Some(Self {
            scale,
            min_x,
            mid_y: (min_y + max_y) / 2.0,
        })
    }

    fn to_screen(&self, x: f64, y: f64) -> Point {
        Point::new(
            MAP_MARGIN + ((x - self.min_x) * self.scale) as f32,
            MAP_HEIGHT / 2.0 - ((y - self.mid_y) * self.scale) as f32,
        )
    }
}

fn nearest_route_point(route: &RouteView, position: Point) -> Option<usize> {
    let transform = MapTransform::fit(route)?;
    let squared: Vec<f64> = route
        .x
        .iter()
        .zip(route.y.iter())
        .map(|(&x, &y)| {
            let screen = transform.to_screen(x, y);
            let dx = (screen.x - position.x) as f64;
            let dy = (screen.y - position.y) as f64;
            dx * dx + dy * dy
        })
        .collect();
    argmin_abs(&squared, 0.0)
}

#[derive(Clone)]
struct RouteMap {
    route: Option<RouteView>,
    selected: Option<usize>,
}

impl canvas::Program<Message> for RouteMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.99, 0.99, 0.99),
        );

        let border = Path::new(|builder| {
            builder.rectangle(Point::ORIGIN, bounds.size());
        });
        frame.stroke(
            &border,
            Stroke::default().with_color(Color::from_rgb(0.8, 0.8, 0.8)),
        );

        if let Some(route) = &self.route {
            if let Some(transform) = MapTransform::fit(route) {
                for (index, (&x, &y)) in route.x.iter().zip(route.y.iter()).enumerate() {
                    let center = transform.to_screen(x, y);
                    let is_selected = self.selected == Some(index);
                    let radius = if is_selected { 5.0 } else { 2.0 };
                    let marker = Path::new(|builder| builder.circle(center, radius));
                    let color = if is_selected {
                        Color::from_rgb(0.84, 0.15, 0.16)
                    } else {
                        Color::BLACK
                    };
                    frame.fill(&marker, color);
                }
            }
        }

        vec![frame.into_geometry()]
    }
}
