use carecore::model::{OccupancyHistogram, SocialEvent, SocializationSummary, TracePoint};
use carecore::render::{MapScene, PathAnimator};
use carecore::{MapConfig, MarkerKind};
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Size, Subscription, Task, Theme,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "CareTrace Visualizer".into()
}

/// Two independent cadences: a coarse data refresh and the fine-grained
/// animation tick. iced tears both down with the application, so neither
/// can fire into a dismissed view.
fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    Subscription::batch([
        time::every(Duration::from_secs(5)).map(|_| Message::RefreshTick),
        time::every(Duration::from_millis(200)).map(|_| Message::AnimationTick),
    ])
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    form: ScenarioForm,
    dashboard: Option<DashboardPayload>,
    low_rows: Vec<LowInteractionRow>,
    animator: PathAnimator,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    RefreshTick,
    AnimationTick,
    DashboardFetched(Result<DashboardPayload, String>),
    LowInteractionFetched(Result<Vec<LowInteractionRow>, String>),
    FormFieldChanged(FormField, String),
    SubmitScenario,
    ScenarioSubmitted(Result<String, String>),
}

#[derive(Debug, Clone, Copy)]
enum FormField {
    Threshold,
    Residents,
    Samples,
    Seed,
    Description,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let form = ScenarioForm::default();
        let threshold = form.threshold_minutes();
        (
            Visualizer {
                form,
                dashboard: None,
                low_rows: Vec::new(),
                animator: PathAnimator::new(),
                status: "Waiting for report...".into(),
                history: Vec::new(),
            },
            Task::batch([
                Task::perform(fetch_dashboard(), Message::DashboardFetched),
                Task::perform(fetch_low_interaction(threshold), Message::LowInteractionFetched),
            ]),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::RefreshTick => {
                let threshold = state.form.threshold_minutes();
                Task::batch([
                    Task::perform(fetch_dashboard(), Message::DashboardFetched),
                    Task::perform(fetch_low_interaction(threshold), Message::LowInteractionFetched),
                ])
            }
            Message::AnimationTick => {
                let trace_len = state
                    .dashboard
                    .as_ref()
                    .map(|d| d.report.mobility.movement_path.len())
                    .unwrap_or(0);
                state.animator.advance(trace_len);
                Task::none()
            }
            Message::DashboardFetched(Ok(payload)) => {
                state.status = format!(
                    "Report received: {} heat cells / {} path points",
                    payload.report.mobility.heatmap.len(),
                    payload.report.mobility.movement_path.len()
                );
                state.push_history(format!(
                    "Report for {}: {} events, {} friends",
                    payload.report.name,
                    payload.report.events.len(),
                    payload.report.friends.len()
                ));
                state.dashboard = Some(payload);
                Task::none()
            }
            Message::DashboardFetched(Err(err)) => {
                state.status = format!("Report error: {err}");
                Task::none()
            }
            Message::LowInteractionFetched(Ok(rows)) => {
                state.low_rows = rows;
                Task::none()
            }
            Message::LowInteractionFetched(Err(err)) => {
                state.status = format!("Low-interaction error: {err}");
                Task::none()
            }
            Message::FormFieldChanged(field, value) => {
                state.form.update_field(field, value);
                if matches!(field, FormField::Threshold) {
                    let threshold = state.form.threshold_minutes();
                    Task::perform(fetch_low_interaction(threshold), Message::LowInteractionFetched)
                } else {
                    Task::none()
                }
            }
            Message::SubmitScenario => {
                let payload = state.form.to_payload();
                Task::perform(post_scenario(payload), Message::ScenarioSubmitted)
            }
            Message::ScenarioSubmitted(Ok(message)) => {
                state.status = message;
                state.push_history("Scenario submitted".into());
                Task::none()
            }
            Message::ScenarioSubmitted(Err(err)) => {
                state.status = format!("Scenario error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let config_column = column![
            text("Dashboard Controls").size(26),
            text_input("Threshold (minutes)", &state.form.threshold)
                .on_input(|value| Message::FormFieldChanged(FormField::Threshold, value))
                .padding(6),
            text_input("Residents", &state.form.residents)
                .on_input(|value| Message::FormFieldChanged(FormField::Residents, value))
                .padding(6),
            text_input("Samples per resident", &state.form.samples)
                .on_input(|value| Message::FormFieldChanged(FormField::Samples, value))
                .padding(6),
            text_input("Seed", &state.form.seed)
                .on_input(|value| Message::FormFieldChanged(FormField::Seed, value))
                .padding(6),
            text_input("Description", &state.form.description)
                .on_input(|value| Message::FormFieldChanged(FormField::Description, value))
                .padding(6),
            button("POST scenario")
                .on_press(Message::SubmitScenario)
                .padding(10),
            text(&state.status).size(14),
            column![
                text("Parameter definitions").size(16),
                text("Threshold: residents whose total interaction time falls under this many minutes are flagged for follow-up.")
                    .size(12),
                text("Residents: number of tracked residents in the generated scenario.")
                    .size(12),
                text("Samples per resident: one position sample per minute of walk history.")
                    .size(12),
                text("Seed: deterministic PRNG seeding so scenarios replay consistently.")
                    .size(12),
                text("Description: free-text note included in the ingest log.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let resident_line = if let Some(dashboard) = &state.dashboard {
            text(format!(
                "Resident: {} (ID {})",
                dashboard.report.name, dashboard.report.user_id
            ))
            .size(18)
        } else {
            text("Resident: n/a").size(18)
        };

        let overview_line = if let Some(dashboard) = &state.dashboard {
            text(format!(
                "Active devices: {}  |  Events today: {}",
                dashboard.overview.active_devices, dashboard.overview.events_today
            ))
            .size(14)
        } else {
            text("Active devices: n/a").size(14)
        };

        let socialization_line = if let Some(dashboard) = &state.dashboard {
            let summary = &dashboard.report.socialization;
            text(format!(
                "Socialization: today {:.2} h | week {:.2} h | month {:.2} h",
                summary.today_hours, summary.week_hours, summary.month_hours
            ))
            .size(14)
        } else {
            text("Socialization: n/a").size(14)
        };

        let butterfly_line = if let Some(dashboard) = &state.dashboard {
            let butterfly = &dashboard.report.butterfly;
            let level = if butterfly.isolation_level.is_empty() {
                "n/a"
            } else {
                butterfly.isolation_level.as_str()
            };
            text(format!(
                "Interaction status: {} ({} min total)",
                level, butterfly.total_minutes
            ))
            .size(14)
        } else {
            text("Interaction status: n/a").size(14)
        };

        let (heatmap, events, trace) = state
            .dashboard
            .as_ref()
            .map(|d| {
                (
                    d.report.mobility.heatmap.clone(),
                    d.report.events.clone(),
                    d.report.mobility.movement_path.clone(),
                )
            })
            .unwrap_or_default();

        let map_element: Element<'_, Message> =
            if heatmap.is_empty() && events.is_empty() && trace.is_empty() {
                text("No mobility data.").size(14).into()
            } else {
                Canvas::new(MobilityMap {
                    heatmap,
                    events: events.clone(),
                    trace,
                    animator: state.animator,
                })
                .width(Length::Fill)
                .height(Length::Fixed(380.0))
                .into()
            };

        let major_events = events
            .iter()
            .filter(|event| event.participants >= 4)
            .take(6)
            .fold(Column::new().spacing(4), |col, event| {
                col.push(
                    text(format!(
                        "Event {}: {} -> {} ({} people)",
                        event.event_id,
                        event.start.format("%m-%d %H:%M"),
                        event.end.format("%H:%M"),
                        event.participants
                    ))
                    .size(12),
                )
            });
        let major_events = if events.iter().any(|event| event.participants >= 4) {
            major_events
        } else {
            Column::new().push(text("No major events yet").size(12))
        };

        let friends_list = if let Some(dashboard) = &state.dashboard {
            if dashboard.report.friends.is_empty() {
                Column::new().push(text("No shared events yet").size(12))
            } else {
                dashboard
                    .report
                    .friends
                    .iter()
                    .fold(Column::new().spacing(4), |col, friend| {
                        col.push(
                            text(format!(
                                "{}: {:.2} minutes together",
                                friend.name, friend.overlap_minutes
                            ))
                            .size(12),
                        )
                    })
            }
        } else {
            Column::new().push(text("No report yet").size(12))
        };

        let low_table = if state.low_rows.is_empty() {
            Column::new().push(text("No residents under the threshold").size(12))
        } else {
            state
                .low_rows
                .iter()
                .fold(Column::new().spacing(4), |col, row| {
                    col.push(
                        text(format!("{}: {} min", row.name, row.total_minutes)).size(12),
                    )
                })
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

        let dashboard_column = column![
            text("Facility Dashboard").size(26),
            resident_line,
            overview_line,
            socialization_line,
            butterfly_line,
            text("Mobility map (squares = dwell, circles = events, dot = live position)").size(16),
            map_element,
            text("Major events (4+ residents)").size(16),
            Container::new(major_events).padding(6),
            text("Top friends").size(16),
            Container::new(friends_list).padding(6),
            text("Low-interaction residents").size(16),
            Container::new(scrollable(low_table).height(Length::Fixed(110.0))).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![config_column, dashboard_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_dashboard() -> Result<DashboardPayload, String> {
    let response = reqwest::get("http://127.0.0.1:9000/report")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<DashboardPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn fetch_low_interaction(threshold_minutes: i64) -> Result<Vec<LowInteractionRow>, String> {
    let url = format!(
        "http://127.0.0.1:9000/low-interaction?threshold_minutes={}",
        threshold_minutes
    );
    let response = reqwest::get(&url).await.map_err(|e| e.to_string())?;
    response
        .json::<Vec<LowInteractionRow>>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_scenario(config: ScenarioConfig) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9000/ingest-config")
        .json(&config)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Scenario submitted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone)]
struct ScenarioForm {
    threshold: String,
    residents: String,
    samples: String,
    seed: String,
    description: String,
}

impl ScenarioForm {
    fn default() -> Self {
        Self {
            threshold: "5".into(),
            residents: "6".into(),
            samples: "240".into(),
            seed: "0".into(),
            description: "Rust visualizer scenario".into(),
        }
    }

    fn update_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Threshold => self.threshold = value,
            FormField::Residents => self.residents = value,
            FormField::Samples => self.samples = value,
            FormField::Seed => self.seed = value,
            FormField::Description => self.description = value,
        }
    }

    fn threshold_minutes(&self) -> i64 {
        self.threshold.trim().parse().unwrap_or(5)
    }

    fn to_payload(&self) -> ScenarioConfig {
        ScenarioConfig {
            residents: self.residents.parse().ok(),
            samples_per_resident: self.samples.parse().ok(),
            seed: self.seed.parse().ok(),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ScenarioConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    residents: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    samples_per_resident: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DashboardPayload {
    #[serde(default)]
    report: ReportPayload,
    #[serde(default)]
    overview: OverviewPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ReportPayload {
    #[serde(default)]
    user_id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    socialization: SocializationSummary,
    #[serde(default)]
    events: Vec<SocialEvent>,
    #[serde(default)]
    mobility: MobilityPayload,
    #[serde(default)]
    friends: Vec<FriendPayload>,
    #[serde(default)]
    butterfly: ButterflyPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MobilityPayload {
    #[serde(default)]
    heatmap: OccupancyHistogram,
    #[serde(default)]
    movement_path: Vec<TracePoint>,
}

#[derive(Debug, Clone, Deserialize)]
struct FriendPayload {
    #[allow(dead_code)]
    user_id: u64,
    name: String,
    overlap_minutes: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ButterflyPayload {
    #[serde(default)]
    total_minutes: i64,
    #[serde(default)]
    isolation_level: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct OverviewPayload {
    #[serde(default)]
    active_devices: usize,
    #[serde(default)]
    events_today: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct LowInteractionRow {
    #[allow(dead_code)]
    user_id: u64,
    name: String,
    total_minutes: i64,
}

/// Canvas program for the layered mobility map. Layout and colors live
/// here; every placement decision comes from `MapScene::compose` so the
/// three marker classes share one grid.
#[derive(Clone)]
struct MobilityMap {
    heatmap: OccupancyHistogram,
    events: Vec<SocialEvent>,
    trace: Vec<TracePoint>,
    animator: PathAnimator,
}

impl canvas::Program<Message> for MobilityMap {
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
            Color::from_rgb(0.04, 0.07, 0.13),
        );

        let margin = 12.0_f32;
        let side = (bounds.width.min(bounds.height) - margin * 2.0).max(1.0);
        let offset_x = (bounds.width - side) / 2.0;
        let offset_y = (bounds.height - side) / 2.0;

        let config = MapConfig {
            display_size: f64::from(side),
            ..Default::default()
        };

        let border = Path::new(|builder| {
            builder.rectangle(Point::new(offset_x, offset_y), Size::new(side, side))
        });
        frame.stroke(
            &border,
            Stroke::default().with_color(Color::from_rgb(0.25, 0.25, 0.3)),
        );

        let scene = MapScene::compose(
            &self.heatmap,
            &self.events,
            &self.trace,
            &self.animator,
            &config,
        );

        if let Some(scene) = scene {
            for marker in &scene.markers {
                let x = offset_x + marker.x as f32;
                let y = offset_y + marker.y as f32;
                match marker.kind {
                    MarkerKind::HeatCell => {
                        let cell = config.cell_size as f32;
                        frame.fill_rectangle(
                            Point::new(x - cell / 2.0, y - cell / 2.0),
                            Size::new(cell, cell),
                            Color::from_rgba(0.0, 0.59, 1.0, marker.opacity as f32),
                        );
                    }
                    MarkerKind::Event => {
                        let circle = Path::new(|builder| {
                            builder.circle(Point::new(x, y), config.event_radius as f32)
                        });
                        frame.fill(&circle, Color::from_rgb(0.95, 0.55, 0.2));
                    }
                    MarkerKind::Position => {
                        let radius = config.position_radius as f32;
                        let dot = Path::new(|builder| builder.circle(Point::new(x, y), radius));
                        frame.fill(&dot, Color::from_rgb(0.3, 0.9, 0.45));
                        let ring =
                            Path::new(|builder| builder.circle(Point::new(x, y), radius + 3.0));
                        frame.stroke(
                            &ring,
                            Stroke::default()
                                .with_width(1.5)
                                .with_color(Color::from_rgb(0.3, 0.9, 0.45)),
                        );
                    }
                }
            }
        }

        vec![frame.into_geometry()]
    }
}
