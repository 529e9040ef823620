use crate::model::{RouteView, SelectionInfo};
use crate::page::INDEX_PAGE;
use crate::session::{Selection, Session};
use anyhow::Result;
use cablecore::telemetry::MetricsRecorder;
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::header::{HeaderValue, CONTENT_TYPE},
    http::StatusCode,
    Filter,
};

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    index: usize,
}

type SharedSelection = Arc<RwLock<Option<SelectionInfo>>>;

/// Bridge that hosts the browser-facing endpoints over one shared session.
///
/// The selection is the only mutable state; both the map payload and the
/// image endpoint derive from it, so a click never forces the route geometry
/// to be recomputed.
pub struct ViewerBridge {
    state: SharedSelection,
    metrics: Arc<MetricsRecorder>,
}

impl ViewerBridge {
    pub fn new(session: Arc<Session>, bind: SocketAddr) -> Self {
        let state: SharedSelection = Arc::new(RwLock::new(None));
        let metrics = Arc::new(MetricsRecorder::new());

        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let session_filter = warp::any().map(move || session.clone());
        let metrics_for_filter = metrics.clone();
        let metrics_filter = warp::any().map(move || metrics_for_filter.clone());

        let page_route = warp::path::end()
            .and(warp::get())
            .map(|| warp::reply::html(INDEX_PAGE));

        let route_route = warp::path("route")
            .and(warp::get())
            .and(session_filter.clone())
            .and(state_filter.clone())
            .map(|session: Arc<Session>, state: SharedSelection| {
                let selected = state.read().unwrap().as_ref().map(|info| info.index);
                let plan = session.plan();
                warp::reply::json(&RouteView {
                    x: plan.x().to_vec(),
                    y: plan.y().to_vec(),
                    distances_m: plan.distances().to_vec(),
                    selected,
                })
            });

        let select_route = warp::path("select")
            .and(warp::post())
            .and(warp::body::json())
            .and(session_filter)
            .and(state_filter.clone())
            .and(metrics_filter)
            .and_then(
                |request: SelectRequest,
                 session: Arc<Session>,
                 state: SharedSelection,
                 metrics: Arc<MetricsRecorder>| async move {
                    match session.select(request.index) {
                        Ok(selection) => {
                            metrics.record_selection();
                            let reply = json!({
                                "status": "ok",
                                "index": selection.index,
                                "label": selection.label.clone(),
                                "distance_m": selection.distance_m,
                            });
                            let mut guard = state.write().unwrap();
                            *guard = Some(SelectionInfo {
                                index: selection.index,
                                distance_m: selection.distance_m,
                                label: selection.label,
                                image: selection.image,
                            });
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&reply),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("select error: {}", err);
                            metrics.record_error();
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let image_route = warp::path("spectrogram")
            .and(warp::get())
            .and(state_filter)
            .map(|state: SharedSelection| {
                let guard = state.read().unwrap();
                spectrogram_response(guard.as_ref())
            });

        thread::spawn(move || {
            let routes = page_route.or(route_route).or(select_route).or(image_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(bind).await;
            });
        });

        Self { state, metrics }
    }

    /// Stores a selection resolved outside the HTTP path, such as the offline
    /// summary run.
    pub fn publish(&self, selection: &Selection) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = Some(SelectionInfo {
            index: selection.index,
            distance_m: selection.distance_m,
            label: selection.label.clone(),
            image: selection.image.clone(),
        });
        println!(
            "[GUI] selected {} ({} image bytes)",
            selection.label,
            selection.image.len()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Option<SelectionInfo> {
        self.state.read().unwrap().clone()
    }
}

/// PNG bytes of the current selection, or a 404 with placeholder text before
/// the first click.
fn spectrogram_response(selection: Option<&SelectionInfo>) -> warp::http::Response<Vec<u8>> {
    match selection {
        Some(info) => bytes_response(info.image.clone(), StatusCode::OK, "image/png"),
        None => bytes_response(
            b"click a route point to view its spectrogram".to_vec(),
            StatusCode::NOT_FOUND,
            "text/plain; charset=utf-8",
        ),
    }
}

fn bytes_response(
    body: Vec<u8>,
    status: StatusCode,
    content_type: &'static str,
) -> warp::http::Response<Vec<u8>> {
    let mut response = warp::http::Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn bridge_stores_published_selection() {
        let dir = tempdir().unwrap();
        let mut file = File::create(dir.path().join("spectrogram_ch5m.png")).unwrap();
        file.write_all(b"png-bytes").unwrap();

        let mut config = ViewerConfig::from_args(1.0, 50.0, dir.path().to_path_buf(), 9000);
        config.loop_starts_m = Vec::new();
        config.loop_lengths_m = Vec::new();

        let session = Arc::new(Session::new(&config).unwrap());
        let bridge = ViewerBridge::new(session.clone(), ([127, 0, 0, 1], 0).into());

        let selection = session.select(0).unwrap();
        bridge.publish(&selection).unwrap();

        let stored = bridge.snapshot().unwrap();
        assert_eq!(stored.index, 0);
        assert_eq!(stored.label, "Channel 0 — 5.00 m");
        assert_eq!(stored.image, b"png-bytes");
        assert_eq!(bridge.metrics().snapshot(), (0, 0));
    }

    #[test]
    fn spectrogram_endpoint_serves_png_bytes() {
        let info = SelectionInfo {
            index: 3,
            distance_m: 12.0,
            label: "Channel 3 — 12.00 m".into(),
            image: b"png-bytes".to_vec(),
        };
        let response = spectrogram_response(Some(&info));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "image/png"
        );
        assert_eq!(response.body(), &b"png-bytes".to_vec());
    }

    #[test]
    fn spectrogram_placeholder_before_any_click() {
        let response = spectrogram_response(None);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert!(!response.body().is_empty());
    }
}
