//! Headless preview: builds the travel globe, steps it for a few simulated
//! seconds, and reports what happened. Useful for exercising the engine
//! without a renderer attached.

use std::env;

use foundation::math::{Vec2, Vec3, project};
use formats::dots::LandDot;
use formats::manifest::load_dot_package;
use formats::trips::{CityLocation, Trip, flatten_all_trips};
use globe::config::GlobeConfig;
use globe::render::extract;
use globe::scene_graph::GlobeScene;
use layers::dots::Ray;
use scene::viewport::Breakpoint;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_DT_S: f64 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut scene = GlobeScene::new(GlobeConfig::default(), Breakpoint::Md);

    // Load a real dot package if one was provided, otherwise fall back to a
    // small synthetic dataset so the preview always has something to show.
    let dots = match env::args().nth(1) {
        Some(dir) => match load_dot_package(&dir) {
            Ok((manifest, dots)) => {
                info!(dataset = %manifest.dataset_id, count = dots.len(), "loaded dot package");
                Some(dots)
            }
            Err(err) => {
                warn!(%err, "failed to load dot package");
                None
            }
        },
        None => Some(synthetic_dots()),
    };

    match dots {
        Some(dots) => scene.dots_loaded(dots),
        None => scene.dots_failed("no usable dot dataset"),
    }

    let trips = demo_trips();
    let arcs = flatten_all_trips(&trips);
    scene.set_markers(&formats::trips::arc_cities(&arcs));
    scene.start_free_mode(&arcs, 42);

    // Let the globe scale in and spawn a few random arcs.
    run_frames(&mut scene, 240);

    // Simulate a tap on the first dot, which spotlights its country and
    // flies the camera there.
    if let Some(target) = scene.dot_cloud().and_then(|d| d.dot(0).cloned()) {
        let toward = Vec3::new(target.x, target.y, target.z);
        let ray = Ray::new(toward * 4.0, -toward);
        scene.pointer_down(Vec2::new(400.0, 300.0), Some(ray));
        if let Some(iso) = scene.pointer_up(Some(ray)) {
            info!(%iso, "selected country");
        }
    }
    run_frames(&mut scene, 240);

    // Clear focus and settle back to the overview.
    scene.set_focus(None);
    run_frames(&mut scene, 240);

    let frame = extract(&scene);
    info!(
        visible = frame.visible,
        scale = frame.scale,
        commands = frame.commands.len(),
        camera_distance = frame.camera.distance(),
        "final render frame"
    );

    for event in scene.drain_events() {
        info!(frame = event.frame_index, event = ?event.event, "engine event");
    }
}

fn run_frames(scene: &mut GlobeScene, count: usize) {
    for _ in 0..count {
        scene.update(FRAME_DT_S);
    }
}

/// A handful of dots per country, projected the same way the offline
/// generator would.
fn synthetic_dots() -> Vec<LandDot> {
    let radius = 150.0;
    let seeds = [
        (40.7, -74.0, "United States", "USA"),
        (38.3, -85.8, "United States", "USA"),
        (47.6, -122.3, "United States", "USA"),
        (4.7, -74.1, "Colombia", "COL"),
        (10.4, -75.5, "Colombia", "COL"),
        (51.5, -0.1, "United Kingdom", "GBR"),
    ];
    seeds
        .iter()
        .map(|(lat, lon, name, iso)| {
            let p = project(*lat, *lon, radius);
            LandDot {
                x: p.x,
                y: p.y,
                z: p.z,
                country_name: (*name).to_string(),
                iso_a3: (*iso).to_string(),
            }
        })
        .collect()
}

fn demo_trips() -> Vec<Trip> {
    let nyc = CityLocation::new(40.7128, -74.006, "NYC").expect("city");
    let bogota = CityLocation::new(4.711, -74.0721, "Bogota").expect("city");
    let cartagena = CityLocation::new(10.391, -75.4794, "Cartagena").expect("city");
    let london = CityLocation::new(51.5074, -0.1278, "London").expect("city");

    vec![
        Trip::new(
            "colombia",
            vec!["USA".into(), "COL".into()],
            vec![nyc.clone(), bogota, cartagena, nyc.clone()],
        )
        .expect("trip"),
        Trip::new(
            "london",
            vec!["USA".into(), "GBR".into()],
            vec![nyc.clone(), london, nyc],
        )
        .expect("trip"),
    ]
}
