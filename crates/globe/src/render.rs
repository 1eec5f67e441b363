//! Data-only render extraction.
//!
//! The engine never talks to a GPU; each frame it collects typed commands
//! that an external renderer replays. Buffers are borrowed from the layers
//! (the dot position buffer is stable for the cloud's lifetime), so
//! extraction allocates only the command list.

use foundation::math::{EulerXyz, Quat, Vec3};
use layers::arcs::{ArcPath, DrawRange};
use layers::atmosphere::Atmosphere;
use layers::dots::EdgeFade;
use layers::landing::{
    LANDING_BASE_RADIUS, LANDING_RING_INNER, LANDING_RING_OUTER,
};
use layers::markers::pulse_at;
use layers::sphere::BaseSphere;
use layers::style::Rgb;
use scene::camera::Camera;

use crate::scene_graph::GlobeScene;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand<'a> {
    BaseSphere {
        sphere: BaseSphere,
    },
    AtmosphereShell {
        atmosphere: Atmosphere,
    },
    PointCloud {
        positions: &'a [f32],
        colors: &'a [f32],
        point_size: f32,
        opacity: f32,
        edge_fade: Option<EdgeFade>,
    },
    /// An animated arc: draw the `range` window of the path's tube.
    ArcTube {
        path: ArcPath,
        range: DrawRange,
        color: Rgb,
        lift: f64,
    },
    /// A fully drawn arc from a persisted group; no per-frame draw range.
    StaticArcTube {
        path: ArcPath,
        color: Rgb,
        lift: f64,
    },
    /// A flat disc on the sphere surface (markers, landing dots).
    SurfaceDisc {
        position: Vec3,
        orientation: Quat,
        radius: f64,
        scale: f64,
        opacity: f32,
        color: Rgb,
    },
    /// A flat ring on the sphere surface (pulses, landing rings).
    SurfaceRing {
        position: Vec3,
        orientation: Quat,
        inner_radius: f64,
        outer_radius: f64,
        scale: f64,
        opacity: f32,
        color: Rgb,
    },
}

#[derive(Debug)]
pub struct RenderFrame<'a> {
    /// False until the land-dot data has loaded; nothing should draw.
    pub visible: bool,
    pub scale: f64,
    pub rotation: EulerXyz,
    pub camera: Camera,
    pub commands: Vec<RenderCommand<'a>>,
}

/// Collect this frame's draw commands from the scene.
pub fn extract(scene: &GlobeScene) -> RenderFrame<'_> {
    let mut frame = RenderFrame {
        visible: scene.is_visible(),
        scale: scene.scale(),
        rotation: scene.rotation().euler,
        camera: *scene.camera(),
        commands: Vec::new(),
    };
    if !frame.visible {
        return frame;
    }

    let config = scene.config();
    let now = scene.now();

    frame.commands.push(RenderCommand::BaseSphere {
        sphere: config.sphere,
    });
    frame.commands.push(RenderCommand::AtmosphereShell {
        atmosphere: config.atmosphere,
    });

    if let Some(dots) = scene.dot_cloud() {
        frame.commands.push(RenderCommand::PointCloud {
            positions: dots.positions(),
            colors: dots.colors(),
            point_size: dots.point_size(),
            opacity: config.dot_opacity,
            edge_fade: config.edge_fade,
        });
    }

    if let Some(arcs) = scene.arc_group() {
        for arc in arcs.visible_arcs(now) {
            frame.commands.push(RenderCommand::ArcTube {
                path: arc.path,
                range: arc.range,
                color: config.arc_color,
                lift: config.arc_lift,
            });
        }
        if let Some(paths) = arcs.static_paths() {
            for path in paths {
                frame.commands.push(RenderCommand::StaticArcTube {
                    path,
                    color: config.arc_color,
                    lift: config.arc_lift,
                });
            }
        }
    }

    if let Some(markers) = scene.marker_set() {
        let pulse = pulse_at(now);
        for marker in markers.markers() {
            frame.commands.push(RenderCommand::SurfaceDisc {
                position: marker.position,
                orientation: marker.orientation,
                radius: marker.size,
                scale: 1.0,
                opacity: markers.style.opacity,
                color: markers.style.color,
            });
            // The looping pulse halo around each marker.
            frame.commands.push(RenderCommand::SurfaceRing {
                position: marker.position,
                orientation: marker.orientation,
                inner_radius: marker.size * 3.0 * 0.95,
                outer_radius: marker.size * 3.0,
                scale: pulse.scale,
                opacity: pulse.opacity as f32,
                color: markers.style.color,
            });
        }
    }

    for fx in scene.landing_effects() {
        let shapes = fx.shapes(now);
        frame.commands.push(RenderCommand::SurfaceDisc {
            position: fx.position(),
            orientation: fx.orientation(),
            radius: LANDING_BASE_RADIUS,
            scale: shapes.dot_scale,
            opacity: 1.0,
            color: config.arc_color,
        });
        frame.commands.push(RenderCommand::SurfaceRing {
            position: fx.position(),
            orientation: fx.orientation(),
            inner_radius: LANDING_RING_INNER,
            outer_radius: LANDING_RING_OUTER,
            scale: shapes.ring_scale,
            opacity: shapes.ring_opacity as f32,
            color: config.arc_color,
        });
    }

    frame
}
