use layers::arcs::ArcGroupConfig;
use layers::atmosphere::Atmosphere;
use layers::dots::{EdgeFade, PickOptions};
use layers::sphere::BaseSphere;
use layers::style::Rgb;

/// Every tunable the globe scene reads, in one place.
///
/// Defaults reproduce the production look: a 150-unit dot shell over a
/// 149-unit base sphere, slow eastward auto-rotation, purple/blue palette.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    /// Radius of the dot shell; arcs and markers anchor to it too.
    pub radius: f64,
    /// Auto-rotation speed around Y, radians per second.
    pub rotation_speed_rad_s: f64,

    pub sphere: BaseSphere,
    pub atmosphere: Atmosphere,

    pub dot_base_color: Rgb,
    pub dot_highlight_color: Rgb,
    pub dot_point_size: f32,
    pub dot_opacity: f32,
    /// Far-hemisphere fade; `None` renders both hemispheres flat.
    pub edge_fade: Option<EdgeFade>,
    pub pick: PickOptions,

    pub arc_color: Rgb,
    /// Arcs render slightly above the dot shell to avoid z-fighting.
    pub arc_lift: f64,
    pub arcs: ArcGroupConfig,

    pub marker_color: Rgb,
    pub marker_size: f64,

    /// How long a clicked country stays highlighted.
    pub highlight_hold_s: f64,
    pub focus_duration_s: f64,
    /// Whether a dot selection also flies the camera to that country.
    pub focus_on_select: bool,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        let radius = 150.0;
        Self {
            radius,
            rotation_speed_rad_s: 0.02,
            sphere: BaseSphere::new(radius - 1.0, Rgb::new(0.3255, 0.2471, 0.4824)), // #533f7b
            atmosphere: Atmosphere::new(radius, Rgb::new(0.9569, 0.7373, 0.9647)),   // #f4bcf6
            dot_base_color: Rgb::new(0.8745, 0.5490, 0.9922), // #df8cfd
            dot_highlight_color: Rgb::new(0.5255, 0.8314, 0.9882), // #86d4fc
            dot_point_size: 2.5,
            dot_opacity: 0.8,
            edge_fade: Some(EdgeFade::default()),
            pick: PickOptions::default(),
            arc_color: Rgb::new(0.8667, 0.4353, 0.9412), // #dd6ff0
            arc_lift: 0.1,
            arcs: ArcGroupConfig {
                radius,
                ..ArcGroupConfig::default()
            },
            marker_color: Rgb::new(0.8667, 0.4353, 0.9412), // #dd6ff0
            marker_size: 1.0,
            highlight_hold_s: 2.0,
            focus_duration_s: 2.0,
            focus_on_select: true,
        }
    }
}
