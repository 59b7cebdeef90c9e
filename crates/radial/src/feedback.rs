use dwell::geom::{Pose, Vec3};

/// Ring that fills while a ray dwells on an interactable.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressIndicator {
    pub visible: bool,
    pub pose: Pose,
    pub fill: f64,
    display_distance: f64,
}

impl ProgressIndicator {
    pub fn new(display_distance: f64) -> Self {
        Self {
            visible: false,
            pose: Pose::default(),
            fill: 0.0,
            display_distance,
        }
    }

    /// Places the ring between the target and the head. The head position is
    /// captured once per hover.
    pub fn show(&mut self, head: Vec3, target: Vec3) {
        self.pose = placement(head, target, self.display_distance);
        self.fill = 0.0;
        self.visible = true;
    }

    pub fn set_fill(&mut self, progress: f64) {
        self.fill = progress.clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.fill = 0.0;
        self.visible = false;
    }
}

/// Pose `distance` from `target` toward `head`, facing away from the viewer
/// like a UI panel.
pub fn placement(head: Vec3, target: Vec3, distance: f64) -> Pose {
    let toward_head = (head - target).normalized().unwrap_or(Vec3::FORWARD * -1.0);
    Pose {
        position: target + toward_head * distance,
        forward: toward_head * -1.0,
        up: Vec3::UP,
    }
}
