use crate::config::HighlightStyle;
use crate::menu::{BASE_SCALE, HIGHLIGHT_SCALE, base_tint, highlight_tint};
use dwell::geom::Pose;
use dwell::sector::{SectorLayout, Wedge};
use palette::Srgba;

#[derive(Debug, Clone, PartialEq)]
pub struct SectorVisual {
    pub index: usize,
    pub wedge: Wedge,
    pub tint: Srgba<f64>,
    pub scale: f64,
}

impl SectorVisual {
    fn new(index: usize, layout: &SectorLayout) -> Self {
        Self {
            index,
            wedge: layout.wedge(index),
            tint: base_tint(),
            scale: BASE_SCALE,
        }
    }

    fn set_highlighted(&mut self, highlighted: bool, style: HighlightStyle) {
        self.tint = if highlighted && style.tints() {
            highlight_tint()
        } else {
            base_tint()
        };
        self.scale = if highlighted && style.scales() {
            HIGHLIGHT_SCALE
        } else {
            BASE_SCALE
        };
    }

    pub fn is_highlighted(&self) -> bool {
        self.tint != base_tint() || self.scale != BASE_SCALE
    }
}

/// Visual state of the menu for the current session.
///
/// Sector visuals are rebuilt from scratch on every spawn so no highlight
/// survives into the next session.
#[derive(Debug, Clone)]
pub struct RadialMenu {
    pub visible: bool,
    pub pose: Pose,
    pub sectors: Vec<SectorVisual>,
    pub highlight_index: Option<usize>,
    style: HighlightStyle,
    spawn_count: u64,
}

impl RadialMenu {
    pub fn new(style: HighlightStyle) -> Self {
        Self {
            visible: false,
            pose: Pose::default(),
            sectors: Vec::new(),
            highlight_index: None,
            style,
            spawn_count: 0,
        }
    }

    pub fn style(&self) -> HighlightStyle {
        self.style
    }

    pub fn set_style(&mut self, style: HighlightStyle) {
        self.style = style;
    }

    pub fn spawn_count(&self) -> u64 {
        self.spawn_count
    }

    pub fn spawn(&mut self, pose: Pose, layout: &SectorLayout) {
        self.sectors.clear();
        self.sectors
            .extend((0..layout.count()).map(|i| SectorVisual::new(i, layout)));
        self.pose = pose;
        self.highlight_index = None;
        self.visible = true;
        self.spawn_count += 1;
    }

    /// Highlights one sector and resets the rest. Inside the dead-zone
    /// (`None`) the previous highlight is left as is.
    pub fn highlight(&mut self, index: Option<usize>) -> bool {
        let Some(index) = index.filter(|&i| i < self.sectors.len()) else {
            return false;
        };
        if self.highlight_index == Some(index) {
            return false;
        }

        let style = self.style;
        for sector in &mut self.sectors {
            sector.set_highlighted(sector.index == index, style);
        }
        self.highlight_index = Some(index);
        true
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwell::geom::Vec3;

    fn layout(count: usize) -> SectorLayout {
        SectorLayout::new(count, 10.0).unwrap()
    }

    #[test]
    fn test_spawn_builds_one_visual_per_sector() {
        let mut menu = RadialMenu::new(HighlightStyle::default());
        let pose = Pose {
            position: Vec3::new(0.0, 1.6, 1.0),
            ..Pose::default()
        };
        menu.spawn(pose, &layout(5));

        assert!(menu.visible);
        assert_eq!(menu.pose, pose);
        assert_eq!(menu.sectors.len(), 5);
        assert_eq!(menu.sectors[2].wedge, layout(5).wedge(2));
        assert!(menu.sectors.iter().all(|s| !s.is_highlighted()));
    }

    #[test]
    fn test_highlight_is_exclusive() {
        let mut menu = RadialMenu::new(HighlightStyle::TintAndScale);
        menu.spawn(Pose::default(), &layout(4));

        assert!(menu.highlight(Some(1)));
        assert!(menu.highlight(Some(3)));

        let lit: Vec<_> = menu
            .sectors
            .iter()
            .filter(|s| s.is_highlighted())
            .map(|s| s.index)
            .collect();
        assert_eq!(lit, vec![3]);
        assert_eq!(menu.sectors[3].scale, HIGHLIGHT_SCALE);
        assert_eq!(menu.sectors[3].tint, highlight_tint());
    }

    #[test]
    fn test_scale_style_keeps_base_tint() {
        let mut menu = RadialMenu::new(HighlightStyle::Scale);
        menu.spawn(Pose::default(), &layout(4));
        menu.highlight(Some(0));

        assert_eq!(menu.sectors[0].tint, base_tint());
        assert_eq!(menu.sectors[0].scale, HIGHLIGHT_SCALE);
    }

    #[test]
    fn test_deadzone_and_out_of_range_keep_highlight() {
        let mut menu = RadialMenu::new(HighlightStyle::Tint);
        menu.spawn(Pose::default(), &layout(4));
        menu.highlight(Some(2));

        assert!(!menu.highlight(None));
        assert!(!menu.highlight(Some(9)));
        assert_eq!(menu.highlight_index, Some(2));
        assert!(menu.sectors[2].is_highlighted());
    }

    #[test]
    fn test_respawn_clears_stale_highlight() {
        let mut menu = RadialMenu::new(HighlightStyle::default());
        menu.spawn(Pose::default(), &layout(4));
        menu.highlight(Some(2));
        menu.hide();
        assert!(!menu.visible);

        menu.spawn(Pose::default(), &layout(6));
        assert_eq!(menu.spawn_count(), 2);
        assert_eq!(menu.sectors.len(), 6);
        assert_eq!(menu.highlight_index, None);
        assert!(menu.sectors.iter().all(|s| !s.is_highlighted()));
    }
}
