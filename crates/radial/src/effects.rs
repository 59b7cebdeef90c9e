use crate::config::{Config, EffectKind};
use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PanelName(String);

crate::impl_string_newtype!(PanelName);

pub fn color_modes() -> [Srgb<f64>; 4] {
    [
        Srgb::new(1.0, 1.0, 1.0),
        Srgb::new(1.0, 0.0, 0.0),
        Srgb::new(1.0, 0.92, 0.016),
        Srgb::new(0.0, 0.0, 1.0),
    ]
}

/// Scene light driven by the four-sector menu:
/// 0 next color, 1 previous color, 2 off, 3 on.
#[derive(Debug, Clone, PartialEq)]
pub struct LightController {
    color_mode: usize,
    enabled: bool,
}

impl Default for LightController {
    fn default() -> Self {
        Self {
            color_mode: 0,
            enabled: true,
        }
    }
}

impl LightController {
    pub fn color(&self) -> Srgb<f64> {
        color_modes()[self.color_mode]
    }

    pub fn color_mode(&self) -> usize {
        self.color_mode
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn apply(&mut self, selection: Option<usize>) {
        let modes = color_modes().len();
        match selection {
            Some(0) => self.color_mode = (self.color_mode + 1) % modes,
            Some(1) => self.color_mode = (self.color_mode + modes - 1) % modes,
            Some(2) => self.enabled = false,
            Some(3) => self.enabled = true,
            _ => return,
        }
        log::debug!(
            "Light color mode {} ({})",
            self.color_mode,
            if self.enabled { "on" } else { "off" }
        );
    }
}

/// Shows exactly one of a fixed set of panels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelSwitcher {
    panels: Vec<PanelName>,
    active: Option<usize>,
}

impl PanelSwitcher {
    pub fn new(panels: Vec<PanelName>) -> Self {
        Self {
            panels,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&PanelName> {
        self.active.and_then(|i| self.panels.get(i))
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn show(&mut self, selection: Option<usize>) {
        match selection.filter(|&i| i < self.panels.len()) {
            Some(index) => {
                self.active = Some(index);
                log::info!("Panel '{}' is now active", self.panels[index]);
            }
            None => log::warn!("Invalid panel index: {:?}", selection),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Light(LightController),
    Panels(PanelSwitcher),
    None,
}

impl Effect {
    pub fn from_config(config: &Config) -> Self {
        match config.effect {
            EffectKind::Light => Self::Light(LightController::default()),
            EffectKind::Panels => Self::Panels(PanelSwitcher::new(config.panels.clone())),
            EffectKind::None => Self::None,
        }
    }

    pub fn apply(&mut self, selection: Option<usize>) {
        match self {
            Self::Light(light) => light.apply(selection),
            Self::Panels(panels) => panels.show(selection),
            Self::None => {}
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Light(light) => {
                let (r, g, b) = light.color().into_components();
                format!(
                    "light {} rgb({:.2}, {:.2}, {:.2})",
                    if light.enabled() { "on" } else { "off" },
                    r,
                    g,
                    b
                )
            }
            Self::Panels(panels) => match panels.active() {
                Some(name) => format!("panel {}", name),
                None => "no panel".to_string(),
            },
            Self::None => "none".to_string(),
        }
    }
}
