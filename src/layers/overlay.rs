//! Full-map overlays: lighting, vision, fog and ambient effects

use crate::core::constants::{FOG_ALPHA, FOG_COLOR};
use crate::core::geo::{Point, Rect};
use crate::core::grid::Grid;
use crate::data::entities::Token;
use crate::data::snapshot::MapInfo;
use crate::layers::base::LayerKind;
use crate::rendering::visual::{Fill, Stroke, Visual};
use crate::views::ViewNode;

const DARKNESS_COLOR: u32 = 0x000000;
const VISION_COLOR: u32 = 0xffffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Lights,
    Vision,
    Fog,
    Effects,
}

impl OverlayKind {
    pub fn layer(self) -> LayerKind {
        match self {
            OverlayKind::Lights => LayerKind::Lights,
            OverlayKind::Vision => LayerKind::Vision,
            OverlayKind::Fog => LayerKind::Fog,
            OverlayKind::Effects => LayerKind::Effects,
        }
    }
}

/// Sight circle of one friendly token, in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sight {
    center: Point,
    radius: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct OverlayState {
    ambient_light: Option<f32>,
    fog: bool,
    effect: Option<String>,
    sights: Vec<Sight>,
}

#[derive(Debug)]
pub struct OverlayLayer {
    kind: OverlayKind,
    node: ViewNode,
    state: OverlayState,
}

impl OverlayLayer {
    pub fn new(kind: OverlayKind) -> Self {
        let mut node = ViewNode::new();
        node.z_index = kind.layer().z_index();
        Self {
            kind,
            node,
            state: OverlayState::default(),
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn update(&mut self, map: &MapInfo, tokens: &[Token], grid: &Grid) {
        let state = match self.kind {
            OverlayKind::Lights => OverlayState {
                ambient_light: map.ambient_light,
                ..OverlayState::default()
            },
            OverlayKind::Fog => OverlayState {
                fog: map.fog,
                ..OverlayState::default()
            },
            OverlayKind::Effects => OverlayState {
                effect: map.effect.clone(),
                ..OverlayState::default()
            },
            OverlayKind::Vision => OverlayState {
                sights: tokens
                    .iter()
                    .filter(|token| token.is_friendly() && !token.dead)
                    .filter_map(|token| {
                        token.vision.map(|range| Sight {
                            center: token.center(),
                            radius: grid.units_to_pixels(range),
                        })
                    })
                    .collect(),
                ..OverlayState::default()
            },
        };
        if state != self.state {
            self.state = state;
            self.node.mark_dirty();
        }
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        if self.node.width != width || self.node.height != height {
            self.node.set_size(width, height);
            self.node.mark_dirty();
        }
    }

    pub fn draw(&mut self) -> usize {
        if !self.node.is_dirty() {
            return 0;
        }
        self.node.clear();
        let bounds = Rect::new(0.0, 0.0, self.node.width, self.node.height);

        match self.kind {
            OverlayKind::Lights => {
                if let Some(light) = self.state.ambient_light.filter(|light| *light < 1.0) {
                    self.node.add_child(
                        Visual::Rect {
                            rect: bounds,
                            corner_radius: 0.0,
                            fill: Some(Fill::new(DARKNESS_COLOR, 1.0 - light.max(0.0))),
                            stroke: None,
                        },
                        0,
                    );
                }
            }
            OverlayKind::Vision => {
                for sight in &self.state.sights {
                    self.node.add_child(
                        Visual::Circle {
                            center: sight.center,
                            radius: sight.radius,
                            fill: Some(Fill::new(VISION_COLOR, 0.05)),
                            stroke: Some(Stroke::new(1.0, VISION_COLOR, 0.3)),
                        },
                        0,
                    );
                }
            }
            OverlayKind::Fog => {
                if self.state.fog {
                    self.node.add_child(
                        Visual::Rect {
                            rect: bounds,
                            corner_radius: 0.0,
                            fill: Some(Fill::new(FOG_COLOR, FOG_ALPHA)),
                            stroke: None,
                        },
                        0,
                    );
                }
            }
            OverlayKind::Effects => {
                if let Some(name) = self.state.effect.clone() {
                    self.node.add_child(Visual::Effect { name, rect: bounds }, 0);
                }
            }
        }
        self.node.mark_clean();
        1
    }

    pub fn node(&self) -> &ViewNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridKind;
    use crate::data::entities::Role;

    fn grid() -> Grid {
        Grid::new(GridKind::Square, 70.0).unwrap()
    }

    #[test]
    fn test_lights_darken_by_ambient() {
        let mut layer = OverlayLayer::new(OverlayKind::Lights);
        let map = MapInfo {
            ambient_light: Some(0.25),
            ..MapInfo::default()
        };
        layer.update(&map, &[], &grid());
        layer.set_size(700.0, 700.0);
        layer.draw();

        match &layer.node().children()[0].visual {
            Visual::Rect { fill: Some(fill), rect, .. } => {
                assert_eq!(fill.alpha, 0.75);
                assert_eq!(rect.size.width, 700.0);
            }
            other => panic!("unexpected visual {:?}", other),
        }
    }

    #[test]
    fn test_vision_only_for_friendly_sight() {
        let mut seer = Token::new("a", Role::Friendly, 35.0, 35.0);
        seer.vision = Some(30.0);
        let mut foe = Token::new("b", Role::Hostile, 35.0, 35.0);
        foe.vision = Some(30.0);
        let blind = Token::new("c", Role::Friendly, 35.0, 35.0);

        let mut layer = OverlayLayer::new(OverlayKind::Vision);
        layer.update(&MapInfo::default(), &[seer, foe, blind], &grid());
        layer.draw();

        assert_eq!(layer.node().children().len(), 1);
        assert!(matches!(
            layer.node().children()[0].visual,
            Visual::Circle { radius, .. } if radius == 420.0
        ));
    }

    #[test]
    fn test_fog_and_effects_follow_map_flags() {
        let map = MapInfo {
            fog: true,
            effect: Some("rain".to_string()),
            ..MapInfo::default()
        };
        let mut fog = OverlayLayer::new(OverlayKind::Fog);
        let mut effects = OverlayLayer::new(OverlayKind::Effects);
        fog.update(&map, &[], &grid());
        effects.update(&map, &[], &grid());
        fog.draw();
        effects.draw();

        assert_eq!(fog.node().children().len(), 1);
        assert!(matches!(
            &effects.node().children()[0].visual,
            Visual::Effect { name, .. } if name == "rain"
        ));

        fog.update(&MapInfo::default(), &[], &grid());
        assert!(fog.node().is_dirty());
        fog.draw();
        assert!(fog.node().children().is_empty());
    }
}
