//! Layered animation scheduler and compositor.
//!
//! The engine owns three ordered layers of active units and a transition countdown. Every call to
//! [`Engine::next_frame`] may swap the default layer for a freshly chosen unit, then renders all
//! layers into one new frame in a fixed order: background, default, foreground, and list order
//! within each layer.

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{Animation, AnimationKind, DEFAULT_ANIMATIONS, Params};
use crate::foundation::error::{TessledError, TessledResult};
use crate::frame::{Frame, FrameConstants};

/// Composition layer. Rendered in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Default,
    Foreground,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Background, Layer::Default, Layer::Foreground];

    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Default => "default",
            Self::Foreground => "foreground",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Layer {
    type Err = TessledError;

    fn from_str(s: &str) -> TessledResult<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TessledError::config(format!("unknown layer '{s}'")))
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One live unit and the identifier it was built from.
pub struct ActiveUnit {
    pub kind: Option<AnimationKind>,
    pub unit: Box<dyn Animation>,
}

impl std::fmt::Debug for ActiveUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveUnit")
            .field("kind", &self.kind)
            .field("finished", &self.unit.is_finished())
            .finish()
    }
}

pub struct Engine {
    fc: FrameConstants,
    tick_secs: f64,
    transition_secs: f64,
    countdown: f64,
    registry: Vec<AnimationKind>,
    layers: [Vec<ActiveUnit>; 3],
    rng: StdRng,
}

impl Engine {
    /// Engine with an empty registry and a random seed.
    pub fn new(fc: FrameConstants, transition_secs: f64) -> TessledResult<Self> {
        Self::with_rng(fc, transition_secs, StdRng::from_entropy())
    }

    /// Engine whose selections are reproducible for a given `seed`.
    pub fn seeded(fc: FrameConstants, transition_secs: f64, seed: u64) -> TessledResult<Self> {
        Self::with_rng(fc, transition_secs, StdRng::seed_from_u64(seed))
    }

    fn with_rng(fc: FrameConstants, transition_secs: f64, rng: StdRng) -> TessledResult<Self> {
        if !transition_secs.is_finite() || transition_secs <= 0.0 {
            return Err(TessledError::config(format!(
                "transition interval must be a positive number of seconds, got {transition_secs}"
            )));
        }
        Ok(Self {
            fc,
            tick_secs: fc.fps.frame_duration_secs(),
            transition_secs,
            countdown: 0.0,
            registry: Vec::new(),
            layers: Default::default(),
            rng,
        })
    }

    pub fn frame_constants(&self) -> FrameConstants {
        self.fc
    }

    /// Register an identifier for random selection. Duplicates are ignored.
    pub fn add_animation_type(&mut self, kind: AnimationKind) {
        if !self.registry.contains(&kind) {
            self.registry.push(kind);
        }
    }

    pub fn add_default_animation_types(&mut self) {
        for &kind in DEFAULT_ANIMATIONS {
            self.add_animation_type(kind);
        }
    }

    pub fn registry(&self) -> &[AnimationKind] {
        &self.registry
    }

    /// Build a unit and append it to `layer`.
    pub fn add_animation(&mut self, kind: AnimationKind, layer: Layer, params: &Params) {
        let unit = kind.build(self.fc, params, self.rng.r#gen());
        self.push(layer, Some(kind), unit);
    }

    /// Append an already-constructed unit to `layer`.
    pub fn add_unit(&mut self, layer: Layer, kind: Option<AnimationKind>, unit: Box<dyn Animation>) {
        self.push(layer, kind, unit);
    }

    fn push(&mut self, layer: Layer, kind: Option<AnimationKind>, unit: Box<dyn Animation>) {
        self.layers[layer.index()].push(ActiveUnit { kind, unit });
    }

    /// Replace `layer` with one unit of a randomly chosen registered identifier.
    ///
    /// When more than one identifier is registered and the layer holds exactly one unit, the new
    /// identifier differs from that unit's. Returns `None` when the registry is empty.
    pub fn set_random_animation(&mut self, layer: Layer) -> Option<AnimationKind> {
        if self.registry.is_empty() {
            return None;
        }
        let current = match self.layers[layer.index()].as_slice() {
            [only] => only.kind,
            _ => None,
        };
        let kind = loop {
            let pick = self.registry[self.rng.gen_range(0..self.registry.len())];
            if self.registry.len() == 1 || Some(pick) != current {
                break pick;
            }
        };
        tracing::info!(animation = %kind, layer = %layer, "new animation");
        let unit = kind.build(self.fc, &Params::new(), self.rng.r#gen());
        self.layers[layer.index()] = vec![ActiveUnit {
            kind: Some(kind),
            unit,
        }];
        Some(kind)
    }

    /// Override the time left until the next transition.
    pub fn set_next_transition(&mut self, secs: f64) {
        self.countdown = secs;
    }

    /// Seconds left until the next transition.
    pub fn countdown(&self) -> f64 {
        self.countdown
    }

    pub fn units(&self, layer: Layer) -> &[ActiveUnit] {
        &self.layers[layer.index()]
    }

    /// Advance one tick and return the composed frame.
    pub fn next_frame(&mut self) -> Frame {
        self.countdown -= self.tick_secs;
        if self.countdown <= 0.0 {
            self.countdown = self.transition_secs;
            self.set_random_animation(Layer::Default);
        }

        let mut frame = self.fc.empty_frame();
        for layer in &mut self.layers {
            for active in layer.iter_mut() {
                active.unit.render(&mut frame);
            }
            layer.retain(|active| !active.unit.is_finished());
        }
        frame
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("fc", &self.fc)
            .field("transition_secs", &self.transition_secs)
            .field("countdown", &self.countdown)
            .field("registry", &self.registry)
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
