//! Animation unit contract and the closed registry of built-in units.
//!
//! Units are created through [`AnimationKind::build`], which resolves the unit's declared
//! parameters (see [`args`]) and hands the factory a private seeded RNG so that unit behavior is
//! reproducible for a given engine seed.

pub mod args;
pub mod sprites;
pub mod units;

use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::foundation::error::{TessledError, TessledResult};
use crate::frame::{Frame, FrameConstants};

pub use args::{ArgSpec, ArgType, ArgValue, Args, Params};

/// A pattern generator driven once per tick by the engine.
///
/// `render` mutates the shared frame in place and must be cheap relative to the tick budget.
/// Units must not keep references to the frame between calls.
pub trait Animation {
    /// Draw this tick into `frame` and advance internal state.
    fn render(&mut self, frame: &mut Frame);

    /// Once this returns `true` the unit is dropped and never rendered again.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Everything a factory needs to construct one unit.
pub struct UnitContext {
    pub fc: FrameConstants,
    pub args: Args,
    pub rng: StdRng,
}

type Factory = fn(UnitContext) -> Box<dyn Animation>;

/// Identifier of a built-in animation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimationKind {
    ExpandingBox,
    ExploringBox,
    ExploringSphere,
    FolText,
    PowerOn,
    FxytMexicanHat,
    FxytWavey,
    Starfield,
    EdgesSwipe,
    PhasesSwipe,
    Flash,
}

#[derive(Clone, Copy)]
struct Entry {
    name: &'static str,
    args: &'static [ArgSpec],
    factory: Factory,
}

/// Registry order. A bare group name resolves to the first listed unit of that group.
const REGISTRY: &[AnimationKind] = &[
    AnimationKind::ExpandingBox,
    AnimationKind::ExploringBox,
    AnimationKind::ExploringSphere,
    AnimationKind::FolText,
    AnimationKind::PowerOn,
    AnimationKind::FxytMexicanHat,
    AnimationKind::FxytWavey,
    AnimationKind::Starfield,
    AnimationKind::EdgesSwipe,
    AnimationKind::PhasesSwipe,
    AnimationKind::Flash,
];

fn entry(name: &'static str, args: &'static [ArgSpec], factory: Factory) -> Entry {
    Entry {
        name,
        args,
        factory,
    }
}

/// Units registered when no explicit subset is configured.
pub const DEFAULT_ANIMATIONS: &[AnimationKind] = &[
    AnimationKind::ExpandingBox,
    AnimationKind::ExploringBox,
    AnimationKind::ExploringSphere,
    AnimationKind::FolText,
    AnimationKind::PowerOn,
];

impl AnimationKind {
    /// Every built-in unit, in registry order.
    pub fn all() -> impl Iterator<Item = AnimationKind> {
        REGISTRY.iter().copied()
    }

    fn entry(self) -> Entry {
        use self::units::{boxes, fill, fxyt, sphere, starfield, swipe, text};
        match self {
            Self::ExpandingBox => entry("expandingbox", boxes::EXPANDING_ARGS, boxes::expanding),
            Self::ExploringBox => entry("exploringbox", boxes::EXPLORING_ARGS, boxes::exploring),
            Self::ExploringSphere => entry("exploringsphere", sphere::ARGS, sphere::build),
            Self::FolText => entry("foltext", text::ARGS, text::build),
            Self::PowerOn => entry("poweron", fill::POWER_ON_ARGS, fill::power_on),
            Self::FxytMexicanHat => entry("fxyt.mexican_hat", fxyt::ARGS, fxyt::mexican_hat),
            Self::FxytWavey => entry("fxyt.wavey", fxyt::ARGS, fxyt::wavey),
            Self::Starfield => entry("starfield", starfield::ARGS, starfield::build),
            Self::EdgesSwipe => entry("edges.swipe", swipe::EDGES_ARGS, swipe::edges),
            Self::PhasesSwipe => entry("phases.swipe", swipe::PHASES_ARGS, swipe::phases),
            Self::Flash => entry("flash", fill::FLASH_ARGS, fill::flash),
        }
    }

    /// Qualified identifier, `group` or `group.variant`.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Declared parameters.
    pub fn args(self) -> &'static [ArgSpec] {
        self.entry().args
    }

    /// Resolve an identifier. A bare group name (`fxyt`) picks the first unit of that group;
    /// `group.variant` picks exactly one.
    pub fn resolve(name: &str) -> TessledResult<Self> {
        let key = name.trim().to_ascii_lowercase();
        if let Some(k) = Self::all().find(|k| k.name() == key) {
            return Ok(k);
        }
        if !key.contains('.')
            && let Some(k) = Self::all().find(|k| k.name().split('.').next() == Some(key.as_str()))
        {
            return Ok(k);
        }
        Err(TessledError::config(format!(
            "unknown animation '{name}' (known: {})",
            Self::all()
                .map(Self::name)
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    /// Resolve a comma-separated list of identifiers. Empty items are skipped.
    pub fn resolve_list(list: &str) -> TessledResult<Vec<Self>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::resolve)
            .collect()
    }

    /// Construct a unit. Parameter coercion cannot fail, so neither can construction.
    pub fn build(self, fc: FrameConstants, params: &Params, seed: u64) -> Box<dyn Animation> {
        let entry = self.entry();
        let ctx = UnitContext {
            fc,
            args: Args::resolve(entry.args, params),
            rng: StdRng::seed_from_u64(seed),
        };
        (entry.factory)(ctx)
    }
}

impl FromStr for AnimationKind {
    type Err = TessledError;

    fn from_str(s: &str) -> TessledResult<Self> {
        Self::resolve(s)
    }
}

impl std::fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
