//! Fixed-rate frame generator: engine -> device transform -> sink, once per tick.

use std::convert::Infallible;

use crate::config::EffectboxConfig;
use crate::engine::Engine;
use crate::foundation::clock::{Clock, TickScheduler};
use crate::foundation::error::TessledResult;
use crate::frame::Frame;
use crate::transport::FrameSink;

/// Build an engine with the configured animations registered.
pub fn build_engine(cfg: &EffectboxConfig) -> TessledResult<Engine> {
    cfg.validate()?;
    let fc = cfg.frame_constants();
    let mut engine = match cfg.seed {
        Some(seed) => Engine::seeded(fc, cfg.transition, seed)?,
        None => Engine::new(fc, cfg.transition)?,
    };
    for kind in cfg.animation_kinds()? {
        engine.add_animation_type(kind);
    }
    Ok(engine)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectboxStats {
    pub frames: u64,
    /// Ticks whose work took longer than the tick itself.
    pub overruns: u64,
}

pub struct Effectbox<K, C> {
    engine: Engine,
    sink: K,
    scheduler: TickScheduler<C>,
    stats: EffectboxStats,
}

impl<K: FrameSink, C: Clock> Effectbox<K, C> {
    pub fn new(engine: Engine, sink: K, clock: C) -> Self {
        let tick = engine.frame_constants().fps.tick();
        Self {
            engine,
            sink,
            scheduler: TickScheduler::new(clock, tick),
            stats: EffectboxStats::default(),
        }
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn stats(&self) -> EffectboxStats {
        self.stats
    }

    /// Produce, publish and pace one frame. Returns the published (physical) frame.
    pub fn step(&mut self) -> TessledResult<Frame> {
        let started = self.scheduler.begin();
        let virtual_frame = self.engine.next_frame();
        let frame = self
            .engine
            .frame_constants()
            .virtual_to_physical(&virtual_frame);
        self.sink.publish(&frame)?;
        let report = self.scheduler.finish(started);
        self.stats.frames += 1;
        if report.overran() {
            self.stats.overruns += 1;
        }
        Ok(frame)
    }

    pub fn run_frames(&mut self, frames: u64) -> TessledResult<()> {
        for _ in 0..frames {
            self.step()?;
        }
        Ok(())
    }

    /// Run until the sink fails.
    pub fn run(&mut self) -> TessledResult<Infallible> {
        tracing::info!(
            fps = self.engine.frame_constants().fps.as_f64(),
            device = %self.engine.frame_constants().device,
            animations = ?self.engine.registry(),
            "effectbox running"
        );
        loop {
            self.step()?;
        }
    }
}
