//! Fixed-order processor pipeline driven once per simulation tick.

use std::fmt;

use tracing::trace;
use turret_defence_core::{Assets, InputEvent, StatsTable};

use crate::{SimError, UiSync, World};

/// Scene transitions requested by processors during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneSignal {
    /// An enemy reached the exit; the run is lost.
    GameOver,
}

/// Everything a processor sees besides the world itself.
#[derive(Debug)]
pub struct FrameContext<'a> {
    /// Simulated milliseconds covered by this tick.
    pub delta_ms: f32,
    /// Input events gathered since the previous tick, in arrival order.
    pub input_events: &'a [InputEvent],
    /// Image bundle used by entity factories.
    pub assets: &'a Assets,
    /// Stat sheets used by factories and the economy.
    pub stats: &'a StatsTable,
    /// Snapshot published to the interface layer.
    pub ui: &'a mut UiSync,
    /// Scene transitions raised this tick.
    pub signals: Vec<SceneSignal>,
}

impl<'a> FrameContext<'a> {
    /// Creates the context for one tick.
    #[must_use]
    pub fn new(
        delta_ms: f32,
        input_events: &'a [InputEvent],
        assets: &'a Assets,
        stats: &'a StatsTable,
        ui: &'a mut UiSync,
    ) -> Self {
        Self {
            delta_ms,
            input_events,
            assets,
            stats,
            ui,
            signals: Vec::new(),
        }
    }

    /// Requests a scene transition once the tick completes.
    pub fn signal(&mut self, signal: SceneSignal) {
        if !self.signals.contains(&signal) {
            self.signals.push(signal);
        }
    }
}

/// Per-tick unit of simulation logic.
pub trait Processor {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Runs one tick over the world.
    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>)
        -> Result<(), SimError>;
}

/// Handle returned by [`Pipeline::add`], used to remove a processor later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessorId(u32);

/// Processors executed in registration order.
#[derive(Default)]
pub struct Pipeline {
    processors: Vec<(ProcessorId, Box<dyn Processor>)>,
    next_id: u32,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Pipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a processor to the end of the run order.
    pub fn add(&mut self, processor: impl Processor + 'static) -> ProcessorId {
        let id = ProcessorId(self.next_id);
        self.next_id += 1;
        self.processors.push((id, Box::new(processor)));
        id
    }

    /// Removes a processor, keeping the order of the others.
    ///
    /// Returns `false` when the processor was already removed.
    pub fn remove(&mut self, id: ProcessorId) -> bool {
        let before = self.processors.len();
        self.processors.retain(|(candidate, _)| *candidate != id);
        self.processors.len() != before
    }

    /// Reports whether the processor is still registered.
    #[must_use]
    pub fn contains(&self, id: ProcessorId) -> bool {
        self.processors.iter().any(|(candidate, _)| *candidate == id)
    }

    /// Names of the registered processors in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.processors
            .iter()
            .map(|(_, processor)| processor.name())
            .collect()
    }

    /// Number of registered processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Reports whether no processors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Runs every processor once, stopping at the first failure.
    pub fn tick(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        for (_, processor) in &mut self.processors {
            trace!(processor = processor.name(), delta_ms = frame.delta_ms, "process");
            processor.process(world, frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use turret_defence_core::{Entity, Rect, StoreError};

    use super::*;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Processor for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process(&mut self, _: &mut World, _: &mut FrameContext<'_>) -> Result<(), SimError> {
            self.log.borrow_mut().push(self.name);
            Ok(())
        }
    }

    struct Failing;

    impl Processor for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn process(&mut self, world: &mut World, _: &mut FrameContext<'_>) -> Result<(), SimError> {
            let _ = world.store().get::<u8>(Entity::new(404))?;
            Ok(())
        }
    }

    fn run(pipeline: &mut Pipeline) -> Result<(), SimError> {
        let mut world = World::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0);
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let mut ui = UiSync::default();
        let mut frame = FrameContext::new(16.0, &[], &assets, &stats, &mut ui);
        pipeline.tick(&mut world, &mut frame)
    }

    #[test]
    fn processors_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = Pipeline::new();
        for name in ["a", "b", "c"] {
            let _ = pipeline.add(Recorder {
                name,
                log: Rc::clone(&log),
            });
        }

        run(&mut pipeline).expect("recorders never fail");

        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn removal_preserves_remaining_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = Pipeline::new();
        let ids: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                pipeline.add(Recorder {
                    name,
                    log: Rc::clone(&log),
                })
            })
            .collect();

        assert!(pipeline.remove(ids[1]));
        assert!(!pipeline.remove(ids[1]));
        assert!(!pipeline.contains(ids[1]));
        run(&mut pipeline).expect("recorders never fail");

        assert_eq!(*log.borrow(), vec!["a", "c"]);
        assert_eq!(pipeline.names(), vec!["a", "c"]);
    }

    #[test]
    fn lookup_failures_abort_the_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = Pipeline::new();
        let _ = pipeline.add(Failing);
        let _ = pipeline.add(Recorder {
            name: "after",
            log: Rc::clone(&log),
        });

        let result = run(&mut pipeline);

        assert!(matches!(
            result,
            Err(SimError::Store(StoreError::MissingEntity(_)))
        ));
        assert!(log.borrow().is_empty(), "later processors must not run");
    }

    #[test]
    fn signals_are_deduplicated() {
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let mut ui = UiSync::default();
        let mut frame = FrameContext::new(16.0, &[], &assets, &stats, &mut ui);

        frame.signal(SceneSignal::GameOver);
        frame.signal(SceneSignal::GameOver);

        assert_eq!(frame.signals, vec![SceneSignal::GameOver]);
    }
}
