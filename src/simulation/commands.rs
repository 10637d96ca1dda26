//! Host commands for the simulation.
//!
//! The viewer collects commands while drawing its panel and applies them
//! serially between frames, so the simulation is never mutated mid-tick.

/// Control requests from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Resumes ticking.
    Start,
    /// Stops ticking after the current tick.
    Pause,
    /// Discards the population and spawns a fresh random one.
    Reset,
    /// Changes the population size and resets.
    SetPopulationSize(usize),
    /// Per-gene mutation probability for the next reproduction.
    SetMutationRate(f32),
    /// Crossover probability for the next reproduction.
    SetCrossoverRate(f32),
    /// Ticks executed per rendered frame.
    SetTicksPerFrame(usize),
}

/// Queue of commands waiting to be applied.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    /// Creates an empty command queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command to the queue.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Checks if no command is waiting.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drains all commands in submission order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }
}
