//! Shared context and outcomes for combat resolution.

use crate::core::config::GameConfig;
use crate::core::run_state::RunState;
use crate::core::tick::GameEvent;
use crate::core::timers::ExpiryQueue;
use crate::entities::EntityRegistry;

/// Everything a combat rule may read or mutate during one resolution step.
///
/// Borrowed from the game controller for the duration of a step, so resolver
/// functions never reach for global state and tests can build one directly.
pub struct Encounter<'a> {
    pub config: &'a GameConfig,
    pub run: &'a mut RunState,
    pub registry: &'a mut EntityRegistry,
    pub expiries: &'a mut ExpiryQueue,
    pub events: &'a mut Vec<GameEvent>,
}

/// Tally of one attack input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackOutcome {
    /// Direct hits paid for with hash-power, boss included.
    pub hits: u32,
    /// Kills from direct hits and chain splash.
    pub kills: u32,
    pub boss_killed: bool,
}

impl AttackOutcome {
    pub fn missed(&self) -> bool {
        self.hits == 0
    }
}
