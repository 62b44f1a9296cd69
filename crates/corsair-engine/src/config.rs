//! Game session configuration.

/// What `back` does once the player is in the previous room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackPolicy {
    /// Going back is a correction: no objective checks, no room events.
    #[default]
    Correction,
    /// Going back counts as entering the room again: visit objectives and
    /// room events run as after `go`.
    Replay,
}

/// Configuration for a game session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// RNG seed for character wandering.
    pub seed: u64,
    /// Append character movement traces to the turn output.
    pub debug: bool,
    /// Behaviour of the `back` command.
    pub back_policy: BackPolicy,
    /// Crew size the player starts with.
    pub starting_crew: u32,
    /// Crew required to pass the guarded door.
    pub crew_quota: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            debug: false,
            back_policy: BackPolicy::Correction,
            starting_crew: 5,
            crew_quota: 8,
        }
    }
}

impl GameConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable movement traces.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the `back` policy.
    pub fn with_back_policy(mut self, policy: BackPolicy) -> Self {
        self.back_policy = policy;
        self
    }

    /// Set the starting crew size.
    pub fn with_starting_crew(mut self, crew: u32) -> Self {
        self.starting_crew = crew;
        self
    }

    /// Set the crew quota of the guarded door.
    pub fn with_crew_quota(mut self, quota: u32) -> Self {
        self.crew_quota = quota;
        self
    }
}
