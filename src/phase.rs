/// Whether the round is still running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Playing,
    GameOver,
}

impl Phase {
    pub fn is_over(self) -> bool {
        self == Phase::GameOver
    }

    /// Moves to `GameOver`. Returns true only on the transition itself, so
    /// repeated calls in one tick are harmless.
    pub fn end(&mut self) -> bool {
        let was_playing = *self == Phase::Playing;
        *self = Phase::GameOver;
        was_playing
    }

    pub fn restart(&mut self) {
        *self = Phase::Playing;
    }
}
