use serde::{Deserialize, Serialize};

// ----------------------------------------------
// Seconds
// ----------------------------------------------

// Host clock timestamps and durations. Double precision so
// timestamps stay exact over long play sessions.
pub type Seconds = f64;

// ----------------------------------------------
// UpdateTimer
// ----------------------------------------------

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct UpdateTimer {
    update_frequency_secs: Seconds,
    time_since_last_update_secs: Seconds,
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UpdateTimerResult {
    DoNotUpdate,
    ShouldUpdate,
}

impl UpdateTimerResult {
    #[inline]
    pub fn should_update(self) -> bool {
        self == UpdateTimerResult::ShouldUpdate
    }
}

impl UpdateTimer {
    #[inline]
    pub fn new(update_frequency_secs: Seconds) -> Self {
        Self { update_frequency_secs, time_since_last_update_secs: 0.0 }
    }

    // Advances the timer by `delta_time_secs`. Reports an update once the
    // accumulated time reaches the frequency, then starts over.
    #[inline]
    pub fn tick(&mut self, delta_time_secs: Seconds) -> UpdateTimerResult {
        self.time_since_last_update_secs += delta_time_secs.max(0.0);

        if self.time_since_last_update_secs >= self.update_frequency_secs {
            self.time_since_last_update_secs = 0.0;
            UpdateTimerResult::ShouldUpdate
        } else {
            UpdateTimerResult::DoNotUpdate
        }
    }

    #[inline]
    pub fn set_frequency_secs(&mut self, update_frequency_secs: Seconds) {
        self.update_frequency_secs = update_frequency_secs;
    }

    #[inline]
    pub fn frequency_secs(&self) -> Seconds {
        self.update_frequency_secs
    }

    #[inline]
    pub fn time_since_last_secs(&self) -> Seconds {
        self.time_since_last_update_secs
    }
}
