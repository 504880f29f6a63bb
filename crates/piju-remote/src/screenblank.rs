//! Screen power state machine.
//!
//! Fed the client's last status once per sample interval.  Repeated samples
//! with the same playing/not-playing partition only count down; a change of
//! partition fires `StartPlaying` / `StopPlaying` and re-arms the countdown.
//!
//! ```text
//!   Playing   ──(tick_interval samples)──> PlayingTick, re-armed
//!   !Playing  ──(stop_delay samples)─────> StoppedDelayed, once
//! ```
//!
//! The sample that switches into not-playing is the first of the
//! `stop_delay` samples.
//!
//! What each hook does to the display depends on the `PowerProfile`.

use piju_client::config::PowerProfile;
use piju_client::Status;

/// A single `xset` screensaver primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCommand {
    /// `xset s <secs>`; `0` disables blanking.
    SetIdleTimeout(u32),
    /// `xset s activate`
    BlankNow,
    /// `xset s reset`
    Unblank,
}

impl DisplayCommand {
    /// Arguments passed to `xset`.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::SetIdleTimeout(secs) => vec!["s".to_string(), secs.to_string()],
            Self::BlankNow => vec!["s".to_string(), "activate".to_string()],
            Self::Unblank => vec!["s".to_string(), "reset".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileHook {
    StartPlaying,
    StopPlaying,
    PlayingTick,
    StoppedDelayed,
}

use DisplayCommand::{BlankNow, SetIdleTimeout, Unblank};

/// Display commands for a hook under a profile.
pub fn profile_commands(profile: PowerProfile, hook: ProfileHook) -> &'static [DisplayCommand] {
    match (profile, hook) {
        (PowerProfile::None, _) => &[],

        (PowerProfile::Balanced, ProfileHook::StartPlaying) => &[SetIdleTimeout(300)],
        (PowerProfile::Balanced, ProfileHook::StopPlaying) => &[SetIdleTimeout(30)],
        (PowerProfile::Balanced, ProfileHook::PlayingTick) => &[],
        (PowerProfile::Balanced, ProfileHook::StoppedDelayed) => &[BlankNow],

        (PowerProfile::OnOff, ProfileHook::StartPlaying) => &[SetIdleTimeout(3600), Unblank],
        (PowerProfile::OnOff, ProfileHook::StopPlaying) => &[Unblank, SetIdleTimeout(10)],
        (PowerProfile::OnOff, ProfileHook::PlayingTick) => &[SetIdleTimeout(0), Unblank],
        (PowerProfile::OnOff, ProfileHook::StoppedDelayed) => &[BlankNow],
    }
}

pub struct ScreenBlankController {
    profile: PowerProfile,
    observed: Status,
    countdown: u32,
    tick_interval: u32,
    stop_delay: u32,
}

impl ScreenBlankController {
    /// `stop_delay` below 2 is raised to 2: the delayed hook never shares a
    /// sample with `StopPlaying`.
    pub fn new(profile: PowerProfile, tick_interval: u32, stop_delay: u32) -> Self {
        let tick_interval = tick_interval.max(1);
        Self {
            profile,
            observed: Status::Error,
            countdown: tick_interval,
            tick_interval,
            stop_delay: stop_delay.max(2),
        }
    }

    pub fn profile(&self) -> PowerProfile {
        self.profile
    }

    /// Advance one sample and return the hook that fired, if any.
    pub fn transition(&mut self, status: Status) -> Option<ProfileHook> {
        let was_playing = self.observed.is_playing();
        let is_playing = status.is_playing();

        if was_playing == is_playing {
            if self.countdown == 0 {
                return None;
            }
            self.countdown -= 1;
            if self.countdown > 0 {
                return None;
            }
            return if is_playing {
                self.countdown = self.tick_interval;
                Some(ProfileHook::PlayingTick)
            } else {
                Some(ProfileHook::StoppedDelayed)
            };
        }

        self.observed = status;
        if is_playing {
            self.countdown = self.tick_interval;
            Some(ProfileHook::StartPlaying)
        } else {
            self.countdown = self.stop_delay - 1;
            Some(ProfileHook::StopPlaying)
        }
    }

    /// Advance one sample and return the display commands to run.
    pub fn set_state(&mut self, status: Status) -> Vec<DisplayCommand> {
        match self.transition(status) {
            Some(hook) => profile_commands(self.profile, hook).to_vec(),
            None => Vec::new(),
        }
    }
}
