//! Action enum: everything a key press can ask the app to do.

use piju_client::ResumeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // ── Transport ────────────────────────────────────────────────────────────
    Pause,
    Resume,
    Next,
    Previous,

    // ── Source ───────────────────────────────────────────────────────────────
    /// Local or radio: hides the link panel and resumes from that player.
    ResumeFrom(ResumeSource),
    /// Link: toggles the link panel, sends nothing.
    ToggleLink,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
