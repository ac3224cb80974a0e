// ── UI-facing state ───────────────────────────────────────────────────────────
//
// Toolkit-independent models of on-screen widgets.  Rendering lives with the
// host application.

pub mod tabs;
