//! Step definitions for kanban board behaviour scenarios.

mod then;
