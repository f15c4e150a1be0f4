//! Boards, columns, and the tasks moving between them.
//!
//! A board owns an ordered set of columns; each column owns an ordered set
//! of tasks and may cap how many it holds with a work-in-progress (WIP)
//! limit. The module enforces that cap atomically for every task insert and
//! move, cascades board deletion through columns and tasks, and exports or
//! replaces the whole store in one transaction. It follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
