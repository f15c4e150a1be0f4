//! Kanban store: boards, columns, and tasks with enforced WIP limits.
//!
//! This crate provides the data engine behind a kanban board. Boards own
//! ordered columns, columns own ordered tasks, and every mutation runs as a
//! single transaction so that a column's work-in-progress limit holds even
//! under concurrent writers.
//!
//! # Architecture
//!
//! The store follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (in-memory, `SQLite`)
//! - **Services**: Validation and orchestration over a port
//!
//! # Modules
//!
//! - [`board`]: Board, column, and task management with bulk transfer
//! - [`config`]: Store configuration and connection setup

pub mod board;
pub mod config;
