//! Application services for board orchestration and bulk transfer.

mod error;
mod kanban;
mod transfer;

pub use error::{
    ErrorKind, KanbanServiceError, KanbanServiceResult, TransferServiceError,
    TransferServiceResult,
};
pub use kanban::{
    AddTaskRequest, CreateBoardRequest, KanbanService, MoveTaskRequest, UpdateTaskRequest,
};
pub use transfer::TransferService;
