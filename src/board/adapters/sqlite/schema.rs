//! Diesel schema for kanban persistence.

diesel::table! {
    /// Board records.
    boards (id) {
        /// Board identifier.
        id -> Text,
        /// Board name.
        name -> Text,
        /// Free-text goal.
        goal -> Text,
        /// Column new tasks are routed into by default.
        landing_column_id -> Nullable<Text>,
        /// Creation timestamp (RFC 3339).
        created_at -> Text,
        /// Last update timestamp (RFC 3339).
        updated_at -> Text,
    }
}

diesel::table! {
    /// Column records, each owned by one board.
    board_columns (id) {
        /// Column identifier.
        id -> Text,
        /// Owning board.
        board_id -> Text,
        /// Column name.
        name -> Text,
        /// Ordering key, unique within the board.
        position -> BigInt,
        /// WIP limit; zero means unlimited.
        wip_limit -> BigInt,
        /// Whether the column holds completed work.
        is_done_column -> Bool,
    }
}

diesel::table! {
    /// Task records, each held by one column.
    tasks (id) {
        /// Task identifier.
        id -> Text,
        /// Column holding the task.
        column_id -> Text,
        /// Task title.
        title -> Text,
        /// Markdown content.
        content -> Text,
        /// Ordering key, unique within the column.
        position -> BigInt,
        /// Creation timestamp (RFC 3339).
        created_at -> Text,
        /// Last update timestamp (RFC 3339).
        updated_at -> Text,
        /// Reason recorded with the latest move or edit.
        update_reason -> Nullable<Text>,
    }
}

diesel::joinable!(board_columns -> boards (board_id));
diesel::joinable!(tasks -> board_columns (column_id));
diesel::allow_tables_to_appear_in_same_query!(boards, board_columns, tasks);
