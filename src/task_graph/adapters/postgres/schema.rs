//! Diesel schema for task graph persistence.

diesel::table! {
    /// Task graph roots.
    task_graphs (id) {
        /// Task graph identifier.
        id -> Uuid,
        /// Goal text.
        goal -> Text,
    }
}

diesel::table! {
    /// Prerequisites owned by a task graph.
    prerequisites (task_graph_id, position) {
        /// Owning task graph.
        task_graph_id -> Uuid,
        /// Insertion order within the owning graph.
        position -> Int4,
        /// Prerequisite identifier, unique only by convention.
        id -> Uuid,
        /// Label text.
        label -> Text,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Whether the parent is the goal or another prerequisite.
        #[max_length = 20]
        parent_kind -> Varchar,
        /// Parent node identifier.
        parent_id -> Uuid,
        /// Experimentation start.
        started_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(prerequisites -> task_graphs (task_graph_id));
diesel::allow_tables_to_appear_in_same_query!(task_graphs, prerequisites);
