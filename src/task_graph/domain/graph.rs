//! Task graph aggregate root.

use super::{
    Goal, Label, NodeId, Prerequisite, PrerequisiteId, TaskGraphDomainError, TaskGraphId,
    TaskGraphView,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A goal and the prerequisites discovered on the way to it.
///
/// Prerequisites are kept in insertion order. Their `parent_id` links overlay
/// a logical tree on that flat collection. Completion is derived from the
/// prerequisite statuses and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGraph {
    id: TaskGraphId,
    goal: Goal,
    prerequisites: Vec<Prerequisite>,
}

/// Parameter object for reconstructing a persisted task graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskGraphData {
    /// Persisted task graph identifier.
    pub id: TaskGraphId,
    /// Persisted goal.
    pub goal: Goal,
    /// Persisted prerequisites in insertion order.
    pub prerequisites: Vec<Prerequisite>,
}

impl TaskGraph {
    /// Starts a new task graph with no prerequisites.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::EmptyGoal`] when `goal` is blank.
    pub fn start(id: TaskGraphId, goal: impl Into<String>) -> Result<Self, TaskGraphDomainError> {
        Ok(Self {
            id,
            goal: Goal::new(goal)?,
            prerequisites: Vec::new(),
        })
    }

    /// Reconstructs a task graph from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskGraphData) -> Self {
        Self {
            id: data.id,
            goal: data.goal,
            prerequisites: data.prerequisites,
        }
    }

    /// Returns the task graph identifier.
    #[must_use]
    pub const fn id(&self) -> TaskGraphId {
        self.id
    }

    /// Returns the goal.
    #[must_use]
    pub const fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Returns all prerequisites in insertion order.
    #[must_use]
    pub fn prerequisites(&self) -> &[Prerequisite] {
        &self.prerequisites
    }

    /// Looks up a prerequisite by identifier.
    #[must_use]
    pub fn prerequisite(&self, prerequisite_id: PrerequisiteId) -> Option<&Prerequisite> {
        self.prerequisites
            .iter()
            .find(|prerequisite| prerequisite.id() == prerequisite_id)
    }

    /// Returns the prerequisites added directly under `node`.
    pub fn children_of(&self, node: NodeId) -> impl Iterator<Item = &Prerequisite> + '_ {
        self.prerequisites
            .iter()
            .filter(move |prerequisite| prerequisite.parent_id() == node)
    }

    /// Returns unfinished prerequisites that have no children.
    ///
    /// These are the ones the Mikado Method says to work on next.
    pub fn leaves(&self) -> impl Iterator<Item = &Prerequisite> + '_ {
        self.prerequisites.iter().filter(move |prerequisite| {
            !prerequisite.is_done()
                && self
                    .children_of(NodeId::Prerequisite(prerequisite.id()))
                    .next()
                    .is_none()
        })
    }

    /// Returns `true` when every prerequisite is done.
    ///
    /// A graph without prerequisites is not done: nothing has been
    /// committed towards its goal yet.
    #[must_use]
    pub fn is_done(&self) -> bool {
        !self.prerequisites.is_empty() && self.prerequisites.iter().all(Prerequisite::is_done)
    }

    /// Returns `true` when `id` is this graph's identifier.
    #[must_use]
    pub fn identify_by(&self, id: TaskGraphId) -> bool {
        self.id == id
    }

    /// Compares two graphs by id, goal, and prerequisites.
    ///
    /// Completion is derived from the prerequisites, so equal graphs always
    /// agree on it.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Adds a `todo` prerequisite directly under the goal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::EmptyLabel`] when `label` is blank.
    pub fn add_prerequisite(
        &mut self,
        prerequisite_id: PrerequisiteId,
        label: impl Into<String>,
    ) -> Result<(), TaskGraphDomainError> {
        self.append(prerequisite_id, NodeId::Graph(self.id), label)
    }

    /// Adds a `todo` prerequisite under another prerequisite.
    ///
    /// The parent is not required to exist in this graph; callers are
    /// expected to offer only known parents.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::EmptyLabel`] when `label` is blank.
    pub fn add_prerequisite_to_prerequisite(
        &mut self,
        prerequisite_id: PrerequisiteId,
        parent_id: PrerequisiteId,
        label: impl Into<String>,
    ) -> Result<(), TaskGraphDomainError> {
        self.append(prerequisite_id, NodeId::Prerequisite(parent_id), label)
    }

    /// Starts experimenting on a `todo` prerequisite, stamping the current
    /// time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::PrerequisiteNotFound`] when the
    /// prerequisite is unknown, or
    /// [`TaskGraphDomainError::InvalidTransition`] when it is not `todo`.
    pub fn start_experimentation(
        &mut self,
        prerequisite_id: PrerequisiteId,
        clock: &impl Clock,
    ) -> Result<(), TaskGraphDomainError> {
        self.prerequisite_mut(prerequisite_id)?
            .start_experimentation(clock.utc())
    }

    /// Commits the changes of an `experimenting` prerequisite.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::PrerequisiteNotFound`] when the
    /// prerequisite is unknown, or
    /// [`TaskGraphDomainError::InvalidTransition`] when it is not
    /// `experimenting`.
    pub fn commit_changes(
        &mut self,
        prerequisite_id: PrerequisiteId,
    ) -> Result<(), TaskGraphDomainError> {
        self.prerequisite_mut(prerequisite_id)?.commit_changes()
    }

    /// Projects the graph into its flat view.
    #[must_use]
    pub fn render(&self) -> TaskGraphView {
        TaskGraphView::from(self)
    }

    fn append(
        &mut self,
        prerequisite_id: PrerequisiteId,
        parent_id: NodeId,
        label: impl Into<String>,
    ) -> Result<(), TaskGraphDomainError> {
        let label = Label::new(label)?;
        self.prerequisites
            .push(Prerequisite::new(prerequisite_id, parent_id, label));
        Ok(())
    }

    fn prerequisite_mut(
        &mut self,
        prerequisite_id: PrerequisiteId,
    ) -> Result<&mut Prerequisite, TaskGraphDomainError> {
        self.prerequisites
            .iter_mut()
            .find(|prerequisite| prerequisite.id() == prerequisite_id)
            .ok_or(TaskGraphDomainError::PrerequisiteNotFound(prerequisite_id))
    }
}
