//! Client-side board state and the drag-to-move protocol.
//!
//! [`BoardView`] is a read model of one project's lists and tasks in
//! render order. [`DragController`] runs the drag lifecycle as a small
//! state machine: the UI feeds it drag events and gets back either
//! nothing (no-op drop) or a [`TaskMoveRequest`] to send through
//! [`crate::api::TasksApi::move_task`]. Nothing in this module touches
//! the network, so every transition is unit testable.

mod reorder;

pub use reorder::{begin_drag, drop_hint, resolve_drop};

use uuid::Uuid;

use crate::api::types::{Task, TaskList, TaskMove};

/// Lists and tasks of one project, sorted for rendering.
#[derive(Debug, Clone)]
pub struct BoardView {
    lists: Vec<TaskList>,
}

impl BoardView {
    /// Sort lists and their embedded tasks by position. Sorting is
    /// stable, so equal positions keep the server order, which is
    /// creation time.
    pub fn new(mut lists: Vec<TaskList>) -> Self {
        lists.sort_by_key(|list| list.position);
        for list in &mut lists {
            if let Some(tasks) = list.tasks.as_mut() {
                tasks.sort_by_key(|task| task.position);
            }
        }
        Self { lists }
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn find_list(&self, list: Uuid) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.id == list)
    }

    /// Locate a task and the list it currently sits in.
    pub fn find_task(&self, task: Uuid) -> Option<(&TaskList, &Task)> {
        self.lists.iter().find_map(|list| {
            list.tasks
                .as_ref()
                .and_then(|tasks| tasks.iter().find(|t| t.id == task))
                .map(|t| (list, t))
        })
    }

    /// Number of tasks in a list, falling back to the server-side
    /// count when tasks are not embedded.
    pub fn task_count(&self, list: &TaskList) -> usize {
        list.tasks.as_ref().map_or(list.tasks_count as usize, Vec::len)
    }
}

/// A drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub task: Uuid,
    pub source_list: Uuid,
}

/// What the pointer is over when a drag event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Over another task card.
    Task(Uuid),
    /// Over a list body: below the cards, or an empty list.
    List(Uuid),
}

/// Where the dragged card would land if released now. Purely for
/// presentation (insertion markers); no state changes until the drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropHint {
    pub list: Uuid,
    pub slot: u32,
}

/// Fully resolved move, ready to send to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMoveRequest {
    pub task: Uuid,
    pub target_list: Uuid,
    pub new_position: u32,
}

impl TaskMoveRequest {
    /// Wire body for [`crate::api::TasksApi::move_task`].
    pub fn payload(&self) -> TaskMove {
        TaskMove {
            target_list: self.target_list,
            new_position: self.new_position,
        }
    }
}

/// Drag lifecycle state machine, one per board surface.
#[derive(Debug, Default)]
pub struct DragController {
    dragging: Option<DragState>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<&DragState> {
        self.dragging.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Start dragging a task. Ids not on the board are ignored and the
    /// controller stays idle.
    pub fn drag_start(&mut self, board: &BoardView, task: Uuid) -> bool {
        self.dragging = begin_drag(board, task);
        self.dragging.is_some()
    }

    /// Landing hint for the current pointer target.
    pub fn drag_over(&self, board: &BoardView, target: Option<&DropTarget>) -> Option<DropHint> {
        let drag = self.dragging.as_ref()?;
        drop_hint(board, drag, target?)
    }

    /// Finish the drag. Always returns to idle; yields a move request
    /// only when the drop actually changes something.
    pub fn drag_end(
        &mut self,
        board: &BoardView,
        target: Option<&DropTarget>,
    ) -> Option<TaskMoveRequest> {
        let drag = self.dragging.take()?;
        resolve_drop(board, &drag, target?)
    }

    /// Abort without producing a move (Escape, window blur).
    pub fn drag_cancel(&mut self) {
        self.dragging = None;
    }
}

// ==================== Tests ====================
