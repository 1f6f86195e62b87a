//! Drop resolution for the drag-to-move protocol.
//!
//! Pure functions from the board snapshot, the drag state and the drop
//! target to the resulting move. [`super::DragController`] drives them
//! from UI events; callers that track their own drag state can use them
//! directly.

use uuid::Uuid;

use super::{BoardView, DragState, DropHint, DropTarget, TaskMoveRequest};

/// Start state for a drag. `None` when the id is not on the board,
/// which keeps stale UI events from starting a phantom drag.
pub fn begin_drag(board: &BoardView, task: Uuid) -> Option<DragState> {
    let (list, task) = board.find_task(task)?;
    Some(DragState {
        task: task.id,
        source_list: list.id,
    })
}

/// Where the card would land if released now. Presentation data only.
pub fn drop_hint(board: &BoardView, drag: &DragState, target: &DropTarget) -> Option<DropHint> {
    let (list, slot) = landing(board, drag, target)?;
    Some(DropHint { list, slot })
}

/// Resolve a release into the one move mutation for this drop, or
/// `None` when the drop changes nothing and no request should be sent.
pub fn resolve_drop(
    board: &BoardView,
    drag: &DragState,
    target: &DropTarget,
) -> Option<TaskMoveRequest> {
    let (target_list, new_position) = landing(board, drag, target)?;
    Some(TaskMoveRequest {
        task: drag.task,
        target_list,
        new_position,
    })
}

/// Target list and slot shared by the hint and the drop.
///
/// Releasing on a card takes that card's slot, displacing it downward
/// (insert before). Releasing on a list body, which the UI reports for
/// empty lists and the space below the last card, appends at the end.
/// Releasing on the dragged card itself, or on an id that has left the
/// board since the drag started, resolves to nothing.
fn landing(board: &BoardView, drag: &DragState, target: &DropTarget) -> Option<(Uuid, u32)> {
    match target {
        DropTarget::Task(id) if *id == drag.task => None,
        DropTarget::Task(id) => {
            let (list, task) = board.find_task(*id)?;
            Some((list.id, task.position))
        }
        DropTarget::List(id) => {
            let list = board.find_list(*id)?;
            Some((list.id, board.task_count(list) as u32))
        }
    }
}

// ==================== Tests ====================
