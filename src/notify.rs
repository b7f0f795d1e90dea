//! Outbound notification handoff: a pre-filled WhatsApp deep link.
//!
//! Fire-and-forget. Delivery is never confirmed, nothing is retried, and a
//! failure to open the link does not surface as an application error; the
//! task creation it follows has already committed.

use chrono::Local;

use crate::core::member::Member;
use crate::core::task::Task;

/// Build the deep link for an assignment notification, or `None` when the
/// assignee has no phone number.
pub fn assignment_link(task: &Task, assignee: &Member) -> Option<String> {
    if !assignee.has_phone() {
        return None;
    }
    let due = task.due_date.with_timezone(&Local).format("%d/%m/%Y %H:%M");
    let message = format!(
        "Hi {}! A new task was assigned to you: \"{}\". Due: {}. Please check the family calendar!",
        assignee.name, task.title, due
    );
    Some(format!(
        "https://wa.me/{}?text={}",
        assignee.phone.trim(),
        urlencoding::encode(&message)
    ))
}

/// Hand the link to the host environment's open-URL capability.
pub fn dispatch(task: &Task, assignee: &Member) {
    let Some(link) = assignment_link(task, assignee) else {
        return;
    };
    match open::that(&link) {
        Ok(()) => log::info!("opened notification link for {}", assignee.name),
        Err(e) => log::warn!("could not open notification link: {}", e),
    }
}
