//! Per-event-name listener registry.

use std::collections::HashMap;

use crate::event::{EventName, GestureEvent};

/// Handle identifying a listener registered with
/// [`GestureDetector::on`](super::GestureDetector::on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&GestureEvent)>;

#[derive(Default)]
pub(super) struct Listeners {
    next_id: u64,
    by_name: HashMap<EventName, Vec<(ListenerId, Callback)>>,
}

impl Listeners {
    pub(super) fn add(&mut self, name: EventName, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.by_name.entry(name).or_default().push((id, callback));
        id
    }

    pub(super) fn remove(&mut self, name: EventName, id: ListenerId) -> bool {
        let Some(list) = self.by_name.get_mut(&name) else {
            return false;
        };
        let before = list.len();
        list.retain(|(listener, _)| *listener != id);
        list.len() < before
    }

    /// Invokes every listener registered for the event's name, in registration order.
    pub(super) fn emit(&mut self, event: &GestureEvent) {
        if let Some(list) = self.by_name.get_mut(&event.name()) {
            for (_, callback) in list {
                callback(event);
            }
        }
    }

    pub(super) fn count(&self, name: EventName) -> usize {
        self.by_name.get(&name).map_or(0, Vec::len)
    }

    pub(super) fn clear(&mut self) {
        self.by_name.clear();
    }
}
