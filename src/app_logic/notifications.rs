/*
 * Change-notification hub: the synchronous publish mechanism the controller
 * announces derived-property changes through. An event carries only the
 * property's name; observers re-read the value they care about. Because
 * notifications fire before the triggering entry point returns, an observer
 * typically records the property and re-reads controller state once the call
 * unwinds, rather than calling back in mid-notification.
 */
use std::rc::Rc;

// Every derived property the controller exposes to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerProperty {
    ActiveProfile,
    FullDetails,
    PreviewDetails,
    CanChooseProfile,
    CanAssignHandlers,
    CanRemoveHandlers,
    SortRequired,
    Profiles,
}

pub trait ChangeObserver {
    /// The named property's value may have changed; re-read it.
    fn property_changed(&self, property: ControllerProperty);
}

/*
 * Observer registry. Notification is synchronous and in registration order;
 * there is no batching and no deduplication of no-op updates, so observers
 * must be idempotent on re-reads that find an unchanged value.
 */
#[derive(Default)]
pub struct ChangeNotificationHub {
    observers: Vec<Rc<dyn ChangeObserver>>,
}

impl ChangeNotificationHub {
    pub fn new() -> Self {
        ChangeNotificationHub {
            observers: Vec::new(),
        }
    }

    pub fn register(&mut self, observer: Rc<dyn ChangeObserver>) {
        self.observers.push(observer);
    }

    /// Removes a previously registered observer; identity is by handle.
    pub fn unregister(&mut self, observer: &Rc<dyn ChangeObserver>) {
        self.observers
            .retain(|existing| !Rc::ptr_eq(existing, observer));
    }

    pub fn notify(&self, property: ControllerProperty) {
        for observer in &self.observers {
            observer.property_changed(property);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct TaggingObserver {
        tag: &'static str,
        events: Rc<RefCell<Vec<(&'static str, ControllerProperty)>>>,
    }

    impl ChangeObserver for TaggingObserver {
        fn property_changed(&self, property: ControllerProperty) {
            self.events.borrow_mut().push((self.tag, property));
        }
    }

    #[test]
    fn test_observers_notified_in_registration_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut hub = ChangeNotificationHub::new();
        hub.register(Rc::new(TaggingObserver {
            tag: "first",
            events: Rc::clone(&events),
        }));
        hub.register(Rc::new(TaggingObserver {
            tag: "second",
            events: Rc::clone(&events),
        }));

        hub.notify(ControllerProperty::SortRequired);

        assert_eq!(
            *events.borrow(),
            vec![
                ("first", ControllerProperty::SortRequired),
                ("second", ControllerProperty::SortRequired),
            ]
        );
    }

    #[test]
    fn test_unregistered_observer_receives_nothing() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut hub = ChangeNotificationHub::new();
        let observer: Rc<dyn ChangeObserver> = Rc::new(TaggingObserver {
            tag: "only",
            events: Rc::clone(&events),
        });
        hub.register(Rc::clone(&observer));
        hub.notify(ControllerProperty::Profiles);
        assert_eq!(events.borrow().len(), 1);

        hub.unregister(&observer);
        hub.notify(ControllerProperty::Profiles);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_notifications_are_not_deduplicated() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut hub = ChangeNotificationHub::new();
        hub.register(Rc::new(TaggingObserver {
            tag: "only",
            events: Rc::clone(&events),
        }));

        hub.notify(ControllerProperty::ActiveProfile);
        hub.notify(ControllerProperty::ActiveProfile);

        assert_eq!(events.borrow().len(), 2);
    }
}
