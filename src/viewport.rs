use std::ops::Range;

/// Watches one list row and reports when it scrolls into view.
///
/// The app registers the last revealed joke after every window change and
/// reports the visible rows after every scroll or resize. A registration fires
/// at most once.
pub trait ViewportObserver: Send {
    /// Watch `element`, replacing any previous registration.
    fn observe(&mut self, element: usize);

    /// Report the rows currently on screen. Returns the watched element the
    /// first time it lies inside `visible`, then stops watching.
    fn notify(&mut self, visible: Range<usize>) -> Option<usize>;

    /// Drop the current registration without firing.
    fn disconnect(&mut self);
}

/// Observer for a terminal list where visibility is a plain row range.
#[derive(Debug, Default)]
pub struct LastRowObserver {
    watched: Option<usize>,
}

impl LastRowObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewportObserver for LastRowObserver {
    fn observe(&mut self, element: usize) {
        self.watched = Some(element);
    }

    fn notify(&mut self, visible: Range<usize>) -> Option<usize> {
        let element = self.watched?;
        if visible.contains(&element) {
            self.watched = None;
            Some(element)
        } else {
            None
        }
    }

    fn disconnect(&mut self) {
        self.watched = None;
    }
}
