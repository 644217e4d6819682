/// View switching state for the three app sections
///
/// Mirrors the page's fade behavior: the shown view unhides at opacity 0 and
/// snaps to full opacity on the next tick of the event loop, while every
/// other view drops to opacity 0 immediately and is marked hidden once the
/// fade-out window has passed.
use std::time::Duration;

/// How long a fading-out view stays mounted before it is hidden
pub const FADE_OUT: Duration = Duration::from_millis(300);

/// The three switchable sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    Landing,
    Menu,
    Orders,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::Landing, ViewId::Menu, ViewId::Orders];

    fn index(self) -> usize {
        match self {
            ViewId::Landing => 0,
            ViewId::Menu => 1,
            ViewId::Orders => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    opacity: f32,
    hidden: bool,
}

/// Owns which view is active and each view's fade state
#[derive(Debug)]
pub struct ViewController {
    active: ViewId,
    fades: [Fade; 3],
}

impl ViewController {
    /// All views start hidden; the caller shows the landing view on startup
    pub fn new() -> Self {
        ViewController {
            active: ViewId::Landing,
            fades: [Fade {
                opacity: 0.0,
                hidden: true,
            }; 3],
        }
    }

    /// Switch to `id`.
    ///
    /// The target is unhidden at its current opacity (0 if it was hidden) and
    /// waits for [`fade_in_tick`](Self::fade_in_tick). Every other view has
    /// its opacity cut to 0 now and is returned so the caller can schedule
    /// its deferred [`finish_fade_out`](Self::finish_fade_out).
    pub fn show(&mut self, id: ViewId) -> Vec<ViewId> {
        self.active = id;
        self.fades[id.index()].hidden = false;

        let mut fading_out = Vec::new();
        for other in ViewId::ALL {
            if other != id {
                self.fades[other.index()].opacity = 0.0;
                fading_out.push(other);
            }
        }
        fading_out
    }

    /// One tick after a show: bring the active view to full opacity.
    /// Stale ticks for a view that is no longer active are ignored.
    pub fn fade_in_tick(&mut self, id: ViewId) {
        if self.active == id {
            self.fades[id.index()].opacity = 1.0;
        }
    }

    /// The fade-out window elapsed: hide the view, unless it was re-shown
    /// in the meantime
    pub fn finish_fade_out(&mut self, id: ViewId) {
        if self.active != id {
            self.fades[id.index()].hidden = true;
        }
    }

    pub fn active(&self) -> ViewId {
        self.active
    }

    pub fn opacity(&self, id: ViewId) -> f32 {
        self.fades[id.index()].opacity
    }

    /// Hidden views are not rendered at all
    pub fn is_hidden(&self, id: ViewId) -> bool {
        self.fades[id.index()].hidden
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_sequences_unhide_before_full_opacity() {
        let mut views = ViewController::new();

        views.show(ViewId::Landing);
        assert!(!views.is_hidden(ViewId::Landing));
        // visible but transparent until the next tick
        assert_eq!(views.opacity(ViewId::Landing), 0.0);

        views.fade_in_tick(ViewId::Landing);
        assert_eq!(views.opacity(ViewId::Landing), 1.0);
    }

    #[test]
    fn test_switching_fades_out_the_previous_view() {
        let mut views = ViewController::new();
        views.show(ViewId::Landing);
        views.fade_in_tick(ViewId::Landing);

        let fading = views.show(ViewId::Menu);
        assert!(fading.contains(&ViewId::Landing));

        // landing is still mounted during the fade, just transparent
        assert!(!views.is_hidden(ViewId::Landing));
        assert_eq!(views.opacity(ViewId::Landing), 0.0);

        views.finish_fade_out(ViewId::Landing);
        assert!(views.is_hidden(ViewId::Landing));
    }

    #[test]
    fn test_reshow_within_the_fade_window_cancels_the_hide() {
        let mut views = ViewController::new();
        views.show(ViewId::Landing);
        views.fade_in_tick(ViewId::Landing);

        views.show(ViewId::Menu);
        // user bounces straight back before the 300ms window elapses
        views.show(ViewId::Landing);
        views.finish_fade_out(ViewId::Landing);

        assert!(!views.is_hidden(ViewId::Landing));
    }

    #[test]
    fn test_stale_fade_in_tick_is_ignored() {
        let mut views = ViewController::new();
        views.show(ViewId::Menu);
        views.show(ViewId::Orders);

        // the tick scheduled for the menu show arrives after the switch
        views.fade_in_tick(ViewId::Menu);
        assert_eq!(views.opacity(ViewId::Menu), 0.0);

        views.fade_in_tick(ViewId::Orders);
        assert_eq!(views.opacity(ViewId::Orders), 1.0);
    }

    #[test]
    fn test_exactly_one_active_view() {
        let mut views = ViewController::new();
        views.show(ViewId::Orders);
        assert_eq!(views.active(), ViewId::Orders);

        views.show(ViewId::Menu);
        assert_eq!(views.active(), ViewId::Menu);
    }
}
