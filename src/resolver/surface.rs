/// Output surface for the dish-of-the-day image
///
/// The resolver fully owns this surface: after a run it holds exactly one of
/// {loading indicator, one image, error message}. The UI only reads snapshots.
use std::sync::{Arc, Mutex};

/// Fixed identifier carried by the rendered dish image
pub const DISH_IMAGE_ID: &str = "main-dish-image";

/// User-visible message when every candidate and every remote attempt failed
pub const LOAD_ERROR_MESSAGE: &str = "Could not load menu image.";

/// Where a resolved image came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Loaded from one of the local candidate files
    Local { location: String },
    /// Produced by the remote generation API
    Generated,
}

/// A resolved, displayable dish image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishImage {
    pub bytes: Vec<u8>,
    pub origin: ImageOrigin,
}

impl DishImage {
    /// Accessibility label for the image. The generated variant carries a
    /// slightly different label than the local one, matching the two insert
    /// paths of the resolver.
    pub fn alt_text(&self) -> &'static str {
        match self.origin {
            ImageOrigin::Local { .. } => "Today's Special: Peri-Peri Chicken",
            ImageOrigin::Generated => "Today's Special: Peri-Peri Chicken Bowl",
        }
    }
}

/// Contents of the image container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DishSurface {
    /// Nothing shown yet (before the menu view is first activated)
    #[default]
    Empty,
    /// Loading indicator while resolution is in flight
    Loading,
    /// The resolved image; at most one is ever inserted
    Image(DishImage),
    /// Terminal failure message
    Error(&'static str),
}

impl DishSurface {
    pub fn has_image(&self) -> bool {
        matches!(self, DishSurface::Image(_))
    }
}

/// Handle to the surface shared between the resolver task and the UI
#[derive(Debug, Clone, Default)]
pub struct SharedSurface(Arc<Mutex<DishSurface>>);

impl SharedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when an image is already displayed (the idempotence guard)
    pub fn has_image(&self) -> bool {
        self.lock().has_image()
    }

    pub fn set_loading(&self) {
        *self.lock() = DishSurface::Loading;
    }

    pub fn set_image(&self, image: DishImage) {
        *self.lock() = DishSurface::Image(image);
    }

    pub fn set_error(&self) {
        *self.lock() = DishSurface::Error(LOAD_ERROR_MESSAGE);
    }

    /// Clone of the current contents, for rendering
    pub fn snapshot(&self) -> DishSurface {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DishSurface> {
        self.0.lock().expect("dish surface mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_starts_empty() {
        let surface = SharedSurface::new();
        assert_eq!(surface.snapshot(), DishSurface::Empty);
        assert!(!surface.has_image());
    }

    #[test]
    fn test_surface_holds_one_state_at_a_time() {
        let surface = SharedSurface::new();

        surface.set_loading();
        assert_eq!(surface.snapshot(), DishSurface::Loading);

        surface.set_image(DishImage {
            bytes: vec![1, 2, 3],
            origin: ImageOrigin::Generated,
        });
        assert!(surface.has_image());

        surface.set_error();
        assert_eq!(surface.snapshot(), DishSurface::Error(LOAD_ERROR_MESSAGE));
        assert!(!surface.has_image());
    }

    #[test]
    fn test_alt_text_differs_by_origin() {
        let local = DishImage {
            bytes: vec![],
            origin: ImageOrigin::Local {
                location: "images/todays-menu.jpg".to_string(),
            },
        };
        let generated = DishImage {
            bytes: vec![],
            origin: ImageOrigin::Generated,
        };

        assert_ne!(local.alt_text(), generated.alt_text());
    }
}
