/// Dish-of-the-day image resolution
///
/// The pipeline behind the menu view's hero image: probe a fixed list of
/// local files strictly in order, and only if every one fails fall back to
/// the remote generation API with bounded exponential-backoff retry. The
/// whole thing degrades to a static error message, never a crash.
use std::time::Duration;

mod generate;
mod probe;
mod surface;

pub use generate::{GenerateError, GeneratorConfig, HttpGenerator, ImageGenerator};
pub use probe::{FsProbe, LocalProbe, ProbeError};
pub use surface::{
    DishImage, DishSurface, ImageOrigin, SharedSurface, DISH_IMAGE_ID, LOAD_ERROR_MESSAGE,
};

/// Local files tried before falling back to the generation API.
/// Order matters: the first decodable file wins and the API is never called.
pub const LOCAL_CANDIDATES: [&str; 7] = [
    "images/peri peri.jpeg",
    "images/peri%20peri.jpeg",
    "images/todays-menu.jpg",
    "images/todays-menu.jpeg",
    "images/todays-menu.png",
    "images/peri-peri.jpg",
    "images/peri-peri.jpeg",
];

/// Prompt sent to the generation API when no local candidate exists
pub const DISH_PROMPT: &str = "A photorealistic, high-angle close-up of a delicious and healthy \
     Peri-Peri Chicken Bowl with roasted vegetables and rice, presented cleanly in a modern \
     school cafeteria setting. Bright, natural light. Minimalist style.";

/// Total generation attempts before giving up
const MAX_ATTEMPTS: u32 = 3;

/// Terminal outcome of one resolution call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The guard fired: an image was already displayed, nothing was done
    AlreadyDisplayed,
    /// A local candidate loaded; the remote API was never called
    Local { location: String },
    /// The generation API produced the image
    Generated,
    /// Every candidate and every attempt failed; the error message is shown
    Failed,
}

/// Resolves the dish image onto a [`SharedSurface`].
///
/// Probe and generator are injected so the whole pipeline runs against fakes
/// in tests. Safe to call [`run`](Self::run) any number of times; work
/// happens at most once per displayed image.
pub struct ImageResolver<P, G> {
    probe: P,
    generator: G,
    candidates: Vec<String>,
    prompt: String,
    max_attempts: u32,
}

impl<P: LocalProbe, G: ImageGenerator> ImageResolver<P, G> {
    /// Resolver over the fixed candidate list and prompt
    pub fn new(probe: P, generator: G) -> Self {
        let candidates = LOCAL_CANDIDATES.iter().map(|c| c.to_string()).collect();
        Self::with_candidates(probe, generator, candidates)
    }

    /// Resolver with a custom candidate list (the one intended customization
    /// point)
    pub fn with_candidates(probe: P, generator: G, candidates: Vec<String>) -> Self {
        ImageResolver {
            probe,
            generator,
            candidates,
            prompt: DISH_PROMPT.to_string(),
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Produce the dish image onto `surface`.
    ///
    /// Idempotent: if the surface already shows an image this returns
    /// immediately without probing or calling the network. Otherwise the
    /// surface is left showing exactly one of {image, error message}.
    pub async fn run(&self, surface: &SharedSurface) -> Resolution {
        // If the image already exists, do nothing
        if surface.has_image() {
            return Resolution::AlreadyDisplayed;
        }

        surface.set_loading();

        if let Some((location, bytes)) = self.probe_candidates().await {
            surface.set_image(DishImage {
                bytes,
                origin: ImageOrigin::Local {
                    location: location.clone(),
                },
            });
            return Resolution::Local { location };
        }

        match self.generate_with_retry().await {
            Some(bytes) => {
                surface.set_image(DishImage {
                    bytes,
                    origin: ImageOrigin::Generated,
                });
                Resolution::Generated
            }
            None => {
                surface.set_error();
                Resolution::Failed
            }
        }
    }

    /// Try each candidate strictly in list order; first success wins
    async fn probe_candidates(&self) -> Option<(String, Vec<u8>)> {
        for candidate in &self.candidates {
            match self.probe.load(candidate).await {
                Ok(bytes) => {
                    println!("📷 Using local menu image: {}", candidate);
                    return Some((candidate.clone(), bytes));
                }
                Err(_) => {
                    // try next candidate
                }
            }
        }
        None
    }

    /// Up to `max_attempts` sequential generation calls, waiting 2^k seconds
    /// after failed attempt k (2s, 4s); the final failure gets no wait
    async fn generate_with_retry(&self) -> Option<Vec<u8>> {
        for attempt in 1..=self.max_attempts {
            match self.generator.generate(&self.prompt).await {
                Ok(bytes) => {
                    println!("✨ Generated menu image on attempt {}", attempt);
                    return Some(bytes);
                }
                Err(error) => {
                    eprintln!("⚠️  Generation attempt {} failed: {}", attempt, error);
                    if attempt < self.max_attempts {
                        let delay = Duration::from_secs(1u64 << attempt);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
        None
    }
}
