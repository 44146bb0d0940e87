// The restoration engine seam. The engine is a black box to the rest of
// the pipeline: it takes one canonical RGB image and returns one restored
// RGB image, scaled by the configured factor. `EngineProvider` decides
// whether requests share one process-wide engine or construct their own.

use image::RgbImage;
use std::sync::{Arc, Mutex};

use crate::config::{EnhancementConfig, Method};
use crate::error::EnhanceError;

/// The face-restoration / upscaling capability.
///
/// Implementations are bound to one configuration at construction time and
/// must not require per-request mutable state. Invocation may take
/// substantial wall-clock time and is never retried by callers.
pub trait RestorationEngine: Send + Sync {
    fn enhance(&self, image: &RgbImage) -> Result<RgbImage, EnhanceError>;
}

/// Builds a fresh engine bound to the given configuration.
pub type EngineFactory =
    Arc<dyn Fn(&EnhancementConfig) -> Result<Box<dyn RestorationEngine>, EnhanceError> + Send + Sync>;

/// Factory for the built-in `Enhancer`.
pub fn default_factory() -> EngineFactory {
    Arc::new(|config| Ok(Box::new(Enhancer::new(config))))
}

/// Built-in engine: resamples by the upscale factor and applies a
/// method-tuned unsharp-mask restoration pass. A model-backed engine
/// would implement `RestorationEngine` the same way.
pub struct Enhancer {
    method: Method,
    background_enhancement: bool,
    scale: u32,
}

impl Enhancer {
    pub fn new(config: &EnhancementConfig) -> Self {
        Self {
            method: config.method(),
            background_enhancement: config.background_enhancement(),
            scale: config.upscale().factor(),
        }
    }

    // Sharpening strength per method. Codeformer is tuned conservatively,
    // RestoreFormer most aggressively.
    fn sharpen_amount(&self) -> f32 {
        match self.method {
            Method::Gfpgan => 0.8,
            Method::RestoreFormer => 1.0,
            Method::Codeformer => 0.6,
        }
    }
}

impl RestorationEngine for Enhancer {
    fn enhance(&self, image: &RgbImage) -> Result<RgbImage, EnhanceError> {
        let (width, height) = image.dimensions();
        let (out_width, out_height) = (width * self.scale, height * self.scale);
        if out_width == 0 || out_height == 0 {
            return Err(EnhanceError::EngineError(
                "input image has zero dimensions".to_string(),
            ));
        }

        // With background enhancement the whole frame is resampled with the
        // high-quality filter; without it, a plain interpolation keeps
        // non-face regions close to their original rendition.
        let filter = if self.background_enhancement {
            image::imageops::FilterType::Lanczos3
        } else {
            image::imageops::FilterType::Triangle
        };
        let resized = image::imageops::resize(image, out_width, out_height, filter);

        Ok(unsharp_mask(&resized, self.sharpen_amount(), 1.0))
    }
}

// Unsharp mask: out = src + amount * (src - blurred).
fn unsharp_mask(image: &RgbImage, amount: f32, radius: f32) -> RgbImage {
    if amount.abs() < f32::EPSILON || radius <= 0.0 {
        return image.clone();
    }

    let blurred = image::imageops::blur(image, radius);
    let mut out = image.clone();
    for (sharp, (soft, original)) in out
        .pixels_mut()
        .zip(blurred.pixels().zip(image.pixels()))
    {
        for c in 0..3 {
            let src = original.0[c] as f32;
            let blur = soft.0[c] as f32;
            sharp.0[c] = (src + amount * (src - blur)).clamp(0.0, 255.0) as u8;
        }
    }
    out
}

struct SharedEngine {
    config: EnhancementConfig,
    // Serializes invocations; the trait does not promise reentrancy.
    engine: Mutex<Box<dyn RestorationEngine>>,
}

/// Strategy for obtaining an engine per request, chosen at startup rather
/// than per call site: either one shared instance bound to the service
/// defaults, or a fresh instance for every request.
pub struct EngineProvider {
    factory: EngineFactory,
    shared: Option<SharedEngine>,
}

impl EngineProvider {
    /// Builds the process-wide engine up front and reuses it for every
    /// request whose validated configuration matches its bound one.
    pub fn shared(factory: EngineFactory, defaults: &EnhancementConfig) -> Result<Self, EnhanceError> {
        let engine = (factory)(defaults)?;
        Ok(Self {
            factory,
            shared: Some(SharedEngine {
                config: defaults.clone(),
                engine: Mutex::new(engine),
            }),
        })
    }

    /// Every request constructs its own engine: repeated setup cost, total
    /// isolation between requests.
    pub fn per_request(factory: EngineFactory) -> Self {
        Self {
            factory,
            shared: None,
        }
    }

    /// Obtains an engine bound to `config` and invokes it exactly once.
    pub fn enhance(
        &self,
        config: &EnhancementConfig,
        image: &RgbImage,
    ) -> Result<RgbImage, EnhanceError> {
        match &self.shared {
            Some(shared) if shared.config == *config => {
                let engine = shared
                    .engine
                    .lock()
                    .map_err(|e| EnhanceError::EngineError(format!("engine lock poisoned: {}", e)))?;
                engine.enhance(image)
            }
            // No shared engine, or the request asks for a different
            // configuration than the shared engine is bound to.
            _ => {
                let engine = (self.factory)(config)?;
                engine.enhance(image)
            }
        }
    }
}
