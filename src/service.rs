// The shared request pipeline: validate configuration, decode the input,
// invoke the engine exactly once, return the restored image. All three
// front ends call this and nothing else.

use image::RgbImage;
use tracing::debug;

use crate::config::EnhancementConfig;
use crate::engine::EngineProvider;
use crate::error::EnhanceError;
use crate::image_codec::{self, ImageSource};

/// Raw, transport-level enhancement parameters as gathered by a front end.
/// Validation happens inside `EnhancementService::run`, never here.
#[derive(Debug, Clone)]
pub struct EnhanceRequest {
    pub method: String,
    pub background_enhancement: bool,
    pub upscale: u32,
}

pub struct EnhancementService {
    provider: EngineProvider,
}

impl EnhancementService {
    pub fn new(provider: EngineProvider) -> Self {
        Self { provider }
    }

    /// Runs one enhancement request to completion.
    ///
    /// Validation and decode errors short-circuit before any engine work;
    /// an engine failure surfaces unchanged as `EngineError`. Encoding the
    /// result is the caller's concern.
    pub fn run(
        &self,
        source: &ImageSource,
        request: &EnhanceRequest,
    ) -> Result<RgbImage, EnhanceError> {
        let config = EnhancementConfig::validate(
            &request.method,
            request.background_enhancement,
            request.upscale,
        )?;

        let image = image_codec::decode(source)?;
        debug!(
            "Decoded input image: {}x{}, method={}, upscale={}",
            image.width(),
            image.height(),
            config.method(),
            config.upscale().factor()
        );

        self.provider.enhance(&config, &image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Method, Upscale};
    use crate::engine::{EngineFactory, RestorationEngine};
    use base64::prelude::{BASE64_STANDARD, Engine as _};
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Engine stand-in that records invocations and doubles dimensions.
    struct MockEngine {
        invocations: Arc<AtomicUsize>,
        fail: bool,
    }

    impl RestorationEngine for MockEngine {
        fn enhance(&self, image: &RgbImage) -> Result<RgbImage, EnhanceError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EnhanceError::EngineError("mock inference failure".into()));
            }
            Ok(RgbImage::from_pixel(
                image.width() * 2,
                image.height() * 2,
                Rgb([0, 0, 0]),
            ))
        }
    }

    fn mock_factory(invocations: Arc<AtomicUsize>, fail: bool) -> EngineFactory {
        Arc::new(move |_config| {
            Ok(Box::new(MockEngine {
                invocations: invocations.clone(),
                fail,
            }))
        })
    }

    fn mock_service(invocations: Arc<AtomicUsize>) -> EnhancementService {
        EnhancementService::new(EngineProvider::per_request(mock_factory(invocations, false)))
    }

    fn png_source(width: u32, height: u32) -> ImageSource {
        let img = RgbImage::from_pixel(width, height, Rgb([90, 90, 90]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        ImageSource::Bytes(buffer.into_inner())
    }

    fn valid_request() -> EnhanceRequest {
        EnhanceRequest {
            method: "gfpgan".into(),
            background_enhancement: true,
            upscale: 2,
        }
    }

    #[test]
    fn test_valid_request_invokes_engine_once() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let service = mock_service(invocations.clone());

        let out = service.run(&png_source(8, 6), &valid_request()).unwrap();
        assert_eq!(out.dimensions(), (16, 12));
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_method_short_circuits_before_engine() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let service = mock_service(invocations.clone());

        let request = EnhanceRequest {
            method: "bogus".into(),
            ..valid_request()
        };
        let err = service.run(&png_source(8, 6), &request).unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidMethod(value) if value == "bogus"));
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_upscale_short_circuits_before_engine() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let service = mock_service(invocations.clone());

        let request = EnhanceRequest {
            upscale: 3,
            ..valid_request()
        };
        let err = service.run(&png_source(8, 6), &request).unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidUpscale(_)));
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_decode_failure_short_circuits_before_engine() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let service = mock_service(invocations.clone());

        let err = service
            .run(
                &ImageSource::Bytes(b"definitely not an image".to_vec()),
                &valid_request(),
            )
            .unwrap_err();
        assert!(matches!(err, EnhanceError::UnreadableImage(_)));
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_engine_failure_surfaces_unchanged() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let service = EnhancementService::new(EngineProvider::per_request(mock_factory(
            invocations.clone(),
            true,
        )));

        let err = service.run(&png_source(8, 6), &valid_request()).unwrap_err();
        assert!(matches!(err, EnhanceError::EngineError(_)));
        // Invoked exactly once and never retried.
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_provider_end_to_end() {
        let defaults = EnhancementConfig::new(Method::Gfpgan, true, Upscale::X2);
        let invocations = Arc::new(AtomicUsize::new(0));
        let provider =
            EngineProvider::shared(mock_factory(invocations.clone(), false), &defaults).unwrap();
        let service = EnhancementService::new(provider);

        let encoded = match png_source(10, 10) {
            ImageSource::Bytes(data) => BASE64_STANDARD.encode(data),
            _ => unreachable!(),
        };
        let out = service
            .run(&ImageSource::Base64(encoded), &valid_request())
            .unwrap();
        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }
}
