//! Built-in media decorators: image, video and audio.

mod image;
mod media;

pub use image::{Alignment, ImageKind, ImageNode, IMAGE_KIND};
pub use media::{AudioKind, AudioNode, VideoKind, VideoNode, AUDIO_KIND, VIDEO_KIND};

use richdoc_core::{Registry, RegistryError};

/// Register the image, video and audio kinds.
pub fn register_media_kinds(registry: &mut Registry) -> Result<(), RegistryError> {
    registry
        .register_decorator_kind(ImageKind)?
        .register_decorator_kind(VideoKind)?
        .register_decorator_kind(AudioKind)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_media_kinds() {
        let mut registry = Registry::new();
        register_media_kinds(&mut registry).unwrap();
        assert_eq!(
            registry.decorator_kinds().collect::<Vec<_>>(),
            vec![IMAGE_KIND, VIDEO_KIND, AUDIO_KIND]
        );
    }

    #[test]
    fn test_register_twice_fails() {
        let mut registry = Registry::new();
        register_media_kinds(&mut registry).unwrap();
        assert!(matches!(
            register_media_kinds(&mut registry),
            Err(RegistryError::DuplicateKind(_))
        ));
    }
}
