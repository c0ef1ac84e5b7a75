use super::error::ApiError;
use crate::language_pack::{Image, ImageDict};

/// Storage backend for language pack images.
///
/// Implementations report a missing image with
/// [`ApiError::ResourceNotFound`].
pub trait LanguagePackHandler {
    fn get(&self, id: &str) -> Result<Image, ApiError>;

    fn get_all(&self) -> Result<Vec<Image>, ApiError>;

    fn create(&self, data: &ImageDict) -> Result<Image, ApiError>;

    fn update(&self, id: &str, data: &ImageDict) -> Result<Image, ApiError>;

    fn delete(&self, id: &str) -> Result<(), ApiError>;
}

impl<T: LanguagePackHandler + ?Sized> LanguagePackHandler for &T {
    fn get(&self, id: &str) -> Result<Image, ApiError> {
        (**self).get(id)
    }

    fn get_all(&self) -> Result<Vec<Image>, ApiError> {
        (**self).get_all()
    }

    fn create(&self, data: &ImageDict) -> Result<Image, ApiError> {
        (**self).create(data)
    }

    fn update(&self, id: &str, data: &ImageDict) -> Result<Image, ApiError> {
        (**self).update(id, data)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        (**self).delete(id)
    }
}
