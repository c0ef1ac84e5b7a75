use log::warn;

use super::error::ApiError;
use super::handler::LanguagePackHandler;
use super::{Request, Response, JSON_CONTENT_TYPE};
use crate::language_pack::{ImageDict, LanguagePack};

/// `application/json`, ignoring case and any `; charset=...` parameters
fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE))
}

/// Parses a create/update body and encodes it for the handler.
///
/// A missing or blank body, a non-JSON content type, or a record whose
/// fields cannot be encoded as tags is rejected before the handler is
/// involved. Requests without a content type are read as JSON.
fn image_dict_from_body(request: &Request) -> Result<ImageDict, ApiError> {
    let body = match request.body.as_deref().map(str::trim) {
        Some(body) if !body.is_empty() => body,
        _ => return Err(ApiError::missing_data()),
    };

    if let Some(content_type) = request.content_type.as_deref() {
        if !is_json(content_type) {
            return Err(ApiError::BadRequest(format!(
                "Unsupported content type: {}",
                content_type
            )));
        }
    }

    let lp: LanguagePack = serde_json::from_str(body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid language pack: {}", err)))?;
    lp.as_image_dict()
        .map_err(|err| ApiError::BadRequest(format!("Invalid language pack: {}", err)))
}

fn failure(err: ApiError) -> Response {
    warn!("Language pack request failed: {}", err);
    Response::error(&err)
}

/// Single language pack resource: `/v1/language_packs/<id>`
pub struct LanguagePackController<H: LanguagePackHandler> {
    id: String,
    handler: H,
}

impl<H: LanguagePackHandler> LanguagePackController<H> {
    pub fn new(id: &str, handler: H) -> Self {
        Self {
            id: id.to_string(),
            handler,
        }
    }

    /// Return this language pack
    pub fn get(&self, request: &Request) -> Response {
        match self.handler.get(&self.id) {
            Ok(image) => Response::json(200, &LanguagePack::from_image(&image, &request.host_url)),
            Err(err) => failure(err),
        }
    }

    /// Modify this language pack
    pub fn put(&self, request: &Request) -> Response {
        let data = match image_dict_from_body(request) {
            Ok(data) => data,
            Err(err) => return failure(err),
        };

        match self.handler.update(&self.id, &data) {
            Ok(image) => Response::json(200, &LanguagePack::from_image(&image, &request.host_url)),
            Err(err) => failure(err),
        }
    }

    /// Delete this language pack
    pub fn delete(&self, _request: &Request) -> Response {
        match self.handler.delete(&self.id) {
            Ok(()) => Response::empty(204),
            Err(err) => failure(err),
        }
    }
}

/// Language pack collection: `/v1/language_packs`
pub struct LanguagePacksController<H: LanguagePackHandler> {
    handler: H,
}

impl<H: LanguagePackHandler> LanguagePacksController<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Resource for one language pack of this collection
    pub fn resource(&self, id: &str) -> LanguagePackController<&H> {
        LanguagePackController::new(id, &self.handler)
    }

    /// Return all language packs
    pub fn get_all(&self, request: &Request) -> Response {
        match self.handler.get_all() {
            Ok(images) => {
                let packs: Vec<LanguagePack> = images
                    .iter()
                    .map(|image| LanguagePack::from_image(image, &request.host_url))
                    .collect();
                Response::json(200, &packs)
            }
            Err(err) => failure(err),
        }
    }

    /// Create a new language pack
    pub fn post(&self, request: &Request) -> Response {
        let data = match image_dict_from_body(request) {
            Ok(data) => data,
            Err(err) => return failure(err),
        };

        match self.handler.create(&data) {
            Ok(image) => Response::json(201, &LanguagePack::from_image(&image, &request.host_url)),
            Err(err) => failure(err),
        }
    }
}
