use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, ApiResult},
    spotify::Paging,
};

pub type QueryMap = HashMap<String, String>;

pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_PLAYLIST_ITEMS_LIMIT: u32 = 100;

/// Integer query parameter with a default for when it is absent.
pub fn int_param(params: &QueryMap, key: &str, default: u32) -> ApiResult<u32> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ApiError::validation(format!("{} must be a non-negative integer", key))),
    }
}

pub fn paging(params: &QueryMap, default_limit: u32) -> ApiResult<Paging> {
    Ok(Paging {
        limit: int_param(params, "limit", default_limit)?,
        offset: int_param(params, "offset", 0)?,
    })
}

/// Non-empty string parameter.
pub fn text_param<'a>(params: &'a QueryMap, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// Parses a JSON request body; an empty body counts as `{}`.
pub fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::validation(format!("invalid JSON body: {}", e)))
}
