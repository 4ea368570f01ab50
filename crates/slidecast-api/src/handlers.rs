//! Request handlers.

pub mod analysis;
pub mod health;
pub mod indexes;
pub mod presentations;
pub mod upload;

pub use analysis::*;
pub use health::*;
pub use indexes::*;
pub use presentations::*;
pub use upload::*;

use slidecast_models::VideoId;

use crate::error::{ApiError, ApiResult};

/// Reject ids that cannot be used as a store key before any downstream call.
pub(crate) fn checked_video_id(raw: String) -> ApiResult<VideoId> {
    let id = VideoId::from(raw);
    if !id.is_valid_key() {
        return Err(ApiError::bad_request(format!("Invalid video id: {}", id)));
    }
    Ok(id)
}
