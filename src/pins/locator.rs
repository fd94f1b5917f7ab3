use serenity::all::{ChannelId, MessageId};
use tracing::debug;

use super::platform::{PinPlatform, PlatformError};

/// Discord returns at most this many messages per history request.
pub const HISTORY_PAGE_SIZE: usize = 100;

/// Walks the pins channel newest-first looking for the preview whose first
/// embed links to `permalink`. Gives up after `history_limit` messages, so a
/// preview older than that is reported as missing even though it exists.
pub async fn locate_preview(
    platform: &dyn PinPlatform,
    pins_channel: ChannelId,
    permalink: &str,
    history_limit: usize,
) -> Result<Option<MessageId>, PlatformError> {
    let mut scanned = 0usize;
    let mut before = None;

    while scanned < history_limit {
        let page_size = (history_limit - scanned).min(HISTORY_PAGE_SIZE);
        let page = platform
            .message_history(pins_channel, before, page_size as u8)
            .await?;

        for entry in page.iter().take(page_size) {
            scanned += 1;
            if entry.first_embed_url.as_deref() == Some(permalink) {
                debug!(
                    "located preview channel_id={} preview_id={} scanned={}",
                    pins_channel, entry.id, scanned
                );
                return Ok(Some(entry.id));
            }
        }

        if page.len() < page_size {
            break;
        }
        before = page.last().map(|entry| entry.id);
    }

    debug!(
        "no preview found channel_id={} permalink={} scanned={}",
        pins_channel, permalink, scanned
    );
    Ok(None)
}
