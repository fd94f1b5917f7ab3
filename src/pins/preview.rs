use super::model::{EmbedContent, EmbedField, EmbedFooter, OriginMessage};

pub const PREVIEW_TITLE: &str = "Jump to pinned message";
pub const MAX_DESCRIPTION_CHARS: usize = 500;
/// Discord rejects messages carrying more embeds than this.
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;
pub const ATTACHMENTS_FIELD: &str = "Attachments";
const TRUNCATION_SUFFIX: &str = "...";
const PREVIEW_COLOUR: u32 = 0xE74C3C;

/// Cuts `text` to `MAX_DESCRIPTION_CHARS` characters, marking the cut with an
/// ellipsis.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], TRUNCATION_SUFFIX),
        None => text.to_string(),
    }
}

pub fn render_preview(origin: &OriginMessage) -> EmbedContent {
    let mut preview = EmbedContent {
        title: Some(PREVIEW_TITLE.to_string()),
        description: Some(truncate_description(&origin.content)),
        url: Some(origin.permalink()),
        timestamp: Some(origin.timestamp),
        colour: Some(PREVIEW_COLOUR),
        footer: Some(EmbedFooter {
            text: format!("{} in #{}", origin.author.name, origin.channel_name),
            icon_url: origin.author.avatar_url.clone(),
        }),
        ..EmbedContent::default()
    };

    if let Some((first, rest)) = origin.attachments.split_first() {
        preview.image = Some(first.url.clone());

        if !rest.is_empty() {
            let names: Vec<&str> = rest.iter().map(|a| a.filename.as_str()).collect();
            preview.fields.push(EmbedField {
                name: ATTACHMENTS_FIELD.to_string(),
                value: names.join(", "),
                inline: false,
            });
        }
    }

    preview
}

/// Everything posted into the pins channel for `origin`: the preview first,
/// then as many of the origin's own embeds as still fit in one message.
pub fn preview_message_embeds(origin: &OriginMessage) -> Vec<EmbedContent> {
    std::iter::once(render_preview(origin))
        .chain(origin.embeds.iter().take(MAX_EMBEDS_PER_MESSAGE - 1).cloned())
        .collect()
}
