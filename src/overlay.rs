use crate::effects::WaveKind;
use crate::feed::FeedLog;
use web_sys as web;

fn button_id(kind: WaveKind) -> &'static str {
    match kind {
        WaveKind::Emp => "emp-button",
        WaveKind::Sound => "sound-button",
    }
}

pub fn control_ids() -> [(&'static str, WaveKind); 2] {
    WaveKind::ALL.map(|k| (button_id(k), k))
}

/// Replace the feed panel with the current log, newest at the bottom.
pub fn update_feed_log(document: &web::Document, log: &FeedLog) {
    if let Some(el) = document.get_element_by_id("feed-log") {
        let text = log.lines().collect::<Vec<_>>().join("\n");
        el.set_text_content(Some(&text));
        el.set_scroll_top(el.scroll_height());
    }
}
