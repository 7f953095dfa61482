use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::models::MediaItem;

use super::{Timeline, TimelineEntry};

/// Spacing between items that share a timestamp.
pub const TIE_BREAK_STEP_MS: i64 = 1;

fn step() -> Duration {
    Duration::milliseconds(TIE_BREAK_STEP_MS)
}

/// Merge photos and videos into one strictly ordered timeline.
pub fn build_timeline(photos: &[MediaItem], videos: &[MediaItem]) -> Timeline {
    let photos = flatten(photos);
    let videos = flatten(videos);

    let mut merged = Vec::with_capacity(photos.len() + videos.len());
    let mut photos = photos.into_iter().peekable();
    let mut videos = videos.into_iter().peekable();

    loop {
        let take_photo = match (photos.peek(), videos.peek()) {
            (Some(p), Some(v)) => p.key <= v.key,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_photo { photos.next() } else { videos.next() };
        merged.extend(next);
    }

    // A photo and a video can still share a key after merging
    enforce_strict_order(&mut merged);
    Timeline::from_entries(merged)
}

/// Group one list by timestamp, order each group by file name and give
/// every member its own key.
fn flatten(items: &[MediaItem]) -> Vec<TimelineEntry> {
    let mut groups: BTreeMap<NaiveDateTime, Vec<&MediaItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.captured).or_default().push(item);
    }

    let mut entries = Vec::with_capacity(items.len());
    for (captured, mut group) in groups {
        group.sort_by_key(|item| item.file_name());
        let mut key = captured;
        for item in group {
            entries.push(TimelineEntry {
                key,
                item: item.clone(),
            });
            key += step();
        }
    }

    // A large group can spill into the next timestamp
    enforce_strict_order(&mut entries);
    entries
}

fn enforce_strict_order(entries: &mut [TimelineEntry]) {
    for i in 1..entries.len() {
        let floor = entries[i - 1].key + step();
        if entries[i].key < floor {
            entries[i].key = floor;
        }
    }
}
