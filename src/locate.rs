// Infer the quest from where a solution lives: `ec2024/q01.rs` is quest 1
// of event 2024.

use std::path::Path;

use tracing::info;

use crate::types::QuestId;

pub fn quest_from_path(path: &Path) -> Option<QuestId> {
    let stem = path.file_stem()?.to_str()?;
    let parent = path.parent()?.file_name()?.to_str()?;

    let digits = stem.strip_prefix('q')?;
    // `q1` and `q01` are fine, `q001` is not.
    if digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let quest: u32 = digits.parse().ok()?;
    if !(1..=20).contains(&quest) {
        return None;
    }

    let year = parent.strip_prefix("ec")?;
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let event: u32 = year.parse().ok()?;

    info!("introspect quest={} event={} from {}", quest, event, path.display());
    Some(QuestId::new(quest, event))
}
