use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{DetailLevel, LearningItem, LearningType, NewLearningItem, Summarizer};

/// Learning items, most recent first.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearningRegistry {
    items: Vec<LearningItem>,
}

impl LearningRegistry {
    pub fn new(items: Vec<LearningItem>) -> Self {
        LearningRegistry { items }
    }

    pub fn items(&self) -> &[LearningItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&LearningItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn add_item(
        &mut self,
        fields: NewLearningItem,
        detail: DetailLevel,
        summarizer: &dyn Summarizer,
    ) -> &LearningItem {
        let summary = summarizer.summarize(&fields.description, detail);
        let item = LearningItem::new(fields, summary);
        info!(id = %item.id, kind = %item.kind, %detail, "learning item added");
        self.items.insert(0, item);
        &self.items[0]
    }

    /// Flips `completed` on the matching item. Unknown ids are ignored.
    pub fn toggle_completed(&mut self, item_id: &str) -> Option<bool> {
        match self.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                item.completed = !item.completed;
                info!(item_id, completed = item.completed, "learning item toggled");
                Some(item.completed)
            },
            None => {
                warn!(item_id, "toggle for unknown learning item ignored");
                None
            },
        }
    }

    pub fn filter_by_type(&self, kind: Option<LearningType>) -> Vec<&LearningItem> {
        self.items
            .iter()
            .filter(|item| kind.map_or(true, |k| item.kind == k))
            .collect()
    }
}
