use anyhow::Result;
use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::api::{HydraApi, WizardApi};
use crate::domain::{CommentItem, FieldState, ParameterSave, TreeNode};
use crate::schema::wire_value;

use super::notify::{ChangeNotifier, Subscription};

/// Durable identity of an edited leaf: owning file plus dotted input path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditKey {
    pub file_id: String,
    pub input_url: String,
}

impl EditKey {
    pub fn new(file_id: impl Into<String>, input_url: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            input_url: input_url.into(),
        }
    }
}

/// State container for the tree browser.
///
/// Owns the currently loaded tree, navigation state and the set of
/// edited-but-uncommitted leaves. Every setter notifies subscribers
/// synchronously before returning. The container itself never issues
/// requests except on explicit commit calls, and a failed commit keeps the
/// pending edits so the user may retry.
#[derive(Debug, Default)]
pub struct SettingsState {
    tree: Option<TreeNode>,
    current_output_url: String,
    current_display_name_path: String,
    output_urls: IndexMap<String, String>,
    expand: bool,
    modify_time: Option<NaiveDateTime>,
    search_query: String,
    edits: IndexMap<EditKey, FieldState>,
    comment_queue: Vec<CommentItem>,
    notifier: ChangeNotifier,
}

impl SettingsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&self, callback: impl Fn() + 'static) -> Subscription {
        self.notifier.subscribe(callback)
    }

    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    pub fn set_tree(&mut self, tree: Option<TreeNode>) {
        self.tree = tree;
        self.notifier.notify();
    }

    pub fn current_output_url(&self) -> &str {
        &self.current_output_url
    }

    pub fn set_current_output_url(&mut self, url: impl Into<String>) {
        self.current_output_url = url.into();
        self.notifier.notify();
    }

    pub fn current_display_name_path(&self) -> &str {
        &self.current_display_name_path
    }

    pub fn set_current_display_name_path(&mut self, path: impl Into<String>) {
        self.current_display_name_path = path.into();
        self.notifier.notify();
    }

    pub fn output_urls(&self) -> &IndexMap<String, String> {
        &self.output_urls
    }

    pub fn set_output_urls(&mut self, urls: IndexMap<String, String>) {
        self.output_urls = urls;
        self.notifier.notify();
    }

    pub fn expand(&self) -> bool {
        self.expand
    }

    pub fn set_expand(&mut self, expand: bool) {
        self.expand = expand;
        self.notifier.notify();
    }

    pub fn modify_time(&self) -> Option<NaiveDateTime> {
        self.modify_time
    }

    pub fn set_modify_time(&mut self, time: Option<NaiveDateTime>) {
        self.modify_time = time;
        self.notifier.notify();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.notifier.notify();
    }

    /// Stages a deep copy of an edited leaf under its durable identity.
    /// Staging the same key again overwrites the previous pending edit.
    pub fn stage_edit(&mut self, key: EditKey, field: FieldState) {
        self.edits.insert(key, field);
        self.notifier.notify();
    }

    /// Drops a pending edit, returning it so the caller can restore the
    /// original leaf from an earlier deep copy.
    pub fn discard_edit(&mut self, key: &EditKey) -> Option<FieldState> {
        let removed = self.edits.shift_remove(key);
        if removed.is_some() {
            self.notifier.notify();
        }
        removed
    }

    pub fn edits(&self) -> &IndexMap<EditKey, FieldState> {
        &self.edits
    }

    pub fn has_pending_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    pub fn queue_comment(&mut self, item: CommentItem) {
        self.comment_queue.push(item);
        self.notifier.notify();
    }

    pub fn comment_queue(&self) -> &[CommentItem] {
        &self.comment_queue
    }

    /// Wire payload for the commit endpoint: one `{input_url, value,
    /// file_id}` triple per edited leaf, not the full schema.
    pub fn save_payload(&self) -> Vec<ParameterSave> {
        self.edits
            .iter()
            .map(|(key, field)| ParameterSave {
                input_url: key.input_url.clone(),
                value: field
                    .value
                    .as_ref()
                    .map(wire_value)
                    .unwrap_or(serde_json::Value::Null),
                file_id: key.file_id.clone(),
            })
            .collect()
    }

    /// Commits all pending edits. The edit set is cleared only after a
    /// successful round trip; on failure it is retained for retry.
    pub async fn commit_edits(&mut self, api: &HydraApi, form_url: &str) -> Result<()> {
        if self.edits.is_empty() {
            return Ok(());
        }
        let payload = self.save_payload();
        api.set_values(form_url, &payload).await?;
        self.edits.clear();
        self.notifier.notify();
        Ok(())
    }

    /// Flushes the comment-out queue as one batched request. Same retry
    /// semantics as [`Self::commit_edits`].
    pub async fn flush_comments(&mut self, api: &WizardApi) -> Result<()> {
        if self.comment_queue.is_empty() {
            return Ok(());
        }
        api.comment_out(&self.comment_queue).await?;
        self.comment_queue.clear();
        self.notifier.notify();
        Ok(())
    }
}
