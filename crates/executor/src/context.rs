use std::collections::BTreeMap;
use std::sync::Arc;

use herald_core::TriggeringEvent;
use herald_messaging::{DynMessageService, ResourceLoader};
use serde::Serialize;

/// Output variables written by one activity invocation.
///
/// Later workflow steps read them as `<activityId>.outputs.<key>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputVariables(BTreeMap<String, serde_json::Value>);

impl OutputVariables {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Everything an activity needs at execution time, supplied by the engine.
pub struct ActivityContext {
    activity_id: String,
    event: Option<TriggeringEvent>,
    messages: Arc<dyn DynMessageService>,
    resources: Arc<dyn ResourceLoader>,
    outputs: OutputVariables,
}

impl ActivityContext {
    pub fn new(
        activity_id: impl Into<String>,
        messages: Arc<dyn DynMessageService>,
        resources: Arc<dyn ResourceLoader>,
    ) -> Self {
        Self {
            activity_id: activity_id.into(),
            event: None,
            messages,
            resources,
            outputs: OutputVariables::default(),
        }
    }

    /// Set the event that triggered the workflow.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<TriggeringEvent>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn activity_id(&self) -> &str {
        &self.activity_id
    }

    pub fn event(&self) -> Option<&TriggeringEvent> {
        self.event.as_ref()
    }

    pub fn messages(&self) -> &Arc<dyn DynMessageService> {
        &self.messages
    }

    pub fn resources(&self) -> &Arc<dyn ResourceLoader> {
        &self.resources
    }

    pub fn set_output_variable(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.outputs.set(key, value);
    }

    pub fn output_variable(&self, key: &str) -> Option<&serde_json::Value> {
        self.outputs.get(key)
    }

    pub fn outputs(&self) -> &OutputVariables {
        &self.outputs
    }

    /// Fully qualified name of an output variable, as referenced from other
    /// workflow steps.
    pub fn qualified_name(&self, key: &str) -> String {
        format!("{}.outputs.{key}", self.activity_id)
    }
}

impl std::fmt::Debug for ActivityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityContext")
            .field("activity_id", &self.activity_id)
            .field("event", &self.event)
            .field("messages", &self.messages.name())
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}
