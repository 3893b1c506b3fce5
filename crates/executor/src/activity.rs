use crate::context::ActivityContext;
use crate::error::ExecutorError;

/// Executes one kind of workflow activity.
///
/// Implementations read their configuration from `activity`, use the
/// capabilities in `ctx` and record results as output variables on `ctx`.
pub trait ActivityExecutor: Send + Sync {
    /// Configuration type of the activity.
    type Activity: Sync;

    fn execute(
        &self,
        activity: &Self::Activity,
        ctx: &mut ActivityContext,
    ) -> impl std::future::Future<Output = Result<(), ExecutorError>> + Send;
}
