use async_trait::async_trait;
use clash_battle::BattleField;

use crate::action::BattleAction;

/// Presentation layer: animations, text boxes, a terminal printer.
///
/// Called once per action after its logic has run. Implementations must
/// not assume they can change the battle; they only get a shared field.
#[async_trait]
pub trait BattleView: Send + Sync {
    async fn present(&self, action: &BattleAction, field: &BattleField) {
        let _ = (action, field);
    }
}

/// Presents nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

#[async_trait]
impl BattleView for NullView {}

/// Writes each action to the tracing subscriber at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingView;

#[async_trait]
impl BattleView for TracingView {
    async fn present(&self, action: &BattleAction, field: &BattleField) {
        tracing::debug!(turn = field.turn(), kind = action.kind().name(), "{action}");
    }
}
