//! Fitted return-category classifier consumed by the classifier strategy.

use crate::domain::return_category::ReturnCategory;

/// A pre-fitted model mapping three consecutive closes to a predicted
/// return category. Inference must be side-effect free so one model can be
/// shared between strategy instances.
pub trait ClassifierPort: Send + Sync {
    fn predict(&self, window: &[f64; 3]) -> ReturnCategory;
}
