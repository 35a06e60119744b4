use std::sync::Arc;

use crate::error::Result;
use crate::models::{EclecticMap, TeeHoleScore, UserId};
use crate::store::RoundStore;

/// Fewest strokes per (tee, hole) across the given scores
pub fn build_eclectic(scores: &[TeeHoleScore]) -> EclecticMap {
    let mut map = EclecticMap::new();

    for score in scores {
        map.entry(score.tee_id)
            .or_default()
            .entry(score.hole_number)
            .and_modify(|best| *best = (*best).min(score.strokes))
            .or_insert(score.strokes);
    }

    map
}

/// Best-ever round per tee, assembled hole by hole from the whole history
#[derive(Clone)]
pub struct EclecticAggregator {
    store: Arc<dyn RoundStore>,
}

impl EclecticAggregator {
    pub fn new(store: Arc<dyn RoundStore>) -> Self {
        Self { store }
    }

    pub fn for_user(&self, user_id: UserId) -> Result<EclecticMap> {
        let scores = self.store.tee_hole_scores(user_id)?;

        Ok(build_eclectic(&scores))
    }
}
