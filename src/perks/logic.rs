//! Level-up perk offers.

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{PerkId, PerkSet};
use crate::core::constants::PERK_OFFER_SIZE;

/// Sample up to three distinct perks the player does not hold yet.
/// Returns an empty offer once every perk is held.
pub fn roll_perk_offer<R: Rng>(held: &PerkSet, rng: &mut R) -> Vec<PerkId> {
    let available = held.missing();
    available
        .choose_multiple(rng, PERK_OFFER_SIZE)
        .copied()
        .collect()
}
